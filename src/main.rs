//! hello-opencl: square 1024 floats on an OpenCL device
//!
//! Usage:
//!   hello-opencl [OPTIONS]
//!
//! Examples:
//!   hello-opencl
//!   hello-opencl --kernel ./kernel.cl
//!   hello-opencl --strict -v

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use hello_opencl::{RunConfig, run};

/// Square an array on an OpenCL device and verify it on the host
#[derive(Parser, Debug)]
#[command(name = "hello-opencl")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Kernel source file (default: kernel.cl from the application bundle)
    #[arg(short, long, value_name = "PATH")]
    kernel: Option<PathBuf>,

    /// Options passed to the OpenCL program build
    #[arg(long, value_name = "OPTS", default_value = "", allow_hyphen_values = true)]
    build_options: String,

    /// Exit with status 2 when a result does not match
    #[arg(long)]
    strict: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    let mut config = RunConfig::from_env();
    if let Some(path) = args.kernel {
        config.kernel_path = Some(path);
    }
    config.build_options = args.build_options;
    config.strict = args.strict;

    // Errors go to stdout along with the rest of the run's output.
    let code = match run(&config) {
        Ok(outcome) => outcome.exit_code(config.strict),
        Err(e) => {
            println!("{}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}
