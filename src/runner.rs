//! The square run: setup, dispatch, read-back, validation
//!
//! Each step returns early on failure. Handles are owned values, so whatever
//! was acquired before a failing step is released on the way out, most
//! recently acquired first.

use std::path::PathBuf;

use log::info;

use crate::buffer::DeviceBuffers;
use crate::compiler::{self, ENTRY_POINT};
use crate::device::Accelerator;
use crate::error::Result;
use crate::kernel;
use crate::resource::{self, KERNEL_PATH_ENV};
use crate::validate::{self, Mismatch};
use crate::{KERNEL_FILE, NUM_VALUES};

/// Line printed when every element checks out
pub const SUCCESS_MESSAGE: &str = "All values were properly squared!";

/// Run settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Kernel source path; the bundle search is used when unset
    pub kernel_path: Option<PathBuf>,
    /// Options passed to the program build
    pub build_options: String,
    /// Treat a validation mismatch as a failure
    pub strict: bool,
}

impl RunConfig {
    /// Defaults, with the kernel path taken from `HELLO_OPENCL_KERNEL` if set
    pub fn from_env() -> Self {
        Self {
            kernel_path: std::env::var_os(KERNEL_PATH_ENV).map(PathBuf::from),
            ..Self::default()
        }
    }
}

/// Result of a run that got as far as validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Verified,
    Mismatch(Mismatch),
}

impl Outcome {
    /// Process exit status
    ///
    /// A mismatch only fails the process in strict mode.
    pub fn exit_code(&self, strict: bool) -> i32 {
        match self {
            Outcome::Verified => 0,
            Outcome::Mismatch(_) if strict => 2,
            Outcome::Mismatch(_) => 0,
        }
    }
}

/// Square `NUM_VALUES` floats on the device and check them on the host
///
/// Prints the device name, then either the first mismatch or
/// [`SUCCESS_MESSAGE`].
pub fn run(config: &RunConfig) -> Result<Outcome> {
    let kernel_path = resource::resolve(KERNEL_FILE, config.kernel_path.as_deref())?;

    let accelerator = Accelerator::new()?;

    let source = resource::read_text(&kernel_path)?;
    let compiled = compiler::compile(&accelerator, &source, ENTRY_POINT, &config.build_options)?;

    let input = validate::input_values(NUM_VALUES);
    let buffers = DeviceBuffers::stage(accelerator.context(), &input)?;

    kernel::dispatch(accelerator.queue(), &compiled, &buffers)?;
    let output = buffers.read_output(accelerator.queue())?;

    let outcome = match validate::first_mismatch(&input, &output) {
        None => {
            println!("{}", SUCCESS_MESSAGE);
            Outcome::Verified
        }
        Some(mismatch) => {
            println!("{}", mismatch);
            Outcome::Mismatch(mismatch)
        }
    };
    info!("Run finished on {}: {:?}", accelerator.name(), outcome);

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_exit_codes() {
        let mismatch = Outcome::Mismatch(Mismatch {
            index: 0,
            observed: 1.0,
            expected: 0.0,
        });

        assert_eq!(Outcome::Verified.exit_code(false), 0);
        assert_eq!(Outcome::Verified.exit_code(true), 0);
        assert_eq!(mismatch.exit_code(false), 0);
        assert_eq!(mismatch.exit_code(true), 2);
    }

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.kernel_path, None);
        assert!(config.build_options.is_empty());
        assert!(!config.strict);
    }
}
