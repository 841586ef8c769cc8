//! Kernel program compilation

use log::{debug, info, trace};
use opencl3::kernel::Kernel;
use opencl3::program::Program;

use crate::device::Accelerator;
use crate::error::{Result, SquareError, Status};

/// Name of the kernel function the host dispatches
pub const ENTRY_POINT: &str = "square";

/// A built program and the kernel extracted from it
///
/// The kernel field comes first so it is released before its program.
pub struct CompiledKernel {
    kernel: Kernel,
    #[allow(dead_code)]
    program: Program,
    name: String,
}

impl CompiledKernel {
    /// The kernel handle
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Entry point name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for CompiledKernel {
    fn drop(&mut self) {
        debug!("Releasing kernel '{}' and its program", self.name);
    }
}

/// Compile `source` for the session's device and look up `entry_point`
///
/// On a build failure the device's full build log is fetched and carried in
/// the returned error.
pub fn compile(
    accelerator: &Accelerator,
    source: &str,
    entry_point: &str,
    build_options: &str,
) -> Result<CompiledKernel> {
    trace!("Kernel source:\n{}", source);

    let mut program = Program::create_from_source(accelerator.context(), source)
        .map_err(|e| SquareError::ProgramCreate(Status::from(e)))?;

    let device_id = accelerator.device().id();
    if let Err(e) = program.build(&[device_id], build_options) {
        let log = match program.get_build_log(device_id) {
            Ok(log) if !log.trim().is_empty() => log,
            Ok(_) => "(the compiler produced an empty build log)".to_string(),
            Err(log_err) => format!("(build log unavailable: {})", Status::from(log_err)),
        };
        return Err(SquareError::Build {
            status: Status::from(e),
            log,
        });
    }
    info!(
        "Built program for {} (options: {:?})",
        accelerator.name(),
        build_options
    );

    let kernel = Kernel::create(&program, entry_point).map_err(|e| SquareError::KernelLookup {
        name: entry_point.to_string(),
        status: Status::from(e),
    })?;

    Ok(CompiledKernel {
        kernel,
        program,
        name: entry_point.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::test_accelerator;

    const SQUARE_SOURCE: &str = include_str!("../resources/kernel.cl");

    #[test]
    fn test_compile_square_kernel() {
        let Some(accelerator) = test_accelerator() else {
            return;
        };

        let compiled = compile(&accelerator, SQUARE_SOURCE, ENTRY_POINT, "");
        assert!(
            compiled.is_ok(),
            "Failed to compile kernel: {:?}",
            compiled.err()
        );
        assert_eq!(compiled.unwrap().name(), ENTRY_POINT);
    }

    #[test]
    fn test_compile_error_carries_build_log() {
        let Some(accelerator) = test_accelerator() else {
            return;
        };

        let broken = "__kernel void square(__global const float* input, __global float* output) {\n    output[i] = undeclared_value;\n}\n";

        match compile(&accelerator, broken, ENTRY_POINT, "") {
            Err(SquareError::Build { log, .. }) => {
                assert!(!log.trim().is_empty());
                println!("Build log:\n{}", log);
            }
            Err(other) => panic!("expected a build error, got {}", other),
            Ok(_) => panic!("broken source compiled"),
        }
    }

    #[test]
    fn test_unknown_entry_point() {
        let Some(accelerator) = test_accelerator() else {
            return;
        };

        match compile(&accelerator, SQUARE_SOURCE, "cube", "") {
            Err(SquareError::KernelLookup { name, .. }) => assert_eq!(name, "cube"),
            Err(other) => panic!("expected a lookup error, got {}", other),
            Ok(_) => panic!("lookup of a missing entry point succeeded"),
        }
    }
}
