//! hello-opencl: square an array on an OpenCL device
//!
//! Sets up an OpenCL session (GPU preferred, CPU as fallback), compiles the
//! `square` kernel from the bundled `kernel.cl`, runs it over
//! [`NUM_VALUES`] floats and checks every result against the host.
//!
//! # Modules
//!
//! - **resource**: locating `kernel.cl` in the application bundle
//! - **device**: platform/device selection, context and queue
//! - **compiler**: program build, build log, entry point lookup
//! - **buffer**: device buffers and read-back
//! - **kernel**: argument binding and dispatch
//! - **validate**: host reference check
//! - **runner**: the whole sequence
//!
//! # Usage
//!
//! ```no_run
//! use hello_opencl::{Outcome, RunConfig, run};
//!
//! match run(&RunConfig::default()) {
//!     Ok(Outcome::Verified) => {}
//!     Ok(Outcome::Mismatch(m)) => eprintln!("first bad element: {}", m.index),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod buffer;
pub mod compiler;
pub mod device;
pub mod error;
pub mod kernel;
pub mod resource;
pub mod runner;
pub mod validate;

// ============================================================================
// Re-exports
// ============================================================================

pub use buffer::DeviceBuffers;
pub use compiler::{CompiledKernel, ENTRY_POINT};
pub use device::{Accelerator, DeviceKind};
pub use error::{BufferRole, SquareError, Status};
pub use runner::{Outcome, RunConfig, SUCCESS_MESSAGE, run};
pub use validate::Mismatch;

// ============================================================================
// Constants
// ============================================================================

/// Number of elements squared per run, one work item each
pub const NUM_VALUES: usize = 1024;

/// File name of the kernel source resource
pub const KERNEL_FILE: &str = "kernel.cl";
