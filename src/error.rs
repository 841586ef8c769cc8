//! Error types for the square run

use std::fmt;
use std::path::PathBuf;

use opencl3::error_codes::ClError;
use opencl3::types::cl_int;
use thiserror::Error;

/// Status code returned by the OpenCL runtime
///
/// Prints as the numeric code followed by its symbolic name,
/// e.g. `-11 (CL_BUILD_PROGRAM_FAILURE)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub cl_int);

impl Status {
    /// Raw runtime code
    pub fn code(self) -> cl_int {
        self.0
    }
}

impl From<ClError> for Status {
    fn from(e: ClError) -> Self {
        Self(e.0)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, ClError(self.0))
    }
}

/// Which of the two device buffers an allocation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferRole {
    Input,
    Output,
}

impl fmt::Display for BufferRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferRole::Input => write!(f, "input"),
            BufferRole::Output => write!(f, "output"),
        }
    }
}

/// Every way the square run can fail
///
/// A validation mismatch is not in here: it is reported through
/// [`crate::Outcome`] and does not abort the run.
#[derive(Debug, Error)]
pub enum SquareError {
    #[error("Error getting platform: {0}")]
    Platform(Status),

    #[error("No OpenCL platforms found")]
    NoPlatform,

    #[error("No OpenCL devices found")]
    NoDevice,

    #[error("Error creating context: {0}")]
    Context(Status),

    #[error("Error creating command queue: {0}")]
    Queue(Status),

    #[error("Could not find {name} in bundle")]
    ResourceNotFound { name: String, searched: Vec<PathBuf> },

    #[error("Could not read {}: {source}", .path.display())]
    ResourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error creating program: {0}")]
    ProgramCreate(Status),

    #[error("Error building program: {status}\nBuild log:\n{log}")]
    Build { status: Status, log: String },

    #[error("Error creating kernel '{name}': {status}")]
    KernelLookup { name: String, status: Status },

    #[error("Error creating {role} buffer: {status}")]
    Allocation { role: BufferRole, status: Status },

    #[error("Error setting kernel arguments: {0}")]
    ArgumentBinding(Status),

    #[error("Error executing kernel: {0}")]
    Dispatch(Status),

    #[error("Error reading results: {0}")]
    ReadBack(Status),
}

impl SquareError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T> = std::result::Result<T, SquareError>;
