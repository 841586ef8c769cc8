//! Square kernel dispatch

use std::ptr;

use log::debug;
use opencl3::command_queue::CommandQueue;
use opencl3::memory::ClMem;

use crate::buffer::DeviceBuffers;
use crate::compiler::CompiledKernel;
use crate::error::{Result, SquareError, Status};

/// Bind `(input, output)` as arguments 0 and 1 and enqueue one work item per
/// element over a 1-D range
///
/// Returns once the command is queued; the blocking read-back is what waits
/// for it to finish.
pub fn dispatch(
    queue: &CommandQueue,
    compiled: &CompiledKernel,
    buffers: &DeviceBuffers,
) -> Result<()> {
    let kernel = compiled.kernel();

    unsafe {
        kernel
            .set_arg(0, &buffers.input().get())
            .and_then(|_| kernel.set_arg(1, &buffers.output().get()))
    }
    .map_err(|e| SquareError::ArgumentBinding(Status::from(e)))?;

    let global_work_size = [buffers.len()];
    let _event = unsafe {
        queue.enqueue_nd_range_kernel(
            kernel.get(),
            1,
            ptr::null(),
            global_work_size.as_ptr(),
            ptr::null(),
            &[],
        )
    }
    .map_err(|e| SquareError::Dispatch(Status::from(e)))?;

    debug!(
        "Enqueued '{}' over {} work items",
        compiled.name(),
        global_work_size[0]
    );
    Ok(())
}
