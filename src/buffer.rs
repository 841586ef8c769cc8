//! Device buffers for the square kernel

use std::ptr;

use log::debug;
use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::memory::{Buffer, CL_MEM_COPY_HOST_PTR, CL_MEM_READ_ONLY, CL_MEM_WRITE_ONLY};
use opencl3::types::{CL_BLOCKING, cl_float};

use crate::error::{BufferRole, Result, SquareError, Status};

/// Input and output buffers of equal length
///
/// The input is read-only and filled from host memory at creation; the
/// output is write-only and starts uninitialized.
pub struct DeviceBuffers {
    input: Buffer<cl_float>,
    output: Buffer<cl_float>,
    len: usize,
}

impl DeviceBuffers {
    /// Allocate both buffers, copying `input` into the first
    ///
    /// If the output allocation fails the input buffer is released before
    /// returning.
    pub fn stage(context: &Context, input: &[cl_float]) -> Result<Self> {
        let len = input.len();

        // CL_MEM_COPY_HOST_PTR only reads from the host pointer.
        let input_buffer = unsafe {
            Buffer::<cl_float>::create(
                context,
                CL_MEM_READ_ONLY | CL_MEM_COPY_HOST_PTR,
                len,
                input.as_ptr().cast_mut().cast(),
            )
        }
        .map_err(|e| SquareError::Allocation {
            role: BufferRole::Input,
            status: Status::from(e),
        })?;

        let output_buffer = unsafe {
            Buffer::<cl_float>::create(context, CL_MEM_WRITE_ONLY, len, ptr::null_mut())
        }
        .map_err(|e| SquareError::Allocation {
            role: BufferRole::Output,
            status: Status::from(e),
        })?;

        debug!(
            "Allocated input/output buffers ({} bytes each)",
            len * size_of::<cl_float>()
        );

        Ok(Self {
            input: input_buffer,
            output: output_buffer,
            len,
        })
    }

    pub fn input(&self) -> &Buffer<cl_float> {
        &self.input
    }

    pub fn output(&self) -> &Buffer<cl_float> {
        &self.output
    }

    /// Number of elements in each buffer
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Blocking copy of the output buffer into a new host vector
    ///
    /// Returns only after every command queued before it, including the
    /// kernel dispatch, has completed.
    pub fn read_output(&self, queue: &CommandQueue) -> Result<Vec<cl_float>> {
        let mut host = vec![0.0; self.len];
        unsafe { queue.enqueue_read_buffer(&self.output, CL_BLOCKING, 0, &mut host, &[]) }
            .map_err(|e| SquareError::ReadBack(Status::from(e)))?;
        Ok(host)
    }
}

impl Drop for DeviceBuffers {
    fn drop(&mut self) {
        debug!("Releasing input/output buffers");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::test_accelerator;

    #[test]
    fn test_stage_and_read_back_unwritten_output() {
        let Some(accelerator) = test_accelerator() else {
            return;
        };

        let data: Vec<f32> = vec![1.0, 2.0, 3.0, 4.0];
        let buffers = DeviceBuffers::stage(accelerator.context(), &data).unwrap();
        assert_eq!(buffers.len(), 4);
        assert!(!buffers.is_empty());

        // Contents are unspecified before a kernel writes them; only the
        // length is checked.
        let host = buffers.read_output(accelerator.queue()).unwrap();
        assert_eq!(host.len(), 4);
    }

    #[test]
    fn test_input_buffer_holds_host_data() {
        let Some(accelerator) = test_accelerator() else {
            return;
        };

        let data: Vec<f32> = (0..16).map(|i| i as f32 * 0.5).collect();
        let buffers = DeviceBuffers::stage(accelerator.context(), &data).unwrap();

        let mut host = vec![0.0f32; data.len()];
        unsafe {
            accelerator
                .queue()
                .enqueue_read_buffer(buffers.input(), CL_BLOCKING, 0, &mut host, &[])
                .unwrap();
        }
        assert_eq!(host, data);
    }
}
