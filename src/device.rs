//! OpenCL device selection and session setup

use std::fmt;
use std::io::{self, Write};

use log::{debug, info};
use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::device::{CL_DEVICE_TYPE_CPU, CL_DEVICE_TYPE_GPU, Device};
use opencl3::platform::get_platforms;
use opencl3::types::cl_device_type;

use crate::error::{Result, SquareError, Status};

/// Class of compute device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Gpu,
    Cpu,
}

impl DeviceKind {
    /// Order in which device classes are tried
    pub const PREFERENCE: [DeviceKind; 2] = [DeviceKind::Gpu, DeviceKind::Cpu];

    /// OpenCL device type bitfield for this class
    pub fn cl_type(self) -> cl_device_type {
        match self {
            DeviceKind::Gpu => CL_DEVICE_TYPE_GPU,
            DeviceKind::Cpu => CL_DEVICE_TYPE_CPU,
        }
    }

    /// Next class to try when this one has no devices
    pub fn fallback(self) -> Option<DeviceKind> {
        match self {
            DeviceKind::Gpu => Some(DeviceKind::Cpu),
            DeviceKind::Cpu => None,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Gpu => write!(f, "GPU"),
            DeviceKind::Cpu => write!(f, "CPU"),
        }
    }
}

/// Pick the first device of the most preferred class
///
/// `query` lists the devices of one class. A query error counts as "no
/// devices of that class", which is how the runtime reports an empty class.
/// Each fallback to the next class is announced on `out`.
pub fn select_device<T, E, F, W>(mut query: F, out: &mut W) -> Option<(DeviceKind, T)>
where
    E: fmt::Debug,
    F: FnMut(DeviceKind) -> std::result::Result<Vec<T>, E>,
    W: Write,
{
    for kind in DeviceKind::PREFERENCE {
        match query(kind) {
            Ok(devices) => {
                if let Some(device) = devices.into_iter().next() {
                    return Some((kind, device));
                }
                debug!("{} query returned no devices", kind);
            }
            Err(e) => debug!("{} query failed: {:?}", kind, e),
        }

        if let Some(next) = kind.fallback() {
            let _ = writeln!(out, "No {} found, trying {}...", kind, next);
        }
    }
    None
}

/// Whether the first of `platforms` has a device [`select_device`] would pick
pub fn first_platform_has_device<P, T, E, F>(platforms: &[P], mut query: F) -> bool
where
    E: fmt::Debug,
    F: FnMut(&P, DeviceKind) -> std::result::Result<Vec<T>, E>,
{
    platforms.first().is_some_and(|platform| {
        select_device(|kind| query(platform, kind), &mut io::sink()).is_some()
    })
}

/// An initialized OpenCL session
///
/// Holds the selected device, its context and a single in-order command
/// queue. Fields drop top to bottom, so the queue is released before the
/// context.
pub struct Accelerator {
    queue: CommandQueue,
    context: Context,
    device: Device,
    kind: DeviceKind,
    name: String,
}

impl Accelerator {
    /// Whether [`Accelerator::new`] would find a device
    ///
    /// Applies the same first-platform, GPU-then-CPU search without printing.
    pub fn is_available() -> bool {
        get_platforms()
            .map(|platforms| {
                first_platform_has_device(&platforms, |platform, kind| {
                    platform.get_devices(kind.cl_type())
                })
            })
            .unwrap_or(false)
    }

    /// Set up a session on the first platform, GPU first, CPU as fallback
    ///
    /// Prints the selected device name.
    pub fn new() -> Result<Self> {
        let platforms = get_platforms().map_err(|e| SquareError::Platform(e.into()))?;
        let platform = platforms.first().ok_or(SquareError::NoPlatform)?;
        debug!(
            "Using platform {}",
            platform.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let (kind, device_id) = select_device(
            |kind| platform.get_devices(kind.cl_type()),
            &mut io::stdout(),
        )
        .ok_or(SquareError::NoDevice)?;
        let device = Device::new(device_id);

        let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        println!("Using device: {}", name);

        let context =
            Context::from_device(&device).map_err(|e| SquareError::Context(Status::from(e)))?;
        #[allow(deprecated)]
        let queue = CommandQueue::create_default(&context, 0)
            .map_err(|e| SquareError::Queue(Status::from(e)))?;

        info!("Created context and command queue on {} device {}", kind, name);

        Ok(Self {
            queue,
            context,
            device,
            kind,
            name,
        })
    }

    /// Device name as reported by the runtime
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class of the selected device
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }
}

impl Drop for Accelerator {
    fn drop(&mut self) {
        debug!("Releasing command queue and context for {}", self.name);
    }
}

/// Session for device-gated tests, or `None` when this host has no usable device
#[cfg(test)]
pub(crate) fn test_accelerator() -> Option<Accelerator> {
    if !Accelerator::is_available() {
        println!("OpenCL not available, skipping test");
        return None;
    }
    Accelerator::new().ok()
}
