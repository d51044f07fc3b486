//! Platform discovery and per-device setup: one context, one in-order queue.

use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::device::{Device, CL_DEVICE_TYPE_ALL};
use opencl3::platform::get_platforms;

use crate::status::{guard, FailureKind};

/// Which platform and device to open, both by enumeration index.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionOptions {
    pub platform: usize,
    pub device: usize,
}

/// An open connection to one OpenCL device: context plus command queue.
///
/// The discovery counts are kept so callers can report what was found
/// without re-enumerating.
pub struct Session {
    pub device: Device,
    pub context: Context,
    pub queue: CommandQueue,
    pub platform_count: usize,
    pub device_count: usize,
}

impl Session {
    /// Enumerate platforms and devices, then create a context and queue for
    /// the selected device.
    pub fn open(options: &SessionOptions) -> Result<Session, FailureKind> {
        let platforms = guard(get_platforms(), "clGetPlatformIDs")?;
        let platform = platforms
            .get(options.platform)
            .ok_or(FailureKind::InvalidPlatform)?;

        let device_ids = guard(
            platform.get_devices(CL_DEVICE_TYPE_ALL),
            "clGetDeviceIDs",
        )?;
        let device_id = device_ids
            .get(options.device)
            .copied()
            .ok_or(FailureKind::DeviceNotFound)?;
        let device = Device::new(device_id);

        let context = guard(Context::from_device(&device), "clCreateContext")?;
        #[allow(deprecated)]
        let queue = guard(
            unsafe { CommandQueue::create(&context, device.id(), 0) },
            "clCreateCommandQueue",
        )?;

        Ok(Session {
            device,
            context,
            queue,
            platform_count: platforms.len(),
            device_count: device_ids.len(),
        })
    }

    /// Human-readable name of the opened device.
    pub fn device_name(&self) -> Result<String, FailureKind> {
        guard(self.device.name(), "clGetDeviceInfo")
    }
}
