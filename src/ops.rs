//! The two tutorial operations, start to finish: buffers up, kernel in the
//! queue, results back.

use std::ffi::c_void;
use std::ptr;

use opencl3::kernel::ExecuteKernel;
use opencl3::memory::{Buffer, CL_MEM_COPY_HOST_PTR, CL_MEM_READ_WRITE};
use opencl3::types::{cl_float, cl_uint, CL_BLOCKING};

use crate::kernels;
use crate::program::build_kernel;
use crate::session::Session;
use crate::status::{guard, FailureKind};

/// Work items per workgroup. `vec_dot` reduces in a local array of this
/// size, so it must stay in sync with the kernel source.
pub const LOCAL_SIZE: usize = 128;

/// Workgroups per launch. Both kernels stride over their input, so the
/// global size is independent of the vector length.
pub const WORK_GROUPS: usize = 128;

const GLOBAL_SIZE: usize = LOCAL_SIZE * WORK_GROUPS;

/// Add `y` into `x` on the device and read `x` back.
pub fn vec_add(session: &Session, x: &mut [f32], y: &[f32]) -> Result<(), FailureKind> {
    check_lengths(x.len(), y.len())?;
    let kernel = build_kernel(session, kernels::VEC_ADD, "vec_add")?;
    let n = x.len();

    let x_buf = guard(
        unsafe {
            Buffer::<cl_float>::create(
                &session.context,
                CL_MEM_READ_WRITE | CL_MEM_COPY_HOST_PTR,
                n,
                x.as_mut_ptr() as *mut c_void,
            )
        },
        "clCreateBuffer",
    )?;
    let y_buf = guard(
        unsafe {
            Buffer::<cl_float>::create(
                &session.context,
                CL_MEM_READ_WRITE | CL_MEM_COPY_HOST_PTR,
                n,
                y.as_ptr() as *mut c_void,
            )
        },
        "clCreateBuffer",
    )?;

    guard(
        unsafe {
            ExecuteKernel::new(&kernel)
                .set_arg(&x_buf)
                .set_arg(&y_buf)
                .set_arg(&(n as cl_uint))
                .set_global_work_size(GLOBAL_SIZE)
                .set_local_work_size(LOCAL_SIZE)
                .enqueue_nd_range(&session.queue)
        },
        "clEnqueueNDRangeKernel",
    )?;

    guard(
        unsafe {
            session
                .queue
                .enqueue_read_buffer(&x_buf, CL_BLOCKING, 0, x, &[])
        },
        "clEnqueueReadBuffer",
    )?;
    Ok(())
}

/// Compute `dot(x, y)` on the device. Each workgroup reduces its stripe to a
/// single partial; the host sums the partials.
pub fn vec_dot(session: &Session, x: &[f32], y: &[f32]) -> Result<f32, FailureKind> {
    check_lengths(x.len(), y.len())?;
    let kernel = build_kernel(session, kernels::VEC_DOT, "vec_dot")?;
    let n = x.len();

    let x_buf = guard(
        unsafe {
            Buffer::<cl_float>::create(
                &session.context,
                CL_MEM_READ_WRITE | CL_MEM_COPY_HOST_PTR,
                n,
                x.as_ptr() as *mut c_void,
            )
        },
        "clCreateBuffer",
    )?;
    let y_buf = guard(
        unsafe {
            Buffer::<cl_float>::create(
                &session.context,
                CL_MEM_READ_WRITE | CL_MEM_COPY_HOST_PTR,
                n,
                y.as_ptr() as *mut c_void,
            )
        },
        "clCreateBuffer",
    )?;
    let partials_buf = guard(
        unsafe {
            Buffer::<cl_float>::create(
                &session.context,
                CL_MEM_READ_WRITE,
                WORK_GROUPS,
                ptr::null_mut(),
            )
        },
        "clCreateBuffer",
    )?;

    guard(
        unsafe {
            ExecuteKernel::new(&kernel)
                .set_arg(&x_buf)
                .set_arg(&y_buf)
                .set_arg(&partials_buf)
                .set_arg(&(n as cl_uint))
                .set_global_work_size(GLOBAL_SIZE)
                .set_local_work_size(LOCAL_SIZE)
                .enqueue_nd_range(&session.queue)
        },
        "clEnqueueNDRangeKernel",
    )?;

    let mut partials = vec![0.0f32; WORK_GROUPS];
    guard(
        unsafe {
            session.queue.enqueue_read_buffer(
                &partials_buf,
                CL_BLOCKING,
                0,
                &mut partials,
                &[],
            )
        },
        "clEnqueueReadBuffer",
    )?;

    Ok(partials.iter().sum())
}

fn check_lengths(x: usize, y: usize) -> Result<(), FailureKind> {
    if x == y {
        Ok(())
    } else {
        Err(FailureKind::InvalidKernelArgs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_lengths_are_rejected_before_any_device_call() {
        assert_eq!(
            check_lengths(16, 32),
            Err(FailureKind::InvalidKernelArgs)
        );
        assert!(check_lengths(16, 16).is_ok());
    }

    #[test]
    fn test_launch_geometry_is_consistent() {
        assert_eq!(GLOBAL_SIZE % LOCAL_SIZE, 0);
        assert!(LOCAL_SIZE.is_power_of_two(), "the tree reduction halves the stride");
    }
}
