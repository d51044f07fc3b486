//! End-to-end checks against a real OpenCL device.
//!
//! Ignored by default since CI machines rarely expose an OpenCL runtime.
//! Run with `cargo test -- --ignored` on a machine with a device installed.

use clfirst::ops;
use clfirst::session::{Session, SessionOptions};
use clfirst::status::FailureKind;

#[test]
#[ignore = "requires an OpenCL device"]
fn test_vec_add_on_device() {
    let session =
        Session::open(&SessionOptions::default()).expect("no OpenCL device available");
    let mut x = vec![1.0f32; 4096];
    let y = vec![2.0f32; 4096];

    ops::vec_add(&session, &mut x, &y).expect("vec_add failed");
    assert!(x.iter().all(|&v| v == 3.0), "every element should be 1 + 2");
}

#[test]
#[ignore = "requires an OpenCL device"]
fn test_vec_dot_on_device() {
    let session =
        Session::open(&SessionOptions::default()).expect("no OpenCL device available");
    let x = vec![1.0f32; 4096];
    let y = vec![2.0f32; 4096];

    let result = ops::vec_dot(&session, &x, &y).expect("vec_dot failed");
    let expected = 2.0 * 4096.0;
    assert!(
        (result - expected).abs() < 1.0,
        "dot(x,y) = {result}, expected {expected}"
    );
}

#[test]
#[ignore = "requires an OpenCL device"]
fn test_bad_kernel_source_reports_build_failure() {
    let session =
        Session::open(&SessionOptions::default()).expect("no OpenCL device available");
    let result = clfirst::program::build_kernel(
        &session,
        "__kernel void broken(__global float *x) { this does not compile }",
        "broken",
    );
    assert!(
        matches!(result, Err(FailureKind::BuildProgramFailure)),
        "a syntax error in kernel source should surface as a build failure"
    );
}
