//! Kernel compilation: source in, `Kernel` out.

use opencl3::kernel::Kernel;
use opencl3::program::Program;

use crate::session::Session;
use crate::status::{guard, FailureKind};

/// Build `source` for the session's device and extract the kernel named
/// `name`.
///
/// On a build failure the device's build log is dumped to stderr before the
/// status is translated, since the log is the only place the device compiler
/// explains itself.
pub fn build_kernel(
    session: &Session,
    source: &str,
    name: &str,
) -> Result<Kernel, FailureKind> {
    let mut program = guard(
        Program::create_from_source(&session.context, source),
        "clCreateProgramWithSource",
    )?;

    let built = program.build(&[session.device.id()], "");
    if built.is_err() {
        if let Ok(log) = program.get_build_log(session.device.id()) {
            eprintln!("OpenCL build log:\n{}", log.trim_end());
        }
    }
    guard(built, "clBuildProgram")?;

    guard(Kernel::create(&program, name), "clCreateKernel")
}
