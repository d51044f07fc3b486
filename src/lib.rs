//! First steps with OpenCL: a strided vector addition and a workgroup-reduced
//! dot product, built on a translator that turns raw status codes into
//! descriptive failures.

pub mod kernels;
pub mod ops;
pub mod program;
pub mod session;
pub mod status;

pub use session::{Session, SessionOptions};
pub use status::{check, guard, FailureKind};
