//! Translation of OpenCL status codes into descriptive failures.
//!
//! Every device-API call reports a `cl_int` status. [`check`] treats
//! `CL_SUCCESS` as a no-op and turns any other value into the matching
//! [`FailureKind`], printing one diagnostic line with the raw code and the
//! call site first. [`guard`] does the same for the `Result` values the
//! `opencl3` binding returns. Codes outside the known table (extension codes
//! included) fall through to [`FailureKind::UnknownError`] instead of being
//! left unhandled.

use std::fmt;
use std::panic::Location;

use opencl3::error_codes::*;
use opencl3::types::cl_int;

/// One failure category per distinct OpenCL status code, plus
/// [`UnknownError`](FailureKind::UnknownError) as the catch-all.
///
/// Each kind carries a fixed message describing the condition; the kinds a
/// user can usually do something about also carry remediation guidance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    DeviceNotFound,
    DeviceNotAvailable,
    CompilerNotAvailable,
    MemObjectAllocationFailure,
    OutOfResources,
    OutOfHostMemory,
    ProfilingInfoNotAvailable,
    MemCopyOverlap,
    ImageFormatMismatch,
    ImageFormatNotSupported,
    BuildProgramFailure,
    MapFailure,
    InvalidValue,
    InvalidDeviceType,
    InvalidPlatform,
    InvalidDevice,
    InvalidContext,
    InvalidQueueProperties,
    InvalidCommandQueue,
    InvalidHostPtr,
    InvalidMemObject,
    InvalidImageFormatDescriptor,
    InvalidImageSize,
    InvalidSampler,
    InvalidBinary,
    InvalidBuildOptions,
    InvalidProgram,
    InvalidProgramExecutable,
    InvalidKernelName,
    InvalidKernelDefinition,
    InvalidKernel,
    InvalidArgIndex,
    InvalidArgValue,
    InvalidArgSize,
    InvalidKernelArgs,
    InvalidWorkDimension,
    InvalidWorkGroupSize,
    InvalidWorkItemSize,
    InvalidGlobalOffset,
    InvalidEventWaitList,
    InvalidEvent,
    InvalidOperation,
    InvalidGlObject,
    InvalidBufferSize,
    InvalidMipLevel,
    InvalidGlobalWorkSize,
    InvalidProperty,
    /// Any status code absent from the table above.
    UnknownError,
}

/// The closed code-to-kind mapping. `UnknownError` is deliberately absent;
/// it is the fallback for everything this table does not name.
const CODE_TABLE: &[(cl_int, FailureKind)] = &[
    (CL_DEVICE_NOT_FOUND, FailureKind::DeviceNotFound),
    (CL_DEVICE_NOT_AVAILABLE, FailureKind::DeviceNotAvailable),
    (CL_COMPILER_NOT_AVAILABLE, FailureKind::CompilerNotAvailable),
    (
        CL_MEM_OBJECT_ALLOCATION_FAILURE,
        FailureKind::MemObjectAllocationFailure,
    ),
    (CL_OUT_OF_RESOURCES, FailureKind::OutOfResources),
    (CL_OUT_OF_HOST_MEMORY, FailureKind::OutOfHostMemory),
    (
        CL_PROFILING_INFO_NOT_AVAILABLE,
        FailureKind::ProfilingInfoNotAvailable,
    ),
    (CL_MEM_COPY_OVERLAP, FailureKind::MemCopyOverlap),
    (CL_IMAGE_FORMAT_MISMATCH, FailureKind::ImageFormatMismatch),
    (
        CL_IMAGE_FORMAT_NOT_SUPPORTED,
        FailureKind::ImageFormatNotSupported,
    ),
    (CL_BUILD_PROGRAM_FAILURE, FailureKind::BuildProgramFailure),
    (CL_MAP_FAILURE, FailureKind::MapFailure),
    (CL_INVALID_VALUE, FailureKind::InvalidValue),
    (CL_INVALID_DEVICE_TYPE, FailureKind::InvalidDeviceType),
    (CL_INVALID_PLATFORM, FailureKind::InvalidPlatform),
    (CL_INVALID_DEVICE, FailureKind::InvalidDevice),
    (CL_INVALID_CONTEXT, FailureKind::InvalidContext),
    (CL_INVALID_QUEUE_PROPERTIES, FailureKind::InvalidQueueProperties),
    (CL_INVALID_COMMAND_QUEUE, FailureKind::InvalidCommandQueue),
    (CL_INVALID_HOST_PTR, FailureKind::InvalidHostPtr),
    (CL_INVALID_MEM_OBJECT, FailureKind::InvalidMemObject),
    (
        CL_INVALID_IMAGE_FORMAT_DESCRIPTOR,
        FailureKind::InvalidImageFormatDescriptor,
    ),
    (CL_INVALID_IMAGE_SIZE, FailureKind::InvalidImageSize),
    (CL_INVALID_SAMPLER, FailureKind::InvalidSampler),
    (CL_INVALID_BINARY, FailureKind::InvalidBinary),
    (CL_INVALID_BUILD_OPTIONS, FailureKind::InvalidBuildOptions),
    (CL_INVALID_PROGRAM, FailureKind::InvalidProgram),
    (
        CL_INVALID_PROGRAM_EXECUTABLE,
        FailureKind::InvalidProgramExecutable,
    ),
    (CL_INVALID_KERNEL_NAME, FailureKind::InvalidKernelName),
    (CL_INVALID_KERNEL_DEFINITION, FailureKind::InvalidKernelDefinition),
    (CL_INVALID_KERNEL, FailureKind::InvalidKernel),
    (CL_INVALID_ARG_INDEX, FailureKind::InvalidArgIndex),
    (CL_INVALID_ARG_VALUE, FailureKind::InvalidArgValue),
    (CL_INVALID_ARG_SIZE, FailureKind::InvalidArgSize),
    (CL_INVALID_KERNEL_ARGS, FailureKind::InvalidKernelArgs),
    (CL_INVALID_WORK_DIMENSION, FailureKind::InvalidWorkDimension),
    (CL_INVALID_WORK_GROUP_SIZE, FailureKind::InvalidWorkGroupSize),
    (CL_INVALID_WORK_ITEM_SIZE, FailureKind::InvalidWorkItemSize),
    (CL_INVALID_GLOBAL_OFFSET, FailureKind::InvalidGlobalOffset),
    (CL_INVALID_EVENT_WAIT_LIST, FailureKind::InvalidEventWaitList),
    (CL_INVALID_EVENT, FailureKind::InvalidEvent),
    (CL_INVALID_OPERATION, FailureKind::InvalidOperation),
    (CL_INVALID_GL_OBJECT, FailureKind::InvalidGlObject),
    (CL_INVALID_BUFFER_SIZE, FailureKind::InvalidBufferSize),
    (CL_INVALID_MIP_LEVEL, FailureKind::InvalidMipLevel),
    (CL_INVALID_GLOBAL_WORK_SIZE, FailureKind::InvalidGlobalWorkSize),
    (CL_INVALID_PROPERTY, FailureKind::InvalidProperty),
];

impl FailureKind {
    /// Map a raw status code to its failure kind.
    ///
    /// Total over all of `i32`: anything the table does not name, including
    /// codes reserved by extensions this crate never calls, becomes
    /// `UnknownError`.
    pub fn from_code(code: cl_int) -> FailureKind {
        CODE_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, kind)| *kind)
            .unwrap_or(FailureKind::UnknownError)
    }

    /// The raw status code this kind mirrors. `UnknownError` stands for every
    /// unmapped code at once, so it has none.
    pub fn code(&self) -> Option<cl_int> {
        CODE_TABLE
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(code, _)| *code)
    }

    /// The `CL_*` constant name of the underlying status code.
    pub fn name(&self) -> &'static str {
        use FailureKind::*;
        match self {
            DeviceNotFound => "CL_DEVICE_NOT_FOUND",
            DeviceNotAvailable => "CL_DEVICE_NOT_AVAILABLE",
            CompilerNotAvailable => "CL_COMPILER_NOT_AVAILABLE",
            MemObjectAllocationFailure => "CL_MEM_OBJECT_ALLOCATION_FAILURE",
            OutOfResources => "CL_OUT_OF_RESOURCES",
            OutOfHostMemory => "CL_OUT_OF_HOST_MEMORY",
            ProfilingInfoNotAvailable => "CL_PROFILING_INFO_NOT_AVAILABLE",
            MemCopyOverlap => "CL_MEM_COPY_OVERLAP",
            ImageFormatMismatch => "CL_IMAGE_FORMAT_MISMATCH",
            ImageFormatNotSupported => "CL_IMAGE_FORMAT_NOT_SUPPORTED",
            BuildProgramFailure => "CL_BUILD_PROGRAM_FAILURE",
            MapFailure => "CL_MAP_FAILURE",
            InvalidValue => "CL_INVALID_VALUE",
            InvalidDeviceType => "CL_INVALID_DEVICE_TYPE",
            InvalidPlatform => "CL_INVALID_PLATFORM",
            InvalidDevice => "CL_INVALID_DEVICE",
            InvalidContext => "CL_INVALID_CONTEXT",
            InvalidQueueProperties => "CL_INVALID_QUEUE_PROPERTIES",
            InvalidCommandQueue => "CL_INVALID_COMMAND_QUEUE",
            InvalidHostPtr => "CL_INVALID_HOST_PTR",
            InvalidMemObject => "CL_INVALID_MEM_OBJECT",
            InvalidImageFormatDescriptor => "CL_INVALID_IMAGE_FORMAT_DESCRIPTOR",
            InvalidImageSize => "CL_INVALID_IMAGE_SIZE",
            InvalidSampler => "CL_INVALID_SAMPLER",
            InvalidBinary => "CL_INVALID_BINARY",
            InvalidBuildOptions => "CL_INVALID_BUILD_OPTIONS",
            InvalidProgram => "CL_INVALID_PROGRAM",
            InvalidProgramExecutable => "CL_INVALID_PROGRAM_EXECUTABLE",
            InvalidKernelName => "CL_INVALID_KERNEL_NAME",
            InvalidKernelDefinition => "CL_INVALID_KERNEL_DEFINITION",
            InvalidKernel => "CL_INVALID_KERNEL",
            InvalidArgIndex => "CL_INVALID_ARG_INDEX",
            InvalidArgValue => "CL_INVALID_ARG_VALUE",
            InvalidArgSize => "CL_INVALID_ARG_SIZE",
            InvalidKernelArgs => "CL_INVALID_KERNEL_ARGS",
            InvalidWorkDimension => "CL_INVALID_WORK_DIMENSION",
            InvalidWorkGroupSize => "CL_INVALID_WORK_GROUP_SIZE",
            InvalidWorkItemSize => "CL_INVALID_WORK_ITEM_SIZE",
            InvalidGlobalOffset => "CL_INVALID_GLOBAL_OFFSET",
            InvalidEventWaitList => "CL_INVALID_EVENT_WAIT_LIST",
            InvalidEvent => "CL_INVALID_EVENT",
            InvalidOperation => "CL_INVALID_OPERATION",
            InvalidGlObject => "CL_INVALID_GL_OBJECT",
            InvalidBufferSize => "CL_INVALID_BUFFER_SIZE",
            InvalidMipLevel => "CL_INVALID_MIP_LEVEL",
            InvalidGlobalWorkSize => "CL_INVALID_GLOBAL_WORK_SIZE",
            InvalidProperty => "CL_INVALID_PROPERTY",
            UnknownError => "UNKNOWN",
        }
    }

    /// The fixed message describing the condition, phrased for an operator
    /// rather than as a bare code.
    pub fn message(&self) -> &'static str {
        use FailureKind::*;
        match self {
            DeviceNotFound => {
                "Could not find a suitable device. Please check whether an OpenCL \
                 implementation is properly installed and a suitable device available."
            }
            DeviceNotAvailable => {
                "Could not use the compute device because it is not available."
            }
            CompilerNotAvailable => {
                "Your OpenCL framework does not provide an OpenCL compiler."
            }
            MemObjectAllocationFailure => {
                "Could not allocate memory on the device. Most likely the device \
                 simply ran out of memory."
            }
            OutOfResources => {
                "Tried to launch a compute kernel, but the device does not provide \
                 enough resources. Try changing the global and local work item sizes."
            }
            OutOfHostMemory => {
                "The host ran out of memory (usually CPU RAM). Please try again on \
                 smaller problems."
            }
            ProfilingInfoNotAvailable => {
                "Profiling information is not available for this command queue."
            }
            MemCopyOverlap => "Source and destination of a memory copy overlap.",
            ImageFormatMismatch => "The image formats of the operands do not match.",
            ImageFormatNotSupported => {
                "The requested image format is not supported by the device."
            }
            BuildProgramFailure => {
                "The OpenCL compiler encountered an error during the compilation of \
                 OpenCL sources."
            }
            MapFailure => "Mapping a buffer or image into host memory failed.",
            InvalidValue => "An invalid value was passed to an OpenCL API call.",
            InvalidDeviceType => "The requested device type is invalid.",
            InvalidPlatform => "The platform is not valid.",
            InvalidDevice => "The device is not valid.",
            InvalidContext => "The context is not valid.",
            InvalidQueueProperties => {
                "The requested command queue properties are not supported by the device."
            }
            InvalidCommandQueue => "The command queue is not valid.",
            InvalidHostPtr => {
                "The host pointer is invalid for the requested memory flags."
            }
            InvalidMemObject => "The memory object is not valid.",
            InvalidImageFormatDescriptor => "The image format descriptor is invalid.",
            InvalidImageSize => {
                "The image dimensions are not supported by the device."
            }
            InvalidSampler => "The sampler is not valid.",
            InvalidBinary => "The program binary is invalid for this device.",
            InvalidBuildOptions => "The program build options are invalid.",
            InvalidProgram => "The program object is not valid.",
            InvalidProgramExecutable => {
                "The program has not been successfully built for this device."
            }
            InvalidKernelName => {
                "The supplied kernel name is invalid. If you have written your own \
                 OpenCL kernel, please check that the correct kernel name is used in \
                 the initialization of the kernel object."
            }
            InvalidKernelDefinition => {
                "The kernel definition does not match between devices."
            }
            InvalidKernel => "The supplied kernel argument is invalid.",
            InvalidArgIndex => "The kernel argument index is out of range.",
            InvalidArgValue => "The kernel argument value is invalid.",
            InvalidArgSize => {
                "The kernel argument size does not match the kernel parameter."
            }
            InvalidKernelArgs => {
                "The supplied kernel arguments do not fit the kernel parameter list. \
                 If you have written your own OpenCL kernel, please check that the \
                 correct kernel arguments are set in the appropriate order."
            }
            InvalidWorkDimension => "The work dimension is invalid.",
            InvalidWorkGroupSize => {
                "The supplied work group size is invalid. If you have set this value \
                 manually, please reconsider your choice."
            }
            InvalidWorkItemSize => {
                "The work item size is invalid. If you have set this value manually, \
                 please reconsider your choice."
            }
            InvalidGlobalOffset => "The global work offset is invalid.",
            InvalidEventWaitList => "The event wait list is invalid.",
            InvalidEvent => "An event object is not valid.",
            InvalidOperation => {
                "The requested operation is not permitted in the current state."
            }
            InvalidGlObject => "The OpenGL object is not valid.",
            InvalidBufferSize => {
                "The buffer size is zero or exceeds the limits of the device."
            }
            InvalidMipLevel => "The mip level is invalid.",
            InvalidGlobalWorkSize => "The global work size is invalid.",
            InvalidProperty => "A context property is invalid.",
            UnknownError => {
                "Encountered an unknown OpenCL error. In some cases, this might be \
                 due to an invalid global work size, but it can also be due to \
                 several compilation errors."
            }
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(_) => write!(f, "OpenCL: FATAL ERROR: {}: {}", self.name(), self.message()),
            None => write!(f, "OpenCL: FATAL ERROR: {}", self.message()),
        }
    }
}

impl std::error::Error for FailureKind {}

/// Check a raw status code returned by a device-API call.
///
/// `CL_SUCCESS` is a no-op. Any other code first gets one diagnostic line on
/// stderr naming the raw code, the failing API function, and the caller's
/// file and line, then comes back as the mapped [`FailureKind`].
#[track_caller]
pub fn check(code: cl_int, api: &str) -> Result<(), FailureKind> {
    if code == CL_SUCCESS {
        return Ok(());
    }
    let site = Location::caller();
    eprintln!(
        "OpenCL: error {} in {} ({}:{})",
        code,
        api,
        site.file(),
        site.line()
    );
    Err(FailureKind::from_code(code))
}

/// [`check`] lifted over the `Result` values the `opencl3` binding returns;
/// the raw code is extracted from the binding's [`ClError`].
#[track_caller]
pub fn guard<T>(result: Result<T, ClError>, api: &str) -> Result<T, FailureKind> {
    match result {
        Ok(value) => Ok(value),
        Err(ClError(code)) => {
            let site = Location::caller();
            eprintln!(
                "OpenCL: error {} in {} ({}:{})",
                code,
                api,
                site.file(),
                site.line()
            );
            Err(FailureKind::from_code(code))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_success_is_a_noop() {
        assert!(check(CL_SUCCESS, "clGetPlatformIDs").is_ok());
    }

    #[test]
    fn test_every_known_code_maps_to_its_kind() {
        for &(code, kind) in CODE_TABLE {
            assert_eq!(
                FailureKind::from_code(code),
                kind,
                "code {} should map to {:?}",
                code,
                kind
            );
            assert_eq!(
                kind.code(),
                Some(code),
                "{:?} should report code {}",
                kind,
                code
            );
        }
    }

    #[test]
    fn test_mapping_is_one_to_one() {
        let codes: HashSet<_> = CODE_TABLE.iter().map(|(c, _)| *c).collect();
        let kinds: HashSet<_> = CODE_TABLE.iter().map(|(_, k)| *k).collect();
        assert_eq!(codes.len(), CODE_TABLE.len(), "duplicate code in table");
        assert_eq!(kinds.len(), CODE_TABLE.len(), "duplicate kind in table");
        assert!(
            !kinds.contains(&FailureKind::UnknownError),
            "the catch-all must not appear in the table"
        );
    }

    #[test]
    fn test_unknown_codes_fall_through() {
        for code in [999_999, -999, 42, i32::MIN, i32::MAX] {
            assert_eq!(
                FailureKind::from_code(code),
                FailureKind::UnknownError,
                "code {} is not in the table and must fall through",
                code
            );
        }
        assert_eq!(FailureKind::UnknownError.code(), None);
    }

    #[test]
    fn test_check_reports_the_mapped_kind() {
        assert_eq!(
            check(CL_DEVICE_NOT_FOUND, "clGetDeviceIDs"),
            Err(FailureKind::DeviceNotFound)
        );
        assert_eq!(
            check(CL_BUILD_PROGRAM_FAILURE, "clBuildProgram"),
            Err(FailureKind::BuildProgramFailure)
        );
    }

    #[test]
    fn test_guard_unwraps_binding_errors() {
        let ok: Result<u32, ClError> = Ok(7);
        assert_eq!(guard(ok, "clGetPlatformIDs"), Ok(7));

        let err: Result<u32, ClError> = Err(ClError(CL_OUT_OF_RESOURCES));
        assert_eq!(
            guard(err, "clEnqueueNDRangeKernel"),
            Err(FailureKind::OutOfResources)
        );
    }

    #[test]
    fn test_messages_explain_the_condition() {
        assert!(FailureKind::DeviceNotFound
            .message()
            .contains("Could not find a suitable device"));
        assert!(FailureKind::BuildProgramFailure
            .message()
            .contains("compilation"));
        assert!(FailureKind::DeviceNotFound
            .to_string()
            .contains("CL_DEVICE_NOT_FOUND"));
    }

    // --- Purity: no shared state, so threads must agree with a single thread ---

    #[test]
    fn test_translation_is_pure_across_threads() {
        let single: Vec<FailureKind> = (-70..=-1).map(FailureKind::from_code).collect();
        // The sweep must reach the first defined code.
        assert_eq!(single.last(), Some(&FailureKind::DeviceNotFound));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    (-70..=-1).map(FailureKind::from_code).collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), single);
        }
    }
}
