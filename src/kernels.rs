//! OpenCL C sources for the tutorial kernels.

/// Strided in-place vector addition: `x[i] += y[i]`.
pub const VEC_ADD: &str = include_str!("kernels/vec_add.cl");

/// Strided multiply-accumulate with a tree reduction in local memory;
/// writes one partial sum per workgroup.
pub const VEC_DOT: &str = include_str!("kernels/vec_dot.cl");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::LOCAL_SIZE;

    #[test]
    fn test_kernel_sources_name_their_entry_points() {
        assert!(VEC_ADD.contains("__kernel void vec_add"));
        assert!(VEC_DOT.contains("__kernel void vec_dot"));
    }

    #[test]
    fn test_dot_reduction_array_matches_local_size() {
        assert!(
            VEC_DOT.contains(&format!("shared_array[{}]", LOCAL_SIZE)),
            "the local reduction array must hold one slot per work item"
        );
    }
}
