//! In-register square transpose micro-kernel.
//!
//! The micro-kernel is the innermost building block: a full `N×N` transpose of
//! `N` registers, where `N` is the register's lane count. Offsets, partial
//! extents and tail handling are layered on top in [`kernel`](crate::kernel).

use reglin_core::{RegScalar, Register};

/// Square in-register transpose.
///
/// `out[i].lane(j) == tile[j].lane(i)` for all `i, j < N`.
pub trait MicroKernel<T: RegScalar, const N: usize> {
    fn transpose_square(tile: &[Register<T, N>; N]) -> [Register<T, N>; N];
}

/// Portable lane-loop micro-kernel.
///
/// The loop has compile-time bounds on both axes; for the supported widths
/// LLVM turns it into unpack/shuffle sequences.
pub struct LaneKernel;

impl<T: RegScalar, const N: usize> MicroKernel<T, N> for LaneKernel {
    #[inline(always)]
    fn transpose_square(tile: &[Register<T, N>; N]) -> [Register<T, N>; N] {
        let mut out = [[T::zero(); N]; N];
        for (j, reg) in tile.iter().enumerate() {
            let lanes = reg.as_array();
            for i in 0..N {
                out[i][j] = lanes[i];
            }
        }
        out.map(Register::from_array)
    }
}
