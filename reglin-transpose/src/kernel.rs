//! Offset-aware transpose built on the square micro-kernel.
//!
//! The input columns are gathered into an `N×N` tile, transposed in registers,
//! and each tile row is rotated so that the matrix lands at `offset_out`. The
//! tail policy is applied as a final lane blend, so every grid point takes the
//! same code path.

use reglin_core::{lane_range_mask, simd, RegScalar, Register, Result};

use crate::micro_kernel::{LaneKernel, MicroKernel};
use crate::shape::{RegisterPlacement, TailPolicy, TransposeShape};

/// Transpose the matrix held in `src` into `dst`.
///
/// Column `c` of the input is register `placement.input_index(c)`, with its
/// rows in lanes `offset_in..offset_in + rows`. Row `r` is written to register
/// `placement.output_index(r)` at lanes `offset_out..offset_out + cols`.
/// Other registers of `dst` are left untouched.
///
/// Fails with `OutOfRange` if `shape` was built for a different lane count
/// or the placement reaches past either slice.
pub fn transpose_into<T: RegScalar, const N: usize>(
    shape: &TransposeShape,
    placement: &RegisterPlacement,
    tail: TailPolicy,
    src: &[Register<T, N>],
    dst: &mut [Register<T, N>],
) -> Result<()> {
    reglin_core::check_range("lanes", shape.lanes(), N, N)?;
    placement.validate(shape, src.len(), dst.len())?;
    simd::dispatch(|| transpose_unchecked::<T, N, LaneKernel>(shape, placement, tail, src, dst));
    Ok(())
}

/// Transpose with default placement into a fresh register array.
///
/// Registers `0..rows` of the result hold the transposed matrix; the remaining
/// registers are zero.
pub fn transpose<T: RegScalar, const N: usize>(
    shape: &TransposeShape,
    tail: TailPolicy,
    src: &[Register<T, N>],
) -> Result<[Register<T, N>; N]> {
    let mut dst = [Register::zero(); N];
    transpose_into(shape, &RegisterPlacement::default(), tail, src, &mut dst)?;
    Ok(dst)
}

#[inline(always)]
fn transpose_unchecked<T: RegScalar, const N: usize, K: MicroKernel<T, N>>(
    shape: &TransposeShape,
    placement: &RegisterPlacement,
    tail: TailPolicy,
    src: &[Register<T, N>],
    dst: &mut [Register<T, N>],
) {
    // Tile slots past `cols` take the neighbouring input registers when they
    // exist. Only Overwrite lets those values reach the output.
    let tile: [Register<T, N>; N] = std::array::from_fn(|c| {
        placement
            .input_index(c)
            .and_then(|i| src.get(i))
            .copied()
            .unwrap_or_else(Register::zero)
    });
    let transposed = K::transpose_square(&tile);
    let mask = lane_range_mask::<N>(shape.offset_out(), shape.cols());
    let zero = Register::zero();

    for r in 0..shape.rows() {
        // validated for every row below `rows`
        let Some(slot) = placement.output_index(r).and_then(|i| dst.get_mut(i)) else {
            continue;
        };
        let row = transposed[shape.offset_in() + r].rotate_lanes_up(shape.offset_out());
        *slot = match tail {
            TailPolicy::Overwrite => row,
            TailPolicy::SetZero => row.select(zero, mask),
            TailPolicy::KeepUnused => row.select(*slot, mask),
        };
    }
}
