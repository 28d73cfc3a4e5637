//! Moving matrices in and out of register arrays, and the register-kind
//! dispatched entry point.

use reglin_core::{check_range, KernelError, Matrix, RegScalar, Register, RegisterKind, Result};

use crate::kernel::transpose;
use crate::shape::{TailPolicy, TransposeShape};

/// Load `matrix` into registers, one column per register, rows starting at
/// lane `offset`. Unused lanes and registers are zero.
pub fn pack_columns<T: RegScalar, const N: usize>(
    matrix: &Matrix<T>,
    offset: usize,
) -> Result<[Register<T, N>; N]> {
    check_range("rows", matrix.rows(), 1, N)?;
    check_range("cols", matrix.cols(), 1, N)?;
    check_range("offset", offset, 0, N - matrix.rows())?;
    let mut regs = [Register::zero(); N];
    for (c, reg) in regs.iter_mut().enumerate().take(matrix.cols()) {
        for (r, &v) in matrix.col(c).iter().enumerate() {
            reg.set_lane(offset + r, v);
        }
    }
    Ok(regs)
}

/// Read a `rows × cols` matrix back out of column registers.
pub fn unpack_columns<T: RegScalar, const N: usize>(
    regs: &[Register<T, N>],
    rows: usize,
    cols: usize,
    offset: usize,
) -> Result<Matrix<T>> {
    check_range("rows", rows, 1, N)?;
    check_range("cols", cols, 1, regs.len())?;
    check_range("offset", offset, 0, N - rows)?;
    Ok(Matrix::from_fn(rows, cols, |r, c| regs[c].lane(offset + r)))
}

/// Transpose `matrix` through registers of the given kind.
///
/// The `rows × cols` matrix is packed at lane `offset_in`, transposed with
/// `tail`, and the `cols × rows` result is read back from lane `offset_out`.
/// Values pass through the register's precision, so `f32` registers round
/// the input.
///
/// Fails with `OutOfRange` if the matrix or the offsets do not fit the
/// register.
pub fn transpose_matrix(
    kind: RegisterKind,
    offset_in: usize,
    offset_out: usize,
    tail: TailPolicy,
    matrix: &Matrix<f64>,
) -> Result<Matrix<f64>> {
    let shape = TransposeShape::new(
        kind.element_count(),
        matrix.rows(),
        matrix.cols(),
        offset_in,
        offset_out,
    )?;
    match kind {
        RegisterKind::M128 => transpose_packed::<f32, 4>(&shape, tail, matrix),
        RegisterKind::M128d => transpose_packed::<f64, 2>(&shape, tail, matrix),
        RegisterKind::M256 => transpose_packed::<f32, 8>(&shape, tail, matrix),
        RegisterKind::M256d => transpose_packed::<f64, 4>(&shape, tail, matrix),
    }
}

fn transpose_packed<T: RegScalar, const N: usize>(
    shape: &TransposeShape,
    tail: TailPolicy,
    matrix: &Matrix<f64>,
) -> Result<Matrix<f64>> {
    if matrix.shape() != [shape.rows(), shape.cols()] {
        return Err(KernelError::DimensionMismatch {
            expected: [shape.rows(), shape.cols()],
            got: matrix.shape(),
        });
    }
    let regs = pack_columns::<T, N>(&matrix.cast(), shape.offset_in())?;
    let out = transpose(shape, tail, &regs)?;
    Ok(unpack_columns(&out, shape.cols(), shape.rows(), shape.offset_out())?.cast())
}
