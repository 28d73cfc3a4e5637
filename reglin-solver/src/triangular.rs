//! Triangular solves on column-major factors, written against
//! [`ColumnKernel`].
//!
//! None of these functions checks the diagonal; the factorizations reject
//! zero pivots before a factor is ever handed to a substitution.

use reglin_core::{Matrix, RegScalar};

use crate::column::ColumnKernel;

/// Diagonal of a triangular factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagonal {
    /// The diagonal is implicitly one; stored diagonal entries are ignored.
    Unit,
    /// The stored diagonal is used.
    Stored,
}

/// Solve `L·x = b` in place, using the lower triangle of `l`.
pub fn forward_lower<T: RegScalar, K: ColumnKernel<T>>(l: &Matrix<T>, diag: Diagonal, b: &mut [T]) {
    let n = b.len();
    for k in 0..n {
        if diag == Diagonal::Stored {
            b[k] = b[k] / l[(k, k)];
        }
        let (head, tail) = b.split_at_mut(k + 1);
        K::sub_scaled(tail, head[k], &l.col(k)[k + 1..n]);
    }
}

/// Solve `U·x = b` in place, using the upper triangle of `u`.
pub fn back_upper<T: RegScalar, K: ColumnKernel<T>>(u: &Matrix<T>, b: &mut [T]) {
    for k in (0..b.len()).rev() {
        b[k] = b[k] / u[(k, k)];
        let (head, tail) = b.split_at_mut(k);
        K::sub_scaled(head, tail[0], &u.col(k)[..k]);
    }
}

/// Solve `Lᵗ·x = b` in place, using the lower triangle of `l`.
///
/// Row `i` of `Lᵗ` is column `i` of `L`, so each step is a dot product over
/// a contiguous column.
pub fn back_lower_transposed<T: RegScalar, K: ColumnKernel<T>>(
    l: &Matrix<T>,
    diag: Diagonal,
    b: &mut [T],
) {
    let n = b.len();
    for i in (0..n).rev() {
        let (head, tail) = b.split_at_mut(i + 1);
        let mut v = head[i] - K::dot(&l.col(i)[i + 1..n], tail);
        if diag == Diagonal::Stored {
            v = v / l[(i, i)];
        }
        head[i] = v;
    }
}
