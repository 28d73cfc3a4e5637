//! Gaussian elimination on the augmented system `[A | b]`.

use reglin_core::{Matrix, PivotStrategy, RegScalar, Result, Vector};

use crate::column::ColumnKernel;
use crate::pivot::{select_pivot_row, ZeroPivot};
use crate::triangular::back_upper;

/// Solve `A·x = b` by forward elimination and back substitution.
///
/// With [`PivotStrategy::PartialPivot`] every step first moves the row with
/// the largest magnitude in the active column into pivot position. Only the
/// columns still taking part in the elimination are swapped, since the
/// finished ones are never read again.
///
/// Fails with `DimensionMismatch` for a non-square `A` or a wrong `b` length
/// and with `SingularMatrix` on a numerically zero pivot.
pub fn gauss<T: RegScalar, K: ColumnKernel<T>>(
    a: &Matrix<T>,
    b: &Vector<T>,
    pivot: PivotStrategy,
) -> Result<Vector<T>> {
    let n = crate::check_system(a, b)?;
    let zero = ZeroPivot::for_matrix(a);
    let mut a = a.clone();
    let mut x = b.clone();

    for k in 0..n {
        let p = select_pivot_row::<T, K>(&a, k, pivot);
        if p != k {
            for c in k..n {
                a.col_mut(c).swap(k, p);
            }
            x.as_mut_slice().swap(k, p);
        }
        let inv = T::one() / zero.check(a[(k, k)], k)?;

        // multipliers overwrite the sub-diagonal of column k
        K::scale(&mut a.col_mut(k)[k + 1..], inv);
        for c in k + 1..n {
            let (target, source) = a.col_pair_mut(c, k);
            let f = target[k];
            K::sub_scaled(&mut target[k + 1..], f, &source[k + 1..]);
        }
        let (head, tail) = x.as_mut_slice().split_at_mut(k + 1);
        K::sub_scaled(tail, head[k], &a.col(k)[k + 1..]);
    }

    back_upper::<T, K>(&a, x.as_mut_slice());
    Ok(x)
}
