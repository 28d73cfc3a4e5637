//! Pivot selection, the numerical zero test and row permutations.

use reglin_core::matrix::INLINE_VECTOR;
use reglin_core::{KernelError, Matrix, PivotStrategy, RegScalar, Result, Vector};
use smallvec::SmallVec;

use crate::column::ColumnKernel;

/// Threshold below which a pivot counts as zero.
///
/// A pivot `p` is zero when `|p| <= n · ε · max|A|` or when it is not
/// finite. `max|A|` is taken from the input matrix, so an all-zero matrix
/// has threshold zero and every pivot fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroPivot<T> {
    threshold: T,
}

impl<T: RegScalar> ZeroPivot<T> {
    pub fn for_matrix(a: &Matrix<T>) -> Self {
        let n = T::cast_from_f64(a.rows().max(a.cols()) as f64);
        Self {
            threshold: n * T::epsilon() * a.max_abs(),
        }
    }

    #[inline]
    pub fn threshold(&self) -> T {
        self.threshold
    }

    #[inline]
    pub fn is_zero(&self, p: T) -> bool {
        !p.is_finite() || p.abs() <= self.threshold
    }

    /// `Err(SingularMatrix { step })` if `p` is numerically zero.
    #[inline]
    pub fn check(&self, p: T, step: usize) -> Result<T> {
        if self.is_zero(p) {
            return Err(KernelError::SingularMatrix { step });
        }
        Ok(p)
    }
}

/// Row of the pivot for elimination step `k`: `k` itself without pivoting,
/// otherwise the row in `k..n` with the largest `|a[row, k]|`.
#[inline]
pub(crate) fn select_pivot_row<T: RegScalar, K: ColumnKernel<T>>(
    a: &Matrix<T>,
    k: usize,
    pivot: PivotStrategy,
) -> usize {
    match pivot {
        PivotStrategy::NoPivot => k,
        PivotStrategy::PartialPivot => k + K::max_abs_index(&a.col(k)[k..]),
    }
}

/// Row permutation `P` stored as the source row of every target row:
/// `(P·b)[i] = b[rows[i]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    rows: SmallVec<[usize; INLINE_VECTOR]>,
    swaps: usize,
}

impl Permutation {
    pub fn identity(n: usize) -> Self {
        Self {
            rows: (0..n).collect(),
            swaps: 0,
        }
    }

    /// Exchange entries `a` and `b`. A no-op when `a == b`.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a != b {
            self.rows.swap(a, b);
            self.swaps += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.rows
    }

    pub fn is_identity(&self) -> bool {
        self.rows.iter().enumerate().all(|(i, &r)| i == r)
    }

    /// `+1` for an even number of swaps, `-1` for odd.
    pub fn sign(&self) -> i32 {
        if self.swaps % 2 == 0 {
            1
        } else {
            -1
        }
    }

    /// Compute `P·b`.
    pub fn apply<T: RegScalar>(&self, b: &[T]) -> Vector<T> {
        Vector::from_fn(self.rows.len(), |i| b[self.rows[i]])
    }
}
