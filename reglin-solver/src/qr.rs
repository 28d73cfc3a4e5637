//! Householder QR factorization `A = Q·R`.

use std::marker::PhantomData;

use reglin_core::{KernelError, Matrix, RegScalar, Result, Vector};

use crate::column::ColumnKernel;
use crate::pivot::ZeroPivot;
use crate::triangular::back_upper;

/// Explicit orthogonal `Q` and upper triangular `R` with `A = Q·R`.
///
/// Factorization never fails on a singular matrix; a zero diagonal entry of
/// `R` is reported by [`solve`](Self::solve).
#[derive(Debug, Clone, PartialEq)]
pub struct QrFactorization<T, K> {
    q: Matrix<T>,
    r: Matrix<T>,
    zero: ZeroPivot<T>,
    kernel: PhantomData<K>,
}

impl<T: RegScalar, K: ColumnKernel<T>> QrFactorization<T, K> {
    /// Factorize `a` with `n - 1` Householder reflections.
    ///
    /// Fails with `DimensionMismatch` for a non-square `a`.
    pub fn new(a: &Matrix<T>) -> Result<Self> {
        let n = a.square_size()?;
        let zero = ZeroPivot::for_matrix(a);
        let mut r = a.clone();
        // Qᵗ is accumulated by applying each reflection to its columns
        let mut qt = Matrix::identity(n);
        let two = T::one() + T::one();

        for k in 0..n.saturating_sub(1) {
            let mut v = Vector::from_slice(&r.col(k)[k..]);
            let norm = K::dot(v.as_slice(), v.as_slice()).sqrt();
            if norm == T::zero() {
                continue;
            }
            let alpha = if v[0] > T::zero() { -norm } else { norm };
            v[0] = v[0] - alpha;
            let vv = K::dot(v.as_slice(), v.as_slice());
            if vv == T::zero() {
                continue;
            }
            let beta = two / vv;

            for c in k + 1..n {
                reflect::<T, K>(&mut r.col_mut(c)[k..], v.as_slice(), beta);
            }
            let col = r.col_mut(k);
            col[k] = alpha;
            col[k + 1..].fill(T::zero());
            for c in 0..n {
                reflect::<T, K>(&mut qt.col_mut(c)[k..], v.as_slice(), beta);
            }
        }

        Ok(Self {
            q: qt.transpose(),
            r,
            zero,
            kernel: PhantomData,
        })
    }

    pub fn size(&self) -> usize {
        self.r.rows()
    }

    pub fn q(&self) -> &Matrix<T> {
        &self.q
    }

    pub fn r(&self) -> &Matrix<T> {
        &self.r
    }

    /// Solve `A·x = b` through `R·x = Qᵗ·b`.
    ///
    /// Fails with `SingularMatrix` if a diagonal entry of `R` is numerically
    /// zero.
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>> {
        let n = self.size();
        if b.len() != n {
            return Err(KernelError::DimensionMismatch {
                expected: [n, 1],
                got: [b.len(), 1],
            });
        }
        for k in 0..n {
            self.zero.check(self.r[(k, k)], k)?;
        }
        // (Qᵗ·b)[i] is column i of Q dotted with b
        let mut x = Vector::from_fn(n, |i| K::dot(self.q.col(i), b.as_slice()));
        back_upper::<T, K>(&self.r, x.as_mut_slice());
        Ok(x)
    }
}

/// Apply `H = I - β·v·vᵗ` to `y`.
#[inline]
fn reflect<T: RegScalar, K: ColumnKernel<T>>(y: &mut [T], v: &[T], beta: T) {
    let s = beta * K::dot(v, y);
    K::sub_scaled(y, s, v);
}

/// Factorize `a` and solve `A·x = b`.
pub fn qr_solve<T: RegScalar, K: ColumnKernel<T>>(a: &Matrix<T>, b: &Vector<T>) -> Result<Vector<T>> {
    crate::check_system(a, b)?;
    QrFactorization::<T, K>::new(a)?.solve(b)
}
