//! Symmetric factorizations: Cholesky `A = L·Lᵗ` and `A = L·D·Lᵗ`.
//!
//! Both read only the lower triangle of `A`; the strict upper triangle is
//! never touched, so a caller may pass a matrix whose upper half is stale.

use std::marker::PhantomData;

use reglin_core::{KernelError, Matrix, RegScalar, Result, Vector};

use crate::column::ColumnKernel;
use crate::pivot::ZeroPivot;
use crate::triangular::{back_lower_transposed, forward_lower, Diagonal};

/// Cholesky factor `L` of a symmetric positive definite matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct LltFactorization<T, K> {
    l: Matrix<T>,
    kernel: PhantomData<K>,
}

impl<T: RegScalar, K: ColumnKernel<T>> LltFactorization<T, K> {
    /// Fails with `NotPositiveDefinite` when a diagonal entry of the Schur
    /// complement is not strictly positive.
    pub fn new(a: &Matrix<T>) -> Result<Self> {
        let n = a.square_size()?;
        let zero = ZeroPivot::for_matrix(a);
        let mut l = lower_part(a);

        for j in 0..n {
            for k in 0..j {
                let (target, source) = l.col_pair_mut(j, k);
                K::sub_scaled(&mut target[j..], source[j], &source[j..]);
            }
            let d = l[(j, j)];
            if zero.is_zero(d) || d < T::zero() {
                return Err(KernelError::NotPositiveDefinite { step: j });
            }
            let root = d.sqrt();
            let col = l.col_mut(j);
            col[j] = root;
            K::scale(&mut col[j + 1..], T::one() / root);
        }

        Ok(Self {
            l,
            kernel: PhantomData,
        })
    }

    pub fn l(&self) -> &Matrix<T> {
        &self.l
    }

    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>> {
        check_rhs(self.l.rows(), b)?;
        let mut x = b.clone();
        forward_lower::<T, K>(&self.l, Diagonal::Stored, x.as_mut_slice());
        back_lower_transposed::<T, K>(&self.l, Diagonal::Stored, x.as_mut_slice());
        Ok(x)
    }
}

/// Unit lower `L` and diagonal `D` of a symmetric matrix, without pivoting.
///
/// `D` is stored on the diagonal of the packed matrix and `L` strictly
/// below it.
#[derive(Debug, Clone, PartialEq)]
pub struct LdltFactorization<T, K> {
    ld: Matrix<T>,
    kernel: PhantomData<K>,
}

impl<T: RegScalar, K: ColumnKernel<T>> LdltFactorization<T, K> {
    /// Fails with `SingularMatrix` on a numerically zero `D` entry.
    pub fn new(a: &Matrix<T>) -> Result<Self> {
        let n = a.square_size()?;
        let zero = ZeroPivot::for_matrix(a);
        let mut ld = lower_part(a);

        for j in 0..n {
            for k in 0..j {
                let (target, source) = ld.col_pair_mut(j, k);
                // L[j,k] · D[k]
                let f = source[j] * source[k];
                K::sub_scaled(&mut target[j..], f, &source[j..]);
            }
            let d = zero.check(ld[(j, j)], j)?;
            K::scale(&mut ld.col_mut(j)[j + 1..], T::one() / d);
        }

        Ok(Self {
            ld,
            kernel: PhantomData,
        })
    }

    /// Unit lower factor `L`.
    pub fn l(&self) -> Matrix<T> {
        let n = self.ld.rows();
        Matrix::from_fn(n, n, |r, c| match r.cmp(&c) {
            std::cmp::Ordering::Greater => self.ld[(r, c)],
            std::cmp::Ordering::Equal => T::one(),
            std::cmp::Ordering::Less => T::zero(),
        })
    }

    /// Diagonal of `D`.
    pub fn d(&self) -> Vector<T> {
        Vector::from_fn(self.ld.rows(), |i| self.ld[(i, i)])
    }

    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>> {
        check_rhs(self.ld.rows(), b)?;
        let mut x = b.clone();
        forward_lower::<T, K>(&self.ld, Diagonal::Unit, x.as_mut_slice());
        for (i, xi) in x.as_mut_slice().iter_mut().enumerate() {
            *xi = *xi / self.ld[(i, i)];
        }
        back_lower_transposed::<T, K>(&self.ld, Diagonal::Unit, x.as_mut_slice());
        Ok(x)
    }
}

/// Copy of the lower triangle of `a`, zero above the diagonal.
fn lower_part<T: RegScalar>(a: &Matrix<T>) -> Matrix<T> {
    Matrix::from_fn(a.rows(), a.cols(), |r, c| if r >= c { a[(r, c)] } else { T::zero() })
}

fn check_rhs<T: RegScalar>(n: usize, b: &Vector<T>) -> Result<()> {
    if b.len() != n {
        return Err(KernelError::DimensionMismatch {
            expected: [n, 1],
            got: [b.len(), 1],
        });
    }
    Ok(())
}

/// Cholesky-factorize `a` and solve `A·x = b`.
pub fn llt_solve<T: RegScalar, K: ColumnKernel<T>>(a: &Matrix<T>, b: &Vector<T>) -> Result<Vector<T>> {
    crate::check_system(a, b)?;
    LltFactorization::<T, K>::new(a)?.solve(b)
}

/// LDLᵗ-factorize `a` and solve `A·x = b`.
pub fn ldlt_solve<T: RegScalar, K: ColumnKernel<T>>(a: &Matrix<T>, b: &Vector<T>) -> Result<Vector<T>> {
    crate::check_system(a, b)?;
    LdltFactorization::<T, K>::new(a)?.solve(b)
}
