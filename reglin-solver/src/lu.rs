//! LU factorization `P·A = L·U`.

use std::marker::PhantomData;

use reglin_core::{KernelError, Matrix, PivotStrategy, RegScalar, Result, Vector};

use crate::column::ColumnKernel;
use crate::pivot::{select_pivot_row, Permutation, ZeroPivot};
use crate::triangular::{back_upper, forward_lower, Diagonal};

/// Packed LU factors and the row permutation.
///
/// `L` is unit lower triangular and stored strictly below the diagonal, `U`
/// on and above it. The factorization can be reused for any number of
/// right-hand sides. `K` is the column kernel its solves run with.
#[derive(Debug, Clone, PartialEq)]
pub struct LuFactorization<T, K> {
    lu: Matrix<T>,
    permutation: Permutation,
    kernel: PhantomData<K>,
}

impl<T: RegScalar, K: ColumnKernel<T>> LuFactorization<T, K> {
    /// Factorize `a`.
    ///
    /// Fails with `DimensionMismatch` for a non-square `a` and with
    /// `SingularMatrix` on a numerically zero pivot.
    pub fn new(a: &Matrix<T>, pivot: PivotStrategy) -> Result<Self> {
        let n = a.square_size()?;
        let zero = ZeroPivot::for_matrix(a);
        let mut lu = a.clone();
        let mut permutation = Permutation::identity(n);

        for k in 0..n {
            let p = select_pivot_row::<T, K>(&lu, k, pivot);
            if p != k {
                // whole rows: earlier multipliers follow their row
                lu.swap_rows(k, p);
                permutation.swap(k, p);
            }
            let inv = T::one() / zero.check(lu[(k, k)], k)?;
            K::scale(&mut lu.col_mut(k)[k + 1..], inv);
            for c in k + 1..n {
                let (target, source) = lu.col_pair_mut(c, k);
                let f = target[k];
                K::sub_scaled(&mut target[k + 1..], f, &source[k + 1..]);
            }
        }

        Ok(Self {
            lu,
            permutation,
            kernel: PhantomData,
        })
    }

    pub fn size(&self) -> usize {
        self.lu.rows()
    }

    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// The packed factors.
    pub fn packed(&self) -> &Matrix<T> {
        &self.lu
    }

    /// Unit lower factor `L`.
    pub fn l(&self) -> Matrix<T> {
        let n = self.size();
        Matrix::from_fn(n, n, |r, c| match r.cmp(&c) {
            std::cmp::Ordering::Greater => self.lu[(r, c)],
            std::cmp::Ordering::Equal => T::one(),
            std::cmp::Ordering::Less => T::zero(),
        })
    }

    /// Upper factor `U`.
    pub fn u(&self) -> Matrix<T> {
        let n = self.size();
        Matrix::from_fn(n, n, |r, c| if r <= c { self.lu[(r, c)] } else { T::zero() })
    }

    /// `det(A)`, from the diagonal of `U` and the permutation sign.
    pub fn determinant(&self) -> T {
        let diag = (0..self.size()).fold(T::one(), |acc, i| acc * self.lu[(i, i)]);
        if self.permutation.sign() < 0 {
            -diag
        } else {
            diag
        }
    }

    /// Solve `A·x = b`.
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>> {
        let n = self.size();
        if b.len() != n {
            return Err(KernelError::DimensionMismatch {
                expected: [n, 1],
                got: [b.len(), 1],
            });
        }
        let mut x = self.permutation.apply(b.as_slice());
        forward_lower::<T, K>(&self.lu, Diagonal::Unit, x.as_mut_slice());
        back_upper::<T, K>(&self.lu, x.as_mut_slice());
        Ok(x)
    }

    /// Solve `A·X = B` column by column.
    pub fn solve_many(&self, b: &Matrix<T>) -> Result<Matrix<T>> {
        let n = self.size();
        if b.rows() != n {
            return Err(KernelError::DimensionMismatch {
                expected: [n, b.cols()],
                got: b.shape(),
            });
        }
        let mut out = Matrix::zeros(n, b.cols());
        for c in 0..b.cols() {
            let x = self.solve(&Vector::from_slice(b.col(c)))?;
            out.col_mut(c).copy_from_slice(x.as_slice());
        }
        Ok(out)
    }
}

/// Factorize `a` and solve `A·x = b`.
pub fn lu_solve<T: RegScalar, K: ColumnKernel<T>>(
    a: &Matrix<T>,
    b: &Vector<T>,
    pivot: PivotStrategy,
) -> Result<Vector<T>> {
    crate::check_system(a, b)?;
    LuFactorization::<T, K>::new(a, pivot)?.solve(b)
}
