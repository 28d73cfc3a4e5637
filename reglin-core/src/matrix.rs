//! Column-major dense matrix and vector types.
//!
//! Storage is column-major: element `(r, c)` lives at `c * rows + r`, so each
//! column is a contiguous slice. This matches the register layout used by the
//! kernels, where one register (or a run of registers) holds one column.
//!
//! Both types keep small operands inline ([`INLINE_ELEMENTS`] values for a
//! matrix, [`INLINE_VECTOR`] for a vector). Register-sized systems therefore
//! never touch the heap.

use std::ops::{Index, IndexMut};

use smallvec::SmallVec;

use crate::scalar::RegScalar;
use crate::{KernelError, Result};

/// Matrix elements stored inline before spilling to the heap (8×8).
pub const INLINE_ELEMENTS: usize = 64;

/// Vector elements stored inline before spilling to the heap.
pub const INLINE_VECTOR: usize = 8;

// ============================================================================
// Matrix
// ============================================================================

/// Dense column-major matrix with runtime dimensions.
#[derive(Clone, PartialEq, Debug)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: SmallVec<[T; INLINE_ELEMENTS]>,
}

impl<T: RegScalar> Matrix<T> {
    /// Create a `rows × cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: SmallVec::from_elem(T::zero(), rows * cols),
        }
    }

    /// Create the `n × n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = T::one();
        }
        m
    }

    /// Create a matrix by evaluating `f(row, col)` for every element.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = SmallVec::with_capacity(rows * cols);
        for c in 0..cols {
            for r in 0..rows {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    /// Wrap column-major data. `data.len()` must equal `rows * cols`.
    pub fn from_col_major(rows: usize, cols: usize, data: &[T]) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(KernelError::DimensionMismatch {
                expected: [rows * cols, 1],
                got: [data.len(), 1],
            });
        }
        Ok(Self {
            rows,
            cols,
            data: SmallVec::from_slice(data),
        })
    }

    /// Build from row-major data. `data.len()` must equal `rows * cols`.
    pub fn from_row_major(rows: usize, cols: usize, data: &[T]) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(KernelError::DimensionMismatch {
                expected: [rows * cols, 1],
                got: [data.len(), 1],
            });
        }
        Ok(Self::from_fn(rows, cols, |r, c| data[r * cols + c]))
    }

    /// Build from a list of rows.
    ///
    /// ```rust
    /// use reglin_core::Matrix;
    ///
    /// let a = Matrix::from_rows(&[[0.0, 1.0], [1.0, 1.0]]);
    /// assert_eq!(a[(0, 1)], 1.0);
    /// assert_eq!(a.col(0), &[0.0, 1.0]);
    /// ```
    pub fn from_rows<const C: usize>(rows: &[[T; C]]) -> Self {
        Self::from_fn(rows.len(), C, |r, c| rows[r][c])
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Return the size of a square, non-empty matrix.
    ///
    /// Fails with [`KernelError::DimensionMismatch`] otherwise.
    pub fn square_size(&self) -> Result<usize> {
        if !self.is_square() || self.rows == 0 {
            let n = self.rows.max(self.cols).max(1);
            return Err(KernelError::DimensionMismatch {
                expected: [n, n],
                got: self.shape(),
            });
        }
        Ok(self.rows)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[col * self.rows + row]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[col * self.rows + row] = value;
    }

    /// Column `c` as a contiguous slice.
    #[inline]
    pub fn col(&self, c: usize) -> &[T] {
        &self.data[c * self.rows..(c + 1) * self.rows]
    }

    #[inline]
    pub fn col_mut(&mut self, c: usize) -> &mut [T] {
        let rows = self.rows;
        &mut self.data[c * rows..(c + 1) * rows]
    }

    /// Borrow column `target` mutably and column `source` immutably.
    ///
    /// # Panics
    /// Panics if `target == source`.
    pub fn col_pair_mut(&mut self, target: usize, source: usize) -> (&mut [T], &[T]) {
        assert_ne!(target, source, "column pair must be distinct");
        let rows = self.rows;
        if target < source {
            let (lo, hi) = self.data.split_at_mut(source * rows);
            (&mut lo[target * rows..(target + 1) * rows], &hi[..rows])
        } else {
            let (lo, hi) = self.data.split_at_mut(target * rows);
            (&mut hi[..rows], &lo[source * rows..(source + 1) * rows])
        }
    }

    /// Column-major element slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Exchange rows `a` and `b` across every column.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for c in 0..self.cols {
            self.col_mut(c).swap(a, b);
        }
    }

    /// Largest absolute element, zero for an empty matrix.
    pub fn max_abs(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &v| if v.abs() > acc { v.abs() } else { acc })
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |r, c| self.get(c, r))
    }

    /// Matrix-vector product `self · x`.
    pub fn mul_vec(&self, x: &Vector<T>) -> Result<Vector<T>> {
        if x.len() != self.cols {
            return Err(KernelError::DimensionMismatch {
                expected: [self.cols, 1],
                got: [x.len(), 1],
            });
        }
        let mut y = Vector::zeros(self.rows);
        for c in 0..self.cols {
            let xc = x[c];
            for (yr, &a) in y.as_mut_slice().iter_mut().zip(self.col(c)) {
                *yr = *yr + a * xc;
            }
        }
        Ok(y)
    }

    /// Matrix product `self · rhs`.
    pub fn matmul(&self, rhs: &Matrix<T>) -> Result<Matrix<T>> {
        if rhs.rows != self.cols {
            return Err(KernelError::DimensionMismatch {
                expected: [self.cols, rhs.cols],
                got: rhs.shape(),
            });
        }
        let mut out = Matrix::zeros(self.rows, rhs.cols);
        for j in 0..rhs.cols {
            for k in 0..self.cols {
                let b = rhs.get(k, j);
                for i in 0..self.rows {
                    let v = out.get(i, j) + self.get(i, k) * b;
                    out.set(i, j, v);
                }
            }
        }
        Ok(out)
    }

    /// Convert every element to another precision.
    pub fn cast<U: RegScalar>(&self) -> Matrix<U> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|&v| U::cast_from_f64(v.into_f64()))
                .collect(),
        }
    }
}

impl<T: RegScalar> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[col * self.rows + row]
    }
}

impl<T: RegScalar> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        &mut self.data[col * self.rows + row]
    }
}

// ============================================================================
// Vector
// ============================================================================

/// Dense column vector.
#[derive(Clone, PartialEq, Debug)]
pub struct Vector<T> {
    data: SmallVec<[T; INLINE_VECTOR]>,
}

impl<T: RegScalar> Vector<T> {
    pub fn zeros(len: usize) -> Self {
        Self {
            data: SmallVec::from_elem(T::zero(), len),
        }
    }

    pub fn from_slice(values: &[T]) -> Self {
        Self {
            data: SmallVec::from_slice(values),
        }
    }

    pub fn from_fn(len: usize, f: impl FnMut(usize) -> T) -> Self {
        Self {
            data: (0..len).map(f).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }

    /// Largest element-wise `|self - other|`.
    ///
    /// # Panics
    /// Panics if the lengths differ.
    pub fn max_abs_diff(&self, other: &Vector<T>) -> T {
        assert_eq!(self.len(), other.len(), "vector length mismatch");
        self.data
            .iter()
            .zip(other.data.iter())
            .fold(T::zero(), |acc, (&a, &b)| {
                let d = (a - b).abs();
                if d > acc {
                    d
                } else {
                    acc
                }
            })
    }

    /// Largest absolute element, zero for an empty vector.
    pub fn max_abs(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &v| if v.abs() > acc { v.abs() } else { acc })
    }

    pub fn cast<U: RegScalar>(&self) -> Vector<U> {
        Vector {
            data: self
                .data
                .iter()
                .map(|&v| U::cast_from_f64(v.into_f64()))
                .collect(),
        }
    }
}

impl<T: RegScalar, const N: usize> From<[T; N]> for Vector<T> {
    fn from(values: [T; N]) -> Self {
        Self::from_slice(&values)
    }
}

impl<T: RegScalar> Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T: RegScalar> IndexMut<usize> for Vector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}
