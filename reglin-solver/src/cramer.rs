//! Cramer's rule for 2×2, 3×3 and 4×4 systems.
//!
//! `x[i] = det(Aᵢ) / det(A)`, where `Aᵢ` is `A` with column `i` replaced
//! by `b`. The determinants are cofactor expansions, so there is no
//! elimination and no pivoting; the closed form is only worth it for these
//! tiny sizes.

use reglin_core::{check_range, KernelError, Matrix, RegScalar, Result, Vector};

/// Largest system solved by [`cramer`].
pub const MAX_CRAMER_SIZE: usize = 4;

/// Solve `A·x = b` by Cramer's rule.
///
/// Fails with `OutOfRange` unless `A` is 2×2, 3×3 or 4×4, and with
/// `SingularMatrix { step: 0 }` when `det(A)` is numerically zero relative
/// to `n · ε · max|A|ⁿ`.
pub fn cramer<T: RegScalar>(a: &Matrix<T>, b: &Vector<T>) -> Result<Vector<T>> {
    let n = crate::check_system(a, b)?;
    check_range("size", n, 2, MAX_CRAMER_SIZE)?;

    let det_a = determinant(a);
    let scale = a.max_abs().powi(n as i32);
    let threshold = T::cast_from_f64(n as f64) * T::epsilon() * scale;
    if !det_a.is_finite() || det_a.abs() <= threshold {
        return Err(KernelError::SingularMatrix { step: 0 });
    }

    let mut ai = a.clone();
    let mut x = Vector::zeros(n);
    for i in 0..n {
        ai.col_mut(i).copy_from_slice(b.as_slice());
        x[i] = determinant(&ai) / det_a;
        ai.col_mut(i).copy_from_slice(a.col(i));
    }
    Ok(x)
}

/// Determinant by cofactor expansion along the first column.
///
/// Intended for `n <= 4`; the cost grows factorially.
pub fn determinant<T: RegScalar>(m: &Matrix<T>) -> T {
    match m.rows() {
        0 => T::one(),
        1 => m[(0, 0)],
        2 => m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
        n => {
            let mut det = T::zero();
            for i in 0..n {
                let cofactor = m[(i, 0)] * determinant(&minor(m, i, 0));
                det = if i % 2 == 0 { det + cofactor } else { det - cofactor };
            }
            det
        }
    }
}

fn minor<T: RegScalar>(m: &Matrix<T>, row: usize, col: usize) -> Matrix<T> {
    let n = m.rows() - 1;
    Matrix::from_fn(n, n, |r, c| {
        let r = if r < row { r } else { r + 1 };
        let c = if c < col { c } else { c + 1 };
        m[(r, c)]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_determinant() {
        let m = Matrix::from_rows(&[[2.0f64, -3.0, 1.0], [2.0, 0.0, -1.0], [1.0, 4.0, 5.0]]);
        assert_eq!(determinant(&m), 49.0);
        let m4 = Matrix::from_rows(&[
            [1.0f64, 0.0, 2.0, -1.0],
            [3.0, 0.0, 0.0, 5.0],
            [2.0, 1.0, 4.0, -3.0],
            [1.0, 0.0, 5.0, 0.0],
        ]);
        assert_eq!(determinant(&m4), 30.0);
        assert_eq!(determinant(&Matrix::<f32>::identity(4)), 1.0);
    }

    #[test]
    fn test_cramer_sizes() {
        for n in 2..=4 {
            let a = Matrix::from_fn(n, n, |r, c| if r == c { 4.0f64 } else { (r + 2 * c) as f64 * 0.25 });
            let x = Vector::from_fn(n, |i| i as f64 - 1.0);
            let b = a.mul_vec(&x).unwrap();
            let got = cramer(&a, &b).unwrap();
            assert_relative_eq!(got.as_slice(), x.as_slice(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cramer_rejects() {
        let a = Matrix::from_rows(&[[0.0f64, 1.0], [1.0, 1.0]]);
        let x = cramer(&a, &Vector::from([1.0, 2.0])).unwrap();
        assert_eq!(x, Vector::from([1.0, 1.0]));

        let singular = Matrix::from_rows(&[[1.0f64, 2.0], [2.0, 4.0]]);
        assert_eq!(
            cramer(&singular, &Vector::from([1.0, 2.0])),
            Err(KernelError::SingularMatrix { step: 0 })
        );
        let big = Matrix::<f64>::identity(5);
        assert!(matches!(
            cramer(&big, &Vector::zeros(5)),
            Err(KernelError::OutOfRange { what: "size", .. })
        ));
    }
}
