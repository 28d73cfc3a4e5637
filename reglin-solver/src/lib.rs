//! Dense solvers for small square systems.
//!
//! Every solver is written once against [`ColumnKernel`] and runs either
//! serially ([`SerialKernel`]) or one register of lanes at a time
//! ([`RegisterKernel`]). Both variants execute the same sequence of
//! column operations, so their results agree up to the summation order of
//! dot products.
//!
//! | Family | Factorization | Pivoting |
//! |---|---|---|
//! | [`gauss`] | elimination of `[A \| b]` | none or partial |
//! | [`LuFactorization`] | `P·A = L·U` | none or partial |
//! | [`QrFactorization`] | `A = Q·R`, Householder | none |
//! | [`LltFactorization`] | `A = L·Lᵗ` | none |
//! | [`LdltFactorization`] | `A = L·D·Lᵗ` | none |
//! | [`cramer`] | determinants, `n ∈ 2..=4` | none |
//!
//! # Example
//!
//! ```rust
//! use reglin_core::{Matrix, PivotStrategy, Vector, Vectorization};
//! use reglin_solver::{solve, SolverConfig, SolverFamily};
//!
//! let a = Matrix::from_rows(&[[0.0, 1.0], [1.0, 1.0]]);
//! let b = Vector::from([1.0, 2.0]);
//! let config = SolverConfig::new(Vectorization::Avx, PivotStrategy::PartialPivot);
//! let x = solve(SolverFamily::Gauss, config, &a, &b).unwrap();
//! assert_eq!(x, Vector::from([1.0, 1.0]));
//!
//! let no_pivot = SolverConfig::new(Vectorization::Avx, PivotStrategy::NoPivot);
//! assert!(solve(SolverFamily::Gauss, no_pivot, &a, &b).is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use reglin_core::{Matrix, PivotStrategy, RegScalar, Vector, Vectorization};

mod cholesky;
pub mod column;
mod cramer;
mod gauss;
mod lu;
pub mod pivot;
mod qr;
pub mod triangular;

pub use cholesky::{ldlt_solve, llt_solve, LdltFactorization, LltFactorization};
pub use column::{ColumnKernel, RegisterKernel, SerialKernel};
pub use cramer::{cramer, determinant, MAX_CRAMER_SIZE};
pub use gauss::gauss;
pub use lu::{lu_solve, LuFactorization};
pub use pivot::{Permutation, ZeroPivot};
pub use qr::{qr_solve, QrFactorization};

pub use reglin_core::{KernelError, Result};

use column::with_column_kernel;

/// Solver families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SolverFamily {
    Gauss,
    Lu,
    Qr,
    Llt,
    Ldlt,
    Cramer,
}

impl SolverFamily {
    pub const ALL: [SolverFamily; 6] = [
        SolverFamily::Gauss,
        SolverFamily::Lu,
        SolverFamily::Qr,
        SolverFamily::Llt,
        SolverFamily::Ldlt,
        SolverFamily::Cramer,
    ];

    /// Name used for result files (`Gauss`, `LU`, `QR`, ...).
    pub fn label(self) -> &'static str {
        match self {
            SolverFamily::Gauss => "Gauss",
            SolverFamily::Lu => "LU",
            SolverFamily::Qr => "QR",
            SolverFamily::Llt => "LLT",
            SolverFamily::Ldlt => "LDLT",
            SolverFamily::Cramer => "Cramer",
        }
    }

    /// Whether [`PivotStrategy::PartialPivot`] changes the algorithm.
    pub fn supports_pivoting(self) -> bool {
        matches!(self, SolverFamily::Gauss | SolverFamily::Lu)
    }

    /// Whether a vectorized variant exists.
    pub fn supports_vectorization(self) -> bool {
        self != SolverFamily::Cramer
    }

    /// Whether the family requires a symmetric matrix.
    pub fn requires_symmetry(self) -> bool {
        matches!(self, SolverFamily::Llt | SolverFamily::Ldlt)
    }

    /// Whether the family has a kernel for `config`.
    pub fn supports(self, config: SolverConfig) -> bool {
        (config.pivot == PivotStrategy::NoPivot || self.supports_pivoting())
            && (!config.vectorization.is_simd() || self.supports_vectorization())
    }

    /// Fails with `UnsupportedVariant` unless [`supports`](Self::supports).
    pub fn check_supported(self, config: SolverConfig) -> Result<()> {
        if config.pivot != PivotStrategy::NoPivot && !self.supports_pivoting() {
            return Err(KernelError::UnsupportedVariant {
                family: self.label(),
                variant: config.pivot.label(),
            });
        }
        if config.vectorization.is_simd() && !self.supports_vectorization() {
            return Err(KernelError::UnsupportedVariant {
                family: self.label(),
                variant: config.vectorization.label(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for SolverFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SolverFamily {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown solver family {s:?}"))
    }
}

/// Kernel variant of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SolverConfig {
    pub vectorization: Vectorization,
    pub pivot: PivotStrategy,
}

impl SolverConfig {
    pub fn new(vectorization: Vectorization, pivot: PivotStrategy) -> Self {
        Self {
            vectorization,
            pivot,
        }
    }
}

/// Solve `A·x = b` with the given family and kernel variant.
///
/// Fails with `UnsupportedVariant` when the family has no kernel for
/// `config`: pivoting exists only for Gauss and LU, and Cramer's rule only
/// runs serially.
pub fn solve<T: RegScalar>(
    family: SolverFamily,
    config: SolverConfig,
    a: &Matrix<T>,
    b: &Vector<T>,
) -> Result<Vector<T>> {
    family.check_supported(config)?;
    if family == SolverFamily::Cramer {
        return cramer(a, b);
    }
    let elements = a.rows() * a.cols();
    with_column_kernel!(config.vectorization, T, elements, |K| match family {
        SolverFamily::Gauss => gauss::<T, K>(a, b, config.pivot),
        SolverFamily::Lu => lu_solve::<T, K>(a, b, config.pivot),
        SolverFamily::Qr => qr_solve::<T, K>(a, b),
        SolverFamily::Llt => llt_solve::<T, K>(a, b),
        SolverFamily::Ldlt => ldlt_solve::<T, K>(a, b),
        SolverFamily::Cramer => cramer(a, b),
    })
}

/// Entry check shared by every solver: `A` square and non-empty, `b` of
/// matching length. Returns `n`.
pub(crate) fn check_system<T: RegScalar>(a: &Matrix<T>, b: &Vector<T>) -> Result<usize> {
    let n = a.square_size()?;
    if b.len() != n {
        return Err(KernelError::DimensionMismatch {
            expected: [n, 1],
            got: [b.len(), 1],
        });
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_family_labels() {
        for family in SolverFamily::ALL {
            assert_eq!(family.label().parse::<SolverFamily>().unwrap(), family);
        }
        assert_eq!("lu".parse::<SolverFamily>().unwrap(), SolverFamily::Lu);
        assert!("svd".parse::<SolverFamily>().is_err());
        assert!(SolverFamily::Lu.supports_pivoting());
        assert!(!SolverFamily::Qr.supports_pivoting());
        assert!(!SolverFamily::Cramer.supports_vectorization());
    }

    #[test]
    fn test_solve_every_family() {
        let a = Matrix::from_rows(&[[4.0f64, 1.0, 0.5], [1.0, 3.0, -1.0], [0.5, -1.0, 5.0]]);
        let x = Vector::from([1.0, -2.0, 0.5]);
        let b = a.mul_vec(&x).unwrap();
        for family in SolverFamily::ALL {
            for vectorization in Vectorization::ALL {
                for pivot in PivotStrategy::ALL {
                    let config = SolverConfig::new(vectorization, pivot);
                    if !family.supports(config) {
                        continue;
                    }
                    let got = solve(family, config, &a, &b).unwrap();
                    assert_relative_eq!(got.as_slice(), x.as_slice(), epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_unsupported_variants_are_rejected() {
        let a = Matrix::<f64>::identity(3);
        let b = Vector::from([1.0, 2.0, 3.0]);
        let partial = SolverConfig::new(Vectorization::Serial, PivotStrategy::PartialPivot);
        for family in [SolverFamily::Qr, SolverFamily::Llt, SolverFamily::Ldlt, SolverFamily::Cramer] {
            assert!(!family.supports(partial));
            assert_eq!(
                solve(family, partial, &a, &b),
                Err(KernelError::UnsupportedVariant {
                    family: family.label(),
                    variant: "PartialPivot"
                })
            );
        }
        for vectorization in [Vectorization::Sse, Vectorization::Avx] {
            assert_eq!(
                solve(SolverFamily::Cramer, SolverConfig::new(vectorization, PivotStrategy::NoPivot), &a, &b),
                Err(KernelError::UnsupportedVariant {
                    family: "Cramer",
                    variant: vectorization.label()
                })
            );
        }
        let supported = SolverConfig::new(Vectorization::Avx, PivotStrategy::PartialPivot);
        assert!(SolverFamily::Lu.supports(supported));
        assert_eq!(solve(SolverFamily::Lu, supported, &a, &b).unwrap(), b);
    }

    #[test]
    fn test_entry_checks() {
        let a = Matrix::<f32>::identity(3);
        for family in SolverFamily::ALL {
            assert_eq!(
                solve(family, SolverConfig::default(), &a, &Vector::zeros(2)),
                Err(KernelError::DimensionMismatch {
                    expected: [3, 1],
                    got: [2, 1]
                })
            );
            assert!(matches!(
                solve(family, SolverConfig::default(), &Matrix::<f32>::zeros(0, 0), &Vector::zeros(0)),
                Err(KernelError::DimensionMismatch { .. })
            ));
        }
    }
}
