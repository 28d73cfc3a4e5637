//! Register-resident dense linear algebra for small matrices.
//!
//! This crate re-exports the kernel crates under one name:
//!
//! - [`reglin_core`]: register model, [`Matrix`]/[`Vector`], configuration
//!   enums and [`KernelError`]
//! - [`reglin_transpose`]: offset-aware transpose of matrices held in registers
//! - [`reglin_solver`]: Gauss, LU, QR, Cholesky and Cramer solvers in serial
//!   and register-vectorized form
//!
//! # Primary API
//!
//! - [`element_count`]: lanes of a named register (`__m128` → 4)
//! - [`transpose_matrix`]: transpose through registers of a given kind, with
//!   lane offsets and a [`TailPolicy`]
//! - [`solve`]: solve `A·x = b` with a [`SolverFamily`] and [`SolverConfig`]
//! - [`LuFactorization`], [`QrFactorization`]: factor once, solve many
//!
//! # Example
//!
//! ```rust
//! use reglin::{
//!     solve, transpose_matrix, Matrix, PivotStrategy, RegisterKind, SolverConfig,
//!     SolverFamily, TailPolicy, Vector, Vectorization,
//! };
//!
//! let a = Matrix::from_rows(&[[2.0, 1.0], [1.0, 3.0]]);
//! let at = transpose_matrix(RegisterKind::M256d, 2, 1, TailPolicy::KeepUnused, &a).unwrap();
//! assert_eq!(at, a.transpose());
//!
//! let b = Vector::from([3.0, 5.0]);
//! let config = SolverConfig::new(Vectorization::Sse, PivotStrategy::PartialPivot);
//! let x = solve(SolverFamily::Lu, config, &a, &b).unwrap();
//! assert!((x[0] - 0.8).abs() < 1e-12 && (x[1] - 1.4).abs() < 1e-12);
//! ```

pub use reglin_core;
pub use reglin_solver;
pub use reglin_transpose;

pub use reglin_core::{
    check_range, element_count, KernelError, Matrix, PivotStrategy, Precision, RegScalar,
    Register, RegisterKind, Result, Vector, Vectorization,
};
pub use reglin_solver::{
    cramer, gauss, ldlt_solve, llt_solve, lu_solve, qr_solve, solve, ColumnKernel,
    LdltFactorization, LltFactorization, LuFactorization, Permutation, QrFactorization,
    RegisterKernel, SerialKernel, SolverConfig, SolverFamily,
};
pub use reglin_transpose::{
    transpose_into, transpose_matrix, RegisterPlacement, TailPolicy, TransposeShape,
};
