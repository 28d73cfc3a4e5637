//! Core types shared by the reglin kernels.
//!
//! This crate owns the data model the transpose and solver crates build on:
//!
//! - [`RegisterKind`]: the supported vector registers and their element counts
//! - [`Register`]: a fixed-width lane array standing in for one SIMD register
//! - [`RegScalar`]: scalar bound for register elements (`f32`, `f64`)
//! - [`Matrix`] / [`Vector`]: column-major dense storage for solver inputs
//! - [`PivotStrategy`], [`Vectorization`], [`Precision`]: kernel configuration
//!
//! # Dependency graph
//!
//! ```text
//! reglin-core -> reglin-transpose -> reglin
//!             -> reglin-solver    -> reglin-bench
//! ```
//!
//! # Example
//!
//! ```rust
//! use reglin_core::{element_count, Register, RegisterKind};
//!
//! assert_eq!(RegisterKind::M256.element_count(), 8);
//! assert_eq!(element_count("__m128d").unwrap(), 2);
//!
//! let r = Register::<f32, 4>::from_array([1.0, -2.0, 3.0, -4.0]);
//! assert_eq!(r.abs().sum(), 10.0);
//! ```

pub mod matrix;
mod pivot;
pub mod register;
mod scalar;
pub mod simd;

pub use matrix::{Matrix, Vector};
pub use pivot::PivotStrategy;
pub use register::{
    element_count, lane_range_mask, Precision, Register, RegisterKind, Vectorization,
};
pub use scalar::RegScalar;

// ============================================================================
// Error types
// ============================================================================

/// Errors reported by the register, transpose and solver kernels.
///
/// Every kind is returned to the immediate caller. Nothing is retried or
/// recovered inside the kernel layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    /// A register identifier did not name one of the supported registers.
    #[error("invalid register kind: {0:?}")]
    InvalidRegisterKind(String),

    /// A size, lane offset or register position lies outside its valid range.
    #[error("{what} = {value} is out of range {min}..={max}")]
    OutOfRange {
        what: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    /// Operand shapes are incompatible (non-square matrix, wrong rhs length).
    #[error("dimension mismatch: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        expected: [usize; 2],
        got: [usize; 2],
    },

    /// A pivot or diagonal entry is numerically zero.
    #[error("singular matrix: zero pivot at step {step}")]
    SingularMatrix { step: usize },

    /// A Cholesky diagonal entry is not strictly positive.
    #[error("matrix is not positive definite (step {step})")]
    NotPositiveDefinite { step: usize },

    /// The solver family has no kernel for the requested vectorization or
    /// pivot strategy.
    #[error("{family} has no {variant} variant")]
    UnsupportedVariant {
        family: &'static str,
        variant: &'static str,
    },
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;

/// Check that `value` lies in `min..=max`.
#[inline]
pub fn check_range(what: &'static str, value: usize, min: usize, max: usize) -> Result<()> {
    if value < min || value > max {
        return Err(KernelError::OutOfRange {
            what,
            value,
            min,
            max,
        });
    }
    Ok(())
}
