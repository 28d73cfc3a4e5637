//! Scalar type bounds for register elements.

use crate::register::Precision;

/// Element type that can live in a [`Register`](crate::Register).
///
/// Only the two IEEE floating-point widths qualify. The associated
/// [`PRECISION`](RegScalar::PRECISION) ties a type to its lane count in each
/// register width.
pub trait RegScalar:
    num_traits::Float + Default + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static
{
    /// Precision tag of this scalar type.
    const PRECISION: Precision;

    /// Convert from `f64`, rounding to the nearest representable value.
    fn cast_from_f64(v: f64) -> Self;

    /// Widen to `f64`.
    fn into_f64(self) -> f64;
}

impl RegScalar for f32 {
    const PRECISION: Precision = Precision::F32;

    #[inline(always)]
    fn cast_from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline(always)]
    fn into_f64(self) -> f64 {
        self as f64
    }
}

impl RegScalar for f64 {
    const PRECISION: Precision = Precision::F64;

    #[inline(always)]
    fn cast_from_f64(v: f64) -> Self {
        v
    }

    #[inline(always)]
    fn into_f64(self) -> f64 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_reg_scalar<T: RegScalar>() {}

    #[test]
    fn test_standard_types() {
        assert_reg_scalar::<f32>();
        assert_reg_scalar::<f64>();
        assert_eq!(<f32 as RegScalar>::PRECISION, Precision::F32);
        assert_eq!(<f64 as RegScalar>::PRECISION, Precision::F64);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(<f32 as RegScalar>::cast_from_f64(0.5), 0.5f32);
        assert_eq!(RegScalar::into_f64(0.25f32), 0.25f64);
        assert_eq!(<f64 as RegScalar>::cast_from_f64(1e300), 1e300);
    }
}
