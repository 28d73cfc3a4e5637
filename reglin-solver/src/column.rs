//! Column primitives shared by every solver.
//!
//! Matrices are column-major, so the inner loops of elimination,
//! substitution and Householder updates are all operations on contiguous
//! column slices. [`ColumnKernel`] names those operations once; the solvers
//! are generic over it and run the same algorithm with either
//! [`SerialKernel`] (one element per step) or [`RegisterKernel`] (`N` lanes
//! per step).

use std::marker::PhantomData;

use reglin_core::{RegScalar, Register};

/// Slice operations a solver is built from.
pub trait ColumnKernel<T: RegScalar> {
    /// Elements processed per step.
    const WIDTH: usize;

    /// `y[i] -= a * x[i]`. Both slices have the same length.
    fn sub_scaled(y: &mut [T], a: T, x: &[T]);

    /// `y[i] *= a`.
    fn scale(y: &mut [T], a: T);

    /// `Σ x[i] * y[i]`. Both slices have the same length.
    fn dot(x: &[T], y: &[T]) -> T;

    /// Index of the first element of largest magnitude, 0 for an empty slice.
    fn max_abs_index(x: &[T]) -> usize;
}

/// One element per step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerialKernel;

impl<T: RegScalar> ColumnKernel<T> for SerialKernel {
    const WIDTH: usize = 1;

    #[inline]
    fn sub_scaled(y: &mut [T], a: T, x: &[T]) {
        debug_assert_eq!(y.len(), x.len());
        for (yi, &xi) in y.iter_mut().zip(x) {
            *yi = *yi - a * xi;
        }
    }

    #[inline]
    fn scale(y: &mut [T], a: T) {
        for yi in y.iter_mut() {
            *yi = *yi * a;
        }
    }

    #[inline]
    fn dot(x: &[T], y: &[T]) -> T {
        debug_assert_eq!(x.len(), y.len());
        x.iter()
            .zip(y)
            .fold(T::zero(), |acc, (&xi, &yi)| acc + xi * yi)
    }

    #[inline]
    fn max_abs_index(x: &[T]) -> usize {
        let mut best = 0;
        let mut best_val = T::zero();
        for (i, &v) in x.iter().enumerate() {
            if v.abs() > best_val {
                best = i;
                best_val = v.abs();
            }
        }
        best
    }
}

/// `N` lanes per step, with a masked step for the remainder.
///
/// `N` is the lane count of the register the kernel stands for: 4 or 8 for
/// `f32`, 2 or 4 for `f64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterKernel<const N: usize>(PhantomData<[(); N]>);

impl<T: RegScalar, const N: usize> ColumnKernel<T> for RegisterKernel<N> {
    const WIDTH: usize = N;

    #[inline]
    fn sub_scaled(y: &mut [T], a: T, x: &[T]) {
        debug_assert_eq!(y.len(), x.len());
        let av = Register::<T, N>::splat(a);
        let mut ys = y.chunks_exact_mut(N);
        let mut xs = x.chunks_exact(N);
        for (yc, xc) in (&mut ys).zip(&mut xs) {
            Register::<T, N>::load(yc).sub_mul(av, Register::<T, N>::load(xc)).store(yc);
        }
        let (yr, xr) = (ys.into_remainder(), xs.remainder());
        if !yr.is_empty() {
            Register::<T, N>::load_partial(yr)
                .sub_mul(av, Register::<T, N>::load_partial(xr))
                .store_partial(yr);
        }
    }

    #[inline]
    fn scale(y: &mut [T], a: T) {
        let av = Register::<T, N>::splat(a);
        let mut ys = y.chunks_exact_mut(N);
        for yc in &mut ys {
            (Register::<T, N>::load(yc) * av).store(yc);
        }
        let yr = ys.into_remainder();
        if !yr.is_empty() {
            (Register::<T, N>::load_partial(yr) * av).store_partial(yr);
        }
    }

    #[inline]
    fn dot(x: &[T], y: &[T]) -> T {
        debug_assert_eq!(x.len(), y.len());
        let mut acc = Register::<T, N>::zero();
        let mut xs = x.chunks_exact(N);
        let mut ys = y.chunks_exact(N);
        for (xc, yc) in (&mut xs).zip(&mut ys) {
            acc = acc + Register::<T, N>::load(xc) * Register::<T, N>::load(yc);
        }
        if !xs.remainder().is_empty() {
            // zero-filled lanes contribute nothing
            let (xr, yr) = (xs.remainder(), ys.remainder());
            acc = acc + Register::<T, N>::load_partial(xr) * Register::<T, N>::load_partial(yr);
        }
        acc.sum()
    }

    #[inline]
    fn max_abs_index(x: &[T]) -> usize {
        let mut best = 0;
        let mut best_val = T::zero();
        for (chunk_idx, chunk) in x.chunks(N).enumerate() {
            let (lane, v) = Register::<T, N>::load_partial(chunk).max_abs_lane(chunk.len());
            if v > best_val {
                best = chunk_idx * N + lane;
                best_val = v;
            }
        }
        best
    }
}

/// Run `$body` with `$k` bound to the column kernel for `$vectorization` and
/// scalar type `$t`. Vectorized kernels run inside the runtime SIMD dispatch
/// region when `$elements` is large enough for it to pay off.
macro_rules! with_column_kernel {
    ($vectorization:expr, $t:ty, $elements:expr, |$k:ident| $body:expr) => {
        match $vectorization.lanes(<$t as reglin_core::RegScalar>::PRECISION) {
            1 => {
                type $k = $crate::column::SerialKernel;
                $body
            }
            2 => {
                type $k = $crate::column::RegisterKernel<2>;
                reglin_core::simd::dispatch_if_large($elements, || $body)
            }
            4 => {
                type $k = $crate::column::RegisterKernel<4>;
                reglin_core::simd::dispatch_if_large($elements, || $body)
            }
            _ => {
                type $k = $crate::column::RegisterKernel<8>;
                reglin_core::simd::dispatch_if_large($elements, || $body)
            }
        }
    };
}

pub(crate) use with_column_kernel;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(len: usize, scale: f64) -> Vec<f64> {
        (0..len).map(|i| scale * (i as f64 - 3.5)).collect()
    }

    fn check_agrees<K: ColumnKernel<f64>>() {
        for len in 0..19 {
            let x = ramp(len, 0.5);
            let mut y_serial = ramp(len, 1.25);
            let mut y_kernel = y_serial.clone();
            <SerialKernel as ColumnKernel<f64>>::sub_scaled(&mut y_serial, 3.0, &x);
            K::sub_scaled(&mut y_kernel, 3.0, &x);
            assert_eq!(y_serial, y_kernel, "sub_scaled len={len}");

            <SerialKernel as ColumnKernel<f64>>::scale(&mut y_serial, -0.5);
            K::scale(&mut y_kernel, -0.5);
            assert_eq!(y_serial, y_kernel, "scale len={len}");

            assert_relative_eq!(
                <SerialKernel as ColumnKernel<f64>>::dot(&x, &y_serial),
                K::dot(&x, &y_kernel),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_register_kernels_match_serial() {
        check_agrees::<RegisterKernel<2>>();
        check_agrees::<RegisterKernel<4>>();
        check_agrees::<RegisterKernel<8>>();
    }

    #[test]
    fn test_max_abs_index() {
        let x = [1.0f32, -7.0, 3.0, 7.0, 0.5, -2.0, 6.0, -7.5, 1.0];
        assert_eq!(<SerialKernel as ColumnKernel<f32>>::max_abs_index(&x), 7);
        assert_eq!(<RegisterKernel<4> as ColumnKernel<f32>>::max_abs_index(&x), 7);
        assert_eq!(<RegisterKernel<8> as ColumnKernel<f32>>::max_abs_index(&x), 7);

        // ties go to the first occurrence
        let tie = [0.0f64, 2.0, -2.0, 1.0, 2.0];
        assert_eq!(<SerialKernel as ColumnKernel<f64>>::max_abs_index(&tie), 1);
        assert_eq!(<RegisterKernel<2> as ColumnKernel<f64>>::max_abs_index(&tie), 1);
        assert_eq!(<RegisterKernel<4> as ColumnKernel<f64>>::max_abs_index(&tie), 1);
        assert_eq!(<SerialKernel as ColumnKernel<f64>>::max_abs_index(&[]), 0);
        assert_eq!(<RegisterKernel<4> as ColumnKernel<f64>>::max_abs_index(&[0.0; 3]), 0);
    }

    #[test]
    fn test_dispatch_macro_picks_width() {
        use reglin_core::Vectorization;

        fn width<T: RegScalar>(v: Vectorization) -> usize {
            with_column_kernel!(v, T, 0, |K| <K as ColumnKernel<T>>::WIDTH)
        }
        assert_eq!(width::<f32>(Vectorization::Serial), 1);
        assert_eq!(width::<f32>(Vectorization::Sse), 4);
        assert_eq!(width::<f32>(Vectorization::Avx), 8);
        assert_eq!(width::<f64>(Vectorization::Sse), 2);
        assert_eq!(width::<f64>(Vectorization::Avx), 4);
    }
}
