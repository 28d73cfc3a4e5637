//! Runtime target-feature dispatch for the lane kernels.
//!
//! Lane loops in [`Register`](crate::Register) are written portably. With the
//! `simd` feature, [`dispatch`] runs the closure inside a `pulp` region
//! compiled for the best instruction set detected at runtime, so those loops
//! are lowered to AVX/SSE instead of the baseline target.

#[inline(always)]
pub fn dispatch<R>(f: impl FnOnce() -> R) -> R {
    #[cfg(feature = "simd")]
    {
        pulp::Arch::new().dispatch(f)
    }
    #[cfg(not(feature = "simd"))]
    {
        f()
    }
}

/// Like [`dispatch`], but skips the dispatch for tiny systems where its
/// overhead would dominate.
#[inline(always)]
pub fn dispatch_if_large<R>(elements: usize, f: impl FnOnce() -> R) -> R {
    // Heuristic only; results do not depend on it.
    if elements >= 64 {
        dispatch(f)
    } else {
        f()
    }
}
