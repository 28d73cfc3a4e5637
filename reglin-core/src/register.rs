//! Register model: supported vector registers and the lane type that stands in
//! for them.
//!
//! | Register | Bits | Element | Lanes |
//! |----------|------|---------|-------|
//! | `__m128`  | 128 | f32 | 4 |
//! | `__m128d` | 128 | f64 | 2 |
//! | `__m256`  | 256 | f32 | 8 |
//! | `__m256d` | 256 | f64 | 4 |
//!
//! [`Register<T, N>`] is a plain aligned lane array. Its operations are
//! straight lane loops with compile-time trip counts, which LLVM lowers to
//! single packed instructions for the widths above.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;

use crate::scalar::RegScalar;
use crate::{KernelError, Result};

// ============================================================================
// Precision / Vectorization
// ============================================================================

/// Floating-point element width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Precision {
    /// 32-bit IEEE float.
    F32,
    /// 64-bit IEEE float.
    F64,
}

impl Precision {
    pub const ALL: [Precision; 2] = [Precision::F32, Precision::F64];

    /// Size of one element in bytes.
    pub fn bytes(self) -> usize {
        match self {
            Precision::F32 => 4,
            Precision::F64 => 8,
        }
    }

    /// Label used in benchmark names (`F32`, `F64`).
    pub fn label(self) -> &'static str {
        match self {
            Precision::F32 => "F32",
            Precision::F64 => "F64",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "F32" | "f32" => Some(Precision::F32),
            "F64" | "f64" => Some(Precision::F64),
            _ => None,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a kernel maps onto registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Vectorization {
    /// One element per operation.
    #[default]
    Serial,
    /// 128-bit registers.
    Sse,
    /// 256-bit registers.
    Avx,
}

impl Vectorization {
    pub const ALL: [Vectorization; 3] = [
        Vectorization::Serial,
        Vectorization::Sse,
        Vectorization::Avx,
    ];

    /// Register width in bits, `None` for serial kernels.
    pub fn register_bits(self) -> Option<usize> {
        match self {
            Vectorization::Serial => None,
            Vectorization::Sse => Some(128),
            Vectorization::Avx => Some(256),
        }
    }

    /// Elements processed per operation for the given precision.
    pub fn lanes(self, precision: Precision) -> usize {
        match self.register_bits() {
            None => 1,
            Some(bits) => bits / 8 / precision.bytes(),
        }
    }

    /// Register used by this vectorization level, `None` for serial kernels.
    pub fn register_kind(self, precision: Precision) -> Option<RegisterKind> {
        match (self, precision) {
            (Vectorization::Serial, _) => None,
            (Vectorization::Sse, Precision::F32) => Some(RegisterKind::M128),
            (Vectorization::Sse, Precision::F64) => Some(RegisterKind::M128d),
            (Vectorization::Avx, Precision::F32) => Some(RegisterKind::M256),
            (Vectorization::Avx, Precision::F64) => Some(RegisterKind::M256d),
        }
    }

    pub fn is_simd(self) -> bool {
        self != Vectorization::Serial
    }

    /// Label used in benchmark names (`Serial`, `SSE`, `AVX`).
    pub fn label(self) -> &'static str {
        match self {
            Vectorization::Serial => "Serial",
            Vectorization::Sse => "SSE",
            Vectorization::Avx => "AVX",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Serial" | "serial" => Some(Vectorization::Serial),
            "SSE" | "sse" => Some(Vectorization::Sse),
            "AVX" | "avx" => Some(Vectorization::Avx),
            _ => None,
        }
    }
}

impl fmt::Display for Vectorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// RegisterKind
// ============================================================================

/// A supported vector register, identified by width and element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegisterKind {
    /// 128-bit, four `f32` lanes.
    M128,
    /// 128-bit, two `f64` lanes.
    M128d,
    /// 256-bit, eight `f32` lanes.
    M256,
    /// 256-bit, four `f64` lanes.
    M256d,
}

impl RegisterKind {
    pub const ALL: [RegisterKind; 4] = [
        RegisterKind::M128,
        RegisterKind::M128d,
        RegisterKind::M256,
        RegisterKind::M256d,
    ];

    /// Number of elements held by one register of this kind.
    pub const fn element_count(self) -> usize {
        match self {
            RegisterKind::M128 => 4,
            RegisterKind::M128d => 2,
            RegisterKind::M256 => 8,
            RegisterKind::M256d => 4,
        }
    }

    pub const fn bits(self) -> usize {
        match self {
            RegisterKind::M128 | RegisterKind::M128d => 128,
            RegisterKind::M256 | RegisterKind::M256d => 256,
        }
    }

    pub const fn precision(self) -> Precision {
        match self {
            RegisterKind::M128 | RegisterKind::M256 => Precision::F32,
            RegisterKind::M128d | RegisterKind::M256d => Precision::F64,
        }
    }

    /// Short name without the intrinsic-type underscores (`m128`, `m256d`).
    pub const fn name(self) -> &'static str {
        match self {
            RegisterKind::M128 => "m128",
            RegisterKind::M128d => "m128d",
            RegisterKind::M256 => "m256",
            RegisterKind::M256d => "m256d",
        }
    }

    /// Parse `__m128`, `m128`, `__m256d`, ... into a register kind.
    pub fn parse(name: &str) -> Result<Self> {
        let short = name.trim().trim_start_matches("__");
        Self::ALL
            .into_iter()
            .find(|k| k.name() == short)
            .ok_or_else(|| KernelError::InvalidRegisterKind(name.to_string()))
    }
}

impl fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RegisterKind {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Number of elements held by the named register.
///
/// Fails with [`KernelError::InvalidRegisterKind`] for unknown names.
pub fn element_count(register: &str) -> Result<usize> {
    RegisterKind::parse(register).map(RegisterKind::element_count)
}

// ============================================================================
// Register
// ============================================================================

/// One vector register: `N` lanes of `T`.
///
/// Lane 0 is the lowest lane. The type is `Copy` and lives on the stack;
/// nothing about it allocates.
#[derive(Clone, Copy, PartialEq, Debug)]
#[repr(C, align(32))]
pub struct Register<T, const N: usize> {
    lanes: [T; N],
}

/// Lane mask selecting `start..start + len`.
#[inline(always)]
pub fn lane_range_mask<const N: usize>(start: usize, len: usize) -> [bool; N] {
    let mut mask = [false; N];
    for (i, m) in mask.iter_mut().enumerate() {
        *m = i >= start && i < start + len;
    }
    mask
}

impl<T: RegScalar, const N: usize> Default for Register<T, N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: RegScalar, const N: usize> Register<T, N> {
    /// Number of lanes.
    pub const LANES: usize = N;

    #[inline(always)]
    pub fn from_array(lanes: [T; N]) -> Self {
        Self { lanes }
    }

    #[inline(always)]
    pub fn zero() -> Self {
        Self::splat(T::zero())
    }

    /// Broadcast `value` into every lane.
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self { lanes: [value; N] }
    }

    #[inline(always)]
    pub fn to_array(self) -> [T; N] {
        self.lanes
    }

    #[inline(always)]
    pub fn as_array(&self) -> &[T; N] {
        &self.lanes
    }

    #[inline(always)]
    pub fn lane(&self, i: usize) -> T {
        self.lanes[i]
    }

    #[inline(always)]
    pub fn set_lane(&mut self, i: usize, value: T) {
        self.lanes[i] = value;
    }

    /// Load `N` consecutive elements. `src` must hold at least `N` values.
    #[inline(always)]
    pub fn load(src: &[T]) -> Self {
        let mut lanes = [T::zero(); N];
        lanes.copy_from_slice(&src[..N]);
        Self { lanes }
    }

    /// Load up to `N` elements; lanes past `src.len()` are zero.
    #[inline(always)]
    pub fn load_partial(src: &[T]) -> Self {
        let mut lanes = [T::zero(); N];
        let k = src.len().min(N);
        lanes[..k].copy_from_slice(&src[..k]);
        Self { lanes }
    }

    /// Store all lanes. `dst` must hold at least `N` values.
    #[inline(always)]
    pub fn store(self, dst: &mut [T]) {
        dst[..N].copy_from_slice(&self.lanes);
    }

    /// Store the first `min(N, dst.len())` lanes.
    #[inline(always)]
    pub fn store_partial(self, dst: &mut [T]) {
        let k = dst.len().min(N);
        dst[..k].copy_from_slice(&self.lanes[..k]);
    }

    /// `self - b * c`, lane-wise, rounded after the product like the scalar
    /// expression.
    #[inline(always)]
    pub fn sub_mul(self, b: Self, c: Self) -> Self {
        let mut out = self.lanes;
        for i in 0..N {
            out[i] = out[i] - b.lanes[i] * c.lanes[i];
        }
        Self { lanes: out }
    }

    #[inline(always)]
    pub fn abs(self) -> Self {
        let mut out = self.lanes;
        for v in out.iter_mut() {
            *v = v.abs();
        }
        Self { lanes: out }
    }

    /// Take lanes from `self` where `mask` is set, from `other` elsewhere.
    #[inline(always)]
    pub fn select(self, other: Self, mask: [bool; N]) -> Self {
        let mut out = other.lanes;
        for i in 0..N {
            if mask[i] {
                out[i] = self.lanes[i];
            }
        }
        Self { lanes: out }
    }

    /// Move lane `i` to lane `(i + k) % N`.
    #[inline(always)]
    pub fn rotate_lanes_up(self, k: usize) -> Self {
        let mut out = self.lanes;
        out.rotate_right(k % N);
        Self { lanes: out }
    }

    /// Horizontal sum of all lanes.
    #[inline(always)]
    pub fn sum(self) -> T {
        // Pairwise halving mirrors the hadd/shuffle reduction of real registers.
        let mut lanes = self.lanes;
        let mut width = N;
        while width > 1 {
            let half = width / 2;
            for i in 0..half {
                lanes[i] = lanes[i] + lanes[i + half];
            }
            if width % 2 == 1 {
                lanes[0] = lanes[0] + lanes[width - 1];
            }
            width = half;
        }
        lanes[0]
    }

    /// Index and magnitude of the largest `|lane|` among the first `count`
    /// lanes. Ties resolve to the lowest lane.
    #[inline(always)]
    pub fn max_abs_lane(self, count: usize) -> (usize, T) {
        let mut best = 0;
        let mut best_val = self.lanes[0].abs();
        for i in 1..count.min(N) {
            let v = self.lanes[i].abs();
            if v > best_val {
                best = i;
                best_val = v;
            }
        }
        (best, best_val)
    }
}

macro_rules! impl_lane_op {
    ($($trait:ident :: $method:ident, $op:tt);* $(;)?) => {
        $(
            impl<T: RegScalar, const N: usize> $trait for Register<T, N> {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    let mut out = self.lanes;
                    for i in 0..N {
                        out[i] = out[i] $op rhs.lanes[i];
                    }
                    Self { lanes: out }
                }
            }
        )*
    };
}

impl_lane_op! {
    Add::add, +;
    Sub::sub, -;
    Mul::mul, *;
    Div::div, /;
}
