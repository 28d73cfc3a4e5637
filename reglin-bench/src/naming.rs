//! Benchmark names.
//!
//! Solver records are named `<Vectorization>_<Precision>_<Pivot>/<size>`,
//! e.g. `SSE_F32_PartialPivot/8`, inside one document per solver family.
//! Older result files used `<Vectorization>_<Precision>/<Pivot>_<n>x<n>`;
//! [`parse_legacy_solver_name`] reads those so old and new results can be
//! compared side by side.
//!
//! Transpose configurations are named
//! `transpose_<rows>x<cols>_<register>_in_<offset_in>_out_<offset_out>`, and
//! each tail policy is a sub-benchmark appended as `/<policy>`.

use std::fmt;
use std::str::FromStr;

use reglin_core::{PivotStrategy, Precision, RegisterKind, Vectorization};
use reglin_transpose::TailPolicy;

use crate::error::{HarnessError, Result};

/// Name of one solver measurement within a family's result document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolverBenchmarkId {
    pub vectorization: Vectorization,
    pub precision: Precision,
    pub pivot: PivotStrategy,
    pub size: usize,
}

impl fmt::Display for SolverBenchmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}/{}",
            self.vectorization.label(),
            self.precision.label(),
            self.pivot.label(),
            self.size
        )
    }
}

impl FromStr for SolverBenchmarkId {
    type Err = HarnessError;

    fn from_str(name: &str) -> Result<Self> {
        let (setup, size) = name
            .split_once('/')
            .ok_or_else(|| HarnessError::name_parse(name, "missing '/' before the size"))?;
        let mut parts = setup.split('_');
        let (Some(vectorization), Some(precision), Some(pivot), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(HarnessError::name_parse(
                name,
                "expected <Vectorization>_<Precision>_<Pivot>",
            ));
        };
        Ok(Self {
            vectorization: parse_vectorization(name, vectorization)?,
            precision: parse_precision(name, precision)?,
            pivot: parse_pivot(name, pivot)?,
            size: parse_size(name, size)?,
        })
    }
}

/// Parse a solver benchmark name in the older
/// `<Vectorization>_<Precision>/<Pivot>_<n>x<n>` form.
///
/// `SIMD` is accepted as an alias of `AVX`, and pivot strategies may be
/// given by description (`no pivoting`). Non-square sizes are rejected.
pub fn parse_legacy_solver_name(name: &str) -> Result<SolverBenchmarkId> {
    let (vectorization, rest) = name
        .split_once('_')
        .ok_or_else(|| HarnessError::name_parse(name, "missing '_' after the vectorization"))?;
    let (precision, rest) = rest
        .split_once('/')
        .ok_or_else(|| HarnessError::name_parse(name, "missing '/' after the precision"))?;
    let (pivot, size) = rest
        .rsplit_once('_')
        .ok_or_else(|| HarnessError::name_parse(name, "missing '_' before the size"))?;
    let (rows, cols) = size
        .split_once('x')
        .ok_or_else(|| HarnessError::name_parse(name, "size is not <n>x<n>"))?;
    let rows = parse_size(name, rows)?;
    if parse_size(name, cols)? != rows {
        return Err(HarnessError::name_parse(name, "system is not square"));
    }

    let vectorization = match vectorization {
        "SIMD" | "simd" => Vectorization::Avx,
        other => parse_vectorization(name, other)?,
    };
    Ok(SolverBenchmarkId {
        vectorization,
        precision: parse_precision(name, precision)?,
        pivot: parse_pivot(name, pivot)?,
        size: rows,
    })
}

/// Parse either naming scheme, trying the current one first.
pub fn parse_solver_name(name: &str) -> Result<SolverBenchmarkId> {
    name.parse::<SolverBenchmarkId>()
        .or_else(|_| parse_legacy_solver_name(name))
}

fn parse_vectorization(name: &str, s: &str) -> Result<Vectorization> {
    Vectorization::from_label(s)
        .ok_or_else(|| HarnessError::name_parse(name, format!("unknown vectorization {s:?}")))
}

fn parse_precision(name: &str, s: &str) -> Result<Precision> {
    Precision::from_label(s)
        .ok_or_else(|| HarnessError::name_parse(name, format!("unknown precision {s:?}")))
}

fn parse_pivot(name: &str, s: &str) -> Result<PivotStrategy> {
    PivotStrategy::from_label(s)
        .ok_or_else(|| HarnessError::name_parse(name, format!("unknown pivot strategy {s:?}")))
}

fn parse_size(name: &str, s: &str) -> Result<usize> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(HarnessError::name_parse(name, format!("invalid size {s:?}"))),
    }
}

// ============================================================================
// Transpose
// ============================================================================

/// Name of one transpose configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransposeBenchmarkId {
    pub register: RegisterKind,
    pub rows: usize,
    pub cols: usize,
    pub offset_in: usize,
    pub offset_out: usize,
}

impl TransposeBenchmarkId {
    /// Record name of one tail policy of this configuration.
    pub fn sub_benchmark(&self, tail: TailPolicy) -> String {
        format!("{self}/{}", tail.name())
    }

    /// Result file name, `<id>.json`.
    pub fn file_name(&self) -> String {
        format!("{self}.json")
    }
}

impl fmt::Display for TransposeBenchmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transpose_{}x{}_{}_in_{}_out_{}",
            self.rows,
            self.cols,
            self.register.name(),
            self.offset_in,
            self.offset_out
        )
    }
}

impl FromStr for TransposeBenchmarkId {
    type Err = HarnessError;

    fn from_str(name: &str) -> Result<Self> {
        let stem = name.strip_suffix(".json").unwrap_or(name);
        let rest = stem
            .strip_prefix("transpose_")
            .ok_or_else(|| HarnessError::name_parse(name, "missing 'transpose_' prefix"))?;
        let (size, rest) = rest
            .split_once('_')
            .ok_or_else(|| HarnessError::name_parse(name, "missing register"))?;
        let (rows, cols) = size
            .split_once('x')
            .ok_or_else(|| HarnessError::name_parse(name, "size is not <rows>x<cols>"))?;
        let (register, offsets) = rest
            .split_once("_in_")
            .ok_or_else(|| HarnessError::name_parse(name, "missing '_in_'"))?;
        let (offset_in, offset_out) = offsets
            .split_once("_out_")
            .ok_or_else(|| HarnessError::name_parse(name, "missing '_out_'"))?;
        let offset = |s: &str| {
            s.parse::<usize>()
                .map_err(|_| HarnessError::name_parse(name, format!("invalid offset {s:?}")))
        };
        Ok(Self {
            register: RegisterKind::parse(register)
                .map_err(|_| HarnessError::name_parse(name, format!("unknown register {register:?}")))?,
            rows: parse_size(name, rows)?,
            cols: parse_size(name, cols)?,
            offset_in: offset(offset_in)?,
            offset_out: offset(offset_out)?,
        })
    }
}

/// Tail policy of a transpose sub-benchmark record name,
/// `<transpose id>/<tail policy>`.
///
/// Fails with `NameParse` when the id or the policy does not parse.
pub fn tail_policy_of(record_name: &str) -> Result<TailPolicy> {
    let (id, tail) = record_name
        .rsplit_once('/')
        .ok_or_else(|| HarnessError::name_parse(record_name, "missing '/<tail policy>' suffix"))?;
    id.parse::<TransposeBenchmarkId>()?;
    tail.parse::<TailPolicy>()
        .map_err(|reason| HarnessError::name_parse(record_name, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(v: Vectorization, p: Precision, s: PivotStrategy, n: usize) -> SolverBenchmarkId {
        SolverBenchmarkId {
            vectorization: v,
            precision: p,
            pivot: s,
            size: n,
        }
    }

    #[test]
    fn test_solver_name_round_trip() {
        let name = "SSE_F32_PartialPivot/8";
        let parsed: SolverBenchmarkId = name.parse().unwrap();
        assert_eq!(
            parsed,
            id(Vectorization::Sse, Precision::F32, PivotStrategy::PartialPivot, 8)
        );
        assert_eq!(parsed.to_string(), name);

        for v in Vectorization::ALL {
            for p in Precision::ALL {
                for s in PivotStrategy::ALL {
                    let original = id(v, p, s, 33);
                    assert_eq!(original.to_string().parse::<SolverBenchmarkId>().unwrap(), original);
                }
            }
        }
    }

    #[test]
    fn test_malformed_solver_names() {
        for name in [
            "",
            "SSE_F32_PartialPivot",
            "SSE_F32/8",
            "SSE_F32_PartialPivot_X/8",
            "NEON_F32_NoPivot/8",
            "SSE_F16_NoPivot/8",
            "SSE_F32_FullPivot/8",
            "SSE_F32_NoPivot/0",
            "SSE_F32_NoPivot/eight",
        ] {
            assert!(
                matches!(name.parse::<SolverBenchmarkId>(), Err(HarnessError::NameParse { .. })),
                "{name:?}"
            );
        }
    }

    #[test]
    fn test_legacy_names() {
        assert_eq!(
            parse_legacy_solver_name("SSE_F32/NoPivot_8x8").unwrap(),
            id(Vectorization::Sse, Precision::F32, PivotStrategy::NoPivot, 8)
        );
        assert_eq!(
            parse_legacy_solver_name("Serial_F64/PartialPivot_32x32").unwrap(),
            id(Vectorization::Serial, Precision::F64, PivotStrategy::PartialPivot, 32)
        );
        assert_eq!(
            parse_legacy_solver_name("SIMD_F64/no pivoting_16x16").unwrap(),
            id(Vectorization::Avx, Precision::F64, PivotStrategy::NoPivot, 16)
        );
        assert!(parse_legacy_solver_name("SSE_F32/NoPivot_8x4").is_err());
        assert!(parse_legacy_solver_name("SSE_F32/NoPivot_8").is_err());
        assert!(parse_legacy_solver_name("SSE_F32_NoPivot/8").is_err());
    }

    #[test]
    fn test_either_scheme() {
        let expected = id(Vectorization::Avx, Precision::F64, PivotStrategy::NoPivot, 4);
        assert_eq!(parse_solver_name("AVX_F64_NoPivot/4").unwrap(), expected);
        assert_eq!(parse_solver_name("AVX_F64/NoPivot_4x4").unwrap(), expected);
        assert!(parse_solver_name("transpose_1x1_m128_in_0_out_0").is_err());
    }

    #[test]
    fn test_transpose_names() {
        let t = TransposeBenchmarkId {
            register: RegisterKind::M256d,
            rows: 2,
            cols: 3,
            offset_in: 1,
            offset_out: 0,
        };
        assert_eq!(t.to_string(), "transpose_2x3_m256d_in_1_out_0");
        assert_eq!(t.file_name(), "transpose_2x3_m256d_in_1_out_0.json");
        assert_eq!(
            t.sub_benchmark(TailPolicy::SetZero),
            "transpose_2x3_m256d_in_1_out_0/set_zero"
        );
        assert_eq!(t.to_string().parse::<TransposeBenchmarkId>().unwrap(), t);
        assert_eq!(t.file_name().parse::<TransposeBenchmarkId>().unwrap(), t);
        assert!("transpose_2x3_m512_in_1_out_0".parse::<TransposeBenchmarkId>().is_err());
        assert!("transpose_2x3_m128_in_1".parse::<TransposeBenchmarkId>().is_err());
        assert!("LU_2x3".parse::<TransposeBenchmarkId>().is_err());
    }

    #[test]
    fn test_tail_policy_of() {
        let t = TransposeBenchmarkId {
            register: RegisterKind::M128,
            rows: 2,
            cols: 3,
            offset_in: 1,
            offset_out: 0,
        };
        for tail in TailPolicy::ALL {
            assert_eq!(tail_policy_of(&t.sub_benchmark(tail)).unwrap(), tail);
        }
        for bad in [
            "transpose_plain",
            "Gauss_garbage_name",
            "transpose_2x3_m128_in_1_out_0",
            "transpose_2x3_m128_in_1_out_0/set_zeroo_typo",
            "transpose_2x3_m128_in_1_out_0/",
            "SSE_F64_PartialPivot/overwrite",
        ] {
            assert!(
                matches!(tail_policy_of(bad), Err(HarnessError::NameParse { .. })),
                "{bad}"
            );
        }
    }
}
