//! Transpose configuration: logical shape, lane offsets, register placement
//! and tail policy.

use std::fmt;
use std::str::FromStr;

use reglin_core::{check_range, KernelError, Result};

/// Treatment of output lanes outside the transposed matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TailPolicy {
    /// Write whole registers. Tail lanes hold leftovers of the in-register
    /// transpose; their values are unspecified.
    Overwrite,
    /// Force tail lanes to zero.
    SetZero,
    /// Preserve the destination register's pre-call tail lanes.
    KeepUnused,
}

impl TailPolicy {
    pub const ALL: [TailPolicy; 3] = [
        TailPolicy::Overwrite,
        TailPolicy::SetZero,
        TailPolicy::KeepUnused,
    ];

    /// Sub-benchmark name (`overwrite`, `set_zero`, `keep_unused`).
    pub fn name(self) -> &'static str {
        match self {
            TailPolicy::Overwrite => "overwrite",
            TailPolicy::SetZero => "set_zero",
            TailPolicy::KeepUnused => "keep_unused",
        }
    }
}

impl fmt::Display for TailPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TailPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown tail policy {s:?}"))
    }
}

/// Validated transpose geometry for registers with `lanes` elements.
///
/// Invariants: `1 <= rows, cols <= lanes`, `offset_in + rows <= lanes`,
/// `offset_out + cols <= lanes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransposeShape {
    lanes: usize,
    rows: usize,
    cols: usize,
    offset_in: usize,
    offset_out: usize,
}

impl TransposeShape {
    /// Validate a geometry, failing with `OutOfRange` on the first violated
    /// bound.
    pub fn new(
        lanes: usize,
        rows: usize,
        cols: usize,
        offset_in: usize,
        offset_out: usize,
    ) -> Result<Self> {
        check_range("rows", rows, 1, lanes)?;
        check_range("cols", cols, 1, lanes)?;
        check_range("offset_in", offset_in, 0, lanes - rows)?;
        check_range("offset_out", offset_out, 0, lanes - cols)?;
        Ok(Self {
            lanes,
            rows,
            cols,
            offset_in,
            offset_out,
        })
    }

    /// Every valid geometry for `lanes`-wide registers: all
    /// `(rows, cols) ∈ [1, lanes]²` with all admissible offsets.
    pub fn grid(lanes: usize) -> impl Iterator<Item = TransposeShape> {
        (1..=lanes).flat_map(move |rows| {
            (1..=lanes).flat_map(move |cols| {
                (0..=lanes - rows).flat_map(move |offset_in| {
                    (0..=lanes - cols).map(move |offset_out| TransposeShape {
                        lanes,
                        rows,
                        cols,
                        offset_in,
                        offset_out,
                    })
                })
            })
        })
    }

    /// Geometry of the transpose that undoes this one.
    pub fn inverse(&self) -> Self {
        Self {
            lanes: self.lanes,
            rows: self.cols,
            cols: self.rows,
            offset_in: self.offset_out,
            offset_out: self.offset_in,
        }
    }

    #[inline]
    pub fn lanes(&self) -> usize {
        self.lanes
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
    pub fn offset_in(&self) -> usize {
        self.offset_in
    }

    #[inline]
    pub fn offset_out(&self) -> usize {
        self.offset_out
    }
}

/// Positions of the matrix registers inside the input and output arrays.
///
/// Column `c` of the input is read from register `first_col_in + c *
/// col_stride_in`; row `r` of the input is written to register
/// `first_col_out + r * col_stride_out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterPlacement {
    pub first_col_in: usize,
    pub col_stride_in: usize,
    pub first_col_out: usize,
    pub col_stride_out: usize,
}

impl Default for RegisterPlacement {
    fn default() -> Self {
        Self {
            first_col_in: 0,
            col_stride_in: 1,
            first_col_out: 0,
            col_stride_out: 1,
        }
    }
}

impl RegisterPlacement {
    /// Register holding input column `col`, or `None` on overflow.
    #[inline]
    pub fn input_index(&self, col: usize) -> Option<usize> {
        col.checked_mul(self.col_stride_in)?.checked_add(self.first_col_in)
    }

    /// Register receiving output row `row`, or `None` on overflow.
    #[inline]
    pub fn output_index(&self, row: usize) -> Option<usize> {
        row.checked_mul(self.col_stride_out)?.checked_add(self.first_col_out)
    }

    /// Check that `cols` input and `rows` output registers fit in arrays of
    /// `src_len` and `dst_len` registers.
    pub fn validate(&self, shape: &TransposeShape, src_len: usize, dst_len: usize) -> Result<()> {
        check_range("col_stride_in", self.col_stride_in, 1, usize::MAX)?;
        check_range("col_stride_out", self.col_stride_out, 1, usize::MAX)?;
        check_index("input register", self.input_index(shape.cols() - 1), src_len)?;
        check_index("output register", self.output_index(shape.rows() - 1), dst_len)
    }
}

fn check_index(what: &'static str, index: Option<usize>, len: usize) -> Result<()> {
    match index {
        Some(index) if index < len => Ok(()),
        _ => Err(KernelError::OutOfRange {
            what,
            value: index.unwrap_or(usize::MAX),
            min: 0,
            max: len.saturating_sub(1),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_bounds() {
        assert!(TransposeShape::new(4, 2, 3, 1, 0).is_ok());
        assert!(TransposeShape::new(4, 4, 4, 0, 0).is_ok());
        assert_eq!(
            TransposeShape::new(4, 3, 2, 2, 0),
            Err(KernelError::OutOfRange {
                what: "offset_in",
                value: 2,
                min: 0,
                max: 1
            })
        );
        assert!(TransposeShape::new(4, 0, 1, 0, 0).is_err());
        assert!(TransposeShape::new(4, 5, 1, 0, 0).is_err());
        assert!(TransposeShape::new(4, 1, 3, 0, 2).is_err());
        assert!(TransposeShape::new(2, 1, 1, 1, 1).is_ok());
    }

    #[test]
    fn test_grid_size() {
        // sum over rows/cols of (N - rows + 1) * (N - cols + 1) = (N(N+1)/2)^2
        for lanes in [2usize, 4, 8] {
            let tri = lanes * (lanes + 1) / 2;
            assert_eq!(TransposeShape::grid(lanes).count(), tri * tri);
        }
        for shape in TransposeShape::grid(4) {
            assert_eq!(
                TransposeShape::new(4, shape.rows(), shape.cols(), shape.offset_in(), shape.offset_out()),
                Ok(shape)
            );
        }
    }

    #[test]
    fn test_inverse() {
        let s = TransposeShape::new(8, 3, 5, 4, 2).unwrap();
        let inv = s.inverse();
        assert_eq!((inv.rows(), inv.cols()), (5, 3));
        assert_eq!((inv.offset_in(), inv.offset_out()), (2, 4));
        assert_eq!(inv.inverse(), s);
    }

    #[test]
    fn test_tail_policy_names() {
        for p in TailPolicy::ALL {
            assert_eq!(p.name().parse::<TailPolicy>().unwrap(), p);
        }
        assert!("zero".parse::<TailPolicy>().is_err());
    }

    #[test]
    fn test_placement_validation() {
        let shape = TransposeShape::new(4, 2, 3, 0, 0).unwrap();
        let p = RegisterPlacement::default();
        assert!(p.validate(&shape, 3, 2).is_ok());
        assert!(p.validate(&shape, 2, 2).is_err());
        assert!(p.validate(&shape, 3, 1).is_err());
        assert!(p.validate(&shape, 0, 0).is_err());

        let strided = RegisterPlacement {
            first_col_in: 1,
            col_stride_in: 2,
            first_col_out: 0,
            col_stride_out: 1,
        };
        // columns at registers 1, 3, 5
        assert!(strided.validate(&shape, 6, 2).is_ok());
        assert!(strided.validate(&shape, 5, 2).is_err());
        let zero_stride = RegisterPlacement {
            col_stride_in: 0,
            ..RegisterPlacement::default()
        };
        assert!(zero_stride.validate(&shape, 4, 4).is_err());
    }

    #[test]
    fn test_placement_overflow_is_out_of_range() {
        let shape = TransposeShape::new(4, 2, 2, 0, 0).unwrap();
        let placement = RegisterPlacement {
            first_col_in: 1,
            col_stride_in: usize::MAX,
            ..RegisterPlacement::default()
        };
        assert_eq!(placement.input_index(1), None);
        assert_eq!(
            placement.validate(&shape, 4, 4),
            Err(KernelError::OutOfRange {
                what: "input register",
                value: usize::MAX,
                min: 0,
                max: 3
            })
        );

        let placement = RegisterPlacement {
            col_stride_out: usize::MAX / 2,
            ..RegisterPlacement::default()
        };
        assert_eq!(placement.output_index(3), None);
        assert!(placement.validate(&shape, 4, 4).is_err());
    }
}
