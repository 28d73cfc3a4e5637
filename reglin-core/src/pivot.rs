use std::fmt;
use std::str::FromStr;

/// Row interchange strategy used during elimination and factorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum PivotStrategy {
    /// Use the natural diagonal pivot. Fails on a zero pivot even if the
    /// system is solvable.
    #[default]
    NoPivot,
    /// Swap the row with the largest magnitude in the active column into the
    /// pivot position before each step.
    PartialPivot,
}

impl PivotStrategy {
    /// All strategies, in benchmark order.
    pub const ALL: [PivotStrategy; 2] = [PivotStrategy::NoPivot, PivotStrategy::PartialPivot];

    /// Canonical label used in benchmark names.
    pub fn label(self) -> &'static str {
        match self {
            PivotStrategy::NoPivot => "NoPivot",
            PivotStrategy::PartialPivot => "PartialPivot",
        }
    }

    /// Human readable label used in reports.
    pub fn description(self) -> &'static str {
        match self {
            PivotStrategy::NoPivot => "no pivoting",
            PivotStrategy::PartialPivot => "partial pivoting",
        }
    }

    /// Parse a label, accepting both naming conventions found in result files.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "NoPivot" | "no pivoting" | "none" | "NONE" => Some(PivotStrategy::NoPivot),
            "PartialPivot" | "partial pivoting" | "partial" | "PARTIAL" => {
                Some(PivotStrategy::PartialPivot)
            }
            _ => None,
        }
    }
}

impl fmt::Display for PivotStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PivotStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unknown pivot strategy {s:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for p in PivotStrategy::ALL {
            assert_eq!(p.label().parse::<PivotStrategy>().unwrap(), p);
            assert_eq!(PivotStrategy::from_label(p.description()), Some(p));
        }
    }

    #[test]
    fn test_unknown_label() {
        assert!("FullPivot".parse::<PivotStrategy>().is_err());
        assert_eq!(PivotStrategy::from_label(""), None);
    }
}
