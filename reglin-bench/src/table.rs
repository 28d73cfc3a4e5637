//! The fixed table of solver configurations the harness knows how to run.

use std::fmt;

use reglin_core::{PivotStrategy, Precision, Vectorization};
use reglin_solver::{SolverConfig, SolverFamily, MAX_CRAMER_SIZE};
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// One benchmarked solver variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SolverBenchConfig {
    #[serde(with = "family_label")]
    pub family: SolverFamily,
    #[serde(with = "vectorization_label")]
    pub vectorization: Vectorization,
    #[serde(with = "precision_label")]
    pub precision: Precision,
    #[serde(with = "pivot_label")]
    pub pivot: PivotStrategy,
}

impl SolverBenchConfig {
    pub fn new(
        family: SolverFamily,
        vectorization: Vectorization,
        precision: Precision,
        pivot: PivotStrategy,
    ) -> Self {
        Self {
            family,
            vectorization,
            precision,
            pivot,
        }
    }

    /// Whether a kernel exists for this combination.
    ///
    /// Pivoting is only offered by Gauss and LU, and Cramer's rule has no
    /// vectorized variant.
    pub fn is_supported(&self) -> bool {
        self.family
            .supports(SolverConfig::new(self.vectorization, self.pivot))
    }

    /// Fails with `UnsupportedConfig` unless [`is_supported`](Self::is_supported).
    pub fn ensure_supported(&self) -> Result<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(HarnessError::UnsupportedConfig(self.to_string()))
        }
    }

    /// Whether the family accepts an `n × n` system.
    pub fn supports_size(&self, n: usize) -> bool {
        match self.family {
            SolverFamily::Cramer => (2..=MAX_CRAMER_SIZE).contains(&n),
            _ => n >= 1,
        }
    }
}

impl fmt::Display for SolverBenchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.family, self.vectorization, self.precision, self.pivot
        )
    }
}

/// Every supported configuration, ordered by family, vectorization,
/// precision and pivot strategy.
pub fn config_table() -> Vec<SolverBenchConfig> {
    let mut table = Vec::new();
    for family in SolverFamily::ALL {
        for vectorization in Vectorization::ALL {
            for precision in Precision::ALL {
                for pivot in PivotStrategy::ALL {
                    let config = SolverBenchConfig::new(family, vectorization, precision, pivot);
                    if config.is_supported() {
                        table.push(config);
                    }
                }
            }
        }
    }
    table
}

/// Supported configurations of one family.
pub fn family_configs(family: SolverFamily) -> impl Iterator<Item = SolverBenchConfig> {
    config_table().into_iter().filter(move |c| c.family == family)
}

macro_rules! label_serde {
    ($module:ident, $ty:ty, $parse:expr) => {
        mod $module {
            use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

            pub fn serialize<S: Serializer>(value: &$ty, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(value.label())
            }

            pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<$ty, D::Error> {
                let label = String::deserialize(d)?;
                let parse: fn(&str) -> Option<$ty> = $parse;
                parse(&label).ok_or_else(|| D::Error::custom(format!("unknown label {label:?}")))
            }
        }
    };
}

label_serde!(family_label, reglin_solver::SolverFamily, |s| s.parse().ok());
label_serde!(vectorization_label, reglin_core::Vectorization, reglin_core::Vectorization::from_label);
label_serde!(precision_label, reglin_core::Precision, reglin_core::Precision::from_label);
label_serde!(pivot_label, reglin_core::PivotStrategy, reglin_core::PivotStrategy::from_label);
