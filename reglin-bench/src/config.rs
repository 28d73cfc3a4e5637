//! Harness configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// Unit of the times written to result documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeUnit {
    #[default]
    #[serde(rename = "ns")]
    Nanoseconds,
    #[serde(rename = "us")]
    Microseconds,
    #[serde(rename = "ms")]
    Milliseconds,
    #[serde(rename = "s")]
    Seconds,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 4] = [
        TimeUnit::Nanoseconds,
        TimeUnit::Microseconds,
        TimeUnit::Milliseconds,
        TimeUnit::Seconds,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
        }
    }

    /// `duration` expressed in this unit.
    pub fn convert(self, duration: Duration) -> f64 {
        let secs = duration.as_secs_f64();
        match self {
            TimeUnit::Nanoseconds => secs * 1e9,
            TimeUnit::Microseconds => secs * 1e6,
            TimeUnit::Milliseconds => secs * 1e3,
            TimeUnit::Seconds => secs,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|u| u.symbol() == s)
            .ok_or_else(|| format!("unknown time unit {s:?}, expected ns, us, ms or s"))
    }
}

/// Settings shared by every harness run.
///
/// Missing fields in a config file fall back to [`HarnessConfig::default`]:
///
/// | field | default |
/// |---|---|
/// | `result_dir` | `results` |
/// | `time_unit` | `ns` |
/// | `time_scaling` | `1.0` |
/// | `sizes` | `[2, 3, 4, 8, 16, 32]` |
/// | `iterations` | `1000` |
/// | `warmup_iterations` | `10` |
/// | `seed` | `42` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory the result documents are written to.
    pub result_dir: PathBuf,
    pub time_unit: TimeUnit,
    /// Factor applied to every reported time, after unit conversion.
    pub time_scaling: f64,
    /// Solver system sizes.
    pub sizes: Vec<usize>,
    /// Timed iterations per configuration.
    pub iterations: u32,
    pub warmup_iterations: u32,
    /// Seed of the input generator.
    pub seed: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            result_dir: PathBuf::from("results"),
            time_unit: TimeUnit::Nanoseconds,
            time_scaling: 1.0,
            sizes: vec![2, 3, 4, 8, 16, 32],
            iterations: 1000,
            warmup_iterations: 10,
            seed: 42,
        }
    }
}

impl HarnessConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(HarnessError::UnsupportedConfig(
                "iterations must be at least 1".to_string(),
            ));
        }
        if !(self.time_scaling.is_finite() && self.time_scaling > 0.0) {
            return Err(HarnessError::UnsupportedConfig(format!(
                "time_scaling must be positive, got {}",
                self.time_scaling
            )));
        }
        if self.sizes.contains(&0) {
            return Err(HarnessError::UnsupportedConfig(
                "system sizes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// A duration in the configured unit and scaling.
    pub fn report(&self, duration: Duration) -> f64 {
        self.time_unit.convert(duration) * self.time_scaling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_valid() {
        let config = HarnessConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.time_unit, TimeUnit::Nanoseconds);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: HarnessConfig =
            serde_json::from_str(r#"{"time_unit": "us", "sizes": [4, 8], "seed": 7}"#).unwrap();
        assert_eq!(config.time_unit, TimeUnit::Microseconds);
        assert_eq!(config.sizes, vec![4, 8]);
        assert_eq!(config.seed, 7);
        assert_eq!(config.iterations, HarnessConfig::default().iterations);
        assert_eq!(config.result_dir, PathBuf::from("results"));
    }

    #[test]
    fn test_report() {
        let config = HarnessConfig {
            time_unit: TimeUnit::Microseconds,
            time_scaling: 2.0,
            ..HarnessConfig::default()
        };
        assert_relative_eq!(config.report(Duration::from_millis(3)), 6000.0, epsilon = 1e-9);
        assert_relative_eq!(TimeUnit::Seconds.convert(Duration::from_millis(250)), 0.25);
    }

    #[test]
    fn test_validate_rejects() {
        let zero_iterations = HarnessConfig {
            iterations: 0,
            ..HarnessConfig::default()
        };
        assert!(zero_iterations.validate().is_err());
        let bad_scaling = HarnessConfig {
            time_scaling: -1.0,
            ..HarnessConfig::default()
        };
        assert!(bad_scaling.validate().is_err());
        let zero_size = HarnessConfig {
            sizes: vec![0, 4],
            ..HarnessConfig::default()
        };
        assert!(zero_size.validate().is_err());
    }

    #[test]
    fn test_time_unit_parse() {
        for unit in TimeUnit::ALL {
            assert_eq!(unit.symbol().parse::<TimeUnit>().unwrap(), unit);
        }
        assert!("min".parse::<TimeUnit>().is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.json");
        std::fs::write(&path, r#"{"iterations": 5}"#).unwrap();
        assert_eq!(HarnessConfig::load(&path).unwrap().iterations, 5);
        std::fs::write(&path, r#"{"iterations": 0}"#).unwrap();
        assert!(HarnessConfig::load(&path).is_err());
        assert!(matches!(
            HarnessConfig::load(&dir.path().join("missing.json")),
            Err(HarnessError::Io { .. })
        ));
    }
}
