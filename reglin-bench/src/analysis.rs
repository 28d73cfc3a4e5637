//! Comparisons between solver configurations.
//!
//! Two comparisons are supported:
//! - relative performance: each family's time divided by a reference
//!   family's time at the same size (values below 1 are faster)
//! - vectorization speedup: serial time divided by vectorized time for the
//!   same family, precision and pivot strategy
//!
//! A ratio needs both times. When either is missing the ratio is
//! [`Speedup::Unavailable`] rather than an error, since result sets are
//! routinely partial (QR has no pivoting variant, Cramer no vectorized one).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use reglin_core::{PivotStrategy, Precision, Vectorization};
use reglin_solver::SolverFamily;
use tracing::warn;

use crate::error::Result;
use crate::naming::SolverBenchmarkId;
use crate::record::ResultDocument;
use crate::store::ResultStore;
use crate::table::SolverBenchConfig;

/// A time ratio, or the absence of one of its operands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Speedup {
    Available(f64),
    Unavailable,
}

impl Speedup {
    fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Self {
        match (numerator, denominator) {
            (Some(n), Some(d)) if d > 0.0 && n.is_finite() && d.is_finite() => {
                Speedup::Available(n / d)
            }
            _ => Speedup::Unavailable,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Speedup::Available(v) => Some(v),
            Speedup::Unavailable => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Speedup::Available(_))
    }
}

impl fmt::Display for Speedup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speedup::Available(v) => write!(f, "{v:.3}"),
            Speedup::Unavailable => f.write_str("n/a"),
        }
    }
}

/// Which recorded time a comparison uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeKind {
    #[default]
    Real,
    Cpu,
}

/// Real and CPU time of one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub real_time: f64,
    pub cpu_time: f64,
}

impl Measurement {
    fn get(self, kind: TimeKind) -> f64 {
        match kind {
            TimeKind::Real => self.real_time,
            TimeKind::Cpu => self.cpu_time,
        }
    }
}

/// One ratio of a comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub config: SolverBenchConfig,
    pub size: usize,
    pub speedup: Speedup,
}

/// Solver measurements of several families, indexed by configuration and
/// size.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    times: BTreeMap<(SolverBenchConfig, usize), Measurement>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the solver records of `family`'s document. Records with names
    /// that parse under neither scheme are skipped; a later record for the
    /// same configuration replaces an earlier one.
    pub fn add_document(&mut self, family: SolverFamily, doc: &ResultDocument) {
        for (id, sample) in doc.solver_samples() {
            self.insert(
                family,
                id,
                Measurement {
                    real_time: sample.real_time,
                    cpu_time: sample.cpu_time,
                },
            );
        }
    }

    pub fn insert(&mut self, family: SolverFamily, id: SolverBenchmarkId, m: Measurement) {
        let config = SolverBenchConfig::new(family, id.vectorization, id.precision, id.pivot);
        self.times.insert((config, id.size), m);
    }

    /// Load `<Family>.json` for every family in `families`. Missing files are
    /// logged and skipped.
    pub fn load(store: &ResultStore, families: &[SolverFamily]) -> Result<Self> {
        let mut set = Self::new();
        for &family in families {
            let file = format!("{}.json", family.label());
            match store.read_optional(&file)? {
                Some(doc) => set.add_document(family, &doc),
                None => warn!(path = %store.path(&file).display(), "no result document"),
            }
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn get(&self, config: SolverBenchConfig, size: usize) -> Option<Measurement> {
        self.times.get(&(config, size)).copied()
    }

    fn time(&self, config: SolverBenchConfig, size: usize, kind: TimeKind) -> Option<f64> {
        self.get(config, size).map(|m| m.get(kind))
    }

    /// Every size present in the set, ascending.
    pub fn sizes(&self) -> Vec<usize> {
        self.times
            .keys()
            .map(|&(_, n)| n)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn has_series(&self, config: SolverBenchConfig) -> bool {
        self.times.keys().any(|(c, _)| *c == config)
    }

    /// Time of each family relative to `reference`, all at the same
    /// vectorization, precision and pivot strategy.
    pub fn relative_performance(
        &self,
        families: &[SolverFamily],
        reference: SolverFamily,
        vectorization: Vectorization,
        precision: Precision,
        pivot: PivotStrategy,
        kind: TimeKind,
    ) -> Vec<Comparison> {
        let baseline = SolverBenchConfig::new(reference, vectorization, precision, pivot);
        if !self.has_series(baseline) {
            warn!(baseline = %baseline, "no data for reference benchmark");
        }
        let sizes = self.sizes();
        let mut out = Vec::with_capacity(families.len() * sizes.len());
        for &family in families {
            let config = SolverBenchConfig::new(family, vectorization, precision, pivot);
            if !self.has_series(config) {
                warn!(benchmark = %config, "no data for benchmark");
            }
            for &size in &sizes {
                out.push(Comparison {
                    config,
                    size,
                    speedup: Speedup::ratio(
                        self.time(config, size, kind),
                        self.time(baseline, size, kind),
                    ),
                });
            }
        }
        out
    }

    /// Serial time divided by `vectorization` time, per family and size.
    /// Values above 1 mean the vectorized kernel is faster.
    pub fn vectorization_speedup(
        &self,
        families: &[SolverFamily],
        vectorization: Vectorization,
        precision: Precision,
        pivot: PivotStrategy,
        kind: TimeKind,
    ) -> Vec<Comparison> {
        let sizes = self.sizes();
        let mut out = Vec::with_capacity(families.len() * sizes.len());
        for &family in families {
            let serial = SolverBenchConfig::new(family, Vectorization::Serial, precision, pivot);
            let config = SolverBenchConfig::new(family, vectorization, precision, pivot);
            for &size in &sizes {
                out.push(Comparison {
                    config,
                    size,
                    speedup: Speedup::ratio(
                        self.time(serial, size, kind),
                        self.time(config, size, kind),
                    ),
                });
            }
        }
        out
    }
}

/// Render comparisons as a text table, one row per size and one column per
/// configuration.
pub fn format_table(title: &str, comparisons: &[Comparison]) -> String {
    let columns: Vec<SolverBenchConfig> = comparisons
        .iter()
        .map(|c| c.config)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let sizes: BTreeSet<usize> = comparisons.iter().map(|c| c.size).collect();

    let mut out = format!("{title}\n{:>6}", "size");
    for config in &columns {
        out.push_str(&format!(" {:>8}", config.family.label()));
    }
    out.push('\n');
    for size in sizes {
        out.push_str(&format!("{size:>6}"));
        for config in &columns {
            let cell = comparisons
                .iter()
                .find(|c| c.size == size && c.config == *config)
                .map_or(Speedup::Unavailable, |c| c.speedup);
            out.push_str(&format!(" {:>8}", cell.to_string()));
        }
        out.push('\n');
    }
    out
}
