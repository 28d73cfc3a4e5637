//! Result documents.
//!
//! ```json
//! {
//!   "context": { "schema_version": 1, "date": "...", "time_unit": "ns", ... },
//!   "benchmarks": [
//!     { "name": "SSE_F32_NoPivot/8", "config": { ... },
//!       "iterations": 1000, "real_time": 812.4, "cpu_time": 809.9, "time_unit": "ns" }
//!   ]
//! }
//! ```
//!
//! The `name` field keeps the string form readers of older documents key
//! on; `config` carries the same information structured.

use serde::{Deserialize, Serialize};

use crate::config::TimeUnit;
use crate::error::{HarnessError, Result};
use crate::naming::{parse_solver_name, SolverBenchmarkId, TransposeBenchmarkId};
use crate::table::SolverBenchConfig;

/// Version written to `context.schema_version`.
pub const SCHEMA_VERSION: u32 = 1;

/// Structured configuration of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordConfig {
    Solver {
        #[serde(flatten)]
        config: SolverBenchConfig,
        size: usize,
    },
    Transpose {
        register: String,
        rows: usize,
        cols: usize,
        offset_in: usize,
        offset_out: usize,
        tail: String,
    },
}

/// One timed configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSample {
    pub name: String,
    /// Absent in documents produced by older harnesses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<RecordConfig>,
    pub iterations: u64,
    /// Mean wall time per iteration.
    pub real_time: f64,
    /// Mean process CPU time per iteration.
    pub cpu_time: f64,
    pub time_unit: TimeUnit,
}

impl BenchmarkSample {
    /// Solver identity of this record, from `config` when present and from
    /// the name otherwise.
    pub fn solver_id(&self) -> Result<SolverBenchmarkId> {
        match &self.config {
            Some(RecordConfig::Solver { config, size }) => Ok(SolverBenchmarkId {
                vectorization: config.vectorization,
                precision: config.precision,
                pivot: config.pivot,
                size: *size,
            }),
            Some(RecordConfig::Transpose { .. }) => Err(HarnessError::name_parse(
                &self.name,
                "transpose record where a solver record was expected",
            )),
            None => parse_solver_name(&self.name),
        }
    }
}

/// Run metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentContext {
    pub schema_version: u32,
    /// Unix timestamp in seconds.
    #[serde(default)]
    pub date: u64,
    #[serde(default)]
    pub host_name: String,
    #[serde(default)]
    pub num_cpus: usize,
    #[serde(default)]
    pub time_unit: TimeUnit,
    #[serde(default = "one")]
    pub time_scaling: f64,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub simd_dispatch: bool,
}

fn one() -> f64 {
    1.0
}

impl Default for DocumentContext {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            date: 0,
            host_name: String::new(),
            num_cpus: 0,
            time_unit: TimeUnit::default(),
            time_scaling: 1.0,
            seed: 0,
            simd_dispatch: false,
        }
    }
}

/// A result document: one solver family or one transpose configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDocument {
    #[serde(default)]
    pub context: DocumentContext,
    pub benchmarks: Vec<BenchmarkSample>,
}

impl ResultDocument {
    pub fn new(context: DocumentContext) -> Self {
        Self {
            context,
            benchmarks: Vec::new(),
        }
    }

    pub fn push(&mut self, sample: BenchmarkSample) {
        self.benchmarks.push(sample);
    }

    pub fn find(&self, name: &str) -> Option<&BenchmarkSample> {
        self.benchmarks.iter().find(|b| b.name == name)
    }

    /// Solver records keyed by identity. Records whose name cannot be parsed
    /// are skipped.
    pub fn solver_samples(&self) -> impl Iterator<Item = (SolverBenchmarkId, &BenchmarkSample)> {
        self.benchmarks
            .iter()
            .filter_map(|b| b.solver_id().ok().map(|id| (id, b)))
    }
}

/// Structured config of a transpose record.
pub fn transpose_config(id: &TransposeBenchmarkId, tail: reglin_transpose::TailPolicy) -> RecordConfig {
    RecordConfig::Transpose {
        register: id.register.name().to_string(),
        rows: id.rows,
        cols: id.cols,
        offset_in: id.offset_in,
        offset_out: id.offset_out,
        tail: tail.name().to_string(),
    }
}
