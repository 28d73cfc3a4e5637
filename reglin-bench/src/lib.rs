//! Benchmark harness for the reglin kernels.
//!
//! The harness walks two grids and records one timing per point:
//!
//! - solvers: every supported [`SolverBenchConfig`] from [`config_table`] at
//!   every configured system size, written as one document per family
//!   (`Gauss.json`, `LU.json`, ...)
//! - transposes: every `(rows, cols, offset_in, offset_out)` of a register
//!   kind, one document per configuration with a record per tail policy
//!
//! [`ResultSet`] reads solver documents back, including documents written by
//! older harnesses with the legacy name scheme, and computes relative
//! performance and vectorization speedups.
//!
//! # Example
//!
//! ```rust
//! use reglin_bench::{run_family, HarnessConfig, ResultSet, Speedup, TimeKind};
//! use reglin_core::{PivotStrategy, Precision, Vectorization};
//! use reglin_solver::SolverFamily;
//!
//! let config = HarnessConfig { sizes: vec![4], iterations: 3, ..HarnessConfig::default() };
//! let doc = run_family(&config, SolverFamily::Lu).unwrap();
//!
//! let mut results = ResultSet::new();
//! results.add_document(SolverFamily::Lu, &doc);
//! let rows = results.relative_performance(
//!     &[SolverFamily::Lu, SolverFamily::Qr],
//!     SolverFamily::Lu,
//!     Vectorization::Avx,
//!     Precision::F64,
//!     PivotStrategy::NoPivot,
//!     TimeKind::Real,
//! );
//! assert_eq!(rows[1].speedup, Speedup::Unavailable);
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod naming;
pub mod record;
pub mod runner;
pub mod store;
pub mod table;
pub mod timer;

pub use analysis::{format_table, Comparison, Measurement, ResultSet, Speedup, TimeKind};
pub use config::{HarnessConfig, TimeUnit};
pub use error::{HarnessError, Result};
pub use naming::{
    parse_legacy_solver_name, parse_solver_name, tail_policy_of, SolverBenchmarkId,
    TransposeBenchmarkId,
};
pub use record::{BenchmarkSample, DocumentContext, RecordConfig, ResultDocument, SCHEMA_VERSION};
pub use runner::{
    run_family, run_solver, run_solver_benchmarks, run_transpose, run_transpose_benchmarks,
    solver_input, transpose_grid,
};
pub use store::{read_document, ResultStore};
pub use table::{config_table, family_configs, SolverBenchConfig};
pub use timer::{measure, process_cpu_time, Timing};
