//! Walking the benchmark grids.
//!
//! Solver inputs are symmetric, strictly diagonally dominant matrices with
//! integer entries drawn from `[-10, 10)`, so every family succeeds for
//! every pivot strategy. Inputs depend only on the seed and the system size:
//! all configurations of one size solve the same system.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reglin_core::{Matrix, Precision, RegScalar, Register, RegisterKind, Vector};
use reglin_solver::{solve, SolverConfig, SolverFamily};
use reglin_transpose::{transpose_into, RegisterPlacement, TailPolicy, TransposeShape};
use tracing::{debug, info};

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::naming::{SolverBenchmarkId, TransposeBenchmarkId};
use crate::record::{transpose_config, BenchmarkSample, DocumentContext, RecordConfig, ResultDocument};
use crate::store::ResultStore;
use crate::table::{family_configs, SolverBenchConfig};
use crate::timer::{measure, Timing};

/// Metadata for documents produced with `config`.
pub fn document_context(config: &HarnessConfig) -> DocumentContext {
    DocumentContext {
        date: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0),
        host_name: std::env::var("HOSTNAME").unwrap_or_default(),
        num_cpus: std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
        time_unit: config.time_unit,
        time_scaling: config.time_scaling,
        seed: config.seed,
        simd_dispatch: cfg!(feature = "simd"),
        ..DocumentContext::default()
    }
}

/// Random solver input of size `n`; see the module docs.
pub fn solver_input<T: RegScalar>(seed: u64, n: usize) -> (Matrix<T>, Vector<T>) {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(n as u64));
    let mut a = Matrix::<f64>::zeros(n, n);
    for c in 0..n {
        for r in c..n {
            let v = f64::from(rng.gen_range(-10i32..10));
            a[(r, c)] = v;
            a[(c, r)] = v;
        }
    }
    for i in 0..n {
        a[(i, i)] = a[(i, i)].abs() + 10.0 * n as f64;
    }
    let b = Vector::from_fn(n, |_| f64::from(rng.gen_range(-10i32..10)));
    (a.cast(), b.cast())
}

/// Time one solver configuration at one size.
///
/// The system is solved once untimed first, so a kernel error is reported
/// instead of timed.
pub fn run_solver(
    config: &HarnessConfig,
    bench: SolverBenchConfig,
    size: usize,
) -> Result<BenchmarkSample> {
    bench.ensure_supported()?;
    let timing = match bench.precision {
        Precision::F32 => time_solver::<f32>(config, bench, size)?,
        Precision::F64 => time_solver::<f64>(config, bench, size)?,
    };
    let id = SolverBenchmarkId {
        vectorization: bench.vectorization,
        precision: bench.precision,
        pivot: bench.pivot,
        size,
    };
    debug!(family = %bench.family, name = %id, real = ?timing.real, "timed solver");
    Ok(sample(
        config,
        id.to_string(),
        RecordConfig::Solver {
            config: bench,
            size,
        },
        timing,
    ))
}

fn time_solver<T: RegScalar>(
    config: &HarnessConfig,
    bench: SolverBenchConfig,
    size: usize,
) -> Result<Timing> {
    let (a, b) = solver_input::<T>(config.seed, size);
    let solver = SolverConfig::new(bench.vectorization, bench.pivot);
    solve(bench.family, solver, &a, &b)?;
    Ok(measure(config.warmup_iterations, config.iterations, |_| {
        solve(bench.family, solver, &a, &b)
    }))
}

fn sample(config: &HarnessConfig, name: String, record: RecordConfig, timing: Timing) -> BenchmarkSample {
    BenchmarkSample {
        name,
        config: Some(record),
        iterations: timing.iterations,
        real_time: config.report(timing.real),
        cpu_time: config.report(timing.cpu),
        time_unit: config.time_unit,
    }
}

/// Every supported configuration of `family` at every configured size.
pub fn run_family(config: &HarnessConfig, family: SolverFamily) -> Result<ResultDocument> {
    let jobs: Vec<(SolverBenchConfig, usize)> = family_configs(family)
        .flat_map(|bench| {
            config
                .sizes
                .iter()
                .copied()
                .filter(move |&n| bench.supports_size(n))
                .map(move |n| (bench, n))
        })
        .collect();
    let skipped = config.sizes.len() * family_configs(family).count() - jobs.len();
    if skipped > 0 {
        debug!(family = %family, skipped, "sizes outside the family's range skipped");
    }

    let mut doc = ResultDocument::new(document_context(config));
    doc.benchmarks = run_jobs(config, &jobs)?;
    info!(family = %family, records = doc.benchmarks.len(), "solver family done");
    Ok(doc)
}

#[cfg(feature = "parallel")]
fn run_jobs(config: &HarnessConfig, jobs: &[(SolverBenchConfig, usize)]) -> Result<Vec<BenchmarkSample>> {
    use rayon::prelude::*;
    jobs.par_iter()
        .map(|&(bench, n)| run_solver(config, bench, n))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_jobs(config: &HarnessConfig, jobs: &[(SolverBenchConfig, usize)]) -> Result<Vec<BenchmarkSample>> {
    jobs.iter()
        .map(|&(bench, n)| run_solver(config, bench, n))
        .collect()
}

/// Run `families` and write one `<Family>.json` document each.
pub fn run_solver_benchmarks(
    config: &HarnessConfig,
    families: &[SolverFamily],
    store: &ResultStore,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(families.len());
    for &family in families {
        let doc = run_family(config, family)?;
        written.push(store.write(&format!("{}.json", family.label()), &doc)?);
    }
    Ok(written)
}

// ============================================================================
// Transpose
// ============================================================================

/// Transpose configurations of `register`: every `(rows, cols)` pair, with
/// every admissible offset pair when `all_offsets` is set and offset zero
/// otherwise.
pub fn transpose_grid(register: RegisterKind, all_offsets: bool) -> Vec<TransposeBenchmarkId> {
    TransposeShape::grid(register.element_count())
        .filter(|s| all_offsets || (s.offset_in() == 0 && s.offset_out() == 0))
        .map(|s| TransposeBenchmarkId {
            register,
            rows: s.rows(),
            cols: s.cols(),
            offset_in: s.offset_in(),
            offset_out: s.offset_out(),
        })
        .collect()
}

/// Time the three tail policies of one transpose configuration.
pub fn run_transpose(config: &HarnessConfig, id: &TransposeBenchmarkId) -> Result<ResultDocument> {
    let lanes = id.register.element_count();
    let shape = TransposeShape::new(lanes, id.rows, id.cols, id.offset_in, id.offset_out)?;
    let mut doc = ResultDocument::new(document_context(config));
    for tail in TailPolicy::ALL {
        let timing = match id.register {
            RegisterKind::M128 => time_transpose::<f32, 4>(config, &shape, tail)?,
            RegisterKind::M128d => time_transpose::<f64, 2>(config, &shape, tail)?,
            RegisterKind::M256 => time_transpose::<f32, 8>(config, &shape, tail)?,
            RegisterKind::M256d => time_transpose::<f64, 4>(config, &shape, tail)?,
        };
        doc.push(sample(
            config,
            id.sub_benchmark(tail),
            transpose_config(id, tail),
            timing,
        ));
    }
    Ok(doc)
}

fn time_transpose<T: RegScalar, const N: usize>(
    config: &HarnessConfig,
    shape: &TransposeShape,
    tail: TailPolicy,
) -> Result<Timing> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let src: [Register<T, N>; N] = std::array::from_fn(|_| {
        Register::from_array(std::array::from_fn(|_| {
            T::cast_from_f64(f64::from(rng.gen_range(-10i32..10)))
        }))
    });
    let mut dst = [Register::<T, N>::zero(); N];
    let placement = RegisterPlacement::default();
    transpose_into(shape, &placement, tail, &src, &mut dst)?;
    let mut failure = None;
    let timing = measure(config.warmup_iterations, config.iterations, |_| {
        if let Err(err) = transpose_into(shape, &placement, tail, &src, &mut dst) {
            failure.get_or_insert(err);
        }
        dst[0]
    });
    match failure {
        Some(err) => Err(err.into()),
        None => Ok(timing),
    }
}

/// Run the transpose grid of `registers` and write one document per
/// configuration.
pub fn run_transpose_benchmarks(
    config: &HarnessConfig,
    registers: &[RegisterKind],
    all_offsets: bool,
    store: &ResultStore,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for &register in registers {
        let grid = transpose_grid(register, all_offsets);
        info!(register = %register, configurations = grid.len(), "transpose grid");
        for id in &grid {
            let doc = run_transpose(config, id)?;
            written.push(store.write(&id.file_name(), &doc)?);
        }
    }
    Ok(written)
}
