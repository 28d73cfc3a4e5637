//! Command-line argument parsing for reglin-bench

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use reglin_bench::{HarnessConfig, TimeKind, TimeUnit};
use reglin_core::{PivotStrategy, Precision, RegisterKind, Vectorization};
use reglin_solver::SolverFamily;

/// reglin-bench - time the reglin solver and transpose kernels
#[derive(Parser, Debug)]
#[command(name = "reglin-bench")]
#[command(author, version, about = "Time the reglin solver and transpose kernels", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// JSON harness configuration; flags below override its fields
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Directory for result documents
    #[arg(short, long, value_name = "DIR", global = true)]
    pub result_dir: Option<PathBuf>,

    /// Unit of reported times (ns, us, ms, s)
    #[arg(long, global = true)]
    pub time_unit: Option<TimeUnit>,

    /// Factor applied to every reported time
    #[arg(long, global = true)]
    pub time_scaling: Option<f64>,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Benchmark the dense solvers and write one document per family
    Solvers {
        /// Families to run (default: all)
        #[arg(short, long, value_delimiter = ',')]
        family: Vec<SolverFamily>,

        /// System sizes
        #[arg(short, long, value_delimiter = ',')]
        sizes: Vec<usize>,

        /// Timed iterations per configuration
        #[arg(short = 'n', long)]
        iterations: Option<u32>,

        /// Untimed iterations per configuration
        #[arg(long)]
        warmup: Option<u32>,

        /// Input generator seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Benchmark the register transpose over the size and offset grid
    Transpose {
        /// Register kinds to run (default: all)
        #[arg(short = 'k', long, value_delimiter = ',')]
        register: Vec<RegisterKind>,

        /// Walk every admissible offset pair instead of offset zero only
        #[arg(long)]
        all_offsets: bool,

        /// Timed iterations per configuration
        #[arg(short = 'n', long)]
        iterations: Option<u32>,
    },

    /// Compare stored solver results
    Compare {
        /// Families to compare (default: all)
        #[arg(short, long, value_delimiter = ',')]
        family: Vec<SolverFamily>,

        /// Family the others are measured against
        #[arg(long, default_value = "LU")]
        reference: SolverFamily,

        /// Vectorization of the relative comparison and of the speedup
        #[arg(long, value_enum, default_value = "avx")]
        vectorization: VectorizationArg,

        #[arg(long, value_enum, default_value = "f64")]
        precision: PrecisionArg,

        /// Pivot strategy of the relative comparison
        #[arg(long, value_enum, default_value = "partial-pivot")]
        pivot: PivotArg,

        /// Pivot strategy of the serial/vectorized speedup
        #[arg(long, value_enum, default_value = "no-pivot")]
        speedup_pivot: PivotArg,

        /// Compare wall or CPU time
        #[arg(long, value_enum, default_value = "real")]
        time: TimeArg,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorizationArg {
    Serial,
    Sse,
    Avx,
}

impl From<VectorizationArg> for Vectorization {
    fn from(arg: VectorizationArg) -> Self {
        match arg {
            VectorizationArg::Serial => Vectorization::Serial,
            VectorizationArg::Sse => Vectorization::Sse,
            VectorizationArg::Avx => Vectorization::Avx,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionArg {
    F32,
    F64,
}

impl From<PrecisionArg> for Precision {
    fn from(arg: PrecisionArg) -> Self {
        match arg {
            PrecisionArg::F32 => Precision::F32,
            PrecisionArg::F64 => Precision::F64,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotArg {
    NoPivot,
    PartialPivot,
}

impl From<PivotArg> for PivotStrategy {
    fn from(arg: PivotArg) -> Self {
        match arg {
            PivotArg::NoPivot => PivotStrategy::NoPivot,
            PivotArg::PartialPivot => PivotStrategy::PartialPivot,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeArg {
    Real,
    Cpu,
}

impl From<TimeArg> for TimeKind {
    fn from(arg: TimeArg) -> Self {
        match arg {
            TimeArg::Real => TimeKind::Real,
            TimeArg::Cpu => TimeKind::Cpu,
        }
    }
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        use tracing_subscriber::{fmt, EnvFilter};

        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        fmt().with_env_filter(filter).with_target(false).init();
    }

    /// Harness configuration: defaults, then the config file, then flags.
    pub fn harness_config(&self) -> reglin_bench::Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::load(path)?,
            None => HarnessConfig::default(),
        };
        if let Some(dir) = &self.result_dir {
            config.result_dir = dir.clone();
        }
        if let Some(unit) = self.time_unit {
            config.time_unit = unit;
        }
        if let Some(scaling) = self.time_scaling {
            config.time_scaling = scaling;
        }
        match &self.command {
            Command::Solvers {
                sizes,
                iterations,
                warmup,
                seed,
                ..
            } => {
                if !sizes.is_empty() {
                    config.sizes = sizes.clone();
                }
                config.iterations = iterations.unwrap_or(config.iterations);
                config.warmup_iterations = warmup.unwrap_or(config.warmup_iterations);
                config.seed = seed.unwrap_or(config.seed);
            }
            Command::Transpose { iterations, .. } => {
                config.iterations = iterations.unwrap_or(config.iterations);
            }
            Command::Compare { .. } => {}
        }
        config.validate()?;
        Ok(config)
    }
}

/// `requested`, or every family when empty.
pub fn families_or_all(requested: &[SolverFamily]) -> Vec<SolverFamily> {
    if requested.is_empty() {
        SolverFamily::ALL.to_vec()
    } else {
        requested.to_vec()
    }
}
