//! reglin-bench - CLI for running and comparing the reglin kernel benchmarks

mod cli;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use reglin_bench::{
    format_table, run_solver_benchmarks, run_transpose_benchmarks, ResultSet, ResultStore,
};
use reglin_core::{PivotStrategy, Precision, RegisterKind, Vectorization};
use tracing::info;

use cli::{families_or_all, Cli, Command};

fn main() {
    let cli = Cli::parse();
    cli.init_logging();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli
        .harness_config()
        .context("Invalid harness configuration")?;
    let store = ResultStore::new(&config.result_dir);

    match cli.command {
        Command::Solvers { family, .. } => {
            let families = families_or_all(&family);
            info!(families = ?families, sizes = ?config.sizes, "running solver benchmarks");
            let written = run_solver_benchmarks(&config, &families, &store)
                .context("Solver benchmark failed")?;
            report_written(cli.quiet, &written);
        }
        Command::Transpose {
            register,
            all_offsets,
            ..
        } => {
            let registers = if register.is_empty() {
                RegisterKind::ALL.to_vec()
            } else {
                register
            };
            let written = run_transpose_benchmarks(&config, &registers, all_offsets, &store)
                .context("Transpose benchmark failed")?;
            report_written(cli.quiet, &written);
        }
        Command::Compare {
            family,
            reference,
            vectorization,
            precision,
            pivot,
            speedup_pivot,
            time,
        } => {
            let families = families_or_all(&family);
            let results = ResultSet::load(&store, &families)
                .with_context(|| format!("Cannot read results from {}", store.dir().display()))?;
            if results.is_empty() {
                anyhow::bail!("No solver results found in {}", store.dir().display());
            }
            let vectorization = Vectorization::from(vectorization);
            let precision = Precision::from(precision);

            let relative = results.relative_performance(
                &families,
                reference,
                vectorization,
                precision,
                pivot.into(),
                time.into(),
            );
            println!(
                "{}",
                format_table(
                    &format!(
                        "Relative performance to {reference} ({vectorization}, {precision}, {})",
                        PivotStrategy::from(pivot).description()
                    ),
                    &relative
                )
            );

            let speedup = results.vectorization_speedup(
                &families,
                vectorization,
                precision,
                speedup_pivot.into(),
                time.into(),
            );
            println!(
                "{}",
                format_table(
                    &format!(
                        "{vectorization} speedup over Serial ({precision}, {})",
                        PivotStrategy::from(speedup_pivot).description()
                    ),
                    &speedup
                )
            );
        }
    }

    Ok(())
}

fn report_written(quiet: bool, written: &[std::path::PathBuf]) {
    if quiet {
        return;
    }
    println!("Wrote {} result document(s)", written.len());
    for path in written {
        println!("  {}", path.display());
    }
}
