use std::{
    io::{self, Write},
    path::PathBuf,
    time::Instant,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use push_meta_solver::{
    OptimizerConfig, PivotConfig, PlotSet, State, optimize, sort_quicksort,
    sort_quicksort_with_plots,
};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::info;

mod plots;

// CLI
// ================================================================================================

/// Sorts a permutation of distinct integers with a short push-swap instruction sequence.
///
/// The optimized sequence is printed to stdout, one op per line; the base and optimized
/// op-counts and the phase timings go to stderr.
#[derive(Debug, Parser)]
#[command(name = "push-meta", version)]
pub struct Cli {
    /// Distinct integers to sort, first value on top of stack A
    #[arg(allow_negative_numbers = true)]
    pub values: Vec<String>,

    /// Sort a seeded random permutation of 0..N instead of explicit values
    #[arg(long, value_name = "N", conflicts_with = "values")]
    pub random: Option<usize>,

    /// Seed for --random
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Nested pivot-evaluation depth past which tuning falls back to percentile pivots
    #[arg(long, default_value_t = 1)]
    pub max_depth: usize,

    /// Iteration cap of the Nelder-Mead pivot search
    #[arg(long, default_value_t = 50)]
    pub max_iters: usize,

    /// Simplex diameter below which the pivot search stops
    #[arg(long, default_value_t = 0.01)]
    pub tol: f32,

    /// Edge length of the initial pivot-search simplex
    #[arg(long, default_value_t = 0.55)]
    pub initial_scale: f32,

    /// Index-space refinement radius around the converged pivot pair
    #[arg(long, default_value_t = 2)]
    pub final_radius: usize,

    /// History lookahead window of the peephole optimizer
    #[arg(long, default_value_t = 1000)]
    pub search_width: usize,

    /// Maximum skip length of the peephole optimizer
    #[arg(long, default_value_t = 4)]
    pub search_depth: usize,

    /// Write the pivot tuner's objective grids as CSV files
    #[arg(long)]
    pub plots: bool,

    /// Directory the plot files are written into
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub plot_dir: PathBuf,
}

pub fn run(cli: Cli) -> Result<()> {
    let values = input_values(&cli)?;
    let mut state = State::new(&values)?;

    let pivot_cfg = PivotConfig {
        max_depth: cli.max_depth,
        max_iters: cli.max_iters,
        tol: cli.tol,
        initial_scale: cli.initial_scale,
        final_radius: cli.final_radius,
    };
    let optimizer_cfg = OptimizerConfig {
        search_width: cli.search_width,
        search_depth: cli.search_depth,
    };

    let mut plot_data = PlotSet::new();
    let sort_started = Instant::now();
    if cli.plots {
        sort_quicksort_with_plots(&mut state, &pivot_cfg, &mut plot_data);
    } else {
        sort_quicksort(&mut state, &pivot_cfg);
    }
    let sort_elapsed = sort_started.elapsed();
    let base = state.op_count();
    info!(values = values.len(), base, "sort phase done");

    let optimize_started = Instant::now();
    let optimized = optimize(&state, &optimizer_cfg);
    let optimize_elapsed = optimize_started.elapsed();
    info!(optimized = optimized.op_count(), "optimization phase done");

    let mut stdout = io::stdout().lock();
    for op in &optimized.ops {
        writeln!(stdout, "{op}")?;
    }
    stdout.flush()?;

    eprintln!("base sort: {base} ops in {sort_elapsed:.2?}");
    eprintln!("optimized: {} ops in {:.2?}", optimized.op_count(), optimize_elapsed);

    if cli.plots {
        plots::write_plots(&cli.plot_dir, &plot_data)?;
    }
    Ok(())
}

/// Resolves the input permutation from the command line.
fn input_values(cli: &Cli) -> Result<Vec<i32>> {
    if let Some(n) = cli.random {
        if n == 0 {
            bail!("--random needs at least one value");
        }
        let n = i32::try_from(n).context("--random value is too large")?;
        let mut values: Vec<i32> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(cli.seed);
        values.shuffle(&mut rng);
        return Ok(values);
    }

    if cli.values.is_empty() {
        bail!("no values given; pass distinct integers or --random N");
    }
    cli.values
        .iter()
        .map(|raw| {
            raw.parse::<i32>().with_context(|| format!("invalid integer `{raw}`"))
        })
        .collect()
}
