use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use green_sched::{Algorithm, Config, ConfigBuilder, Simulator, export};
use log::info;

/// Compare CPU scheduling policies by energy use, CO2 emissions and latency.
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Opts {
    /// JSON configuration file. Fields it leaves out keep their defaults.
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// Number of tasks to generate.
    #[clap(short = 'n', long)]
    tasks: Option<usize>,

    /// Seed for task generation.
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// Comma-separated algorithms to run, e.g. FCFS,SJF,EnergyOptimized.
    #[clap(short = 'a', long, value_delimiter = ',')]
    algorithms: Vec<String>,

    /// Round-robin time quantum, in ticks.
    #[clap(short = 'q', long)]
    quantum: Option<u64>,

    /// Directory to write the CSV summary and JSON results into.
    #[clap(short = 'o', long)]
    output: Option<PathBuf>,

    /// Enable verbose output, including engine phases. Specify twice for
    /// per-interval tracing.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(opts: &Opts) -> Result<Config> {
    let base = match &opts.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    let mut builder = ConfigBuilder::from(base);
    if let Some(n) = opts.tasks {
        builder = builder.tasks(n);
    }
    if let Some(seed) = opts.seed {
        builder = builder.seed(seed);
    }
    if let Some(quantum) = opts.quantum {
        builder = builder.quantum(quantum);
    }
    if !opts.algorithms.is_empty() {
        let algorithms = opts
            .algorithms
            .iter()
            .map(|name| Algorithm::from_name(name))
            .collect::<green_sched::Result<Vec<_>>>()?;
        builder = builder.algorithms(algorithms);
    }

    Ok(builder.build()?)
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let llv = match opts.verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Error)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    simplelog::TermLogger::init(
        llv,
        lcfg.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let config = load_config(&opts)?;
    let mut sim = Simulator::new(config)?;
    let comparison = sim.run_all();

    println!("{}", export::summary_table(&comparison));

    if let Some(dir) = &opts.output {
        export::save_results(&comparison, dir)
            .with_context(|| format!("Failed to save results to {}", dir.display()))?;
        info!("Results saved to {}", dir.display());
    }

    Ok(())
}
