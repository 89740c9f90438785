//! Sigbench CLI: run configured strategies and check for fresh signals.
//!
//! Commands:
//! - `run`: backtest every strategy in a TOML config and save artifacts
//! - `signals`: report the newest bar's signal for every strategy
//! - `strategies`: list the built-in signal providers

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use sigbench_core::signals::SignalKind;
use sigbench_runner::{
    check_latest_signals, format_signal_notice, format_summary, init_logging, load_bars, run_all,
    save_artifacts, LoadOptions, LogConfig, RunnerConfig,
};

#[derive(Parser)]
#[command(
    name = "sigbench",
    about = "Sigbench CLI: signal-driven single-position backtester"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest every strategy in a TOML config.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Bar CSV. Overrides `[data].path` in the config.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Generate this many synthetic bars when no CSV is available.
        #[arg(long)]
        synthetic: Option<usize>,

        /// Seed for synthetic bars.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Print a notice for every strategy with a signal on the newest bar.
    Signals {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Bar CSV. Overrides `[data].path` in the config.
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// List built-in signal provider types.
    Strategies,
}

fn main() -> Result<()> {
    if let Err(e) = init_logging(LogConfig::from_env()) {
        eprintln!("logging disabled: {e}");
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            synthetic,
            seed,
            output_dir,
        } => run_cmd(&config, data, synthetic, seed, &output_dir),
        Commands::Signals { config, data } => signals_cmd(&config, data),
        Commands::Strategies => {
            list_strategies();
            Ok(())
        }
    }
}

fn run_cmd(
    config_path: &Path,
    data: Option<PathBuf>,
    synthetic: Option<usize>,
    seed: u64,
    output_dir: &Path,
) -> Result<()> {
    let config = RunnerConfig::from_file(config_path)?;
    let run_id = config.run_id()?;
    info!(run_id = %run_id, strategies = config.strategies.len(), "config loaded");

    let opts = LoadOptions {
        path: data,
        synthetic,
        seed,
    };
    let bars = load_bars(&config.data, &opts)?;

    let outcomes = run_all(&config, &bars);
    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(result) => {
                println!("{}", format_summary(result));
                let run_dir = save_artifacts(result, output_dir)
                    .with_context(|| format!("saving artifacts for '{}'", outcome.name))?;
                println!("Artifacts saved to: {}", run_dir.display());
                println!();
            }
            Err(e) => {
                eprintln!("Error: {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} strategies failed", outcomes.len());
    }
    Ok(())
}

fn signals_cmd(config_path: &Path, data: Option<PathBuf>) -> Result<()> {
    let config = RunnerConfig::from_file(config_path)?;
    let opts = LoadOptions {
        path: data,
        ..Default::default()
    };
    let bars = load_bars(&config.data, &opts)?;

    let mut notices = 0;
    for check in check_latest_signals(&config, &bars) {
        match check.result {
            Ok(Some(latest)) => {
                if let Some(text) =
                    format_signal_notice(&check.name, &bars.symbol, &bars.timeframe, &latest)
                {
                    println!("{text}");
                    println!();
                    notices += 1;
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    if notices == 0 {
        println!("No signal on the newest bar.");
    }
    Ok(())
}

fn list_strategies() {
    println!("{:<24} Description", "Type");
    println!("{}", "-".repeat(72));
    for (kind, description) in SignalKind::catalog() {
        println!("{:<24} {}", kind.type_name(), description);
    }
}
