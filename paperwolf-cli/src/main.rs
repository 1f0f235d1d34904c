//! Paperwolf CLI — scan, state, and reset commands.
//!
//! Commands:
//! - `scan` — classify a market snapshot, fuse the expert votes, run one
//!   simulation tick, and print the ranked report
//! - `state` — print the persisted portfolio snapshot
//! - `reset` — reinitialize the portfolio to defaults
//!
//! The snapshot CSV carries precomputed features per ticker:
//! `ticker,close,vwap,rsi,volume_z,hv_rank`. An optional history
//! directory holds per-ticker `time,close,volume` CSVs for sparklines.

mod snapshot;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paperwolf_core::{HistoryProvider, MomentumSource, RegimeSource};
use paperwolf_sim::{run_scan, JsonFileStore, ScanReport, SimConfig, SimulationEngine};

use crate::snapshot::{read_snapshot, CsvHistoryProvider};

#[derive(Parser)]
#[command(name = "paperwolf", about = "Paperwolf — hybrid signal fusion + paper-trading game")]
struct Cli {
    /// Path to the persisted portfolio document.
    #[arg(long, default_value = "simulation_state.json", global = true)]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scan: classify, fuse, tick, report.
    Scan {
        /// Market snapshot CSV (ticker,close,vwap,rsi,volume_z,hv_rank).
        #[arg(long)]
        snapshot: PathBuf,

        /// Directory of per-ticker history CSVs (time,close,volume).
        #[arg(long)]
        history_dir: Option<PathBuf>,

        /// Engine config TOML; defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit the full report as JSON instead of the table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the portfolio snapshot as JSON.
    State,
    /// Reinitialize the portfolio and print the fresh snapshot.
    Reset,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            snapshot,
            history_dir,
            config,
            json,
        } => run_scan_command(cli.state, snapshot, history_dir, config, json),
        Commands::State => run_state_command(cli.state),
        Commands::Reset => run_reset_command(cli.state),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<SimConfig> {
    match path {
        Some(path) => SimConfig::from_toml_file(&path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(SimConfig::default()),
    }
}

fn run_scan_command(
    state_path: PathBuf,
    snapshot_path: PathBuf,
    history_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let rows = read_snapshot(&snapshot_path)
        .with_context(|| format!("reading snapshot {}", snapshot_path.display()))?;

    let prices: HashMap<String, f64> = rows
        .iter()
        .map(|row| (row.ticker.clone(), row.close))
        .collect();
    let sniper = MomentumSource::new(rows.iter().map(|r| r.momentum()).collect());
    let income = RegimeSource::new(rows.iter().map(|r| r.volatility()).collect());

    let mut engine = SimulationEngine::new(JsonFileStore::new(&state_path), config);

    let history_provider = history_dir.map(CsvHistoryProvider::new);
    let report = run_scan(
        &mut engine,
        &income,
        &sniper,
        &prices,
        history_provider
            .as_ref()
            .map(|p| p as &dyn HistoryProvider),
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn run_state_command(state_path: PathBuf) -> Result<()> {
    let engine = SimulationEngine::new(JsonFileStore::new(&state_path), SimConfig::default());
    println!("{}", serde_json::to_string_pretty(engine.portfolio())?);
    Ok(())
}

fn run_reset_command(state_path: PathBuf) -> Result<()> {
    let mut engine = SimulationEngine::new(JsonFileStore::new(&state_path), SimConfig::default());
    engine.reset()?;
    println!("{}", serde_json::to_string_pretty(engine.portfolio())?);
    Ok(())
}

fn print_report(report: &ScanReport) {
    let rule = "=".repeat(90);
    println!("{rule}");
    println!(" PAPERWOLF SCAN REPORT (hybrid consensus)");
    println!("{rule}");

    if report.decisions.is_empty() {
        println!("Market is efficient/noisy. No setups found.");
    } else {
        println!(
            "{:<10} | {:<20} | {:<6} | Rationale",
            "Ticker", "Action", "Conf"
        );
        println!("{}", "-".repeat(90));
        for decision in &report.decisions {
            println!(
                "{:<10} | {:<20} | {:<6.2} | {}",
                decision.ticker,
                decision.action.to_string(),
                decision.confidence,
                decision.rationale.join(" | ")
            );
        }
    }

    if !report.logs.is_empty() {
        println!("{}", "-".repeat(90));
        for line in &report.logs {
            println!("  {line}");
        }
    }

    let p = &report.portfolio;
    println!("{rule}");
    println!(
        "Portfolio: balance {:.2} | cash {:.2} | open {} | score {} | level {} | status {:?}",
        p.balance,
        p.cash,
        p.positions.len(),
        p.score,
        p.level,
        p.status
    );
    println!("{rule}");
}
