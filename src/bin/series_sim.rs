//! series-sim - synthetic metric series generator
//!
//! Usage:
//!   series-sim generate --preset energy_consumption --points 48
//!   series-sim generate --config overrides.json --format table
//!   series-sim live --preset network_load --preset cpu --interval-secs 5 --ticks 10
//!   series-sim list

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use series_sim::simulation::feed::DEFAULT_TICK_PERIOD;
use series_sim::{
    LiveFeed, SeriesSimulator, SimulatedTimeSeriesData, SimulationOverrides, list_presets, preset,
    spawn_feed,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "series-sim")]
#[command(about = "Synthetic metric series with trend, seasonality and anomaly injection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one series and print it
    Generate {
        /// Preset to start from
        #[arg(short, long)]
        preset: Option<String>,

        /// Series name (defaults to the preset's name)
        #[arg(short, long)]
        name: Option<String>,

        /// Window length
        #[arg(long)]
        points: Option<usize>,

        /// JSON file with overrides (camelCase fields)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Advance series on a fixed period and stream snapshots as JSON lines
    Live {
        /// Presets to run (repeatable)
        #[arg(short, long, default_value = "energy_consumption")]
        preset: Vec<String>,

        /// Seconds between ticks (default 5)
        #[arg(short, long)]
        interval_secs: Option<u64>,

        /// Stop after this many ticks (runs until Ctrl-C otherwise)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List available presets
    List,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Json,
    JsonLines,
    Table,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            preset,
            name,
            points,
            config,
            seed,
            format,
        } => run_generate(preset, name, points, config, seed, format),
        Commands::Live {
            preset,
            interval_secs,
            ticks,
            seed,
        } => run_live(preset, interval_secs, ticks, seed).await,
        Commands::List => {
            run_list();
            Ok(())
        }
    }
}

fn simulator(seed: Option<u64>) -> anyhow::Result<SeriesSimulator> {
    match seed {
        Some(seed) => Ok(SeriesSimulator::seeded(seed)),
        None => Ok(SeriesSimulator::from_entropy()?),
    }
}

fn preset_overrides(name: &str) -> anyhow::Result<SimulationOverrides> {
    preset(name).ok_or_else(|| anyhow!("unknown preset '{name}' (see `series-sim list`)"))
}

fn run_generate(
    preset_name: Option<String>,
    name: Option<String>,
    points: Option<usize>,
    config: Option<PathBuf>,
    seed: Option<u64>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut overrides = match preset_name.as_deref() {
        Some(p) => preset_overrides(p)?,
        None => SimulationOverrides::default(),
    };

    if let Some(path) = config {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let from_file: SimulationOverrides = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", path.display()))?;
        overrides = overrides.merge(&from_file);
    }

    overrides = overrides.merge(&SimulationOverrides {
        point_count: points,
        ..Default::default()
    });

    let name = name
        .or_else(|| overrides.name.clone())
        .unwrap_or_else(|| "Series".to_string());

    let series = simulator(seed)?.create(&name, &overrides)?;
    info!(series = %series.name, points = series.len(), trend = ?series.trend, "Generated series.");

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&series)?),
        OutputFormat::JsonLines => {
            for point in &series.data {
                println!("{}", serde_json::to_string(point)?);
            }
        }
        OutputFormat::Table => print_table(&series),
    }
    Ok(())
}

fn print_table(series: &SimulatedTimeSeriesData) {
    println!("{} ({})", series.name, series.unit);
    println!(
        "{:<30} {:>12} {:>12} {:>9}",
        "timestamp", "value", "change", "change%"
    );
    for p in &series.data {
        println!(
            "{:<30} {:>12.3} {:>12.3} {:>8.2}%",
            p.timestamp.to_rfc3339(),
            p.value,
            p.change,
            p.change_percentage
        );
    }
    println!(
        "total {:.3} | avg {:.3} | min {:.3} | max {:.3} | trend {:?}",
        series.total, series.average, series.min, series.max, series.trend
    );
}

async fn run_live(
    presets: Vec<String>,
    interval_secs: Option<u64>,
    ticks: Option<u64>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let mut feed = LiveFeed::new(simulator(seed)?);
    for p in &presets {
        let overrides = preset_overrides(p)?;
        let name = overrides.name.clone().unwrap_or_else(|| p.clone());
        let id = feed.add(&name, &overrides)?;
        info!(preset = %p, id = %id, "Series added to feed.");
    }

    let cancel = CancellationToken::new();
    let period = interval_secs
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or(DEFAULT_TICK_PERIOD);
    let (handle, mut rx) = spawn_feed(feed, period, cancel.clone());

    let mut seen = 0u64;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                break;
            }
            snapshot = rx.recv() => {
                let Some(snapshot) = snapshot else { break };
                info!(tick = snapshot.tick, series = snapshot.series.len(), "Live tick.");
                println!("{}", serde_json::to_string(&snapshot)?);
                seen += 1;
                if ticks.is_some_and(|limit| seen >= limit) {
                    break;
                }
            }
        }
    }

    cancel.cancel();
    let feed = handle.await.context("live feed task panicked")?;
    info!(
        ticks = feed.stats().tick_count,
        points = feed.stats().points_generated,
        "Live feed finished."
    );
    Ok(())
}

fn run_list() {
    println!("Available presets:");
    for (name, description) in list_presets() {
        println!("  {:20} - {}", name, description);
    }
    println!("\nUsage: series-sim generate --preset <PRESET> [--points N]");
}
