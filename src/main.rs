// src/main.rs
//! Event generator CLI
//!
//! `eventgen [N_EVENTS]` writes `N_EVENTS` simulated events (default 10000)
//! to `tree.parquet`, replacing any existing file.

use anyhow::{Context, Result};
use clap::Parser;
use eventgen::observability::init_tracing;
use eventgen::utils::config::{ConfigOverrides, GeneratorConfig};
use eventgen::EventGenerator;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a synthetic physics event dataset")]
struct CliArgs {
    /// Number of events to generate
    n_events: Option<u64>,

    /// Output file, replaced if it exists
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Seed for a reproducible dataset
    #[arg(long)]
    seed: Option<u64>,

    /// Configuration file (defaults to ./eventgen.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let overrides = ConfigOverrides {
        n_events: args.n_events,
        output: args.output,
        seed: args.seed,
    };
    let config = GeneratorConfig::load_with(args.config.as_deref(), &overrides)
        .context("Failed to load configuration")?;

    init_tracing(&config.logging)?;

    info!("Starting eventgen v{}", eventgen::VERSION);

    let generator = EventGenerator::new(config)?;
    match generator.run() {
        Ok(report) => {
            info!(
                "Wrote {} events to {} ({} bytes)",
                report.summary.records,
                report.path.display(),
                report.sink.bytes_written
            );
            Ok(())
        }
        Err(e) => {
            error!("Generation failed in {} phase: {}", e.phase(), e);
            Err(e).with_context(|| {
                format!(
                    "Could not generate {}",
                    generator.config().output.path.display()
                )
            })
        }
    }
}
