// src/generation/generator.rs
//! Event generation run
//!
//! Opens the sink, samples `n_events` records in `event_id` order, appends
//! each one as soon as it is drawn, and finalizes the sink. Any error aborts
//! the run; an atomic sink leaves the previous output untouched.

use crate::generation::event::Event;
use crate::generation::sampler::EventSampler;
use crate::generation::stats::DatasetSummary;
use crate::recording::sink::{EventSink, ParquetSink, SinkOptions, SinkReport};
use crate::utils::config::GeneratorConfig;
use crate::utils::errors::{GeneratorError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

/// Footer metadata keys
pub const META_TREE_NAME: &str = "eventgen.tree_name";
pub const META_VERSION: &str = "eventgen.version";
pub const META_CREATED_AT: &str = "eventgen.created_at";
pub const META_SEED: &str = "eventgen.seed";

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub path: PathBuf,
    pub summary: DatasetSummary,
    pub sink: SinkReport,
}

/// Drives sampling into a sink according to a configuration
pub struct EventGenerator {
    config: GeneratorConfig,
    sampler: EventSampler,
}

impl EventGenerator {
    /// Create a generator, validating the configuration
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            sampler: EventSampler::new()?,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run with the configured seed, or OS entropy when none is set
    pub fn run(&self) -> Result<GenerationReport> {
        let mut rng = match self.config.generation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.run_with_rng(&mut rng)
    }

    /// Run with a caller-owned random source
    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GenerationReport> {
        let output = &self.config.output;
        let n_events = self.config.generation.n_events;

        info!(
            "Generating {} events into {}",
            n_events,
            output.path.display()
        );

        let (summary, sink_report) = ParquetSink::create(&output.path, self.sink_options())
            .and_then(|sink| self.write_events(sink, rng))
            .map_err(|e| {
                error!("Generation failed during {}: {}", e.phase(), e);
                e
            })?;

        info!(
            "Generated {} events in {:?} (mean energy {:.2})",
            summary.records,
            sink_report.elapsed,
            summary.energy_mean()
        );

        Ok(GenerationReport {
            path: output.path.clone(),
            summary,
            sink: sink_report,
        })
    }

    /// Sample `n_events` records into `sink` and finalize it
    pub fn write_events<S, R>(&self, mut sink: S, rng: &mut R) -> Result<(DatasetSummary, S::Output)>
    where
        S: EventSink,
        R: Rng + ?Sized,
    {
        let n_events = i64::try_from(self.config.generation.n_events).map_err(|_| {
            GeneratorError::ConfigError("generation.n_events exceeds i64 range".to_string())
        })?;

        let start = Instant::now();
        let mut summary = DatasetSummary::new();

        for event_id in 0..n_events {
            let event: Event = self.sampler.sample(event_id, rng);
            sink.append(&event)?;
            summary.observe(&event);
        }

        let output = sink.finalize()?;

        info!(
            "Wrote {} events in {:?}",
            summary.records,
            start.elapsed()
        );

        Ok((summary, output))
    }

    fn sink_options(&self) -> SinkOptions {
        let mut options = SinkOptions::from_settings(&self.config.output)
            .with_metadata(META_TREE_NAME, self.config.output.tree_name.clone())
            .with_metadata(META_VERSION, crate::VERSION)
            .with_metadata(META_CREATED_AT, chrono::Utc::now().to_rfc3339());

        if let Some(seed) = self.config.generation.seed {
            options = options.with_metadata(META_SEED, seed.to_string());
        }

        options
    }
}

/// Generate `n_events` events into `output_path` with default settings
///
/// Any existing file at `output_path` is replaced. The random source is
/// seeded from OS entropy, so two calls produce different data.
pub fn generate<P: AsRef<Path>>(n_events: u64, output_path: P) -> Result<GenerationReport> {
    let config = GeneratorConfig::for_output(n_events, output_path.as_ref());
    EventGenerator::new(config)?.run()
}
