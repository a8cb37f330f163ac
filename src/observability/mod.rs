// src/observability/mod.rs
//! Logging setup and metric names
//!
//! The sink reports through the `metrics` facade; without an installed
//! recorder those calls are no-ops.

use crate::utils::config::LoggingSettings;
use crate::utils::errors::{GeneratorError, Result};
use tracing_subscriber::EnvFilter;

/// Events handed to the Parquet writer
pub const RECORDS_WRITTEN: &str = "eventgen_records_written_total";

/// Column batches handed to the Parquet writer
pub const BATCHES_FLUSHED: &str = "eventgen_batches_flushed_total";

/// Time spent writing one batch
pub const BATCH_FLUSH_SECONDS: &str = "eventgen_batch_flush_seconds";

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` wins over `settings.level` when set.
pub fn init_tracing(settings: &LoggingSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| {
            GeneratorError::ConfigError(format!("Invalid log level {:?}: {}", settings.level, e))
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match settings.format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.try_init(),
        other => {
            return Err(GeneratorError::ConfigError(format!(
                "Unknown log format {:?} (expected \"pretty\" or \"json\")",
                other
            )))
        }
    };

    result.map_err(|e| GeneratorError::ConfigError(format!("Failed to install subscriber: {}", e)))
}
