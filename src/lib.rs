// src/lib.rs
//! Synthetic physics event generator
//!
//! Samples simulated detector events and streams them into a columnar
//! Parquet dataset with a fixed schema.
//!
//! # Architecture
//!
//! - **generation**: event record, field distributions, run driver
//! - **recording**: schema, Parquet sink, read-back
//! - **observability**: tracing setup and metric names
//! - **utils**: configuration and errors
//!
//! # Example
//!
//! ```no_run
//! let report = eventgen::generate(10_000, "tree.parquet")?;
//! assert_eq!(report.summary.records, 10_000);
//! # Ok::<(), eventgen::GeneratorError>(())
//! ```

// Public module exports
pub mod generation;
pub mod observability;
pub mod recording;
pub mod utils;

// Re-export commonly used types
pub use generation::{generate, DatasetSummary, Event, EventGenerator, GenerationReport, Position};
pub use recording::{EventReader, EventSink, ParquetSink};
pub use utils::config::GeneratorConfig;
pub use utils::errors::{GeneratorError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
