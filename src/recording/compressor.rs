// src/recording/compressor.rs
//! Column compression for generated datasets
//!
//! The Parquet writer compresses each column chunk with zstd; this module
//! maps the configured level onto the writer's codec.

use crate::utils::errors::{GeneratorError, Result};
use parquet::basic::{Compression, ZstdLevel};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Compression levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Uncompressed columns
    None,

    /// Fast compression (level 1)
    Fast,

    /// Balanced (level 3)
    #[default]
    Balanced,

    /// Best compression (level 19)
    Best,
}

impl CompressionLevel {
    /// zstd level, or `None` when uncompressed
    pub fn zstd_level(&self) -> Option<i32> {
        match self {
            CompressionLevel::None => None,
            CompressionLevel::Fast => Some(1),
            CompressionLevel::Balanced => Some(3),
            CompressionLevel::Best => Some(19),
        }
    }

    /// Parquet codec for this level
    pub fn codec(&self) -> Result<Compression> {
        let codec = match self.zstd_level() {
            None => Compression::UNCOMPRESSED,
            Some(level) => {
                let level = ZstdLevel::try_new(level).map_err(|e| {
                    GeneratorError::ConfigError(format!("Invalid zstd level {}: {}", level, e))
                })?;
                Compression::ZSTD(level)
            }
        };

        debug!("Using {:?} column compression", codec);

        Ok(codec)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionLevel::None => "none",
            CompressionLevel::Fast => "fast",
            CompressionLevel::Balanced => "balanced",
            CompressionLevel::Best => "best",
        }
    }
}
