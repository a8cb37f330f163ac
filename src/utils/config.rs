// src/utils/config.rs
//! Generator configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `eventgen.toml` (or an explicit file), then `EVENTGEN__SECTION__KEY`
//! environment variables, then command-line overrides.

use crate::recording::compressor::CompressionLevel;
use crate::utils::errors::{GeneratorError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of events per run
pub const DEFAULT_N_EVENTS: u64 = 10_000;

/// Default output file
pub const DEFAULT_OUTPUT_PATH: &str = "tree.parquet";

/// Default table name recorded in the file metadata
pub const DEFAULT_TREE_NAME: &str = "Events";

const DEFAULT_BATCH_SIZE: usize = 8192;
const DEFAULT_ROW_GROUP_SIZE: usize = 1024 * 1024;
const ENV_PREFIX: &str = "EVENTGEN";
const DEFAULT_CONFIG_FILE: &str = "eventgen";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub generation: GenerationSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

/// What to generate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Number of events to generate
    pub n_events: u64,

    /// Fixed RNG seed; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Where and how to write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Output file, replaced if it exists
    pub path: PathBuf,

    /// Table name stored in the footer metadata
    pub tree_name: String,

    /// Column compression
    pub compression: CompressionLevel,

    /// Rows buffered before a batch is handed to the writer
    pub batch_size: usize,

    /// Maximum rows per Parquet row group
    pub row_group_size: usize,

    /// Write to a temporary file and rename on success
    pub atomic: bool,
}

/// Logging setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,

    /// `pretty` or `json`
    pub format: String,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub n_events: Option<u64>,
    pub output: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generation: GenerationSettings {
                n_events: DEFAULT_N_EVENTS,
                seed: None,
            },
            output: OutputSettings {
                path: PathBuf::from(DEFAULT_OUTPUT_PATH),
                tree_name: DEFAULT_TREE_NAME.to_string(),
                compression: CompressionLevel::default(),
                batch_size: DEFAULT_BATCH_SIZE,
                row_group_size: DEFAULT_ROW_GROUP_SIZE,
                atomic: true,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from the default file and environment
    pub fn load() -> Result<Self> {
        Self::load_with(None, &ConfigOverrides::default())
    }

    /// Load configuration, optionally from an explicit file, then apply overrides
    pub fn load_with(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let file_source = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = Config::builder()
            .set_default("generation.n_events", DEFAULT_N_EVENTS)?
            .set_default("output.path", DEFAULT_OUTPUT_PATH)?
            .set_default("output.tree_name", DEFAULT_TREE_NAME)?
            .set_default("output.compression", "balanced")?
            .set_default("output.batch_size", DEFAULT_BATCH_SIZE as u64)?
            .set_default("output.row_group_size", DEFAULT_ROW_GROUP_SIZE as u64)?
            .set_default("output.atomic", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(file_source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("generation.n_events", overrides.n_events)?
            .set_override_option(
                "output.path",
                overrides
                    .output
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option("generation.seed", overrides.seed)?
            .build()?;

        let loaded: GeneratorConfig = config.try_deserialize()?;
        loaded.validate()?;

        Ok(loaded)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.output.batch_size == 0 {
            return Err(GeneratorError::ConfigError(
                "output.batch_size must be greater than 0".to_string(),
            ));
        }

        if self.output.row_group_size == 0 {
            return Err(GeneratorError::ConfigError(
                "output.row_group_size must be greater than 0".to_string(),
            ));
        }

        if self.output.tree_name.trim().is_empty() {
            return Err(GeneratorError::ConfigError(
                "output.tree_name cannot be empty".to_string(),
            ));
        }

        if self.output.path.as_os_str().is_empty() {
            return Err(GeneratorError::ConfigError(
                "output.path cannot be empty".to_string(),
            ));
        }

        if i64::try_from(self.generation.n_events).is_err() {
            return Err(GeneratorError::ConfigError(format!(
                "generation.n_events cannot exceed {}",
                i64::MAX
            )));
        }

        Ok(())
    }

    /// Shorthand for a config writing `n_events` records to `path`
    pub fn for_output(n_events: u64, path: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.generation.n_events = n_events;
        config.output.path = path.into();
        config
    }
}
