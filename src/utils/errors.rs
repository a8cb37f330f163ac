// src/utils/errors.rs
//! Error types for the event generator
//!
//! Every failure carries the phase it happened in, so a caller can tell a
//! sink that never opened apart from one that failed mid-write.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Generator errors
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// The output sink could not be created
    #[error("Failed to create sink: {0}")]
    CreateFailed(String),

    /// A record batch could not be written to the sink
    #[error("Failed to write records: {0}")]
    WriteFailed(String),

    /// Flushing, syncing or closing the sink failed
    #[error("Failed to finalize sink: {0}")]
    FinalizeFailed(String),

    /// A generated dataset could not be read back
    #[error("Failed to read dataset: {0}")]
    ReadFailed(String),

    /// Invalid or unloadable configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A distribution could not be constructed
    #[error("Sampling error: {0}")]
    SamplingError(String),
}

impl GeneratorError {
    /// Name of the phase that failed
    pub fn phase(&self) -> &'static str {
        match self {
            GeneratorError::CreateFailed(_) => "create",
            GeneratorError::WriteFailed(_) => "write",
            GeneratorError::FinalizeFailed(_) => "finalize",
            GeneratorError::ReadFailed(_) => "read",
            GeneratorError::ConfigError(_) => "config",
            GeneratorError::SamplingError(_) => "sampling",
        }
    }

    /// Whether the error came from the output sink
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            GeneratorError::CreateFailed(_)
                | GeneratorError::WriteFailed(_)
                | GeneratorError::FinalizeFailed(_)
        )
    }
}

impl From<config::ConfigError> for GeneratorError {
    fn from(err: config::ConfigError) -> Self {
        GeneratorError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names() {
        assert_eq!(GeneratorError::CreateFailed("x".into()).phase(), "create");
        assert_eq!(GeneratorError::WriteFailed("x".into()).phase(), "write");
        assert_eq!(GeneratorError::FinalizeFailed("x".into()).phase(), "finalize");
    }

    #[test]
    fn test_io_classification() {
        assert!(GeneratorError::WriteFailed("disk full".into()).is_io());
        assert!(!GeneratorError::ConfigError("bad".into()).is_io());
    }

    #[test]
    fn test_display_mentions_phase() {
        let err = GeneratorError::FinalizeFailed("sync error".to_string());
        assert_eq!(err.to_string(), "Failed to finalize sink: sync error");
    }
}
