// src/utils/mod.rs
//! Configuration and error handling shared across the crate

pub mod config;
pub mod errors;

pub use config::{ConfigOverrides, GeneratorConfig};
pub use errors::{GeneratorError, Result};
