// src/recording/mod.rs
//! Event storage
//!
//! - **Schema**: the fixed six-column layout
//! - **Compressor**: zstd level selection for column chunks
//! - **Sink**: batched Parquet writer with atomic replace
//! - **Reader**: schema-checked read-back of a generated file
//!
//! # Architecture
//!
//! ```text
//! append(event) → Column builders → RecordBatch (batch_size rows)
//!                                          ↓
//!                                    ArrowWriter (row groups, zstd)
//!                                          ↓
//!                          staged temp file → fsync → rename
//! ```

pub mod compressor;
pub mod reader;
pub mod schema;
pub mod sink;

// Re-export commonly used types
pub use compressor::CompressionLevel;
pub use reader::EventReader;
pub use schema::event_schema;
pub use sink::{EventSink, MemorySink, ParquetSink, SinkOptions, SinkReport};
