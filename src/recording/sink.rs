// src/recording/sink.rs
//! Output sinks for generated events
//!
//! A sink is created with its schema already defined, accepts events one at
//! a time, and is consumed by `finalize`, so nothing can be appended after
//! the file is closed.
//!
//! `ParquetSink` buffers up to `batch_size` rows in Arrow column builders and
//! hands each full batch to the Parquet writer. In atomic mode the file is
//! staged next to the destination and renamed over it only once the footer
//! is written and synced.

use crate::generation::event::Event;
use crate::observability::{BATCHES_FLUSHED, BATCH_FLUSH_SECONDS, RECORDS_WRITTEN};
use crate::recording::compressor::CompressionLevel;
use crate::recording::schema::event_schema;
use crate::utils::config::OutputSettings;
use crate::utils::errors::{GeneratorError, Result};
use arrow::array::{ArrayRef, Float32Builder, Int32Builder, Int64Builder};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Destination for generated events
pub trait EventSink {
    /// What the sink hands back once closed
    type Output;

    /// Append one event
    fn append(&mut self, event: &Event) -> Result<()>;

    /// Flush everything and close the sink
    fn finalize(self) -> Result<Self::Output>;

    /// Events accepted so far
    fn records_written(&self) -> u64;
}

/// Parquet sink configuration
#[derive(Debug, Clone)]
pub struct SinkOptions {
    pub compression: CompressionLevel,
    pub batch_size: usize,
    pub row_group_size: usize,
    pub atomic: bool,

    /// Key/value pairs stored in the file footer
    pub metadata: Vec<(String, String)>,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            compression: CompressionLevel::default(),
            batch_size: 8192,
            row_group_size: 1024 * 1024,
            atomic: true,
            metadata: Vec::new(),
        }
    }
}

impl SinkOptions {
    pub fn from_settings(output: &OutputSettings) -> Self {
        Self {
            compression: output.compression,
            batch_size: output.batch_size,
            row_group_size: output.row_group_size,
            atomic: output.atomic,
            metadata: Vec::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }
}

/// Result of a finalized file sink
#[derive(Debug, Clone, Serialize)]
pub struct SinkReport {
    pub path: PathBuf,
    pub records_written: u64,
    pub batches_written: u64,
    pub bytes_written: u64,
    pub elapsed: Duration,
}

/// Column builders for one pending batch
struct ColumnBuffers {
    x: Float32Builder,
    y: Float32Builder,
    z: Float32Builder,
    energy: Float32Builder,
    event_id: Int64Builder,
    event_type: Int32Builder,
    len: usize,
}

impl ColumnBuffers {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Float32Builder::with_capacity(capacity),
            y: Float32Builder::with_capacity(capacity),
            z: Float32Builder::with_capacity(capacity),
            energy: Float32Builder::with_capacity(capacity),
            event_id: Int64Builder::with_capacity(capacity),
            event_type: Int32Builder::with_capacity(capacity),
            len: 0,
        }
    }

    fn push(&mut self, event: &Event) {
        self.x.append_value(event.position.x);
        self.y.append_value(event.position.y);
        self.z.append_value(event.position.z);
        self.energy.append_value(event.energy);
        self.event_id.append_value(event.event_id);
        self.event_type.append_value(event.event_type);
        self.len += 1;
    }

    /// Drain the builders into arrays in schema order
    fn finish(&mut self) -> Vec<ArrayRef> {
        self.len = 0;
        vec![
            Arc::new(self.x.finish()),
            Arc::new(self.y.finish()),
            Arc::new(self.z.finish()),
            Arc::new(self.energy.finish()),
            Arc::new(self.event_id.finish()),
            Arc::new(self.event_type.finish()),
        ]
    }
}

/// Parquet file sink
pub struct ParquetSink {
    path: PathBuf,
    schema: SchemaRef,
    writer: ArrowWriter<File>,
    sync_handle: File,
    staged: Option<NamedTempFile>,
    columns: ColumnBuffers,
    batch_size: usize,
    records_written: u64,
    batches_written: u64,
    started: Instant,
}

impl ParquetSink {
    /// Create the output file and define the event schema
    ///
    /// An existing file at `path` is replaced.
    pub fn create<P: AsRef<Path>>(path: P, options: SinkOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if options.batch_size == 0 {
            return Err(GeneratorError::ConfigError(
                "batch_size must be greater than 0".to_string(),
            ));
        }

        // The staged file can only be renamed over a regular file or nothing
        if let Ok(meta) = fs::symlink_metadata(&path) {
            if meta.is_dir() {
                return Err(GeneratorError::CreateFailed(format!(
                    "{} is a directory",
                    path.display()
                )));
            }
        }

        let (file, staged) = if options.atomic {
            let temp = stage_file(&path)?;
            let file = temp.as_file().try_clone().map_err(|e| {
                GeneratorError::CreateFailed(format!("Failed to clone staged file handle: {}", e))
            })?;
            (file, Some(temp))
        } else {
            let file = File::create(&path).map_err(|e| {
                GeneratorError::CreateFailed(format!("Failed to create {}: {}", path.display(), e))
            })?;
            (file, None)
        };

        let sync_handle = file.try_clone().map_err(|e| {
            GeneratorError::CreateFailed(format!("Failed to clone file handle: {}", e))
        })?;

        let key_value_metadata = options
            .metadata
            .iter()
            .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
            .collect::<Vec<_>>();

        let props = WriterProperties::builder()
            .set_compression(options.compression.codec()?)
            .set_max_row_group_size(options.row_group_size)
            .set_key_value_metadata(Some(key_value_metadata))
            .build();

        let schema = event_schema();
        let writer = ArrowWriter::try_new(file, Arc::clone(&schema), Some(props)).map_err(|e| {
            GeneratorError::CreateFailed(format!("Failed to start Parquet writer: {}", e))
        })?;

        info!(
            "Opened {} (atomic: {}, compression: {})",
            path.display(),
            options.atomic,
            options.compression.as_str()
        );

        Ok(Self {
            path,
            schema,
            writer,
            sync_handle,
            staged,
            columns: ColumnBuffers::with_capacity(options.batch_size),
            batch_size: options.batch_size,
            records_written: 0,
            batches_written: 0,
            started: Instant::now(),
        })
    }

    /// Destination path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hand the pending rows to the Parquet writer
    fn flush_batch(&mut self) -> Result<()> {
        if self.columns.len == 0 {
            return Ok(());
        }

        let rows = self.columns.len;
        let start = Instant::now();

        let batch = RecordBatch::try_new(Arc::clone(&self.schema), self.columns.finish())
            .map_err(|e| GeneratorError::WriteFailed(format!("Failed to assemble batch: {}", e)))?;

        self.writer
            .write(&batch)
            .map_err(|e| GeneratorError::WriteFailed(format!("Failed to write batch: {}", e)))?;

        self.batches_written += 1;

        let elapsed = start.elapsed();
        metrics::counter!(BATCHES_FLUSHED).increment(1);
        metrics::counter!(RECORDS_WRITTEN).increment(rows as u64);
        metrics::histogram!(BATCH_FLUSH_SECONDS).record(elapsed.as_secs_f64());

        debug!("Flushed batch of {} events in {:?}", rows, elapsed);

        Ok(())
    }
}

impl EventSink for ParquetSink {
    type Output = SinkReport;

    fn append(&mut self, event: &Event) -> Result<()> {
        self.columns.push(event);
        self.records_written += 1;

        if self.columns.len >= self.batch_size {
            self.flush_batch()?;
        }

        Ok(())
    }

    fn finalize(mut self) -> Result<SinkReport> {
        self.flush_batch()?;

        let ParquetSink {
            path,
            writer,
            sync_handle,
            staged,
            records_written,
            batches_written,
            started,
            ..
        } = self;

        writer.close().map_err(|e| {
            GeneratorError::FinalizeFailed(format!("Failed to write Parquet footer: {}", e))
        })?;

        sync_handle.sync_all().map_err(|e| {
            GeneratorError::FinalizeFailed(format!("Failed to sync {}: {}", path.display(), e))
        })?;
        drop(sync_handle);

        if let Some(temp) = staged {
            temp.persist(&path).map_err(|e| {
                GeneratorError::FinalizeFailed(format!(
                    "Failed to move staged file into {}: {}",
                    path.display(),
                    e.error
                ))
            })?;
        }

        let bytes_written = match fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!("Could not stat {}: {}", path.display(), e);
                0
            }
        };

        let report = SinkReport {
            path,
            records_written,
            batches_written,
            bytes_written,
            elapsed: started.elapsed(),
        };

        info!(
            "Closed {} ({} events, {} batches, {} bytes)",
            report.path.display(),
            report.records_written,
            report.batches_written,
            report.bytes_written
        );

        Ok(report)
    }

    fn records_written(&self) -> u64 {
        self.records_written
    }
}

/// Create a temporary file beside `dest` so the final rename stays on one filesystem
fn stage_file(dest: &Path) -> Result<NamedTempFile> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp = tempfile::Builder::new()
        .prefix(".eventgen-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| {
            GeneratorError::CreateFailed(format!(
                "Failed to stage output in {}: {}",
                dir.display(),
                e
            ))
        })?;

    // tempfile creates 0600; match what File::create would give
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o644)) {
            warn!("Could not relax permissions on staged file: {}", e);
        }
    }

    Ok(temp)
}

/// In-memory sink collecting events
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Vec<Event>,
    fail_after: Option<u64>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects every append after the first `n`
    pub fn failing_after(n: u64) -> Self {
        Self {
            events: Vec::new(),
            fail_after: Some(n),
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

impl EventSink for MemorySink {
    type Output = Vec<Event>;

    fn append(&mut self, event: &Event) -> Result<()> {
        if let Some(limit) = self.fail_after {
            if self.events.len() as u64 >= limit {
                return Err(GeneratorError::WriteFailed(format!(
                    "memory sink rejected event {}",
                    event.event_id
                )));
            }
        }

        self.events.push(*event);
        Ok(())
    }

    fn finalize(self) -> Result<Vec<Event>> {
        Ok(self.events)
    }

    fn records_written(&self) -> u64 {
        self.events.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::event::Position;
    use crate::recording::reader::EventReader;
    use tempfile::tempdir;

    fn test_event(event_id: i64) -> Event {
        Event {
            event_id,
            event_type: (event_id % 6) as i32,
            energy: event_id as f32 * 1.5,
            position: Position::new(1.0, -2.0, 3.0),
        }
    }

    fn small_batches() -> SinkOptions {
        SinkOptions {
            batch_size: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_sink_creation() {
        let dir = tempdir().unwrap();
        let sink = ParquetSink::create(dir.path().join("events.parquet"), SinkOptions::default());
        assert!(sink.is_ok());
    }

    #[test]
    fn test_batches_flush_at_batch_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.parquet");
        let mut sink = ParquetSink::create(&path, small_batches()).unwrap();

        for id in 0..10 {
            sink.append(&test_event(id)).unwrap();
        }
        assert_eq!(sink.records_written(), 10);

        let report = sink.finalize().unwrap();
        assert_eq!(report.records_written, 10);
        assert_eq!(report.batches_written, 3);
        assert!(report.bytes_written > 0);

        let events = EventReader::open(&path).unwrap().read_all().unwrap();
        assert_eq!(events, (0..10).map(test_event).collect::<Vec<_>>());
    }

    #[test]
    fn test_staged_file_invisible_until_finalize() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.parquet");
        let mut sink = ParquetSink::create(&path, small_batches()).unwrap();
        sink.append(&test_event(0)).unwrap();

        assert!(!path.exists());
        sink.finalize().unwrap();
        assert!(path.exists());

        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_dropped_sink_keeps_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.parquet");
        fs::write(&path, b"previous contents").unwrap();

        {
            let mut sink = ParquetSink::create(&path, small_batches()).unwrap();
            sink.append(&test_event(0)).unwrap();
        }

        assert_eq!(fs::read(&path).unwrap(), b"previous contents");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_direct_mode_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.parquet");
        fs::write(&path, vec![0u8; 1 << 16]).unwrap();

        let options = SinkOptions {
            atomic: false,
            ..Default::default()
        };
        let mut sink = ParquetSink::create(&path, options).unwrap();
        sink.append(&test_event(0)).unwrap();
        sink.finalize().unwrap();

        assert_eq!(EventReader::open(&path).unwrap().num_rows(), 1);
    }

    #[test]
    fn test_missing_directory_fails_on_create() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("events.parquet");

        for atomic in [true, false] {
            let options = SinkOptions {
                atomic,
                ..Default::default()
            };
            let result = ParquetSink::create(&path, options);
            assert!(matches!(result, Err(GeneratorError::CreateFailed(_))));
        }
    }

    #[test]
    fn test_directory_destination_fails_on_create() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.parquet");
        fs::create_dir(&path).unwrap();

        for atomic in [true, false] {
            let options = SinkOptions {
                atomic,
                ..Default::default()
            };
            let err = ParquetSink::create(&path, options).err().unwrap();
            assert_eq!(err.phase(), "create");
        }

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_rename_reports_finalize() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.parquet");
        let mut sink = ParquetSink::create(&path, small_batches()).unwrap();
        for id in 0..10 {
            sink.append(&test_event(id)).unwrap();
        }

        // Destination becomes unrenameable after the sink was opened
        fs::create_dir(&path).unwrap();

        let err = sink.finalize().err().unwrap();
        assert!(matches!(err, GeneratorError::FinalizeFailed(_)));
        assert_eq!(err.phase(), "finalize");

        assert!(path.is_dir());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let dir = tempdir().unwrap();
        let options = SinkOptions {
            batch_size: 0,
            ..Default::default()
        };
        let result = ParquetSink::create(dir.path().join("events.parquet"), options);
        assert!(matches!(result, Err(GeneratorError::ConfigError(_))));
    }

    #[test]
    fn test_metadata_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.parquet");
        let options = SinkOptions::default().with_metadata("eventgen.tree_name", "Events");

        ParquetSink::create(&path, options).unwrap().finalize().unwrap();

        let reader = EventReader::open(&path).unwrap();
        assert_eq!(reader.metadata_value("eventgen.tree_name"), Some("Events"));
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.append(&test_event(0)).unwrap();
        sink.append(&test_event(1)).unwrap();
        assert_eq!(sink.records_written(), 2);
        assert_eq!(sink.events().len(), 2);

        let events = sink.finalize().unwrap();
        assert_eq!(events[1].event_id, 1);
    }

    #[test]
    fn test_memory_sink_failure() {
        let mut sink = MemorySink::failing_after(1);
        assert!(sink.append(&test_event(0)).is_ok());
        assert!(matches!(
            sink.append(&test_event(1)),
            Err(GeneratorError::WriteFailed(_))
        ));
    }
}
