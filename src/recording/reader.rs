// src/recording/reader.rs
//! Read generated datasets back from disk
//!
//! Used to audit a file after a run: the schema is checked on open, and the
//! events can be streamed, collected, or folded into a `DatasetSummary`.

use crate::generation::event::{Event, Position};
use crate::generation::stats::DatasetSummary;
use crate::recording::schema::{
    schema_mismatch, ENERGY, EVENT_ID, EVENT_TYPE, POSITION_X, POSITION_Y, POSITION_Z,
};
use crate::utils::errors::{GeneratorError, Result};
use arrow::array::{Array, Float32Array, Int32Array, Int64Array};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

const READ_BATCH_SIZE: usize = 8192;

/// Reader over a generated Parquet file
pub struct EventReader {
    path: PathBuf,
    builder: ParquetRecordBatchReaderBuilder<File>,
}

impl EventReader {
    /// Open a dataset and verify its schema
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = File::open(&path).map_err(|e| {
            GeneratorError::ReadFailed(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| {
            GeneratorError::ReadFailed(format!("{} is not a Parquet file: {}", path.display(), e))
        })?;

        if let Some(mismatch) = schema_mismatch(builder.schema()) {
            return Err(GeneratorError::ReadFailed(format!(
                "Unexpected schema in {}: {}",
                path.display(),
                mismatch
            )));
        }

        debug!("Opened {} for reading", path.display());

        Ok(Self { path, builder })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Row count from the file footer
    pub fn num_rows(&self) -> u64 {
        self.builder.metadata().file_metadata().num_rows().max(0) as u64
    }

    /// Look up one footer metadata entry
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.builder
            .metadata()
            .file_metadata()
            .key_value_metadata()?
            .iter()
            .find(|kv| kv.key == key)?
            .value
            .as_deref()
    }

    /// All footer metadata entries with a value
    pub fn metadata(&self) -> HashMap<String, String> {
        self.builder
            .metadata()
            .file_metadata()
            .key_value_metadata()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|kv| kv.value.clone().map(|v| (kv.key.clone(), v)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Stream every event in file order, returning how many were visited
    pub fn for_each<F>(self, mut visit: F) -> Result<u64>
    where
        F: FnMut(Event),
    {
        let reader = self
            .builder
            .with_batch_size(READ_BATCH_SIZE)
            .build()
            .map_err(|e| GeneratorError::ReadFailed(format!("Failed to start reader: {}", e)))?;

        let mut visited = 0u64;
        for batch in reader {
            let batch = batch
                .map_err(|e| GeneratorError::ReadFailed(format!("Failed to read batch: {}", e)))?;
            visited += visit_batch(&batch, &mut visit)?;
        }

        Ok(visited)
    }

    /// Collect every event into memory
    pub fn read_all(self) -> Result<Vec<Event>> {
        let mut events = Vec::with_capacity(self.num_rows() as usize);
        self.for_each(|event| events.push(event))?;
        Ok(events)
    }

    /// Recompute the dataset summary from disk
    pub fn summarize(self) -> Result<DatasetSummary> {
        let mut summary = DatasetSummary::new();
        self.for_each(|event| summary.observe(&event))?;
        Ok(summary)
    }
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<T>())
        .ok_or_else(|| GeneratorError::ReadFailed(format!("Column {} missing or mistyped", name)))
}

fn visit_batch<F>(batch: &RecordBatch, visit: &mut F) -> Result<u64>
where
    F: FnMut(Event),
{
    let x = column::<Float32Array>(batch, POSITION_X)?;
    let y = column::<Float32Array>(batch, POSITION_Y)?;
    let z = column::<Float32Array>(batch, POSITION_Z)?;
    let energy = column::<Float32Array>(batch, ENERGY)?;
    let event_id = column::<Int64Array>(batch, EVENT_ID)?;
    let event_type = column::<Int32Array>(batch, EVENT_TYPE)?;

    for row in 0..batch.num_rows() {
        visit(Event {
            event_id: event_id.value(row),
            event_type: event_type.value(row),
            energy: energy.value(row),
            position: Position::new(x.value(row), y.value(row), z.value(row)),
        });
    }

    Ok(batch.num_rows() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::StringArray;
    use arrow::datatypes::{DataType, Field, Schema};
    use parquet::arrow::ArrowWriter;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_file() {
        let result = EventReader::open("/nonexistent/events.parquet");
        assert!(matches!(result, Err(GeneratorError::ReadFailed(_))));
    }

    #[test]
    fn test_open_non_parquet_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.parquet");
        std::fs::write(&path, b"not parquet at all").unwrap();

        assert!(matches!(
            EventReader::open(&path),
            Err(GeneratorError::ReadFailed(_))
        ));
    }

    #[test]
    fn test_foreign_schema_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("other.parquet");

        let schema = Arc::new(Schema::new(vec![Field::new("name", DataType::Utf8, false)]));
        let batch = RecordBatch::try_new(
            Arc::clone(&schema),
            vec![Arc::new(StringArray::from(vec!["a", "b"]))],
        )
        .unwrap();

        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = EventReader::open(&path).err().unwrap();
        assert!(err.to_string().contains("Unexpected schema"));
    }
}
