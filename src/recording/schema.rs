// src/recording/schema.rs
//! Fixed column layout of a generated dataset

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use std::sync::Arc;

pub const POSITION_X: &str = "position.x";
pub const POSITION_Y: &str = "position.y";
pub const POSITION_Z: &str = "position.z";
pub const ENERGY: &str = "energy";
pub const EVENT_ID: &str = "event_id";
pub const EVENT_TYPE: &str = "event_type";

/// Column names in storage order
pub const FIELD_NAMES: [&str; 6] = [POSITION_X, POSITION_Y, POSITION_Z, ENERGY, EVENT_ID, EVENT_TYPE];

/// Build the event schema
pub fn event_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(POSITION_X, DataType::Float32, false),
        Field::new(POSITION_Y, DataType::Float32, false),
        Field::new(POSITION_Z, DataType::Float32, false),
        Field::new(ENERGY, DataType::Float32, false),
        Field::new(EVENT_ID, DataType::Int64, false),
        Field::new(EVENT_TYPE, DataType::Int32, false),
    ]))
}

/// Describe how `schema` differs from the event schema, if it does
///
/// Metadata is ignored; names, order, types and nullability must match.
pub fn schema_mismatch(schema: &Schema) -> Option<String> {
    let expected = event_schema();

    if schema.fields().len() != expected.fields().len() {
        return Some(format!(
            "expected {} columns, found {}",
            expected.fields().len(),
            schema.fields().len()
        ));
    }

    expected
        .fields()
        .iter()
        .zip(schema.fields().iter())
        .find(|(want, got)| {
            want.name() != got.name()
                || want.data_type() != got.data_type()
                || want.is_nullable() != got.is_nullable()
        })
        .map(|(want, got)| {
            format!(
                "expected column {} ({}), found {} ({})",
                want.name(),
                want.data_type(),
                got.name(),
                got.data_type()
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_layout() {
        let schema = event_schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, FIELD_NAMES);
        assert_eq!(schema.field_with_name(EVENT_ID).unwrap().data_type(), &DataType::Int64);
        assert_eq!(schema.field_with_name(ENERGY).unwrap().data_type(), &DataType::Float32);
    }

    #[test]
    fn test_matching_schema() {
        assert!(schema_mismatch(&event_schema()).is_none());
    }

    #[test]
    fn test_renamed_column_detected() {
        let schema = Schema::new(vec![
            Field::new("x", DataType::Float32, false),
            Field::new(POSITION_Y, DataType::Float32, false),
            Field::new(POSITION_Z, DataType::Float32, false),
            Field::new(ENERGY, DataType::Float32, false),
            Field::new(EVENT_ID, DataType::Int64, false),
            Field::new(EVENT_TYPE, DataType::Int32, false),
        ]);

        let mismatch = schema_mismatch(&schema).unwrap();
        assert!(mismatch.contains("position.x"));
    }

    #[test]
    fn test_missing_column_detected() {
        let schema = Schema::new(vec![Field::new(ENERGY, DataType::Float32, false)]);
        assert!(schema_mismatch(&schema).is_some());
    }
}
