//! In-memory table built from JSON records, and its Parquet encoding.
//!
//! Column types are inferred from every value seen for a key:
//! - booleans only: `Boolean`
//! - integers that fit i64: `Int64`
//! - numbers with at least one non-i64: `Float64`
//! - everything else (strings, nested values, mixed kinds, all-null): `Utf8`,
//!   where non-string values are stored as compact JSON text.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, StringArray,
};
use arrow::datatypes::{DataType, Field, Float64Type, Int64Type, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use serde_json::Value;

use crate::domain::model::{ColumnSummary, Record};
use crate::utils::error::{PrepError, Result};

pub const DEFAULT_ROW_GROUP_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ParquetCompression {
    #[default]
    Snappy,
    Zstd,
    Gzip,
    None,
}

impl From<ParquetCompression> for Compression {
    fn from(value: ParquetCompression) -> Self {
        match value {
            ParquetCompression::Snappy => Compression::SNAPPY,
            ParquetCompression::Zstd => Compression::ZSTD(ZstdLevel::default()),
            ParquetCompression::Gzip => Compression::GZIP(GzipLevel::default()),
            ParquetCompression::None => Compression::UNCOMPRESSED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Only nulls so far.
    Null,
    Boolean,
    Int64,
    Float64,
    Utf8,
}

impl ColumnKind {
    /// Widens the kind to also admit `value`.
    pub fn observe(self, value: &Value) -> Self {
        use ColumnKind::*;
        match value {
            Value::Null => self,
            Value::Bool(_) => match self {
                Null | Boolean => Boolean,
                _ => Utf8,
            },
            Value::Number(n) if n.is_i64() => match self {
                Null | Int64 => Int64,
                Float64 => Float64,
                _ => Utf8,
            },
            Value::Number(_) => match self {
                Null | Int64 | Float64 => Float64,
                _ => Utf8,
            },
            Value::String(_) | Value::Array(_) | Value::Object(_) => Utf8,
        }
    }

    pub fn data_type(self) -> DataType {
        match self {
            ColumnKind::Boolean => DataType::Boolean,
            ColumnKind::Int64 => DataType::Int64,
            ColumnKind::Float64 => DataType::Float64,
            ColumnKind::Null | ColumnKind::Utf8 => DataType::Utf8,
        }
    }
}

/// Rows in input order, columns in first-seen key order.
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: Vec<String>,
    kinds: Vec<ColumnKind>,
    index: HashMap<String, usize>,
    rows: Vec<Record>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        for (key, value) in &record {
            let idx = match self.index.get(key) {
                Some(idx) => *idx,
                None => {
                    self.columns.push(key.clone());
                    self.kinds.push(ColumnKind::Null);
                    self.index.insert(key.clone(), self.columns.len() - 1);
                    self.columns.len() - 1
                }
            };
            self.kinds[idx] = self.kinds[idx].observe(value);
        }
        self.rows.push(record);
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn kind(&self, column: &str) -> Option<ColumnKind> {
        self.index.get(column).map(|idx| self.kinds[*idx])
    }

    pub fn schema(&self) -> Arc<Schema> {
        Arc::new(Schema::new(
            self.columns
                .iter()
                .zip(&self.kinds)
                .map(|(name, kind)| Field::new(name, kind.data_type(), true))
                .collect::<Vec<_>>(),
        ))
    }

    pub fn column_summaries(&self) -> Vec<ColumnSummary> {
        self.columns
            .iter()
            .zip(&self.kinds)
            .map(|(name, kind)| ColumnSummary {
                name: name.clone(),
                data_type: kind.data_type().to_string(),
            })
            .collect()
    }

    fn build_column(&self, name: &str, kind: ColumnKind) -> ArrayRef {
        let cells = self.rows.iter().map(|row| row.get(name));
        match kind {
            ColumnKind::Boolean => Arc::new(BooleanArray::from(
                cells.map(|v| v.and_then(Value::as_bool)).collect::<Vec<_>>(),
            )),
            ColumnKind::Int64 => Arc::new(Int64Array::from(
                cells.map(|v| v.and_then(Value::as_i64)).collect::<Vec<_>>(),
            )),
            ColumnKind::Float64 => Arc::new(Float64Array::from(
                cells.map(|v| v.and_then(Value::as_f64)).collect::<Vec<_>>(),
            )),
            ColumnKind::Null | ColumnKind::Utf8 => Arc::new(StringArray::from(
                cells.map(|v| v.and_then(utf8_cell)).collect::<Vec<_>>(),
            )),
        }
    }

    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let arrays = self
            .columns
            .iter()
            .zip(&self.kinds)
            .map(|(name, kind)| self.build_column(name, *kind))
            .collect::<Vec<_>>();
        let options = RecordBatchOptions::new().with_row_count(Some(self.rows.len()));
        Ok(RecordBatch::try_new_with_options(
            self.schema(),
            arrays,
            &options,
        )?)
    }

    /// Encodes the whole table as a Parquet file image. A table without columns
    /// has no valid Parquet schema and is rejected.
    pub fn to_parquet_bytes(
        &self,
        compression: ParquetCompression,
        row_group_size: usize,
    ) -> Result<Vec<u8>> {
        if self.columns.is_empty() {
            return Err(PrepError::NoColumns {
                rows: self.rows.len(),
            });
        }
        let batch = self.to_record_batch()?;
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let props = writer_properties(compression, row_group_size);
        let mut writer = ArrowWriter::try_new(&mut cursor, batch.schema(), Some(props))?;
        if batch.num_rows() > 0 {
            writer.write(&batch)?;
        }
        writer.close()?;
        Ok(cursor.into_inner())
    }
}

fn utf8_cell(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn writer_properties(compression: ParquetCompression, row_group_size: usize) -> WriterProperties {
    let created_by = KeyValue {
        key: "created_by".to_string(),
        value: Some(env!("CARGO_PKG_NAME").to_string()),
    };
    WriterProperties::builder()
        .set_compression(compression.into())
        .set_max_row_group_size(row_group_size)
        .set_key_value_metadata(Some(vec![created_by]))
        .build()
}

/// Writes a file image to `path` in one call, creating parent directories.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// Reads a Parquet file back into records. Null cells come back as JSON `null`.
pub fn read_parquet_records(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut out = Vec::new();
    for batch in reader {
        let batch = batch?;
        let schema = batch.schema();
        for row in 0..batch.num_rows() {
            let mut record = Record::new();
            for (field, column) in schema.fields().iter().zip(batch.columns()) {
                record.insert(field.name().clone(), cell_to_json(column.as_ref(), row)?);
            }
            out.push(record);
        }
    }
    Ok(out)
}

fn cell_to_json(column: &dyn Array, row: usize) -> Result<Value> {
    if column.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match column.data_type() {
        DataType::Boolean => Value::Bool(column.as_boolean().value(row)),
        DataType::Int64 => Value::from(column.as_primitive::<Int64Type>().value(row)),
        DataType::Float64 => Value::from(column.as_primitive::<Float64Type>().value(row)),
        DataType::Utf8 => Value::String(column.as_string::<i32>().value(row).to_string()),
        other => {
            return Err(ArrowError::NotYetImplemented(format!(
                "reading {} columns back as JSON",
                other
            ))
            .into())
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_kind_widening() {
        use ColumnKind::*;
        assert_eq!(Null.observe(&json!(1)), Int64);
        assert_eq!(Int64.observe(&json!(1.5)), Float64);
        assert_eq!(Float64.observe(&json!(2)), Float64);
        assert_eq!(Boolean.observe(&json!(null)), Boolean);
        assert_eq!(Boolean.observe(&json!(1)), Utf8);
        assert_eq!(Int64.observe(&json!("x")), Utf8);
        assert_eq!(Null.observe(&json!({"a": 1})), Utf8);
        assert_eq!(Null.observe(&json!(u64::MAX)), Float64);
    }

    #[test]
    fn test_columns_follow_first_seen_order() {
        let mut table = TableBuilder::new();
        table.push(record(json!({"question": "Q1", "answer": "A1"})));
        table.push(record(json!({"instance": 3, "question": "Q2"})));
        assert_eq!(table.columns(), &["question", "answer", "instance"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.kind("instance"), Some(ColumnKind::Int64));
        assert_eq!(table.kind("missing"), None);
    }

    #[test]
    fn test_record_batch_fills_missing_with_nulls() {
        let mut table = TableBuilder::new();
        table.push(record(json!({"a": 1, "b": "x"})));
        table.push(record(json!({"a": 2})));
        table.push(record(json!({"b": "z", "c": [1, 2]})));

        let batch = table.to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 3);
        assert_eq!(batch.num_columns(), 3);

        let a = batch.column(0).as_primitive::<Int64Type>();
        assert!(a.is_null(2));
        assert_eq!(a.value(1), 2);

        let b = batch.column(1).as_string::<i32>();
        assert!(b.is_null(1));

        let c = batch.column(2).as_string::<i32>();
        assert_eq!(c.value(2), "[1,2]");
    }

    #[test]
    fn test_all_null_column_is_utf8() {
        let mut table = TableBuilder::new();
        table.push(record(json!({"note": null})));
        let schema = table.schema();
        assert_eq!(schema.field(0).data_type(), &DataType::Utf8);
        assert!(schema.field(0).is_nullable());
    }

    #[test]
    fn test_table_without_columns_is_rejected() {
        let empty = TableBuilder::new();
        assert!(matches!(
            empty.to_parquet_bytes(ParquetCompression::Snappy, 16),
            Err(PrepError::NoColumns { rows: 0 })
        ));

        let mut blank_rows = TableBuilder::new();
        blank_rows.push(Record::new());
        blank_rows.push(Record::new());
        assert!(matches!(
            blank_rows.to_parquet_bytes(ParquetCompression::Snappy, 16),
            Err(PrepError::NoColumns { rows: 2 })
        ));
    }

    #[test]
    fn test_parquet_bytes_have_magic() {
        let mut table = TableBuilder::new();
        table.push(record(json!({"a": true})));
        for compression in [
            ParquetCompression::Snappy,
            ParquetCompression::Zstd,
            ParquetCompression::Gzip,
            ParquetCompression::None,
        ] {
            let bytes = table.to_parquet_bytes(compression, 16).unwrap();
            assert_eq!(&bytes[..4], b"PAR1");
            assert_eq!(&bytes[bytes.len() - 4..], b"PAR1");
        }
    }
}
