use std::path::PathBuf;

use crate::core::jsonl::{parse_record, JsonlLines};
use crate::core::tabular::{write_file, ParquetCompression, TableBuilder, DEFAULT_ROW_GROUP_SIZE};
use crate::domain::model::ConversionSummary;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub compression: ParquetCompression,
    pub row_group_size: usize,
}

impl ConvertOptions {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            compression: ParquetCompression::default(),
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }
}

/// Reads the whole input into a table. Any bad line aborts the run.
pub fn load_table(options: &ConvertOptions) -> Result<TableBuilder> {
    let mut table = TableBuilder::new();
    for item in JsonlLines::open(&options.input)? {
        let (line_no, text) = item?;
        table.push(parse_record(line_no, &text)?);
    }
    Ok(table)
}

/// JSONL to Parquet. The destination is written once, after the whole input parsed.
pub struct ConvertPipeline {
    options: ConvertOptions,
}

impl ConvertPipeline {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }
}

impl Pipeline for ConvertPipeline {
    type Summary = ConversionSummary;

    fn name(&self) -> &str {
        "jsonl-to-parquet"
    }

    fn run(&self, monitor: &SystemMonitor) -> Result<ConversionSummary> {
        let options = &self.options;

        tracing::debug!("Reading records from {}", options.input.display());
        let table = load_table(options)?;
        tracing::info!(
            "Read {} records with {} columns",
            table.num_rows(),
            table.columns().len()
        );
        monitor.log_stats("Read");

        let bytes = table.to_parquet_bytes(options.compression, options.row_group_size)?;
        tracing::debug!(
            "Encoded {} bytes ({:?} compression)",
            bytes.len(),
            options.compression
        );
        monitor.log_stats("Encode");

        write_file(&options.output, &bytes)?;
        tracing::debug!("Parquet file written to {}", options.output.display());

        Ok(ConversionSummary {
            output_path: options.output.clone(),
            rows: table.num_rows(),
            columns: table.column_summaries(),
            bytes_written: bytes.len(),
        })
    }
}
