use crate::core::convert::ConvertOptions;
use crate::core::tabular::{ParquetCompression, DEFAULT_ROW_GROUP_SIZE};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_distinct_paths, validate_path, validate_positive_number, Validate,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "jsonl-to-parquet")]
#[command(about = "Convert JSONLines file to Parquet format")]
pub struct ConvertConfig {
    /// Path to input JSONLines file
    pub input_file: PathBuf,

    /// Path to output Parquet file
    pub output_file: PathBuf,

    /// Compression codec for the Parquet column chunks
    #[arg(long, value_enum, default_value_t = ParquetCompression::Snappy)]
    pub compression: ParquetCompression,

    /// Maximum rows per Parquet row group
    #[arg(long, default_value_t = DEFAULT_ROW_GROUP_SIZE)]
    pub row_group_size: usize,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Log process CPU and memory usage")]
    pub monitor: bool,
}

impl ConvertConfig {
    pub fn to_options(&self) -> ConvertOptions {
        ConvertOptions {
            input: self.input_file.clone(),
            output: self.output_file.clone(),
            compression: self.compression,
            row_group_size: self.row_group_size,
        }
    }
}

impl Validate for ConvertConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input_file", self.input_file.as_path())?;
        validate_path("output_file", self.output_file.as_path())?;
        validate_distinct_paths(&[
            ("input_file", self.input_file.as_path()),
            ("output_file", self.output_file.as_path()),
        ])?;
        validate_positive_number("row_group_size", self.row_group_size, 1)?;
        Ok(())
    }
}
