//! Offline dataset preparation: JSONL to Parquet conversion, and projection of
//! JSONL question/answer records with an optional instance-limited subset.

#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{ConvertConfig, ProjectConfig};

pub use crate::core::{
    convert::{ConvertOptions, ConvertPipeline},
    etl::EtlEngine,
    project::{ProjectOptions, ProjectPipeline, SubsetOptions},
    tabular::ParquetCompression,
};
pub use crate::utils::error::{PrepError, Result};
