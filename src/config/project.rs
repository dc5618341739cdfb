use crate::core::project::{ProjectOptions, SubsetOptions};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_distinct_paths, validate_path, validate_required_field, Validate,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "keep-qa-fields")]
#[command(about = "Process JSONL file to keep only question and answer fields")]
pub struct ProjectConfig {
    /// Path to input JSONL file
    #[arg(long = "input_file")]
    pub input_file: PathBuf,

    /// Path to output JSONL file
    #[arg(long = "output_file")]
    pub output_file: PathBuf,

    /// Path to output subset JSONL file
    #[arg(long = "subset_file")]
    pub subset_file: Option<PathBuf>,

    /// Keep records whose `instance` is below this value in the subset file
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Log process CPU and memory usage")]
    pub monitor: bool,
}

impl ProjectConfig {
    pub fn to_options(&self) -> Result<ProjectOptions> {
        let subset = match &self.subset_file {
            Some(path) => Some(SubsetOptions {
                path: path.clone(),
                limit: *validate_required_field("limit", &self.limit)?,
            }),
            None => None,
        };
        Ok(ProjectOptions {
            input: self.input_file.clone(),
            output: self.output_file.clone(),
            subset,
        })
    }
}

impl Validate for ProjectConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input_file", self.input_file.as_path())?;
        validate_path("output_file", self.output_file.as_path())?;

        match &self.subset_file {
            Some(subset) => {
                validate_path("subset_file", subset)?;
                validate_required_field("limit", &self.limit)?;
                validate_distinct_paths(&[
                    ("input_file", self.input_file.as_path()),
                    ("output_file", self.output_file.as_path()),
                    ("subset_file", subset.as_path()),
                ])?;
            }
            None => {
                if self.limit.is_some() {
                    tracing::warn!("--limit has no effect without --subset_file");
                }
                validate_distinct_paths(&[
                    ("input_file", self.input_file.as_path()),
                    ("output_file", self.output_file.as_path()),
                ])?;
            }
        }
        Ok(())
    }
}
