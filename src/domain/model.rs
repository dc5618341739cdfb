use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::utils::error::PrepError;

/// One schema-less input row: field name to JSON value.
pub type Record = Map<String, Value>;

pub const QUESTION_FIELD: &str = "question";
pub const ANSWER_FIELD: &str = "answer";
pub const INSTANCE_FIELD: &str = "instance";

/// A record reduced to exactly `question` and `answer`, serialized in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaRecord {
    pub question: Value,
    pub answer: Value,
}

impl QaRecord {
    /// Missing fields default to an empty string.
    pub fn project(record: &Record) -> Self {
        let field = |name: &str| {
            record
                .get(name)
                .cloned()
                .unwrap_or_else(|| Value::String(String::new()))
        };
        Self {
            question: field(QUESTION_FIELD),
            answer: field(ANSWER_FIELD),
        }
    }
}

/// A line the projector skipped, with the reason.
#[derive(Debug)]
pub struct LineIssue {
    pub line: usize,
    pub error: PrepError,
}

#[derive(Debug, Default)]
pub struct ProjectionReport {
    pub lines_read: usize,
    pub full_records: usize,
    pub subset_records: usize,
    pub issues: Vec<LineIssue>,
}

impl ProjectionReport {
    pub fn skipped(&self) -> usize {
        self.issues.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub data_type: String,
}

#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub output_path: PathBuf,
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
    pub bytes_written: usize,
}
