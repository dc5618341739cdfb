use std::path::PathBuf;

use serde_json::Value;

use crate::core::jsonl::{parse_record, JsonlLines, JsonlWriter};
use crate::domain::model::{LineIssue, ProjectionReport, QaRecord, INSTANCE_FIELD};
use crate::domain::ports::Pipeline;
use crate::utils::error::{PrepError, Result};
use crate::utils::monitor::SystemMonitor;
use crate::utils::validation::validate_input_file;

#[derive(Debug, Clone)]
pub struct SubsetOptions {
    pub path: PathBuf,
    /// Records with `instance < limit` go to the subset.
    pub limit: i64,
}

#[derive(Debug, Clone)]
pub struct ProjectOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub subset: Option<SubsetOptions>,
}

/// Outcome of projecting one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Projected {
    pub record: QaRecord,
    pub in_subset: bool,
}

/// Parses and projects one line. `limit` is set when a subset output is configured,
/// in which case the record must carry a numeric `instance`.
pub fn project_line(line_no: usize, text: &str, limit: Option<i64>) -> Result<Projected> {
    let record = parse_record(line_no, text)?;
    let qa = QaRecord::project(&record);

    let in_subset = match limit {
        Some(limit) => {
            let instance = record
                .get(INSTANCE_FIELD)
                .ok_or_else(|| PrepError::MissingKey {
                    line: line_no,
                    key: INSTANCE_FIELD.to_string(),
                })?;
            instance_below(line_no, instance, limit)?
        }
        None => false,
    };

    Ok(Projected {
        record: qa,
        in_subset,
    })
}

fn instance_below(line_no: usize, instance: &Value, limit: i64) -> Result<bool> {
    let invalid = || PrepError::InvalidFieldType {
        line: line_no,
        key: INSTANCE_FIELD.to_string(),
        expected: "a number".to_string(),
    };
    let Value::Number(n) = instance else {
        return Err(invalid());
    };
    if let Some(i) = n.as_i64() {
        Ok(i < limit)
    } else if n.is_u64() {
        // 大於 i64::MAX，一定不小於 limit
        Ok(false)
    } else {
        n.as_f64().map(|f| f < limit as f64).ok_or_else(invalid)
    }
}

/// Streams the input once, writing every projected record to the full output and
/// the qualifying ones to the subset output. Bad lines are recorded and skipped.
pub fn process_jsonl(options: &ProjectOptions) -> Result<ProjectionReport> {
    validate_input_file(&options.input)?;

    let lines = JsonlLines::open(&options.input)?;
    let mut full = JsonlWriter::create(&options.output)?;
    let mut subset = match &options.subset {
        Some(subset) => Some(JsonlWriter::create(&subset.path)?),
        None => None,
    };
    let limit = options.subset.as_ref().map(|s| s.limit);

    let mut report = ProjectionReport::default();
    for item in lines {
        let (line_no, text) = item?;
        report.lines_read += 1;

        match project_line(line_no, &text, limit) {
            Ok(projected) => {
                if projected.in_subset {
                    if let Some(writer) = subset.as_mut() {
                        writer.write_record(&projected.record)?;
                    }
                }
                full.write_record(&projected.record)?;
            }
            Err(e) if e.is_line_local() => {
                tracing::warn!("⚠️ Skipping line {}: {}", line_no, e);
                report.issues.push(LineIssue {
                    line: line_no,
                    error: e,
                });
            }
            Err(e) => return Err(e),
        }
    }

    report.full_records = full.written();
    full.finish()?;
    if let Some(writer) = subset {
        report.subset_records = writer.written();
        writer.finish()?;
    }

    Ok(report)
}

pub struct ProjectPipeline {
    options: ProjectOptions,
}

impl ProjectPipeline {
    pub fn new(options: ProjectOptions) -> Self {
        Self { options }
    }
}

impl Pipeline for ProjectPipeline {
    type Summary = ProjectionReport;

    fn name(&self) -> &str {
        "keep-qa-fields"
    }

    fn run(&self, monitor: &SystemMonitor) -> Result<ProjectionReport> {
        tracing::debug!(
            "Projecting {} -> {} (subset: {:?})",
            self.options.input.display(),
            self.options.output.display(),
            self.options.subset
        );
        let report = process_jsonl(&self.options)?;
        tracing::info!(
            "Processed {} lines: {} written, {} in subset, {} skipped",
            report.lines_read,
            report.full_records,
            report.subset_records,
            report.skipped()
        );
        monitor.log_stats("Project");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_line_subset_membership() {
        let line = r#"{"question":"Q1","answer":"A1","instance":4}"#;
        assert!(project_line(1, line, Some(5)).unwrap().in_subset);
        assert!(!project_line(1, line, Some(4)).unwrap().in_subset);
        assert!(!project_line(1, line, None).unwrap().in_subset);
    }

    #[test]
    fn test_missing_instance_only_matters_with_subset() {
        let line = r#"{"question":"Q","answer":"A"}"#;
        let projected = project_line(3, line, None).unwrap();
        assert_eq!(projected.record.question, json!("Q"));

        match project_line(3, line, Some(5)) {
            Err(PrepError::MissingKey { line, key }) => {
                assert_eq!(line, 3);
                assert_eq!(key, "instance");
            }
            other => panic!("expected MissingKey, got {:?}", other),
        }
    }

    #[test]
    fn test_instance_number_forms() {
        assert!(instance_below(1, &json!(2.5), 3).unwrap());
        assert!(!instance_below(1, &json!(3.0), 3).unwrap());
        assert!(!instance_below(1, &json!(u64::MAX), i64::MAX).unwrap());
        assert!(instance_below(1, &json!(-1), 0).unwrap());
        assert!(matches!(
            instance_below(9, &json!("1"), 5),
            Err(PrepError::InvalidFieldType { line: 9, .. })
        ));
    }
}
