use crate::utils::error::{PrepError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let raw = path.to_string_lossy();
    if raw.is_empty() {
        return Err(PrepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if raw.contains('\0') {
        return Err(PrepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Rejects an output that would truncate the input (or another output) before it is read.
pub fn validate_distinct_paths(paths: &[(&str, &Path)]) -> Result<()> {
    for (i, (field_a, a)) in paths.iter().enumerate() {
        for (field_b, b) in &paths[i + 1..] {
            if a == b {
                return Err(PrepError::InvalidConfigValueError {
                    field: field_b.to_string(),
                    value: b.display().to_string(),
                    reason: format!("must not be the same path as {}", field_a),
                });
            }
        }
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(PrepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| PrepError::MissingConfigError {
        field: field_name.to_string(),
    })
}

/// The input must already exist as a regular file.
pub fn validate_input_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(PrepError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input_file", Path::new("data/train.jsonl")).is_ok());
        assert!(validate_path("input_file", Path::new("")).is_err());
        assert!(validate_path("input_file", Path::new("bad\0name")).is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("row_group_size", 1024, 1).is_ok());
        assert!(validate_positive_number("row_group_size", 0, 1).is_err());
    }

    #[test]
    fn test_validate_distinct_paths() {
        let input = PathBuf::from("a.jsonl");
        let output = PathBuf::from("b.jsonl");
        assert!(validate_distinct_paths(&[
            ("input_file", input.as_path()),
            ("output_file", output.as_path()),
        ])
        .is_ok());

        let err = validate_distinct_paths(&[
            ("input_file", input.as_path()),
            ("output_file", input.as_path()),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("output_file"));
    }

    #[test]
    fn test_validate_required_field() {
        let limit: Option<i64> = Some(5);
        assert_eq!(*validate_required_field("limit", &limit).unwrap(), 5);
        let missing: Option<i64> = None;
        assert!(matches!(
            validate_required_field("limit", &missing),
            Err(PrepError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_input_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(validate_input_file(dir.path()).is_err());

        let file = dir.path().join("in.jsonl");
        std::fs::write(&file, "{}\n").unwrap();
        assert!(validate_input_file(&file).is_ok());
        assert!(matches!(
            validate_input_file(&dir.path().join("missing.jsonl")),
            Err(PrepError::InputNotFound { .. })
        ));
    }
}
