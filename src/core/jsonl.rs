//! Line-delimited JSON reading and writing.

use crate::domain::model::Record;
use crate::utils::error::{PrepError, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;

/// Iterates the non-blank lines of a reader as `(line_number, text)`, 1-based.
pub struct JsonlLines<R: BufRead> {
    lines: Lines<R>,
    line_no: usize,
}

impl JsonlLines<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonlLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for JsonlLines<R> {
    type Item = Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(Ok((self.line_no, line)));
        }
    }
}

/// Parses one line into a record. Anything other than a JSON object is rejected.
pub fn parse_record(line_no: usize, text: &str) -> Result<Record> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(PrepError::NotAnObject { line: line_no }),
        Err(e) => Err(PrepError::InvalidJson {
            line: line_no,
            message: e.to_string(),
        }),
    }
}

/// Writes one compact JSON value per line. Non-ASCII text is written as-is.
pub struct JsonlWriter<W: Write> {
    writer: BufWriter<W>,
    written: usize,
}

impl JsonlWriter<File> {
    /// Creates (or truncates) `path`, creating missing parent directories.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            written: 0,
        }
    }

    pub fn write_record<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes buffered lines and hands back the inner writer.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| PrepError::IoError(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lines_skip_blanks_and_keep_numbering() {
        let input = "{\"a\":1}\n\n   \n{\"a\":2}\n";
        let lines: Vec<_> = JsonlLines::new(input.as_bytes())
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(
            lines,
            vec![(1, "{\"a\":1}".to_string()), (4, "{\"a\":2}".to_string())]
        );
    }

    #[test]
    fn test_parse_record_rejects_non_objects() {
        assert!(parse_record(1, r#"{"question":"Q"}"#).is_ok());
        assert!(matches!(
            parse_record(2, "[1, 2]"),
            Err(PrepError::NotAnObject { line: 2 })
        ));
        match parse_record(7, "{\"question\": ") {
            Err(PrepError::InvalidJson { line, .. }) => assert_eq!(line, 7),
            other => panic!("expected InvalidJson, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_record_preserves_key_order() {
        let rec = parse_record(1, r#"{"z":1,"a":2,"m":3}"#).unwrap();
        let keys: Vec<&str> = rec.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_writer_keeps_non_ascii_literal() {
        let mut writer = JsonlWriter::new(Vec::new());
        writer
            .write_record(&json!({"question": "¿Cuántos años?", "answer": "七"}))
            .unwrap();
        assert_eq!(writer.written(), 1);
        let bytes = writer.finish().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "{\"question\":\"¿Cuántos años?\",\"answer\":\"七\"}\n"
        );
    }
}
