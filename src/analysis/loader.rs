use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use super::literal::parse_mapping;
use crate::error::{DashError, Result};
use crate::types::{RawTable, Record};

/// Load every record of a line-per-record file.
///
/// One malformed line fails the whole load.
pub fn load_records(path: &Path) -> Result<RawTable> {
    let file = File::open(path).map_err(|source| DashError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_records(BufReader::new(file))?;
    debug!(
        path = %path.display(),
        records = table.len(),
        "loaded records"
    );
    Ok(table)
}

/// Parse records from any buffered reader. Every line must hold one mapping;
/// a blank line is as malformed as any other non-mapping.
pub fn read_records<R: BufRead>(reader: R) -> Result<RawTable> {
    let mut table = RawTable::default();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let record = parse_record(&line).map_err(|reason| DashError::MalformedRecord {
            line: line_no,
            reason,
        })?;
        table.records.push((line_no, record));
    }
    Ok(table)
}

/// JSON first, since NeDB writes JSON; Python-style literals otherwise.
pub fn parse_record(line: &str) -> std::result::Result<Record, String> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a mapping, found {}", kind_of(&other))),
        Err(_) => parse_mapping(line).map_err(|e| e.to_string()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
