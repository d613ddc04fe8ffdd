//! Tabular export and evaluation-corpus loading.
//!
//! The CSV file is the interchange format between pipeline output and the
//! review tool: one row per record, scalar fields as plain columns, the
//! four nested objects serialized as JSON text within their cells.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::info;

use crate::error::{ExtractionError, Result};
use crate::types::JobRecord;

/// Scalar columns, in output order.
const SCALAR_COLUMNS: &[&str] = &[
    "job_id",
    "title",
    "industry",
    "employment_type",
    "employment_contract",
];

/// Columns holding a nested object as JSON cell text.
const NESTED_COLUMNS: &[&str] = &["skills", "required_experience", "salary", "education"];

/// Column carrying the original posting text (evaluation input).
const RAW_TEXT_COLUMN: &str = "raw_job_text";

/// Write records to a CSV file.
///
/// The `raw_job_text` column is included only when at least one record
/// carries it.
pub fn write_csv(path: impl AsRef<Path>, records: &[JobRecord]) -> Result<()> {
    let path = path.as_ref();
    let with_raw_text = records.iter().any(|r| r.raw_job_text.is_some());

    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<&str> = SCALAR_COLUMNS.to_vec();
    header.extend(NESTED_COLUMNS);
    if with_raw_text {
        header.push(RAW_TEXT_COLUMN);
    }
    writer.write_record(&header)?;

    for record in records {
        let mut row: Vec<String> = vec![
            record.job_id.clone().unwrap_or_default(),
            record.title.clone().unwrap_or_default(),
            record.industry.clone().unwrap_or_default(),
            record.employment_type.clone().unwrap_or_default(),
            record.employment_contract.clone().unwrap_or_default(),
            serde_json::to_string(&record.skills)?,
            serde_json::to_string(&record.required_experience)?,
            serde_json::to_string(&record.salary)?,
            serde_json::to_string(&record.education)?,
        ];
        if with_raw_text {
            row.push(record.raw_job_text.clone().unwrap_or_default());
        }
        writer.write_record(&row)?;
    }

    writer.flush().map_err(ExtractionError::Storage)?;
    info!(path = %path.display(), rows = records.len(), "wrote export table");
    Ok(())
}

/// Load an evaluation corpus from a CSV file.
///
/// Returns the posting texts and their ground-truth records. The file must
/// carry a `raw_job_text` column; the nested columns are re-parsed from
/// their JSON cell text (an empty cell reads as an empty object), and every
/// other column contributes a string field to the ground-truth record.
pub fn read_eval_csv(path: impl AsRef<Path>) -> Result<(Vec<String>, Vec<Value>)> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;

    let headers = reader.headers()?.clone();
    let raw_text_index = headers
        .iter()
        .position(|h| h == RAW_TEXT_COLUMN)
        .ok_or_else(|| ExtractionError::MissingColumn {
            name: RAW_TEXT_COLUMN.to_string(),
        })?;

    let mut texts = Vec::new();
    let mut ground_truths = Vec::new();

    for row in reader.records() {
        let row = row?;
        let mut record = Map::new();

        for (index, (header, cell)) in headers.iter().zip(row.iter()).enumerate() {
            if index == raw_text_index {
                continue;
            }
            let value = if NESTED_COLUMNS.contains(&header) {
                parse_nested_cell(cell)?
            } else if cell.is_empty() {
                Value::Null
            } else {
                Value::String(cell.to_string())
            };
            record.insert(header.to_string(), value);
        }

        texts.push(row.get(raw_text_index).unwrap_or_default().to_string());
        ground_truths.push(Value::Object(record));
    }

    Ok((texts, ground_truths))
}

fn parse_nested_cell(cell: &str) -> Result<Value> {
    if cell.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_str(cell)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JobRecord, Skills};

    fn record(id: &str) -> JobRecord {
        JobRecord {
            job_id: Some(id.to_string()),
            title: Some("ML Engineer".to_string()),
            skills: Skills {
                hard_skills: vec!["Python".to_string(), "SQL".to_string()],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_write_csv_serializes_nested_objects_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_csv(&path, &[record("1")]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("job_id,title,"));
        assert!(contents.contains("ML Engineer"));
        assert!(contents.contains(r#"""hard_skills"":[""Python"",""SQL""]"#));
        assert!(!contents.contains(RAW_TEXT_COLUMN));
    }

    #[test]
    fn test_raw_text_column_only_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut rec = record("1");
        rec.raw_job_text = Some("the posting".to_string());
        write_csv(&path, &[rec]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains(RAW_TEXT_COLUMN));
        assert!(contents.contains("the posting"));
    }

    #[test]
    fn test_read_eval_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eval.csv");

        let mut rec = record("1");
        rec.raw_job_text = Some("the posting".to_string());
        write_csv(&path, &[rec]).unwrap();

        let (texts, truths) = read_eval_csv(&path).unwrap();

        assert_eq!(texts, vec!["the posting"]);
        assert_eq!(truths.len(), 1);
        assert_eq!(truths[0]["title"], "ML Engineer");
        assert_eq!(truths[0]["skills"]["hard_skills"][0], "Python");
        assert!(truths[0].get(RAW_TEXT_COLUMN).is_none());
    }

    #[test]
    fn test_read_eval_csv_requires_raw_text_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eval.csv");

        write_csv(&path, &[record("1")]).unwrap();

        let err = read_eval_csv(&path).unwrap_err();
        assert!(matches!(err, ExtractionError::MissingColumn { name } if name == "raw_job_text"));
    }
}
