//! Pipeline test report flattening
//!
//! GitLab's pipeline test report nests test cases under suites
//! (`test_suites[].test_cases[]`). Release notes want one CSV row per test
//! case, tagged with the name of its suite.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::io;

use crate::error::Result;

pub const SUITE_NAME_COLUMN: &str = "suite_name";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestReport {
    #[serde(default)]
    pub test_suites: Vec<TestSuite>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestSuite {
    pub name: String,
    /// Cases are kept as raw objects; every field becomes a column.
    #[serde(default)]
    pub test_cases: Vec<Map<String, Value>>,
}

/// One row per test case, each with a `suite_name` field appended.
pub fn flatten_test_report(report: &TestReport) -> Vec<Map<String, Value>> {
    report
        .test_suites
        .iter()
        .flat_map(|suite| {
            suite.test_cases.iter().map(move |case| {
                let mut row = case.clone();
                row.insert(
                    SUITE_NAME_COLUMN.to_string(),
                    Value::String(suite.name.clone()),
                );
                row
            })
        })
        .collect()
}

/// Column names across all rows, in first-seen order.
fn columns(rows: &[Map<String, Value>]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for key in rows.iter().flat_map(|row| row.keys()) {
        if !columns.contains(&key.as_str()) {
            columns.push(key);
        }
    }
    columns
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Write `rows` as CSV with a header line. Missing fields are left empty;
/// nested values are written as JSON text.
pub fn write_csv<W: io::Write>(rows: &[Map<String, Value>], writer: W) -> Result<()> {
    let columns = columns(rows);
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(&columns)?;
    for row in rows {
        csv.write_record(columns.iter().map(|column| cell(row.get(*column))))?;
    }
    csv.flush()?;
    Ok(())
}
