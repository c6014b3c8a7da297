use std::collections::HashMap;

use serde_json::Value;

use crate::commands::common::{optional_import_field_names, required_import_field_names};
use crate::import::invalid_input_error;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub(crate) struct ParsedRow {
    pub(crate) row: i64,
    pub(crate) account_key: Option<String>,
    pub(crate) posted_at: Option<String>,
    pub(crate) amount: Option<String>,
    pub(crate) description: Option<String>,
}

impl ParsedRow {
    /// `row` is 1-based; `field` returns the raw text for a column name.
    fn from_fields(index: usize, mut field: impl FnMut(&str) -> Option<String>) -> Self {
        Self {
            row: i64::try_from(index).unwrap_or(i64::MAX - 1) + 1,
            account_key: field("account_key"),
            posted_at: field("posted_at"),
            amount: field("amount"),
            description: field("description"),
        }
    }
}

enum SourceFormat {
    JsonArray,
    JsonOther,
    Csv,
    Unknown,
}

fn sniff_format(content: &str) -> SourceFormat {
    if content.starts_with('[') {
        return SourceFormat::JsonArray;
    }
    if serde_json::from_str::<Value>(content).is_ok() {
        return SourceFormat::JsonOther;
    }
    let header_line = content.lines().find(|line| !line.trim().is_empty());
    if header_line.is_some_and(|line| line.contains(',')) {
        return SourceFormat::Csv;
    }
    SourceFormat::Unknown
}

pub(crate) fn parse_source(content: &str) -> ClientResult<Vec<ParsedRow>> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(invalid_input_error("Import source is empty."));
    }

    match sniff_format(trimmed) {
        SourceFormat::JsonArray => parse_json_array(trimmed),
        SourceFormat::Csv => parse_csv(trimmed),
        SourceFormat::JsonOther => Err(ClientError::invalid_import_format(
            "JSON input must be a top-level array of transaction objects.",
            "json_non_array",
        )),
        SourceFormat::Unknown => Err(ClientError::invalid_import_format(
            "Unsupported import format. Provide a JSON array or CSV with headers.",
            "unknown",
        )),
    }
}

fn parse_json_array(content: &str) -> ClientResult<Vec<ParsedRow>> {
    let items = match serde_json::from_str::<Value>(content) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            return Err(invalid_input_error(
                "JSON input must be a top-level array of transaction objects.",
            ));
        }
        Err(_) => {
            return Err(invalid_input_error(
                "Invalid JSON input. Provide a valid JSON array.",
            ));
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let object = item.as_object().ok_or_else(|| {
                invalid_input_error(
                    "JSON array entries must all be objects with transaction fields.",
                )
            })?;
            Ok(ParsedRow::from_fields(index, |name| {
                json_field_text(object.get(name))
            }))
        })
        .collect()
}

fn parse_csv(content: &str) -> ClientResult<Vec<ParsedRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| invalid_input_error("CSV header row is missing or unreadable."))?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();
    check_headers(&headers)?;

    let column_of = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.clone(), index))
        .collect::<HashMap<String, usize>>();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record =
            record.map_err(|_| invalid_input_error("CSV rows are malformed or not UTF-8."))?;
        rows.push(ParsedRow::from_fields(index, |name| {
            let column = column_of.get(name)?;
            record.get(*column).map(str::to_string)
        }));
    }
    Ok(rows)
}

/// Numbers keep their JSON text so decimal amounts are not routed through `f64`.
fn json_field_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn check_headers(actual: &[String]) -> ClientResult<()> {
    let required = required_import_field_names();
    let optional = optional_import_field_names();

    let missing_required = required
        .iter()
        .any(|name| !actual.iter().any(|header| header == name));
    let has_unknown = actual
        .iter()
        .any(|header| !required.contains(&header.as_str()) && !optional.contains(&header.as_str()));

    if missing_required || has_unknown {
        let expected = required
            .into_iter()
            .chain(optional)
            .map(str::to_string)
            .collect();
        return Err(ClientError::import_schema_mismatch(expected, actual.to_vec()));
    }
    Ok(())
}
