#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use runway_client::SuccessEnvelope;
use runway_client::commands::import::{self, ImportRunOptions};
use serde_json::{Value, json};
use tempfile::{Builder, TempDir};

pub fn temp_home(prefix: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = Builder::new().prefix(prefix).tempdir()?;
    let home = dir.path().join("ledger-home");
    fs::create_dir_all(&home)?;
    Ok((dir, home))
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

pub fn transaction(account_key: &str, posted_at: &str, amount: f64, description: &str) -> Value {
    json!({
        "account_key": account_key,
        "posted_at": posted_at,
        "amount": amount,
        "description": description,
    })
}

/// Same amount and description on each of `dates`.
pub fn series(description: &str, amount: f64, dates: &[&str]) -> Vec<Value> {
    dates
        .iter()
        .map(|posted_at| transaction("checking", posted_at, amount, description))
        .collect()
}

pub fn write_fixture(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    assert!(fs::write(&path, body).is_ok());
    path
}

pub fn import_rows(home: &Path, rows: &[Value]) {
    let body = serde_json::to_string(rows).unwrap_or_default();
    let path = write_fixture(home, "fixture.json", &body);
    let result = import::run_with_options(ImportRunOptions {
        path: path.display().to_string(),
        dry_run: false,
        home_override: Some(home),
        stdin_override: None,
    });
    assert!(result.is_ok(), "import failed: {:?}", result.err());
}

pub fn payload(result: runway_client::ClientResult<SuccessEnvelope>) -> Value {
    assert!(result.is_ok(), "command failed: {:?}", result.as_ref().err());
    match result {
        Ok(success) => serde_json::to_value(success).unwrap_or(Value::Null),
        Err(_) => Value::Null,
    }
}

pub fn rows_of(value: &Value, key: &str) -> Vec<Value> {
    value["data"][key].as_array().cloned().unwrap_or_default()
}
