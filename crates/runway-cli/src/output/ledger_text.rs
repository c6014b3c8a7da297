use std::io;

use serde_json::Value;

use super::format::{self, Column};

pub fn render_import(data: &Value) -> io::Result<String> {
    let summary = data
        .get("summary")
        .ok_or_else(|| io::Error::other("import output requires a summary"))?;
    let count = |key: &str| {
        summary
            .get(key)
            .and_then(Value::as_i64)
            .unwrap_or(0)
            .to_string()
    };

    let mut entries = vec![
        ("Rows read:", count("rows_read")),
        ("Rows valid:", count("rows_valid")),
    ];
    let dry_run = data.get("dry_run").and_then(Value::as_bool).unwrap_or(false);
    if !dry_run {
        entries.push(("Rows inserted:", count("inserted")));
    }
    if let Some(import_id) = data.get("import_id").and_then(Value::as_str) {
        entries.push(("Import ID:", import_id.to_string()));
    }

    let mut lines = vec![text(data, "message"), String::new(), "Summary:".to_string()];
    lines.extend(format::key_value_rows(&entries, 2));

    if dry_run {
        lines.push(String::new());
        lines.push("Next step:".to_string());
        let path = data
            .get("path")
            .and_then(Value::as_str)
            .unwrap_or("<path>");
        lines.push(format!("  runway import {path}"));
    } else {
        lines.push(String::new());
        lines.push("Next steps:".to_string());
        lines.push("  runway recurring".to_string());
        lines.push("  runway forecast".to_string());
    }

    Ok(lines.join("\n"))
}

pub fn render_account_list(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("account list output requires rows"))?;

    if rows.is_empty() {
        return Ok([
            "No account balances recorded.",
            "",
            "Forecasts start from 0.00 until you record one:",
            "  runway account set-balance <account_key> <amount>",
        ]
        .join("\n"));
    }

    let columns = [
        Column::left("Account"),
        Column::right("Balance"),
        Column::left("In forecast"),
        Column::left("Updated"),
    ];
    let table_rows = rows.iter().map(account_cells).collect::<Vec<Vec<String>>>();

    let mut lines = vec!["Accounts:".to_string()];
    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Account",
    ));
    lines.push(String::new());
    lines.extend(format::key_value_rows(
        &[("Current balance:", text(data, "current_balance"))],
        0,
    ));
    Ok(lines.join("\n"))
}

pub fn render_account_change(command: &str, data: &Value) -> io::Result<String> {
    let account = data
        .get("account")
        .ok_or_else(|| io::Error::other("account output requires an account"))?;
    let account_key = text(account, "account_key");
    let included = account
        .get("included")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let headline = match command {
        "account include" => format!("`{account_key}` now counts toward the forecast."),
        "account exclude" => format!("`{account_key}` no longer counts toward the forecast."),
        _ => format!("Recorded balance for `{account_key}`."),
    };

    let lines = [
        vec![headline, String::new()],
        format::key_value_rows(
            &[
                ("Balance:", text(account, "balance")),
                ("In forecast:", yes_no(included)),
                ("Current balance:", text(data, "current_balance")),
            ],
            2,
        ),
    ]
    .concat();
    Ok(lines.join("\n"))
}

pub fn render_exclusion_change(data: &Value) -> io::Result<String> {
    let message = data
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("exclusion output requires a message"))?;
    let affected = data
        .get("affected_patterns")
        .and_then(Value::as_u64)
        .unwrap_or(0);

    let mut lines = vec![message.to_string()];
    if affected == 0 {
        lines.push("No recurring pattern currently matches this merchant key.".to_string());
    }
    Ok(lines.join("\n"))
}

pub fn render_hidden(data: &Value) -> io::Result<String> {
    let keys = data
        .get("merchant_keys")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("hidden output requires merchant_keys"))?;

    if keys.is_empty() {
        return Ok("No merchants are hidden.".to_string());
    }

    let mut lines = vec!["Hidden merchants:".to_string()];
    lines.extend(
        keys.iter()
            .filter_map(Value::as_str)
            .map(|key| format!("  {key}")),
    );
    lines.push(String::new());
    lines.push("Show one again with `runway unhide <merchant_key>`.".to_string());
    Ok(lines.join("\n"))
}

fn account_cells(row: &Value) -> Vec<String> {
    vec![
        text(row, "account_key"),
        text(row, "balance"),
        yes_no(row.get("included").and_then(Value::as_bool).unwrap_or(false)),
        text(row, "updated_at"),
    ]
}

fn yes_no(value: bool) -> String {
    let label = if value { "yes" } else { "no" };
    label.to_string()
}

fn text(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        render_account_change, render_account_list, render_exclusion_change, render_hidden,
        render_import,
    };

    #[test]
    fn dry_run_suggests_the_real_import() {
        let data = json!({
            "dry_run": true,
            "path": "rows.csv",
            "message": "Validation passed. No rows were written.",
            "summary": {"rows_read": 4, "rows_valid": 4, "rows_invalid": 0, "inserted": 0},
            "issues": [],
        });

        let rendered = render_import(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Validation passed."));
            assert!(text.contains("Rows read:   4"));
            assert!(!text.contains("Rows inserted"));
            assert!(text.contains("  runway import rows.csv"));
        }
    }

    #[test]
    fn committed_import_shows_inserted_rows_and_id() {
        let data = json!({
            "dry_run": false,
            "path": "rows.csv",
            "import_id": "imp_01",
            "message": "Import completed successfully.",
            "summary": {"rows_read": 2, "rows_valid": 2, "rows_invalid": 0, "inserted": 2},
            "issues": [],
        });

        let rendered = render_import(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Rows inserted:  2"));
            assert!(text.contains("Import ID:      imp_01"));
            assert!(text.contains("  runway forecast"));
        }
    }

    #[test]
    fn account_list_renders_table_and_total() {
        let data = json!({
            "current_balance": "1200.50",
            "rows": [
                {"account_key": "card", "balance": "-310.25", "included": false, "updated_at": "1767225600"},
                {"account_key": "checking", "balance": "1200.50", "included": true, "updated_at": "1767225600"},
            ],
        });

        let rendered = render_account_list(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Account"));
            assert!(text.contains("-310.25"));
            assert!(text.ends_with("Current balance:  1200.50"));
        }
    }

    #[test]
    fn empty_account_list_explains_zero_start() {
        let rendered = render_account_list(&json!({"current_balance": "0.00", "rows": []}));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Forecasts start from 0.00"));
        }
    }

    #[test]
    fn account_exclude_uses_its_own_headline() {
        let data = json!({
            "account": {"account_key": "card", "balance": "-310.25", "included": false, "updated_at": "1"},
            "current_balance": "0.00",
        });
        let rendered = render_account_change("account exclude", &data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("`card` no longer counts toward the forecast."));
            assert!(text.contains("In forecast:      no"));
        }
    }

    #[test]
    fn exclusion_change_notes_unknown_merchants() {
        let data = json!({
            "merchant_key": "GYM",
            "hidden": true,
            "changed": true,
            "message": "`GYM` is now hidden from projections.",
            "affected_patterns": 0,
        });
        let rendered = render_exclusion_change(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("No recurring pattern currently matches"));
        }
    }

    #[test]
    fn hidden_lists_keys() {
        let rendered = render_hidden(&json!({"merchant_keys": ["GYM", "NETFLIX.COM"]}));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("  GYM\n  NETFLIX.COM"));
        }

        let empty = render_hidden(&json!({"merchant_keys": []}));
        assert_eq!(empty.ok().as_deref(), Some("No merchants are hidden."));
    }
}
