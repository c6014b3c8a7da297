use std::io;

use serde_json::Value;

use super::format::{self, Column};

const MAX_LISTED_DAYS: usize = 14;

pub fn render_recurring(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("recurring output requires rows"))?;

    if rows.is_empty() {
        let mut lines = vec!["No recurring patterns found.".to_string()];
        lines.extend(empty_ledger_hint(data));
        return Ok(lines.join("\n"));
    }

    let mut lines = vec![
        format!(
            "{} recurring {} as of {}",
            rows.len(),
            plural(rows.len(), "pattern", "patterns"),
            text(data, "today")
        ),
        String::new(),
    ];
    lines.extend(pattern_table(rows));
    lines.push(String::new());
    lines.push("Detection:".to_string());
    lines.extend(format::key_value_rows(
        &[
            ("Policy:", text(data, "policy_version")),
            (
                "Min occurrences:",
                data.get("min_occurrences")
                    .and_then(Value::as_u64)
                    .map(|value| value.to_string())
                    .unwrap_or_default(),
            ),
            (
                "Consistency filter:",
                on_off(data.get("consistency_filter").and_then(Value::as_bool)),
            ),
            ("Data covers:", data_covers(data)),
        ],
        2,
    ));

    Ok(lines.join("\n"))
}

pub fn render_forecast(data: &Value) -> io::Result<String> {
    let summary = data
        .get("summary")
        .ok_or_else(|| io::Error::other("forecast output requires a summary"))?;
    let days = data
        .get("days")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("forecast output requires days"))?;
    let patterns = data
        .get("patterns")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let horizon = data.get("horizon_days").and_then(Value::as_u64).unwrap_or(0);
    let mut lines = vec![
        format!(
            "Forecast for the next {horizon} {} from {}",
            plural(horizon as usize, "day", "days"),
            text(data, "today")
        ),
        String::new(),
        "Summary:".to_string(),
    ];

    let threshold = text(data, "danger_threshold");
    let below = summary
        .get("days_below_threshold")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let below_text = match summary.get("first_below_threshold_date").and_then(Value::as_str) {
        Some(first) => format!("{below} (first on {first})"),
        None => "none".to_string(),
    };
    let lowest_date = summary
        .get("lowest_balance_date")
        .and_then(Value::as_str)
        .map(|date| format!(" on {date}"))
        .unwrap_or_default();

    lines.extend(format::key_value_rows(
        &[
            ("Starting balance:", text(summary, "starting_balance")),
            ("Ending balance:", text(summary, "ending_balance")),
            (
                "Lowest balance:",
                format!("{}{lowest_date}", text(summary, "lowest_balance")),
            ),
            ("Days below threshold:", format!("{below_text} [threshold {threshold}]")),
            ("Monthly income:", text(summary, "monthly_income")),
            ("Monthly expenses:", text(summary, "monthly_expense")),
            ("Monthly net:", text(summary, "monthly_net")),
        ],
        2,
    ));

    let active = patterns
        .iter()
        .filter(|row| !row.get("is_hidden").and_then(Value::as_bool).unwrap_or(false))
        .cloned()
        .collect::<Vec<Value>>();
    lines.push(String::new());
    if active.is_empty() {
        lines.push("No recurring patterns contribute to this forecast.".to_string());
        lines.extend(empty_ledger_hint(data));
    } else {
        lines.push("Recurring patterns used:".to_string());
        lines.extend(pattern_table(&active));
    }

    let hidden = patterns.len() - active.len();
    if hidden > 0 {
        lines.push(format!(
            "  ({hidden} hidden {} left out; see `runway hidden`)",
            plural(hidden, "merchant", "merchants")
        ));
    }

    let event_days = days
        .iter()
        .filter(|day| {
            day.get("occurring")
                .and_then(Value::as_array)
                .is_some_and(|occurring| !occurring.is_empty())
        })
        .collect::<Vec<&Value>>();
    if !event_days.is_empty() {
        lines.push(String::new());
        lines.push("Upcoming:".to_string());
        lines.extend(upcoming_table(&event_days));
        if event_days.len() > MAX_LISTED_DAYS {
            lines.push(format!(
                "  ... {} more days with activity (use --json for every day)",
                event_days.len() - MAX_LISTED_DAYS
            ));
        }
    }

    Ok(lines.join("\n"))
}

fn pattern_table(rows: &[Value]) -> Vec<String> {
    let columns = [
        Column::left("Merchant"),
        Column::right("Amount"),
        Column::left("Frequency"),
        Column::right("Seen"),
        Column::left("Last"),
        Column::left("Next"),
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            let mut merchant = text(row, "description");
            if row.get("is_hidden").and_then(Value::as_bool).unwrap_or(false) {
                merchant.push_str(" (hidden)");
            }
            vec![
                merchant,
                text(row, "avg_amount"),
                text(row, "frequency"),
                row.get("occurrence_count")
                    .and_then(Value::as_u64)
                    .map(|count| count.to_string())
                    .unwrap_or_default(),
                text(row, "last_date"),
                text(row, "next_date"),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    format::render_table_or_blocks(&columns, &table_rows, format::terminal_width(), "Pattern")
}

fn upcoming_table(days: &[&Value]) -> Vec<String> {
    let columns = [
        Column::left("Date"),
        Column::left("Activity"),
        Column::right("Balance"),
        Column::left(""),
    ];
    let table_rows = days
        .iter()
        .take(MAX_LISTED_DAYS)
        .map(|day| {
            let activity = day
                .get("occurring")
                .and_then(Value::as_array)
                .map(|occurring| {
                    occurring
                        .iter()
                        .map(|item| {
                            format!("{} {}", text(item, "description"), text(item, "amount"))
                        })
                        .collect::<Vec<String>>()
                        .join(", ")
                })
                .unwrap_or_default();
            let flag = if day
                .get("below_threshold")
                .and_then(Value::as_bool)
                .unwrap_or(false)
            {
                "below threshold".to_string()
            } else {
                String::new()
            };
            vec![text(day, "date"), activity, text(day, "balance"), flag]
        })
        .collect::<Vec<Vec<String>>>();

    format::render_table_or_blocks(&columns, &table_rows, format::terminal_width(), "Day")
}

fn empty_ledger_hint(data: &Value) -> Vec<String> {
    let has_data = data
        .get("data_range_hint")
        .and_then(|hint| hint.get("earliest"))
        .is_some_and(|value| !value.is_null());
    if has_data {
        vec![
            String::new(),
            format!("Data covers {}.", data_covers(data)),
            "Try `--preset suggestions` to accept shorter histories.".to_string(),
        ]
    } else {
        vec![
            String::new(),
            "The ledger has no transactions yet.".to_string(),
            "Run `runway import --help` to get started.".to_string(),
        ]
    }
}

fn data_covers(data: &Value) -> String {
    let hint = data.get("data_range_hint");
    let earliest = hint
        .and_then(|value| value.get("earliest"))
        .and_then(Value::as_str);
    let latest = hint
        .and_then(|value| value.get("latest"))
        .and_then(Value::as_str);
    match (earliest, latest) {
        (Some(earliest), Some(latest)) => format!("{earliest} to {latest}"),
        _ => "no transactions".to_string(),
    }
}

fn on_off(value: Option<bool>) -> String {
    match value {
        Some(true) => "on".to_string(),
        _ => "off".to_string(),
    }
}

fn text(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{render_forecast, render_recurring};

    fn pattern(description: &str, amount: &str, hidden: bool) -> Value {
        json!({
            "merchant_key": description,
            "description": description,
            "avg_amount": amount,
            "occurrence_count": 3,
            "avg_interval_days": 30.0,
            "stddev_interval_days": 0.0,
            "interval_days": 30,
            "frequency": "monthly",
            "last_date": "2026-03-01",
            "next_date": "2026-03-31",
            "is_income": false,
            "is_hidden": hidden,
        })
    }

    #[test]
    fn recurring_lists_patterns_with_detection_summary() {
        let data = json!({
            "policy_version": "dashboard-v1",
            "today": "2026-03-05",
            "min_occurrences": 3,
            "consistency_filter": true,
            "rows": [pattern("GYM", "-50.00", false)],
            "data_range_hint": {"earliest": "2026-01-01", "latest": "2026-03-01"},
        });

        let rendered = render_recurring(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("1 recurring pattern as of 2026-03-05"));
            assert!(text.contains("GYM"));
            assert!(text.contains("-50.00"));
            assert!(text.contains("Consistency filter:  on"));
            assert!(text.contains("2026-01-01 to 2026-03-01"));
        }
    }

    #[test]
    fn empty_ledger_points_at_import() {
        let data = json!({
            "rows": [],
            "data_range_hint": {"earliest": null, "latest": null},
        });
        let rendered = render_recurring(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("No recurring patterns found."));
            assert!(text.contains("runway import --help"));
        }
    }

    #[test]
    fn forecast_shows_summary_and_upcoming_days() {
        let data = json!({
            "policy_version": "dashboard-v1",
            "today": "2026-03-05",
            "horizon_days": 3,
            "danger_threshold": "900.00",
            "patterns": [pattern("RENT", "-150.00", false), pattern("GYM", "-50.00", true)],
            "summary": {
                "starting_balance": "1000.00",
                "ending_balance": "850.00",
                "lowest_balance": "850.00",
                "lowest_balance_date": "2026-03-06",
                "days_below_threshold": 3,
                "first_below_threshold_date": "2026-03-06",
                "monthly_income": "0.00",
                "monthly_expense": "-150.00",
                "monthly_net": "-150.00",
            },
            "days": [
                {"date": "2026-03-06", "balance": "850.00", "below_threshold": true,
                 "occurring": [{"merchant_key": "RENT", "description": "RENT", "amount": "-150.00"}]},
                {"date": "2026-03-07", "balance": "850.00", "below_threshold": true, "occurring": []},
            ],
            "data_range_hint": {"earliest": "2026-01-01", "latest": "2026-03-01"},
        });

        let rendered = render_forecast(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Forecast for the next 3 days from 2026-03-05"));
            assert!(text.contains("Ending balance:        850.00"));
            assert!(text.contains("Lowest balance:        850.00 on 2026-03-06"));
            assert!(text.contains("3 (first on 2026-03-06) [threshold 900.00]"));
            assert!(text.contains("(1 hidden merchant left out"));
            assert!(text.contains("RENT -150.00"));
            assert!(text.contains("below threshold"));
            assert!(!text.contains("2026-03-07"));
        }
    }

    #[test]
    fn forecast_without_summary_is_an_error() {
        assert!(render_forecast(&json!({"days": []})).is_err());
    }
}
