use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::contracts::types::{ImportIssue, ImportSummary};
use crate::forecast::date::parse_transaction_date;
use crate::import::CanonicalTransaction;
use crate::import::parse::ParsedRow;
use crate::{ClientError, ClientResult};

const AMOUNT_EXPECTATION: &str = "decimal with <= 2 places (e.g. -42.15)";

#[derive(Debug, Clone)]
pub(crate) struct ValidatedRows {
    pub(crate) rows: Vec<CanonicalTransaction>,
    pub(crate) summary: ImportSummary,
}

/// Any invalid row fails the whole batch; issues are reported per row and field.
pub(crate) fn validate_rows(parsed_rows: Vec<ParsedRow>) -> ClientResult<ValidatedRows> {
    let total_rows = parsed_rows.len();
    let mut rows = Vec::new();
    let mut issues = Vec::new();

    for raw in parsed_rows {
        let mut row_issues = Vec::new();
        let account_key = validate_account_key(raw.row, raw.account_key, &mut row_issues);
        let posted_at = validate_posted_at(raw.row, raw.posted_at, &mut row_issues);
        let amount = validate_amount(raw.row, raw.amount, &mut row_issues);
        let description = normalize_optional(raw.description);

        match (account_key, posted_at, amount) {
            (Some(account_key), Some(posted_at), Some(amount)) if row_issues.is_empty() => {
                rows.push(CanonicalTransaction {
                    account_key,
                    posted_at,
                    amount,
                    description,
                });
            }
            _ => issues.extend(row_issues),
        }
    }

    let summary = ImportSummary {
        rows_read: total_rows as i64,
        rows_valid: rows.len() as i64,
        rows_invalid: issues
            .iter()
            .map(|issue| issue.row)
            .collect::<BTreeSet<i64>>()
            .len() as i64,
        inserted: 0,
    };

    if !issues.is_empty() {
        return Err(ClientError::import_validation_failed(summary, issues));
    }

    Ok(ValidatedRows { rows, summary })
}

fn validate_account_key(
    row: i64,
    value: Option<String>,
    issues: &mut Vec<ImportIssue>,
) -> Option<String> {
    let normalized = normalize_optional(value);
    if normalized.is_none() {
        issues.push(missing_field(row, "account_key", "non-empty string"));
    }
    normalized
}

fn validate_posted_at(
    row: i64,
    value: Option<String>,
    issues: &mut Vec<ImportIssue>,
) -> Option<String> {
    let Some(candidate) = normalize_optional(value) else {
        issues.push(missing_field(row, "posted_at", "YYYY-MM-DD"));
        return None;
    };

    if parse_transaction_date(&candidate).is_none() {
        issues.push(ImportIssue {
            row,
            field: "posted_at".to_string(),
            code: "invalid_date".to_string(),
            description: format!("posted_at must be a real YYYY-MM-DD date; got \"{candidate}\""),
            expected: Some("YYYY-MM-DD".to_string()),
            received: Some(candidate),
        });
        return None;
    }

    Some(candidate)
}

fn validate_amount(
    row: i64,
    value: Option<String>,
    issues: &mut Vec<ImportIssue>,
) -> Option<Decimal> {
    let Some(candidate) = normalize_optional(value) else {
        issues.push(missing_field(row, "amount", AMOUNT_EXPECTATION));
        return None;
    };

    let Ok(amount) = Decimal::from_str(&candidate) else {
        issues.push(ImportIssue {
            row,
            field: "amount".to_string(),
            code: "invalid_number".to_string(),
            description: format!("amount must be numeric; got \"{candidate}\""),
            expected: Some(AMOUNT_EXPECTATION.to_string()),
            received: Some(candidate),
        });
        return None;
    };

    if amount.scale() > 2 {
        let scale = amount.scale();
        issues.push(ImportIssue {
            row,
            field: "amount".to_string(),
            code: "invalid_amount_scale".to_string(),
            description: format!(
                "amount must use at most 2 decimal places; got {scale} decimal places."
            ),
            expected: Some(AMOUNT_EXPECTATION.to_string()),
            received: Some(candidate),
        });
        return None;
    }

    Some(amount)
}

fn missing_field(row: i64, field: &str, expected: &str) -> ImportIssue {
    ImportIssue {
        row,
        field: field.to_string(),
        code: "missing_required_field".to_string(),
        description: format!("{field} must be present and non-empty."),
        expected: Some(expected.to_string()),
        received: Some(String::new()),
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    let raw = value?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::validate_rows;
    use crate::import::parse::ParsedRow;

    fn parsed(row: i64, posted_at: &str, amount: &str, description: Option<&str>) -> ParsedRow {
        ParsedRow {
            row,
            account_key: Some("checking".to_string()),
            posted_at: Some(posted_at.to_string()),
            amount: Some(amount.to_string()),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn valid_rows_keep_exact_decimal_amounts() {
        let validated = validate_rows(vec![
            parsed(1, "2026-05-01", "-12.99", Some(" Music Plus ")),
            parsed(2, "2026-05-02", "1500", None),
        ]);
        assert!(validated.is_ok());
        if let Ok(value) = validated {
            assert_eq!(value.summary.rows_valid, 2);
            assert_eq!(value.rows[0].amount, Decimal::new(-1299, 2));
            assert_eq!(value.rows[0].description.as_deref(), Some("Music Plus"));
            assert_eq!(value.rows[1].description, None);
        }
    }

    #[test]
    fn any_invalid_row_fails_the_batch_with_row_issues() {
        let validated = validate_rows(vec![
            parsed(1, "2026-05-01", "-12.99", Some("ok")),
            parsed(2, "2026-02-30", "-12.99", Some("bad date")),
            parsed(3, "2026-05-03", "-1.005", Some("too precise")),
            parsed(4, "2026-05-04", "abc", Some("not a number")),
        ]);
        assert!(validated.is_err());
        if let Err(error) = validated {
            assert_eq!(error.code, "import_validation_failed");
            let data = error.data.unwrap_or_default();
            assert_eq!(data["summary"]["rows_invalid"], 3);
            assert_eq!(data["issues"][0]["code"], "invalid_date");
            assert_eq!(data["issues"][1]["code"], "invalid_amount_scale");
            assert_eq!(data["issues"][2]["code"], "invalid_number");
        }
    }
}
