use std::str::FromStr;

use rust_decimal::Decimal;

use crate::contracts::types::{
    DataRange, DataRangeHint, ProjectedOccurrenceRow, ProjectionDayRow, ProjectionSummaryRow,
    RecurringRow,
};
use crate::forecast::date::format_iso_date;
use crate::forecast::types::{ProjectionDay, ProjectionSummary, RecurringPattern};
use crate::{ClientError, ClientResult};

const REQUIRED_IMPORT_FIELDS: [(&str, &str); 3] = [
    ("account_key", "string"),
    ("posted_at", "date"),
    ("amount", "decimal"),
];

const OPTIONAL_IMPORT_FIELDS: [(&str, &str); 1] = [("description", "string|null")];

pub(crate) fn required_import_field_names() -> Vec<&'static str> {
    REQUIRED_IMPORT_FIELDS
        .iter()
        .map(|(name, _)| *name)
        .collect()
}

pub(crate) fn optional_import_field_names() -> Vec<&'static str> {
    OPTIONAL_IMPORT_FIELDS
        .iter()
        .map(|(name, _)| *name)
        .collect()
}

pub fn data_range_hint(data_range: &DataRange) -> DataRangeHint {
    DataRangeHint {
        earliest: data_range.earliest.clone(),
        latest: data_range.latest.clone(),
    }
}

/// Parses a user-supplied money amount, allowing at most cents precision.
pub fn parse_money_argument(value: &str, field_name: &str, command: &str) -> ClientResult<Decimal> {
    let trimmed = value.trim();
    let parsed = Decimal::from_str(trimmed).map_err(|_| {
        ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must be a decimal amount such as 1250.00; got \"{trimmed}\"."),
            Some(command),
        )
    })?;
    if parsed.scale() > 2 {
        return Err(ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must use at most 2 decimal places."),
            Some(command),
        ));
    }
    Ok(parsed)
}

pub(crate) fn format_money(value: Decimal) -> String {
    format!("{value:.2}")
}

pub(crate) fn recurring_row(pattern: &RecurringPattern) -> RecurringRow {
    RecurringRow {
        merchant_key: pattern.merchant_key.clone(),
        description: pattern.description.clone(),
        avg_amount: format_money(pattern.avg_amount),
        occurrence_count: pattern.occurrence_count,
        avg_interval_days: round_days(pattern.avg_interval_days),
        stddev_interval_days: round_days(pattern.stddev_interval_days),
        interval_days: pattern.interval_days,
        frequency: pattern.frequency_class.as_str().to_string(),
        last_date: format_iso_date(&pattern.last_date),
        next_date: format_iso_date(&pattern.next_date),
        is_income: pattern.is_income,
        is_hidden: pattern.is_hidden,
    }
}

pub(crate) fn projection_day_row(day: &ProjectionDay) -> ProjectionDayRow {
    ProjectionDayRow {
        date: format_iso_date(&day.date),
        balance: format_money(day.balance),
        below_threshold: day.below_threshold,
        occurring: day
            .occurring
            .iter()
            .map(|occurrence| ProjectedOccurrenceRow {
                merchant_key: occurrence.merchant_key.clone(),
                description: occurrence.description.clone(),
                amount: format_money(occurrence.amount),
            })
            .collect(),
    }
}

pub(crate) fn projection_summary_row(summary: &ProjectionSummary) -> ProjectionSummaryRow {
    ProjectionSummaryRow {
        starting_balance: format_money(summary.starting_balance),
        ending_balance: format_money(summary.ending_balance),
        lowest_balance: format_money(summary.lowest_balance),
        lowest_balance_date: summary.lowest_balance_date.as_ref().map(format_iso_date),
        days_below_threshold: summary.days_below_threshold,
        first_below_threshold_date: summary
            .first_below_threshold_date
            .as_ref()
            .map(format_iso_date),
        monthly_income: format_money(summary.monthly_income),
        monthly_expense: format_money(summary.monthly_expense),
        monthly_net: format_money(summary.monthly_net),
    }
}

fn round_days(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
