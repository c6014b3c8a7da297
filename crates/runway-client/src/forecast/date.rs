use chrono::{Duration, Months, NaiveDate};

const ISO_FORMAT: &str = "%Y-%m-%d";

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Accepts only the zero-padded `YYYY-MM-DD` shape; chrono alone would also
/// take `2026-3-5`.
pub fn parse_transaction_date(value: &str) -> Option<NaiveDate> {
    let shaped = value.len() == 10
        && value.char_indices().all(|(index, ch)| match index {
            4 | 7 => ch == '-',
            _ => ch.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(value, ISO_FORMAT).ok()
}

/// Saturates at the calendar bounds instead of failing.
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    match Duration::try_days(days).and_then(|delta| date.checked_add_signed(delta)) {
        Some(shifted) => shifted,
        None if days < 0 => NaiveDate::MIN,
        None => NaiveDate::MAX,
    }
}

/// Jan 31 plus one month is Feb 28 (or 29). Saturates at `NaiveDate::MAX`.
pub fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(NaiveDate::MAX)
}
