use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::forecast::frequency::FrequencyClass;

/// One ledger row as handed to the pipeline. Rows whose stored date or
/// amount could not be parsed never become a `RawTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTransaction {
    pub norm_amount: Decimal,
    pub upper_description: String,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Transactions sharing a merchant key and a normalized amount, ordered by date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantCluster {
    pub merchant_key: String,
    pub norm_amount: Decimal,
    pub members: Vec<NormalizedTransaction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecurringPattern {
    pub merchant_key: String,
    pub description: String,
    pub avg_amount: Decimal,
    pub occurrence_count: usize,
    pub avg_interval_days: f64,
    pub stddev_interval_days: f64,
    /// `avg_interval_days` rounded to whole days; the projection step size.
    pub interval_days: i64,
    pub last_date: NaiveDate,
    pub next_date: NaiveDate,
    pub frequency_class: FrequencyClass,
    pub is_income: bool,
    pub is_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedOccurrence {
    pub merchant_key: String,
    pub description: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionDay {
    pub date: NaiveDate,
    pub balance: Decimal,
    pub occurring: Vec<ProjectedOccurrence>,
    pub below_threshold: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionSummary {
    pub starting_balance: Decimal,
    pub ending_balance: Decimal,
    pub lowest_balance: Decimal,
    pub lowest_balance_date: Option<NaiveDate>,
    pub days_below_threshold: usize,
    pub first_below_threshold_date: Option<NaiveDate>,
    pub monthly_income: Decimal,
    pub monthly_expense: Decimal,
    pub monthly_net: Decimal,
}
