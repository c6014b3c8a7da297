use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DataRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataRangeHint {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportData {
    pub dry_run: bool,
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_id: Option<String>,
    pub message: String,
    pub summary: ImportSummary,
    pub issues: Vec<ImportIssue>,
    pub data_range_hint: DataRangeHint,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub rows_read: i64,
    pub rows_valid: i64,
    pub rows_invalid: i64,
    pub inserted: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportIssue {
    pub row: i64,
    pub field: String,
    pub code: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountRow {
    pub account_key: String,
    pub balance: String,
    pub included: bool,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountsData {
    pub current_balance: String,
    pub rows: Vec<AccountRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountBalanceData {
    pub account: AccountRow,
    pub current_balance: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecurringRow {
    pub merchant_key: String,
    pub description: String,
    pub avg_amount: String,
    pub occurrence_count: usize,
    pub avg_interval_days: f64,
    pub stddev_interval_days: f64,
    pub interval_days: i64,
    pub frequency: String,
    pub last_date: String,
    pub next_date: String,
    pub is_income: bool,
    pub is_hidden: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecurringData {
    pub policy_version: String,
    pub today: String,
    pub min_occurrences: usize,
    pub consistency_filter: bool,
    pub rows: Vec<RecurringRow>,
    pub data_range_hint: DataRangeHint,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectedOccurrenceRow {
    pub merchant_key: String,
    pub description: String,
    pub amount: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectionDayRow {
    pub date: String,
    pub balance: String,
    pub below_threshold: bool,
    pub occurring: Vec<ProjectedOccurrenceRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectionSummaryRow {
    pub starting_balance: String,
    pub ending_balance: String,
    pub lowest_balance: String,
    pub lowest_balance_date: Option<String>,
    pub days_below_threshold: usize,
    pub first_below_threshold_date: Option<String>,
    pub monthly_income: String,
    pub monthly_expense: String,
    pub monthly_net: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastData {
    pub policy_version: String,
    pub today: String,
    pub horizon_days: u32,
    pub danger_threshold: String,
    pub patterns: Vec<RecurringRow>,
    pub summary: ProjectionSummaryRow,
    pub days: Vec<ProjectionDayRow>,
    pub data_range_hint: DataRangeHint,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExclusionChangeData {
    pub merchant_key: String,
    pub hidden: bool,
    pub changed: bool,
    pub message: String,
    pub affected_patterns: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HiddenData {
    pub merchant_keys: Vec<String>,
}
