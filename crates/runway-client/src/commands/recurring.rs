use std::path::Path;

use chrono::NaiveDate;

use crate::ClientResult;
use crate::commands::common::{data_range_hint, recurring_row};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{RecurringData, RecurringRow};
use crate::forecast::date::format_iso_date;
use crate::forecast::exclusions::{ExclusionStore, SqliteExclusionStore};
use crate::forecast::policy::DetectionPolicy;
use crate::forecast::query::load_transactions;
use crate::forecast::recurring::detect_recurring;
use crate::setup::load_setup;
use crate::state::open_connection;

#[derive(Debug)]
pub struct RecurringRunOptions<'a> {
    pub policy: DetectionPolicy,
    pub today: NaiveDate,
    pub home_override: Option<&'a Path>,
}

pub fn run(policy: DetectionPolicy, today: NaiveDate) -> ClientResult<SuccessEnvelope> {
    run_with_options(RecurringRunOptions {
        policy,
        today,
        home_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: RecurringRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let db_path = setup.db_path_buf();
    let connection = open_connection(&db_path)?;
    let transactions = load_transactions(&connection, &db_path)?;
    let hidden_keys = SqliteExclusionStore::new(&connection, &db_path).hidden_keys()?;
    let patterns = detect_recurring(&transactions, &options.policy, options.today, &hidden_keys);

    let data = RecurringData {
        policy_version: options.policy.version.to_string(),
        today: format_iso_date(&options.today),
        min_occurrences: options.policy.effective_min_occurrences(),
        consistency_filter: options.policy.consistency_filter,
        rows: patterns
            .iter()
            .map(recurring_row)
            .collect::<Vec<RecurringRow>>(),
        data_range_hint: data_range_hint(&setup.data_range),
    };

    success("recurring", data)
}
