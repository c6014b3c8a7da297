use std::path::Path;

use chrono::NaiveDate;

use crate::ClientResult;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{ExclusionChangeData, HiddenData};
use crate::forecast::exclusions::{
    ExclusionStore, SqliteExclusionStore, normalize_merchant_key, set_hidden,
};
use crate::forecast::policy::DetectionPolicy;
use crate::forecast::query::load_transactions;
use crate::forecast::recurring::detect_recurring;
use crate::setup::load_setup;
use crate::state::open_connection;

#[derive(Debug)]
pub struct ExclusionRunOptions<'a> {
    pub merchant_key: String,
    pub today: NaiveDate,
    pub home_override: Option<&'a Path>,
}

pub fn hide(options: ExclusionRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    change(options, true)
}

pub fn unhide(options: ExclusionRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    change(options, false)
}

pub fn list(home_override: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(home_override)?;
    let db_path = setup.db_path_buf();
    let connection = open_connection(&db_path)?;
    let keys = SqliteExclusionStore::new(&connection, &db_path).hidden_keys()?;
    success(
        "hidden",
        HiddenData {
            merchant_keys: keys.into_iter().collect(),
        },
    )
}

fn change(options: ExclusionRunOptions<'_>, hidden: bool) -> ClientResult<SuccessEnvelope> {
    let command = if hidden { "hide" } else { "unhide" };
    let merchant_key = normalize_merchant_key(&options.merchant_key, command)?;
    let setup = load_setup(options.home_override)?;
    let db_path = setup.db_path_buf();
    let connection = open_connection(&db_path)?;

    let mut store = SqliteExclusionStore::new(&connection, &db_path);
    let transactions = load_transactions(&connection, &db_path)?;
    let before = detect_recurring(
        &transactions,
        &DetectionPolicy::default(),
        options.today,
        &store.hidden_keys()?,
    );
    let outcome = set_hidden(&mut store, &before, &merchant_key, hidden)?;

    let affected_patterns = outcome
        .patterns
        .iter()
        .filter(|pattern| pattern.merchant_key == outcome.merchant_key)
        .count();
    let message = match (hidden, outcome.changed) {
        (true, true) => format!("`{merchant_key}` is now hidden from projections."),
        (true, false) => format!("`{merchant_key}` was already hidden."),
        (false, true) => format!("`{merchant_key}` is visible in projections again."),
        (false, false) => format!("`{merchant_key}` was not hidden."),
    };

    success(
        if hidden { "hide" } else { "unhide" },
        ExclusionChangeData {
            merchant_key: outcome.merchant_key,
            hidden: outcome.hidden,
            changed: outcome.changed,
            message,
            affected_patterns,
        },
    )
}
