use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::forecast::types::{NormalizedTransaction, RawTransaction};

/// Rounds to cents, half away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn case_fold(value: &str) -> String {
    value.to_uppercase()
}

pub fn normalize_transaction(row: &RawTransaction) -> Option<NormalizedTransaction> {
    if row.description.trim().is_empty() {
        return None;
    }

    Some(NormalizedTransaction {
        norm_amount: round_cents(row.amount),
        upper_description: case_fold(&row.description),
        description: row.description.clone(),
        amount: row.amount,
        date: row.date,
    })
}

pub fn normalize_transactions(rows: &[RawTransaction]) -> Vec<NormalizedTransaction> {
    let normalized = rows
        .iter()
        .filter_map(normalize_transaction)
        .collect::<Vec<NormalizedTransaction>>();
    let dropped = rows.len() - normalized.len();
    if dropped > 0 {
        debug!(dropped, "dropped transactions without a description");
    }
    normalized
}
