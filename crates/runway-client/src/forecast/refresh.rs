use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::ClientResult;
use crate::forecast::config::ForecastConfig;
use crate::forecast::exclusions::{ExclusionStore, SqliteExclusionStore};
use crate::forecast::projection::{project_balance, summarize};
use crate::forecast::query::{load_current_balance, load_transactions};
use crate::forecast::recurring::detect_recurring;
use crate::forecast::types::{ProjectionDay, ProjectionSummary, RawTransaction, RecurringPattern};

/// Everything one refresh cycle produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSnapshot {
    pub today: NaiveDate,
    pub policy_version: &'static str,
    pub horizon_days: u32,
    pub danger_threshold: Decimal,
    pub hidden_keys: BTreeSet<String>,
    pub patterns: Vec<RecurringPattern>,
    pub days: Vec<ProjectionDay>,
    pub summary: ProjectionSummary,
}

pub fn compute_forecast(
    transactions: &[RawTransaction],
    starting_balance: Decimal,
    hidden_keys: &BTreeSet<String>,
    config: &ForecastConfig,
    today: NaiveDate,
) -> ForecastSnapshot {
    let horizon_days = config.horizon.to_days(today);
    let patterns = detect_recurring(transactions, &config.policy, today, hidden_keys);
    let days = project_balance(
        starting_balance,
        &patterns,
        horizon_days,
        today,
        config.danger_threshold,
    );
    let summary = summarize(starting_balance, &patterns, &days);

    ForecastSnapshot {
        today,
        policy_version: config.policy.version,
        horizon_days,
        danger_threshold: config.danger_threshold,
        hidden_keys: hidden_keys.clone(),
        patterns,
        days,
        summary,
    }
}

/// Reads transactions, balance and the hidden set, then recomputes from scratch.
///
/// Any storage failure aborts the whole cycle; no partial snapshot is returned.
pub fn refresh(
    connection: &Connection,
    db_path: &Path,
    config: &ForecastConfig,
    today: NaiveDate,
) -> ClientResult<ForecastSnapshot> {
    let config = config.validate()?;
    let transactions = load_transactions(connection, db_path)?;
    let starting_balance = load_current_balance(connection, db_path)?;
    let hidden_keys = SqliteExclusionStore::new(connection, db_path).hidden_keys()?;

    let snapshot = compute_forecast(&transactions, starting_balance, &hidden_keys, &config, today);
    info!(
        patterns = snapshot.patterns.len(),
        hidden = hidden_keys.len(),
        horizon_days = snapshot.horizon_days,
        "refreshed forecast"
    );
    Ok(snapshot)
}

/// Hands out cycle tickets and keeps only the newest cycle's result.
///
/// A cycle that finishes after a newer one has started is discarded on
/// `publish`. Long-running cycles can poll `is_current` to stop early.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    generation: AtomicU64,
    latest: Mutex<Option<Published>>,
}

#[derive(Debug)]
struct Published {
    ticket: u64,
    snapshot: Arc<ForecastSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RefreshTicket {
        RefreshTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Returns `false` and drops the snapshot when a newer cycle has begun.
    pub fn publish(&self, ticket: RefreshTicket, snapshot: ForecastSnapshot) -> bool {
        let mut latest = self.lock_latest();
        if !self.is_current(ticket) {
            warn!(
                ticket = ticket.0,
                current = self.generation.load(Ordering::SeqCst),
                "discarding stale forecast refresh"
            );
            return false;
        }
        *latest = Some(Published {
            ticket: ticket.0,
            snapshot: Arc::new(snapshot),
        });
        true
    }

    pub fn latest(&self) -> Option<Arc<ForecastSnapshot>> {
        self.lock_latest()
            .as_ref()
            .map(|published| Arc::clone(&published.snapshot))
    }

    pub fn latest_ticket(&self) -> Option<RefreshTicket> {
        self.lock_latest()
            .as_ref()
            .map(|published| RefreshTicket(published.ticket))
    }

    fn lock_latest(&self) -> MutexGuard<'_, Option<Published>> {
        match self.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
