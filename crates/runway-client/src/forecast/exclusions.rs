//! Hidden merchant keys.
//!
//! Patterns carry `is_hidden`, but the flag is only ever derived from what the
//! store reports after a write has been persisted.

use std::collections::BTreeSet;
use std::path::Path;

use rusqlite::{Connection, params};
use tracing::info;

use crate::error::{ClientError, ClientResult};
use crate::forecast::normalize::case_fold;
use crate::forecast::recurring::apply_exclusions;
use crate::forecast::types::RecurringPattern;
use crate::state::map_sqlite_error;

pub trait ExclusionStore {
    fn hidden_keys(&self) -> ClientResult<BTreeSet<String>>;

    /// Returns `true` when the key was not hidden before.
    fn hide(&mut self, merchant_key: &str) -> ClientResult<bool>;

    /// Returns `true` when the key was hidden before.
    fn unhide(&mut self, merchant_key: &str) -> ClientResult<bool>;
}

pub struct SqliteExclusionStore<'a> {
    connection: &'a Connection,
    db_path: &'a Path,
}

impl<'a> SqliteExclusionStore<'a> {
    pub fn new(connection: &'a Connection, db_path: &'a Path) -> Self {
        Self {
            connection,
            db_path,
        }
    }
}

impl ExclusionStore for SqliteExclusionStore<'_> {
    fn hidden_keys(&self) -> ClientResult<BTreeSet<String>> {
        let mut statement = self
            .connection
            .prepare("SELECT merchant_key FROM internal_hidden_merchants ORDER BY merchant_key ASC")
            .map_err(|error| map_sqlite_error(self.db_path, &error))?;
        let rows = statement
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|error| map_sqlite_error(self.db_path, &error))?;

        let mut keys = BTreeSet::new();
        for row in rows {
            keys.insert(row.map_err(|error| map_sqlite_error(self.db_path, &error))?);
        }
        Ok(keys)
    }

    fn hide(&mut self, merchant_key: &str) -> ClientResult<bool> {
        let changed = self
            .connection
            .execute(
                "INSERT OR IGNORE INTO internal_hidden_merchants (merchant_key, hidden_at)
                 VALUES (?1, strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))",
                params![merchant_key],
            )
            .map_err(|error| {
                ClientError::exclusion_store_failed(merchant_key, &error.to_string())
            })?;
        Ok(changed > 0)
    }

    fn unhide(&mut self, merchant_key: &str) -> ClientResult<bool> {
        let changed = self
            .connection
            .execute(
                "DELETE FROM internal_hidden_merchants WHERE merchant_key = ?1",
                params![merchant_key],
            )
            .map_err(|error| {
                ClientError::exclusion_store_failed(merchant_key, &error.to_string())
            })?;
        Ok(changed > 0)
    }
}

/// In-process store for tests and callers that keep exclusions elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryExclusionStore {
    keys: BTreeSet<String>,
    fail_writes: bool,
}

impl MemoryExclusionStore {
    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            fail_writes: false,
        }
    }

    /// Every subsequent write fails without touching the stored keys.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    fn check_writable(&self, merchant_key: &str) -> ClientResult<()> {
        if self.fail_writes {
            return Err(ClientError::exclusion_store_failed(
                merchant_key,
                "the exclusion store rejected the write",
            ));
        }
        Ok(())
    }
}

impl ExclusionStore for MemoryExclusionStore {
    fn hidden_keys(&self) -> ClientResult<BTreeSet<String>> {
        Ok(self.keys.clone())
    }

    fn hide(&mut self, merchant_key: &str) -> ClientResult<bool> {
        self.check_writable(merchant_key)?;
        Ok(self.keys.insert(merchant_key.to_string()))
    }

    fn unhide(&mut self, merchant_key: &str) -> ClientResult<bool> {
        self.check_writable(merchant_key)?;
        Ok(self.keys.remove(merchant_key))
    }
}

/// Case-folds a user-supplied key the way merchant keys are built.
pub fn normalize_merchant_key(raw: &str, command: &str) -> ClientResult<String> {
    if raw.trim().is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "Merchant key must not be empty.",
            Some(command),
        ));
    }
    Ok(case_fold(raw))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExclusionChange {
    pub merchant_key: String,
    pub hidden: bool,
    pub changed: bool,
    pub patterns: Vec<RecurringPattern>,
}

/// Persists the new hidden state, then re-derives `is_hidden` from the store.
///
/// A failed write leaves `patterns` untouched and surfaces the store error.
pub fn set_hidden(
    store: &mut dyn ExclusionStore,
    patterns: &[RecurringPattern],
    merchant_key: &str,
    hidden: bool,
) -> ClientResult<ExclusionChange> {
    let changed = if hidden {
        store.hide(merchant_key)?
    } else {
        store.unhide(merchant_key)?
    };
    let keys = store.hidden_keys()?;
    info!(merchant_key, hidden, changed, "updated hidden merchant");

    Ok(ExclusionChange {
        merchant_key: merchant_key.to_string(),
        hidden: keys.contains(merchant_key),
        changed,
        patterns: apply_exclusions(patterns, &keys),
    })
}
