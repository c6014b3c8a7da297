use std::path::Path;
use std::str::FromStr;

use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::debug;

use crate::ClientResult;
use crate::forecast::date::parse_transaction_date;
use crate::forecast::types::RawTransaction;
use crate::state::map_sqlite_error;

/// Ledger rows with a usable description, oldest first.
///
/// Rows whose stored date or amount does not parse are skipped here so they
/// never reach clustering.
pub fn load_transactions(
    connection: &Connection,
    db_path: &Path,
) -> ClientResult<Vec<RawTransaction>> {
    let mut statement = connection
        .prepare(
            "SELECT posted_at, amount, description
             FROM internal_transactions
             WHERE description IS NOT NULL
               AND TRIM(description) <> ''
             ORDER BY posted_at ASC, txn_id ASC",
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let rows_iter = statement
        .query_map([], |row| {
            let posted_at: String = row.get(0)?;
            let amount: String = row.get(1)?;
            let description: String = row.get(2)?;
            Ok((posted_at, amount, description))
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut rows: Vec<RawTransaction> = Vec::new();
    let mut malformed = 0_usize;
    for row in rows_iter {
        let (posted_at, amount, description) =
            row.map_err(|error| map_sqlite_error(db_path, &error))?;
        let Some(date) = parse_transaction_date(posted_at.trim()) else {
            malformed += 1;
            continue;
        };
        let Ok(amount) = Decimal::from_str(amount.trim()) else {
            malformed += 1;
            continue;
        };
        rows.push(RawTransaction {
            description,
            amount,
            date,
        });
    }

    if malformed > 0 {
        debug!(malformed, "skipped ledger rows with unparseable date or amount");
    }
    debug!(rows = rows.len(), "loaded ledger transactions");
    Ok(rows)
}

/// Sum of balances for accounts marked as included.
pub fn load_current_balance(connection: &Connection, db_path: &Path) -> ClientResult<Decimal> {
    let mut statement = connection
        .prepare(
            "SELECT account_key, balance
             FROM internal_accounts
             WHERE included = 1
             ORDER BY account_key ASC",
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let rows_iter = statement
        .query_map([], |row| {
            let account_key: String = row.get(0)?;
            let balance: String = row.get(1)?;
            Ok((account_key, balance))
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut total = Decimal::ZERO;
    for row in rows_iter {
        let (account_key, balance) = row.map_err(|error| map_sqlite_error(db_path, &error))?;
        match Decimal::from_str(balance.trim()) {
            Ok(value) => total += value,
            Err(_) => debug!(account_key, "skipped account with unparseable balance"),
        }
    }
    Ok(total)
}
