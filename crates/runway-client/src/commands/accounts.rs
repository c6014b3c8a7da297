use std::path::Path;

use rusqlite::{Connection, params};
use tracing::info;

use crate::commands::common::{format_money, parse_money_argument};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{AccountBalanceData, AccountRow, AccountsData};
use crate::forecast::query::load_current_balance;
use crate::import::persist::now_timestamp;
use crate::setup::load_setup;
use crate::state::{map_sqlite_error, open_connection};
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct SetBalanceOptions<'a> {
    pub account_key: String,
    pub amount: String,
    pub exclude: bool,
    pub home_override: Option<&'a Path>,
}

pub fn run() -> ClientResult<SuccessEnvelope> {
    run_with_home_override(None)
}

#[doc(hidden)]
pub fn run_with_home_override(home_override: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(home_override)?;
    let db_path = setup.db_path_buf();
    let connection = open_connection(&db_path)?;
    let data = query_accounts_data(&connection, &db_path)?;
    success("account list", data)
}

/// Records the balance for one account, creating it on first use.
pub fn set_balance(options: SetBalanceOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let account_key = options.account_key.trim();
    if account_key.is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "Account key must not be empty.",
            Some("account set-balance"),
        ));
    }
    let balance = parse_money_argument(&options.amount, "amount", "account set-balance")?;

    let setup = load_setup(options.home_override)?;
    let db_path = setup.db_path_buf();
    let connection = open_connection(&db_path)?;
    connection
        .execute(
            "INSERT INTO internal_accounts (account_key, balance, included, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (account_key) DO UPDATE SET
                balance = excluded.balance,
                included = excluded.included,
                updated_at = excluded.updated_at",
            params![
                account_key,
                format_money(balance),
                i64::from(!options.exclude),
                now_timestamp()
            ],
        )
        .map_err(|error| map_sqlite_error(&db_path, &error))?;
    info!(account_key, included = !options.exclude, "recorded account balance");

    account_balance_data(&connection, &db_path, account_key, "account set-balance")
}

/// Toggles whether an existing account counts toward the current balance.
pub fn set_included(
    account_key: &str,
    included: bool,
    home_override: Option<&Path>,
) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(home_override)?;
    let db_path = setup.db_path_buf();
    let connection = open_connection(&db_path)?;
    let changed = connection
        .execute(
            "UPDATE internal_accounts SET included = ?2, updated_at = ?3 WHERE account_key = ?1",
            params![account_key, i64::from(included), now_timestamp()],
        )
        .map_err(|error| map_sqlite_error(&db_path, &error))?;
    if changed == 0 {
        return Err(ClientError::account_not_found(account_key));
    }

    let command = if included {
        "account include"
    } else {
        "account exclude"
    };
    account_balance_data(&connection, &db_path, account_key, command)
}

fn account_balance_data(
    connection: &Connection,
    db_path: &Path,
    account_key: &str,
    command: &str,
) -> ClientResult<SuccessEnvelope> {
    let data = query_accounts_data(connection, db_path)?;
    let Some(account) = data
        .rows
        .into_iter()
        .find(|row| row.account_key == account_key)
    else {
        return Err(ClientError::account_not_found(account_key));
    };
    success(
        command,
        AccountBalanceData {
            account,
            current_balance: data.current_balance,
        },
    )
}

pub(crate) fn query_accounts_data(
    connection: &Connection,
    db_path: &Path,
) -> ClientResult<AccountsData> {
    let mut statement = connection
        .prepare(
            "SELECT account_key, balance, included, updated_at
             FROM internal_accounts
             ORDER BY account_key ASC",
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let rows_iter = statement
        .query_map(params![], |row| {
            Ok(AccountRow {
                account_key: row.get(0)?,
                balance: row.get(1)?,
                included: row.get::<_, i64>(2)? != 0,
                updated_at: row.get(3)?,
            })
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut rows = Vec::new();
    for row in rows_iter {
        rows.push(row.map_err(|error| map_sqlite_error(db_path, &error))?);
    }

    Ok(AccountsData {
        current_balance: format_money(load_current_balance(connection, db_path)?),
        rows,
    })
}
