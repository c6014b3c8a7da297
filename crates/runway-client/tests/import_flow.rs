mod support;

use rusqlite::Connection;
use runway_client::commands::import::{self, ImportRunOptions};
use serde_json::Value;
use support::ledger_testkit::{payload, temp_home, transaction, write_fixture};

const CSV_ROWS: &str = "account_key,posted_at,amount,description
checking,2026-01-03,-15.99,NETFLIX.COM
checking,2026-01-15,2500.00,ACME PAYROLL
savings,2026-01-20,10,
";

fn transaction_count(home: &std::path::Path) -> i64 {
    Connection::open(home.join("ledger.db"))
        .and_then(|conn| {
            conn.query_row("SELECT COUNT(*) FROM internal_transactions", [], |row| {
                row.get::<_, i64>(0)
            })
        })
        .unwrap_or(-1)
}

#[test]
fn dry_run_validates_without_writing() {
    let Ok((_dir, home)) = temp_home("runway-import") else {
        return;
    };
    let path = write_fixture(&home, "rows.csv", CSV_ROWS);

    let value = payload(import::run_with_options(ImportRunOptions {
        path: path.display().to_string(),
        dry_run: true,
        home_override: Some(&home),
        stdin_override: None,
    }));

    assert_eq!(value["command"], "import");
    assert_eq!(value["data"]["dry_run"], Value::Bool(true));
    assert_eq!(value["data"]["summary"]["rows_read"], 3);
    assert_eq!(value["data"]["summary"]["rows_valid"], 3);
    assert_eq!(value["data"]["summary"]["inserted"], 0);
    assert!(value["data"].get("import_id").is_none());
    assert_eq!(transaction_count(&home), 0);
}

#[test]
fn commit_inserts_rows_and_reports_the_new_range() {
    let Ok((_dir, home)) = temp_home("runway-import") else {
        return;
    };
    let path = write_fixture(&home, "rows.csv", CSV_ROWS);

    let value = payload(import::run_with_options(ImportRunOptions {
        path: path.display().to_string(),
        dry_run: false,
        home_override: Some(&home),
        stdin_override: None,
    }));

    assert_eq!(value["data"]["summary"]["inserted"], 3);
    assert!(value["data"]["import_id"].is_string());
    assert_eq!(value["data"]["data_range_hint"]["earliest"], "2026-01-03");
    assert_eq!(value["data"]["data_range_hint"]["latest"], "2026-01-20");
    assert_eq!(transaction_count(&home), 3);

    let stored_amount = Connection::open(home.join("ledger.db")).and_then(|conn| {
        conn.query_row(
            "SELECT amount FROM internal_transactions WHERE description = 'NETFLIX.COM'",
            [],
            |row| row.get::<_, String>(0),
        )
    });
    assert_eq!(stored_amount.ok().as_deref(), Some("-15.99"));
}

#[test]
fn json_from_stdin_is_accepted() {
    let Ok((_dir, home)) = temp_home("runway-import") else {
        return;
    };
    let rows = vec![
        transaction("checking", "2026-02-01", -9.99, "SPOTIFY"),
        transaction("checking", "2026-03-01", -9.99, "SPOTIFY"),
    ];

    let value = payload(import::run_with_options(ImportRunOptions {
        path: "-".to_string(),
        dry_run: false,
        home_override: Some(&home),
        stdin_override: serde_json::to_string(&rows).ok(),
    }));

    assert_eq!(value["data"]["summary"]["inserted"], 2);
    assert_eq!(value["data"]["path"], Value::Null);
}

#[test]
fn one_invalid_row_rejects_the_whole_file() {
    let Ok((_dir, home)) = temp_home("runway-import") else {
        return;
    };
    let path = write_fixture(
        &home,
        "rows.csv",
        "account_key,posted_at,amount,description
checking,2026-01-03,-15.99,NETFLIX.COM
checking,2026-13-01,-1.00,BAD MONTH
checking,2026-01-04,-1.005,TOO PRECISE
",
    );

    let result = import::run_with_options(ImportRunOptions {
        path: path.display().to_string(),
        dry_run: false,
        home_override: Some(&home),
        stdin_override: None,
    });

    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.code, "import_validation_failed");
        assert!(!error.is_internal());
        let issues = error
            .data
            .as_ref()
            .and_then(|data| data.get("issues"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let codes = issues
            .iter()
            .filter_map(|issue| issue["code"].as_str())
            .collect::<Vec<&str>>();
        assert_eq!(codes, vec!["invalid_date", "invalid_amount_scale"]);
        assert_eq!(issues[0]["row"], 2);
    }
    assert_eq!(transaction_count(&home), 0);
}

#[test]
fn unknown_csv_header_is_a_schema_mismatch() {
    let Ok((_dir, home)) = temp_home("runway-import") else {
        return;
    };
    let path = write_fixture(
        &home,
        "rows.csv",
        "account_key,posted_at,amount,currency\nchecking,2026-01-03,-15.99,USD\n",
    );

    let result = import::run_with_options(ImportRunOptions {
        path: path.display().to_string(),
        dry_run: true,
        home_override: Some(&home),
        stdin_override: None,
    });

    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.code, "import_schema_mismatch");
    }
}

#[test]
fn empty_stdin_is_an_argument_error() {
    let Ok((_dir, home)) = temp_home("runway-import") else {
        return;
    };

    let result = import::run_with_options(ImportRunOptions {
        path: "-".to_string(),
        dry_run: true,
        home_override: Some(&home),
        stdin_override: Some("   \n".to_string()),
    });

    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.code, "invalid_argument");
    }
}

#[test]
fn missing_file_is_an_argument_error() {
    let Ok((_dir, home)) = temp_home("runway-import") else {
        return;
    };

    let result = import::run_with_options(ImportRunOptions {
        path: home.join("nope.csv").display().to_string(),
        dry_run: true,
        home_override: Some(&home),
        stdin_override: None,
    });

    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.code, "invalid_argument");
    }
}
