use rusqlite::Connection;
use rusqlite_migration::{M, Migrations};

const BOOTSTRAP_SQL: &str = include_str!("migrations/0001_bootstrap.sql");
const ADD_HIDDEN_MERCHANTS_SQL: &str = include_str!("migrations/0002_hidden_merchants.sql");

pub const REQUIRED_CORE_TABLES: [(&str, &[&str]); 5] = [
    ("internal_meta", &["key", "value"]),
    (
        "internal_import_runs",
        &[
            "import_id",
            "created_at",
            "rows_read",
            "inserted",
            "source_kind",
            "source_ref",
        ],
    ),
    (
        "internal_transactions",
        &[
            "txn_id",
            "import_id",
            "account_key",
            "posted_at",
            "amount",
            "description",
        ],
    ),
    (
        "internal_accounts",
        &["account_key", "balance", "included", "updated_at"],
    ),
    ("internal_hidden_merchants", &["merchant_key", "hidden_at"]),
];

pub const REQUIRED_META_KEYS: [(&str, &str); 3] = [
    ("schema_version", "v1"),
    ("import_contract_version", "v1"),
    ("exclusions_version", "v1"),
];

fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(BOOTSTRAP_SQL), M::up(ADD_HIDDEN_MERCHANTS_SQL)])
}

pub fn run_pending(conn: &mut Connection) -> rusqlite_migration::Result<()> {
    migrations().to_latest(conn)
}
