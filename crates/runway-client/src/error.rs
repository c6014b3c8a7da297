use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

use crate::contracts::types::{ImportIssue, ImportSummary};

pub(crate) const IMPORT_HELP_COMMAND: &str = "runway import --help";

const LEDGER_PERMISSION_DENIED: &str = "ledger_init_permission_denied";
const LEDGER_LOCKED: &str = "ledger_locked";
const LEDGER_CORRUPT: &str = "ledger_corrupt";
const MIGRATION_FAILED: &str = "migration_failed";
const LEDGER_INIT_FAILED: &str = "ledger_init_failed";

const LEDGER_FAILURE_CODES: [&str; 5] = [
    LEDGER_PERMISSION_DENIED,
    LEDGER_LOCKED,
    LEDGER_CORRUPT,
    MIGRATION_FAILED,
    LEDGER_INIT_FAILED,
];

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `runway {cmd} --help` for usage."),
            None => "Run `runway --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_import_format(message: &str, received_format: &str) -> Self {
        Self::invalid_argument_with_recovery(
            message,
            vec![
                "Provide a supported import format (JSON array or CSV).".to_string(),
                format!("Run `{IMPORT_HELP_COMMAND}` to confirm field requirements."),
            ],
        )
        .with_data(json!({
            "received_format": received_format,
            "supported_formats": ["json_array", "csv"],
        }))
    }

    pub fn import_schema_mismatch(
        expected_headers: Vec<String>,
        actual_headers: Vec<String>,
    ) -> Self {
        Self::new(
            "import_schema_mismatch",
            "CSV headers do not satisfy the import schema.",
            vec![
                "Include every required header and no unknown headers.".to_string(),
                format!("Run `{IMPORT_HELP_COMMAND}` to review the field list."),
            ],
        )
        .with_data(json!({
            "expected_headers": expected_headers,
            "actual_headers": actual_headers,
        }))
    }

    pub fn import_validation_failed(summary: ImportSummary, issues: Vec<ImportIssue>) -> Self {
        let issue_count = summary.rows_invalid;
        Self::new(
            "import_validation_failed",
            &format!(
                "Import failed validation: {issue_count} rows need fixes. No rows were written."
            ),
            vec![
                "Fix the listed issues in your source file.".to_string(),
                "Rerun runway import --dry-run <path>.".to_string(),
                "Then rerun runway import <path>.".to_string(),
            ],
        )
        .with_data(json!({
            "summary": summary,
            "issues": issues,
        }))
    }

    pub fn account_not_found(account_key: &str) -> Self {
        Self::new(
            "account_not_found",
            &format!("Account `{account_key}` has no recorded balance."),
            vec![
                "Run `runway account list` to see known accounts.".to_string(),
                "Record a balance with `runway account set-balance <account_key> <amount>`."
                    .to_string(),
            ],
        )
        .with_data(json!({
            "account_key": account_key,
        }))
    }

    pub fn exclusion_store_failed(merchant_key: &str, detail: &str) -> Self {
        Self::new(
            "exclusion_store_failed",
            &format!("Could not update the hidden state of `{merchant_key}`: {detail}"),
            vec![
                "Retry the command once other runway processes have finished.".to_string(),
                "Run `runway hidden` to confirm the current hidden set.".to_string(),
            ],
        )
        .with_data(json!({
            "merchant_key": merchant_key,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn ledger_init_permission_denied(path: &Path, detail: &str) -> Self {
        Self::at_ledger(
            LEDGER_PERMISSION_DENIED,
            path,
            |location| format!("Cannot initialize ledger at `{location}`: {detail}"),
            |location| {
                vec![format!(
                    "Grant write access to `{location}` or set `RUNWAY_HOME` to a writable directory."
                )]
            },
        )
    }

    pub fn ledger_locked(path: &Path) -> Self {
        Self::at_ledger(
            LEDGER_LOCKED,
            path,
            |location| format!("Ledger database is locked at `{location}`."),
            |location| {
                vec![format!(
                    "Close other processes using `{location}` so the lock is released."
                )]
            },
        )
    }

    pub fn ledger_corrupt(path: &Path) -> Self {
        Self::at_ledger(
            LEDGER_CORRUPT,
            path,
            |location| format!("Ledger database appears corrupt at `{location}`."),
            |location| {
                vec![format!(
                    "Replace `{location}` with a valid runway ledger file or restore from backup."
                )]
            },
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        Self::at_ledger(
            MIGRATION_FAILED,
            path,
            |location| format!("Ledger migration failed at `{location}`: {detail}"),
            |_| {
                vec![
                    "Resolve conflicting schema objects referenced in the error details."
                        .to_string(),
                ]
            },
        )
    }

    pub fn ledger_init_failed(path: &Path, detail: &str) -> Self {
        Self::at_ledger(
            LEDGER_INIT_FAILED,
            path,
            |location| format!("Ledger initialization failed at `{location}`: {detail}"),
            |_| Vec::new(),
        )
    }

    fn at_ledger(
        code: &str,
        path: &Path,
        message: impl FnOnce(&str) -> String,
        recovery_steps: impl FnOnce(&str) -> Vec<String>,
    ) -> Self {
        let location = path.display().to_string();
        Self::new(code, &message(&location), recovery_steps(&location))
    }

    /// Ledger-level failures the caller cannot fix by changing arguments.
    pub fn is_internal(&self) -> bool {
        self.code.starts_with("internal_") || LEDGER_FAILURE_CODES.contains(&self.code.as_str())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
