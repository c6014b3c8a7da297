pub(crate) mod input;
pub(crate) mod parse;
pub(crate) mod persist;
pub(crate) mod validate;

use rust_decimal::Decimal;
use tracing::info;

use crate::contracts::types::ImportSummary;
use crate::error::IMPORT_HELP_COMMAND;
use crate::setup::SetupContext;
use crate::state::open_connection;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub(crate) struct CanonicalTransaction {
    pub account_key: String,
    pub posted_at: String,
    pub amount: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct ImportExecutionResult {
    pub dry_run: bool,
    pub import_id: Option<String>,
    pub message: String,
    pub summary: ImportSummary,
}

pub(crate) fn execute(
    setup: &SetupContext,
    path: &str,
    dry_run: bool,
    stdin_override: Option<String>,
) -> ClientResult<ImportExecutionResult> {
    let source = input::resolve_source(path, stdin_override)?;
    let parsed_rows = parse::parse_source(&source.content)?;
    let validated = validate::validate_rows(parsed_rows)?;

    if dry_run {
        return Ok(ImportExecutionResult {
            dry_run: true,
            import_id: None,
            message: "Validation passed. No rows were written.".to_string(),
            summary: validated.summary,
        });
    }

    let db_path = setup.db_path_buf();
    let mut connection = open_connection(&db_path)?;
    let persisted = persist::persist_import(
        &mut connection,
        &db_path,
        persist::PersistInput {
            rows: &validated.rows,
            rows_read: validated.summary.rows_read,
            source_kind: source.source_kind.as_str(),
            source_ref: source.source_ref.as_deref(),
        },
    )?;
    info!(
        import_id = %persisted.import_id,
        inserted = persisted.inserted,
        "import committed"
    );

    Ok(ImportExecutionResult {
        dry_run: false,
        import_id: Some(persisted.import_id),
        message: "Import completed successfully.".to_string(),
        summary: ImportSummary {
            inserted: persisted.inserted,
            ..validated.summary
        },
    })
}

pub(crate) fn invalid_input_error(message: &str) -> ClientError {
    ClientError::invalid_argument_with_recovery(
        message,
        vec![
            "Provide JSON array or CSV input via a path, or `-` for stdin.".to_string(),
            format!("Run `{IMPORT_HELP_COMMAND}` to confirm import field requirements."),
        ],
    )
}
