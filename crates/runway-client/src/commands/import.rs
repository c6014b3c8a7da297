use std::path::Path;

use crate::ClientResult;
use crate::commands::common::data_range_hint;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{ImportData, ImportIssue};
use crate::import;
use crate::setup::load_setup;

#[derive(Debug, Default)]
pub struct ImportRunOptions<'a> {
    pub path: String,
    pub dry_run: bool,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

pub fn run(path: &str, dry_run: bool) -> ClientResult<SuccessEnvelope> {
    run_with_options(ImportRunOptions {
        path: path.to_string(),
        dry_run,
        home_override: None,
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ImportRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let execution = import::execute(
        &setup,
        &options.path,
        options.dry_run,
        options.stdin_override,
    )?;
    // Committed rows move the covered date range.
    let after = if execution.dry_run {
        setup
    } else {
        load_setup(options.home_override)?
    };

    let data = ImportData {
        dry_run: execution.dry_run,
        path: (options.path != "-").then_some(options.path),
        import_id: execution.import_id,
        message: execution.message,
        summary: execution.summary,
        issues: Vec::<ImportIssue>::new(),
        data_range_hint: data_range_hint(&after.data_range),
    };

    success("import", data)
}
