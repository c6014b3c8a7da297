mod error_text;
mod forecast_text;
mod format;
mod json;
mod ledger_text;
mod mode;

use std::io;

use runway_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_line;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "import" => ledger_text::render_import(&success.data),
        "account list" => ledger_text::render_account_list(&success.data),
        "account set-balance" | "account include" | "account exclude" => {
            ledger_text::render_account_change(&success.command, &success.data)
        }
        "hide" | "unhide" => ledger_text::render_exclusion_change(&success.data),
        "hidden" => ledger_text::render_hidden(&success.data),
        "recurring" => forecast_text::render_recurring(&success.data),
        "forecast" => forecast_text::render_forecast(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
