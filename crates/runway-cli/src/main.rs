mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use runway_client::ClientError;
use stdout_io::write_stdout_text;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const ROOT_HELP: &str = "runway - recurring cash flow and balance forecasting

Usage:
  runway <command>

Start here:
  runway import --help
  runway recurring
  runway forecast
";

const TOP_LEVEL_HELP: &str = "runway - recurring cash flow and balance forecasting

USAGE: runway <command>

Load your history:
  1. runway import --help                      Read the import fields and formats
  2. runway import --dry-run <path>            Validate a file without writing anything
  3. runway import <path>                      Add transactions to the ledger

Set the starting point:
  runway account set-balance <account> <amount>   Record what an account holds today
  runway account list                             Show balances and the current total

See what repeats and where your balance is heading:
  runway recurring                             Detect recurring income and expenses
  runway forecast --days 90                    Project the balance day by day
  runway forecast --threshold 500              Flag days below a safety margin

Tune the forecast:
  runway hide <merchant_key>                   Leave a merchant out of projections
  runway unhide <merchant_key>                 Bring a merchant back
  runway hidden                                List hidden merchants

Every command accepts --json for machine-readable output.
Set RUNWAY_HOME to keep the ledger somewhere other than ~/.runway.
Set RUST_LOG=runway_client=debug to trace detection on stderr.
";

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => return handle_parse_error(&raw_args, &err),
    };
    let mode = output::mode_for_command(&cli.command);

    match dispatch::dispatch(&cli) {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            debug!(code = %error.code, "command failed");
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn handle_parse_error(raw_args: &[String], err: &clap::Error) -> Result<ExitCode, ExitCode> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let body = if is_top_level_help_request(raw_args) {
                TOP_LEVEL_HELP.to_string()
            } else {
                err.to_string()
            };
            if write_stdout_text(&body).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        ErrorKind::DisplayVersion => {
            if write_stdout_text(&err.to_string()).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            let command_hint = command_path_from_args(raw_args);
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                ClientError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
            let mode = infer_requested_output_mode(raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(ExitCode::from(1))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Drops clap's trailing usage and "For more information" lines.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_start_matches("error: ").trim_end().to_string()
}

/// Subcommand path used for `--help` hints, e.g. "account set-balance".
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let non_flags: Vec<&str> = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect();

    let hint = match non_flags.as_slice() {
        ["account", "set-balance", ..] => "account set-balance",
        ["account", "include", ..] => "account include",
        ["account", "exclude", ..] => "account exclude",
        ["account", "list", ..] => "account list",
        ["account", ..] => "account",
        ["import", ..] => "import",
        ["recurring", ..] => "recurring",
        ["forecast", ..] => "forecast",
        ["hide", ..] => "hide",
        ["unhide", ..] => "unhide",
        ["hidden", ..] => "hidden",
        _ => return None,
    };
    Some(hint.to_string())
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if error.is_internal() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

#[cfg(test)]
mod tests {
    use super::{command_path_from_args, infer_requested_output_mode, strip_clap_boilerplate};
    use crate::output::OutputMode;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn command_paths_follow_subcommands() {
        assert_eq!(
            command_path_from_args(&args(&["runway", "account", "set-balance", "x"])).as_deref(),
            Some("account set-balance")
        );
        assert_eq!(
            command_path_from_args(&args(&["runway", "forecast", "--days", "abc"])).as_deref(),
            Some("forecast")
        );
        assert_eq!(command_path_from_args(&args(&["runway", "dash"])), None);
    }

    #[test]
    fn clap_boilerplate_is_removed() {
        let message = "error: unexpected argument '--bogus' found\n\nUsage: runway recurring\n\nFor more information, try '--help'.\n";
        assert_eq!(
            strip_clap_boilerplate(message),
            "unexpected argument '--bogus' found"
        );
    }

    #[test]
    fn json_flag_anywhere_requests_json_errors() {
        assert_eq!(
            infer_requested_output_mode(&args(&["runway", "forecast", "--days", "x", "--json"])),
            OutputMode::Json
        );
        assert_eq!(
            infer_requested_output_mode(&args(&["runway", "forecast"])),
            OutputMode::Text
        );
    }
}
