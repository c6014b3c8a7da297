use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use runway_client::{DASHBOARD_POLICY, DetectionPolicy, SUGGESTIONS_POLICY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsoDate(pub NaiveDate);

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    if value.len() != 10 {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return Err("date must use YYYY-MM-DD format".to_string());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(IsoDate)
        .map_err(|_| "date must use valid calendar values".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Preset {
    /// At least three occurrences with steady spacing
    #[default]
    Dashboard,
    /// Two occurrences are enough and spacing is not checked
    Suggestions,
}

impl Preset {
    pub fn policy(self) -> DetectionPolicy {
        match self {
            Self::Dashboard => DASHBOARD_POLICY,
            Self::Suggestions => SUGGESTIONS_POLICY,
        }
    }
}

/// Extended help shown after `runway import --help`.
pub const IMPORT_AFTER_HELP: &str = "\
Accepted formats:
  JSON  one top-level array of transaction objects
  CSV   one header row with field names

  <path> is a local file path. Use `-` to read stdin.
  Example: cat rows.json | runway import --dry-run -

Fields:
  account_key (required)   stable account name, e.g. `checking`
  posted_at   (required)   date only, exactly `YYYY-MM-DD`
  amount      (required)   signed decimal, at most 2 places
                           negative = money out, positive = money in
  description (optional)   raw transaction text; rows without one are
                           stored but never used for recurring detection

  JSON example:
  [
    {\"account_key\": \"checking\", \"posted_at\": \"2026-01-15\", \"amount\": -15.99, \"description\": \"NETFLIX.COM\"}
  ]

  CSV example:
  account_key,posted_at,amount,description
  checking,2026-01-15,-15.99,NETFLIX.COM

Any invalid row rejects the whole file. Run with --dry-run first.
";

#[derive(Debug, Parser)]
#[command(
    name = "runway",
    version,
    about = "recurring cash-flow detection and balance forecasting",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct DetectionArgs {
    /// Threshold preset for recurring detection
    #[arg(long, value_enum, default_value_t = Preset::Dashboard)]
    pub preset: Preset,
    /// Override the minimum number of occurrences (never below 2)
    #[arg(long)]
    pub min_occurrences: Option<usize>,
    /// Accept clusters regardless of interval spread
    #[arg(long)]
    pub no_consistency_filter: bool,
    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, value_parser = parse_iso_date)]
    pub today: Option<IsoDate>,
}

impl DetectionArgs {
    pub fn policy(&self) -> DetectionPolicy {
        let mut policy = self.preset.policy();
        if let Some(min_occurrences) = self.min_occurrences {
            policy = policy.with_min_occurrences(min_occurrences);
        }
        if self.no_consistency_filter {
            policy = policy.with_consistency_filter(false);
        }
        policy
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import transactions from a JSON array or CSV file
    #[command(after_long_help = IMPORT_AFTER_HELP)]
    Import {
        /// Validate without writing to the ledger
        #[arg(long)]
        dry_run: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
        /// Path to a JSON or CSV file (use `-` for stdin)
        path: String,
    },
    /// Manage account balances used as the projection starting point
    #[command(arg_required_else_help = true)]
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },
    /// Detect recurring income and expenses
    Recurring {
        #[command(flatten)]
        detection: DetectionArgs,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Project the balance day by day using recurring patterns
    Forecast {
        #[command(flatten)]
        detection: DetectionArgs,
        /// Horizon in days (1-3660)
        #[arg(long, conflicts_with = "months")]
        days: Option<u32>,
        /// Horizon in calendar months
        #[arg(long)]
        months: Option<u32>,
        /// Flag days whose balance falls below this amount
        #[arg(long, allow_hyphen_values = true)]
        threshold: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Hide a merchant from projections
    Hide {
        /// Merchant key as shown by `runway recurring`
        merchant_key: String,
        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        today: Option<IsoDate>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show a hidden merchant in projections again
    Unhide {
        /// Merchant key as shown by `runway hidden`
        merchant_key: String,
        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        today: Option<IsoDate>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// List hidden merchant keys
    Hidden {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum AccountCommand {
    /// Record the current balance of an account
    SetBalance {
        /// Stable account name
        account_key: String,
        /// Balance as a decimal amount
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Keep the balance out of the projection starting point
        #[arg(long)]
        exclude: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Count an account toward the projection starting point
    Include {
        account_key: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Stop counting an account toward the projection starting point
    Exclude {
        account_key: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show recorded balances and the current total
    List {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
