use chrono::{Local, NaiveDate};
use runway_client::commands;
use runway_client::commands::accounts::SetBalanceOptions;
use runway_client::commands::common::parse_money_argument;
use runway_client::commands::exclusions::ExclusionRunOptions;
use runway_client::{ClientResult, ForecastConfig, Horizon, SuccessEnvelope};
use rust_decimal::Decimal;
use tracing::debug;

use crate::cli::{AccountCommand, Cli, Commands, IsoDate};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Import { dry_run, path, .. } => commands::import::run(path, *dry_run),
        Commands::Account { command } => match command {
            AccountCommand::SetBalance {
                account_key,
                amount,
                exclude,
                ..
            } => commands::accounts::set_balance(SetBalanceOptions {
                account_key: account_key.clone(),
                amount: amount.clone(),
                exclude: *exclude,
                home_override: None,
            }),
            AccountCommand::Include { account_key, .. } => {
                commands::accounts::set_included(account_key, true, None)
            }
            AccountCommand::Exclude { account_key, .. } => {
                commands::accounts::set_included(account_key, false, None)
            }
            AccountCommand::List { .. } => commands::accounts::run(),
        },
        Commands::Recurring { detection, .. } => {
            commands::recurring::run(detection.policy(), resolve_today(detection.today))
        }
        Commands::Forecast {
            detection,
            days,
            months,
            threshold,
            ..
        } => {
            let config = ForecastConfig {
                policy: detection.policy(),
                horizon: horizon_from_flags(*days, *months),
                danger_threshold: threshold_from_flag(threshold.as_deref())?,
            };
            commands::forecast::run(config, resolve_today(detection.today))
        }
        Commands::Hide {
            merchant_key,
            today,
            ..
        } => commands::exclusions::hide(exclusion_options(merchant_key, *today)),
        Commands::Unhide {
            merchant_key,
            today,
            ..
        } => commands::exclusions::unhide(exclusion_options(merchant_key, *today)),
        Commands::Hidden { .. } => commands::exclusions::list(None),
    }
}

/// The only place the wall clock is read.
fn resolve_today(explicit: Option<IsoDate>) -> NaiveDate {
    match explicit {
        Some(IsoDate(date)) => date,
        None => {
            let today = Local::now().date_naive();
            debug!(%today, "using local date as today");
            today
        }
    }
}

fn horizon_from_flags(days: Option<u32>, months: Option<u32>) -> Horizon {
    match (days, months) {
        (Some(days), _) => Horizon::Days(days),
        (None, Some(months)) => Horizon::Months(months),
        (None, None) => Horizon::default(),
    }
}

fn threshold_from_flag(value: Option<&str>) -> ClientResult<Decimal> {
    match value {
        Some(raw) => parse_money_argument(raw, "--threshold", "forecast"),
        None => Ok(Decimal::ZERO),
    }
}

fn exclusion_options(merchant_key: &str, today: Option<IsoDate>) -> ExclusionRunOptions<'static> {
    ExclusionRunOptions {
        merchant_key: merchant_key.to_string(),
        today: resolve_today(today),
        home_override: None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use runway_client::Horizon;
    use rust_decimal::Decimal;

    use super::{horizon_from_flags, resolve_today, threshold_from_flag};
    use crate::cli::IsoDate;

    #[test]
    fn horizon_defaults_to_ninety_days() {
        assert_eq!(horizon_from_flags(None, None), Horizon::Days(90));
        assert_eq!(horizon_from_flags(Some(14), None), Horizon::Days(14));
        assert_eq!(horizon_from_flags(None, Some(3)), Horizon::Months(3));
    }

    #[test]
    fn explicit_today_wins_over_the_clock() {
        let pinned = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap_or(NaiveDate::MIN);
        assert_eq!(resolve_today(Some(IsoDate(pinned))), pinned);
    }

    #[test]
    fn threshold_is_optional_and_validated() {
        assert_eq!(threshold_from_flag(None).ok(), Some(Decimal::ZERO));
        assert_eq!(
            threshold_from_flag(Some("-250.00")).ok(),
            Some(Decimal::new(-25000, 2))
        );
        assert!(threshold_from_flag(Some("ten")).is_err());
    }
}
