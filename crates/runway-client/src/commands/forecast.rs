use std::path::Path;

use chrono::NaiveDate;

use crate::ClientResult;
use crate::commands::common::{
    data_range_hint, format_money, projection_day_row, projection_summary_row, recurring_row,
};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{DataRange, ForecastData};
use crate::forecast::config::ForecastConfig;
use crate::forecast::date::format_iso_date;
use crate::forecast::refresh::{ForecastSnapshot, refresh};
use crate::setup::load_setup;
use crate::state::open_connection;

#[derive(Debug)]
pub struct ForecastRunOptions<'a> {
    pub config: ForecastConfig,
    pub today: NaiveDate,
    pub home_override: Option<&'a Path>,
}

pub fn run(config: ForecastConfig, today: NaiveDate) -> ClientResult<SuccessEnvelope> {
    run_with_options(ForecastRunOptions {
        config,
        today,
        home_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ForecastRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let config = options.config.validate()?;
    let setup = load_setup(options.home_override)?;
    let db_path = setup.db_path_buf();
    let connection = open_connection(&db_path)?;
    let snapshot = refresh(&connection, &db_path, &config, options.today)?;

    success("forecast", forecast_data(&snapshot, &setup.data_range))
}

fn forecast_data(snapshot: &ForecastSnapshot, data_range: &DataRange) -> ForecastData {
    ForecastData {
        policy_version: snapshot.policy_version.to_string(),
        today: format_iso_date(&snapshot.today),
        horizon_days: snapshot.horizon_days,
        danger_threshold: format_money(snapshot.danger_threshold),
        patterns: snapshot.patterns.iter().map(recurring_row).collect(),
        summary: projection_summary_row(&snapshot.summary),
        days: snapshot.days.iter().map(projection_day_row).collect(),
        data_range_hint: data_range_hint(data_range),
    }
}
