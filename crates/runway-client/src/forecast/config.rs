use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{ClientError, ClientResult};
use crate::forecast::date::add_months_clamped;
use crate::forecast::policy::DetectionPolicy;

pub const MAX_HORIZON_DAYS: u32 = 3660;
pub const MAX_HORIZON_MONTHS: u32 = 120;
pub const DEFAULT_HORIZON_DAYS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    Days(u32),
    Months(u32),
}

impl Horizon {
    /// Month horizons add calendar months to `today`, clamping to month end.
    pub fn to_days(self, today: NaiveDate) -> u32 {
        match self {
            Self::Days(days) => days,
            Self::Months(months) => {
                let end = add_months_clamped(today, months);
                u32::try_from((end - today).num_days()).unwrap_or(0)
            }
        }
    }

    pub fn validate(self) -> ClientResult<Self> {
        match self {
            Self::Days(days) if !(1..=MAX_HORIZON_DAYS).contains(&days) => {
                Err(ClientError::invalid_argument_for_command(
                    &format!("`--days` must be between 1 and {MAX_HORIZON_DAYS}."),
                    Some("forecast"),
                ))
            }
            Self::Months(months) if !(1..=MAX_HORIZON_MONTHS).contains(&months) => {
                Err(ClientError::invalid_argument_for_command(
                    &format!("`--months` must be between 1 and {MAX_HORIZON_MONTHS}."),
                    Some("forecast"),
                ))
            }
            valid => Ok(valid),
        }
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self::Days(DEFAULT_HORIZON_DAYS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForecastConfig {
    pub policy: DetectionPolicy,
    pub horizon: Horizon,
    pub danger_threshold: Decimal,
}

impl ForecastConfig {
    pub fn validate(self) -> ClientResult<Self> {
        self.horizon.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{ForecastConfig, Horizon, MAX_HORIZON_DAYS};
    use crate::forecast::policy::DASHBOARD_POLICY;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
    }

    #[test]
    fn month_horizon_clamps_to_month_end() {
        assert_eq!(Horizon::Months(1).to_days(date(2026, 1, 31)), 28);
        assert_eq!(Horizon::Months(12).to_days(date(2026, 3, 1)), 365);
        assert_eq!(Horizon::Days(45).to_days(date(2026, 3, 1)), 45);
    }

    #[test]
    fn day_horizon_bounds_are_enforced() {
        assert!(Horizon::Days(0).validate().is_err());
        assert!(Horizon::Days(1).validate().is_ok());
        assert!(Horizon::Days(MAX_HORIZON_DAYS).validate().is_ok());
        assert!(Horizon::Days(MAX_HORIZON_DAYS + 1).validate().is_err());
        assert!(Horizon::Months(0).validate().is_err());
    }

    #[test]
    fn defaults_use_dashboard_policy_and_zero_threshold() {
        let config = ForecastConfig::default();
        assert_eq!(config.policy, DASHBOARD_POLICY);
        assert_eq!(config.danger_threshold, Decimal::ZERO);
        assert_eq!(config.horizon, Horizon::Days(90));
        assert!(config.validate().is_ok());
    }
}
