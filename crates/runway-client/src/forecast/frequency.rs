#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FrequencyClass {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Annual,
}

impl FrequencyClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annual => "annual",
        }
    }

    /// Buckets a whole-day interval; first matching upper bound wins.
    pub const fn classify(interval_days: i64) -> Self {
        if interval_days <= 8 {
            Self::Weekly
        } else if interval_days <= 16 {
            Self::Biweekly
        } else if interval_days <= 35 {
            Self::Monthly
        } else if interval_days <= 100 {
            Self::Quarterly
        } else {
            Self::Annual
        }
    }
}

/// Rounds a mean interval to whole days (half away from zero), never below one day.
pub fn rounded_interval_days(avg_interval_days: f64) -> i64 {
    if !avg_interval_days.is_finite() {
        return 1;
    }
    (avg_interval_days.round() as i64).max(1)
}
