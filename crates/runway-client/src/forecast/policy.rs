use crate::forecast::intervals::IntervalStats;

/// Threshold set for recurring detection.
///
/// Emitted with results via `version` so a threshold change shows up in
/// output diffs rather than silently shifting detections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionPolicy {
    pub version: &'static str,
    pub min_occurrences: usize,
    pub consistency_filter: bool,
    /// Interval stddev must stay strictly below `consistency_ratio × mean`.
    pub consistency_ratio: f64,
    /// Off-canonical descriptions merge only when similarity is strictly above this.
    pub similarity_threshold: f64,
    pub min_avg_interval_days: f64,
    pub max_avg_interval_days: f64,
}

impl DetectionPolicy {
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "dashboard" => Some(DASHBOARD_POLICY),
            "suggestions" => Some(SUGGESTIONS_POLICY),
            _ => None,
        }
    }

    pub fn with_min_occurrences(mut self, min_occurrences: usize) -> Self {
        if self.min_occurrences != min_occurrences {
            self.min_occurrences = min_occurrences;
            self.version = CUSTOM_POLICY_VERSION;
        }
        self
    }

    pub fn with_consistency_filter(mut self, enabled: bool) -> Self {
        if self.consistency_filter != enabled {
            self.consistency_filter = enabled;
            self.version = CUSTOM_POLICY_VERSION;
        }
        self
    }

    /// A single observation has no interval, so two is the floor regardless of configuration.
    pub fn effective_min_occurrences(self) -> usize {
        self.min_occurrences.max(2)
    }

    pub fn accepts(self, stats: &IntervalStats) -> bool {
        if stats.occurrence_count < self.effective_min_occurrences() {
            return false;
        }
        if stats.avg_interval_days < self.min_avg_interval_days
            || stats.avg_interval_days > self.max_avg_interval_days
        {
            return false;
        }
        if self.consistency_filter
            && stats.stddev_interval_days >= self.consistency_ratio * stats.avg_interval_days
        {
            return false;
        }
        true
    }
}

pub const CUSTOM_POLICY_VERSION: &str = "recurring/custom";

/// Live dashboard: three sightings with steady spacing.
pub const DASHBOARD_POLICY: DetectionPolicy = DetectionPolicy {
    version: "recurring/dashboard-v1",
    min_occurrences: 3,
    consistency_filter: true,
    consistency_ratio: 0.5,
    similarity_threshold: 0.7,
    min_avg_interval_days: 5.0,
    max_avg_interval_days: 400.0,
};

/// One-shot suggestion list: two sightings, spacing not checked.
pub const SUGGESTIONS_POLICY: DetectionPolicy = DetectionPolicy {
    version: "recurring/suggestions-v1",
    min_occurrences: 2,
    consistency_filter: false,
    consistency_ratio: 0.5,
    similarity_threshold: 0.7,
    min_avg_interval_days: 5.0,
    max_avg_interval_days: 400.0,
};

impl Default for DetectionPolicy {
    fn default() -> Self {
        DASHBOARD_POLICY
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{DASHBOARD_POLICY, DetectionPolicy, SUGGESTIONS_POLICY};
    use crate::forecast::intervals::IntervalStats;

    fn stats(occurrence_count: usize, avg: f64, stddev: f64) -> IntervalStats {
        IntervalStats {
            occurrence_count,
            avg_interval_days: avg,
            stddev_interval_days: stddev,
            last_date: NaiveDate::MIN,
        }
    }

    #[test]
    fn presets_differ_only_in_occurrences_and_consistency() {
        assert_eq!(DASHBOARD_POLICY.min_occurrences, 3);
        assert!(DASHBOARD_POLICY.consistency_filter);
        assert_eq!(SUGGESTIONS_POLICY.min_occurrences, 2);
        assert!(!SUGGESTIONS_POLICY.consistency_filter);
        assert_eq!(
            DASHBOARD_POLICY.similarity_threshold,
            SUGGESTIONS_POLICY.similarity_threshold
        );
        assert_eq!(DetectionPolicy::preset("dashboard"), Some(DASHBOARD_POLICY));
        assert_eq!(DetectionPolicy::preset("weekly"), None);
    }

    #[test]
    fn interval_bounds_are_inclusive() {
        let policy = SUGGESTIONS_POLICY;
        assert!(policy.accepts(&stats(2, 5.0, 0.0)));
        assert!(policy.accepts(&stats(2, 400.0, 0.0)));
        assert!(!policy.accepts(&stats(2, 4.99, 0.0)));
        assert!(!policy.accepts(&stats(2, 400.01, 0.0)));
    }

    #[test]
    fn consistency_gate_is_strict() {
        assert!(!DASHBOARD_POLICY.accepts(&stats(3, 20.0, 10.0)));
        assert!(DASHBOARD_POLICY.accepts(&stats(3, 20.0, 9.99)));
        assert!(DASHBOARD_POLICY.with_consistency_filter(false).accepts(&stats(3, 20.0, 10.0)));
    }

    #[test]
    fn single_occurrence_is_rejected_even_with_a_minimum_of_one() {
        let policy = SUGGESTIONS_POLICY.with_min_occurrences(1);
        assert_eq!(policy.effective_min_occurrences(), 2);
        assert!(!policy.accepts(&stats(1, 30.0, 0.0)));
    }

    #[test]
    fn overrides_mark_the_policy_as_custom() {
        let policy = DASHBOARD_POLICY.with_min_occurrences(4);
        assert_eq!(policy.version, super::CUSTOM_POLICY_VERSION);
        let untouched = DASHBOARD_POLICY.with_consistency_filter(true);
        assert_eq!(untouched.version, DASHBOARD_POLICY.version);
    }
}
