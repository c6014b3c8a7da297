use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::forecast::cluster::cluster_merchants;
use crate::forecast::frequency::{FrequencyClass, rounded_interval_days};
use crate::forecast::intervals::{AnalyzedCluster, analyze_clusters};
use crate::forecast::normalize::{normalize_transactions, round_cents};
use crate::forecast::policy::DetectionPolicy;
use crate::forecast::predict::predict_next_occurrence;
use crate::forecast::similarity::{DescriptionSimilarity, JaroWinkler};
use crate::forecast::types::{RawTransaction, RecurringPattern};

pub fn detect_recurring(
    transactions: &[RawTransaction],
    policy: &DetectionPolicy,
    today: NaiveDate,
    hidden_keys: &BTreeSet<String>,
) -> Vec<RecurringPattern> {
    detect_recurring_with(transactions, policy, today, hidden_keys, &JaroWinkler)
}

pub fn detect_recurring_with(
    transactions: &[RawTransaction],
    policy: &DetectionPolicy,
    today: NaiveDate,
    hidden_keys: &BTreeSet<String>,
    similarity: &dyn DescriptionSimilarity,
) -> Vec<RecurringPattern> {
    let normalized = normalize_transactions(transactions);
    let clusters = cluster_merchants(&normalized, similarity, policy.similarity_threshold);
    let analyzed = analyze_clusters(clusters, policy);

    let mut patterns = analyzed
        .iter()
        .filter_map(|candidate| build_pattern(candidate, today, hidden_keys))
        .collect::<Vec<RecurringPattern>>();
    patterns.sort_by(compare_patterns);

    debug!(
        transactions = transactions.len(),
        patterns = patterns.len(),
        "detected recurring patterns"
    );
    patterns
}

/// Recomputes `is_hidden` from the exclusion set; nothing else changes.
pub fn apply_exclusions(
    patterns: &[RecurringPattern],
    hidden_keys: &BTreeSet<String>,
) -> Vec<RecurringPattern> {
    patterns
        .iter()
        .map(|pattern| RecurringPattern {
            is_hidden: hidden_keys.contains(&pattern.merchant_key),
            ..pattern.clone()
        })
        .collect()
}

fn build_pattern(
    candidate: &AnalyzedCluster,
    today: NaiveDate,
    hidden_keys: &BTreeSet<String>,
) -> Option<RecurringPattern> {
    let members = &candidate.cluster.members;
    let representative = members.first()?;
    let total = members
        .iter()
        .map(|member| member.amount)
        .sum::<Decimal>();
    let avg_amount = round_cents(total / Decimal::from(members.len()));

    let interval_days = rounded_interval_days(candidate.stats.avg_interval_days);
    let next_date = predict_next_occurrence(candidate.stats.last_date, interval_days, today);

    Some(RecurringPattern {
        merchant_key: candidate.cluster.merchant_key.clone(),
        description: representative.description.clone(),
        avg_amount,
        occurrence_count: candidate.stats.occurrence_count,
        avg_interval_days: candidate.stats.avg_interval_days,
        stddev_interval_days: candidate.stats.stddev_interval_days,
        interval_days,
        last_date: candidate.stats.last_date,
        next_date,
        frequency_class: FrequencyClass::classify(interval_days),
        is_income: avg_amount > Decimal::ZERO,
        is_hidden: hidden_keys.contains(&candidate.cluster.merchant_key),
    })
}

fn compare_patterns(left: &RecurringPattern, right: &RecurringPattern) -> Ordering {
    left.next_date
        .cmp(&right.next_date)
        .then_with(|| left.merchant_key.cmp(&right.merchant_key))
        .then_with(|| left.avg_amount.cmp(&right.avg_amount))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{apply_exclusions, detect_recurring};
    use crate::forecast::date::shift_days;
    use crate::forecast::frequency::FrequencyClass;
    use crate::forecast::policy::{DASHBOARD_POLICY, SUGGESTIONS_POLICY};
    use crate::forecast::types::RawTransaction;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap_or(NaiveDate::MIN)
    }

    fn row(offset: i64, cents: i64, description: &str) -> RawTransaction {
        RawTransaction {
            description: description.to_string(),
            amount: Decimal::new(cents, 2),
            date: shift_days(today(), offset),
        }
    }

    #[test]
    fn monthly_subscription_is_detected_with_next_date_in_future() {
        let input = vec![
            row(-95, -1599, "NETFLIX.COM"),
            row(-65, -1599, "Netflix.com"),
            row(-35, -1599, "NETFLIX.COM"),
            row(-5, -1599, "NETFLIX.COM"),
        ];
        let patterns = detect_recurring(&input, &DASHBOARD_POLICY, today(), &BTreeSet::new());
        assert_eq!(patterns.len(), 1);
        let pattern = &patterns[0];
        assert_eq!(pattern.merchant_key, "NETFLIX.COM");
        assert_eq!(pattern.occurrence_count, 4);
        assert_eq!(pattern.interval_days, 30);
        assert_eq!(pattern.frequency_class, FrequencyClass::Monthly);
        assert_eq!(pattern.next_date, shift_days(today(), 25));
        assert_eq!(pattern.avg_amount, Decimal::new(-1599, 2));
        assert!(!pattern.is_income);
        assert!(!pattern.is_hidden);
    }

    #[test]
    fn inconsistent_spacing_depends_on_the_preset() {
        let input = vec![
            row(-40, -1299, "Music Plus"),
            row(-10, -1299, "Music Plus"),
            row(0, -1299, "Music Plus"),
        ];
        let strict = detect_recurring(&input, &DASHBOARD_POLICY, today(), &BTreeSet::new());
        assert!(strict.is_empty());

        let lenient = detect_recurring(&input, &SUGGESTIONS_POLICY, today(), &BTreeSet::new());
        assert_eq!(lenient.len(), 1);
        assert_eq!(lenient[0].frequency_class, FrequencyClass::Monthly);
        assert_eq!(lenient[0].avg_interval_days, 20.0);
    }

    #[test]
    fn single_transaction_never_becomes_a_pattern() {
        let input = vec![row(-3, -4999, "One Off Store")];
        for policy in [
            DASHBOARD_POLICY,
            SUGGESTIONS_POLICY,
            SUGGESTIONS_POLICY.with_min_occurrences(1),
        ] {
            assert!(detect_recurring(&input, &policy, today(), &BTreeSet::new()).is_empty());
        }
    }

    #[test]
    fn income_and_hidden_flags_are_derived() {
        let input = vec![
            row(-28, 250000, "ACME PAYROLL"),
            row(-14, 250000, "ACME PAYROLL"),
            row(0, 250000, "ACME PAYROLL"),
        ];
        let hidden = BTreeSet::from(["ACME PAYROLL".to_string()]);
        let patterns = detect_recurring(&input, &DASHBOARD_POLICY, today(), &hidden);
        assert_eq!(patterns.len(), 1);
        assert!(patterns[0].is_income);
        assert!(patterns[0].is_hidden);
        assert_eq!(patterns[0].frequency_class, FrequencyClass::Biweekly);

        let restored = apply_exclusions(&patterns, &BTreeSet::new());
        assert!(!restored[0].is_hidden);
        assert_eq!(
            apply_exclusions(&restored, &hidden),
            patterns,
            "re-deriving with the same set reproduces the original"
        );
    }

    #[test]
    fn patterns_are_ordered_by_next_date_then_key() {
        let input = vec![
            row(-21, -1000, "Weekly Box"),
            row(-14, -1000, "Weekly Box"),
            row(-7, -1000, "Weekly Box"),
            row(-60, -4500, "Gym Club"),
            row(-30, -4500, "Gym Club"),
            row(-1, -4500, "Gym Club"),
        ];
        let patterns = detect_recurring(&input, &DASHBOARD_POLICY, today(), &BTreeSet::new());
        assert_eq!(patterns.len(), 2);
        assert!(patterns[0].next_date <= patterns[1].next_date);
        for pattern in &patterns {
            assert!(pattern.next_date >= today());
            assert!(pattern.avg_interval_days >= 5.0 && pattern.avg_interval_days <= 400.0);
            assert!(pattern.occurrence_count >= DASHBOARD_POLICY.min_occurrences);
        }
    }
}
