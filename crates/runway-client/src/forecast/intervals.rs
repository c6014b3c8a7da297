use chrono::NaiveDate;
use tracing::debug;

use crate::forecast::policy::DetectionPolicy;
use crate::forecast::types::MerchantCluster;

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalStats {
    pub occurrence_count: usize,
    pub avg_interval_days: f64,
    /// Population standard deviation of the gaps.
    pub stddev_interval_days: f64,
    pub last_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct AnalyzedCluster {
    pub cluster: MerchantCluster,
    pub stats: IntervalStats,
}

/// Day gaps between consecutive members. Members must already be date-ordered.
pub fn consecutive_gaps(cluster: &MerchantCluster) -> Vec<i64> {
    cluster
        .members
        .windows(2)
        .map(|pair| (pair[1].date - pair[0].date).num_days())
        .collect()
}

/// `None` when the cluster has no gaps to measure.
pub fn interval_stats(cluster: &MerchantCluster) -> Option<IntervalStats> {
    let gaps = consecutive_gaps(cluster);
    if gaps.is_empty() {
        return None;
    }
    let last_date = cluster.members.iter().map(|member| member.date).max()?;

    let count = gaps.len() as f64;
    let mean = gaps.iter().map(|gap| *gap as f64).sum::<f64>() / count;
    let variance = gaps
        .iter()
        .map(|gap| {
            let delta = *gap as f64 - mean;
            delta * delta
        })
        .sum::<f64>()
        / count;

    Some(IntervalStats {
        occurrence_count: gaps.len() + 1,
        avg_interval_days: mean,
        stddev_interval_days: variance.sqrt(),
        last_date,
    })
}

pub fn analyze_clusters(
    clusters: Vec<MerchantCluster>,
    policy: &DetectionPolicy,
) -> Vec<AnalyzedCluster> {
    let total = clusters.len();
    let accepted = clusters
        .into_iter()
        .filter_map(|cluster| {
            let stats = interval_stats(&cluster)?;
            if !policy.accepts(&stats) {
                return None;
            }
            Some(AnalyzedCluster { cluster, stats })
        })
        .collect::<Vec<AnalyzedCluster>>();

    debug!(
        clusters = total,
        accepted = accepted.len(),
        policy = policy.version,
        "filtered clusters by interval statistics"
    );
    accepted
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{analyze_clusters, consecutive_gaps, interval_stats};
    use crate::forecast::date::shift_days;
    use crate::forecast::policy::{DASHBOARD_POLICY, SUGGESTIONS_POLICY};
    use crate::forecast::types::{MerchantCluster, NormalizedTransaction};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap_or(NaiveDate::MIN)
    }

    fn cluster(offsets: &[i64]) -> MerchantCluster {
        let members = offsets
            .iter()
            .map(|offset| NormalizedTransaction {
                norm_amount: Decimal::new(-1299, 2),
                upper_description: "STREAMING CO".to_string(),
                description: "Streaming Co".to_string(),
                amount: Decimal::new(-1299, 2),
                date: shift_days(today(), *offset),
            })
            .collect();
        MerchantCluster {
            merchant_key: "STREAMING CO".to_string(),
            norm_amount: Decimal::new(-1299, 2),
            members,
        }
    }

    #[test]
    fn occurrence_count_is_gap_count_plus_one() {
        let sample = cluster(&[-90, -60, -30, 0]);
        let gaps = consecutive_gaps(&sample);
        let stats = interval_stats(&sample);
        assert!(stats.is_some());
        if let Some(value) = stats {
            assert_eq!(value.occurrence_count, gaps.len() + 1);
            assert_eq!(value.avg_interval_days, 30.0);
            assert_eq!(value.stddev_interval_days, 0.0);
            assert_eq!(value.last_date, today());
        }
    }

    #[test]
    fn uneven_gaps_use_population_stddev() {
        let stats = interval_stats(&cluster(&[-40, -10, 0]));
        assert!(stats.is_some());
        if let Some(value) = stats {
            assert_eq!(value.avg_interval_days, 20.0);
            assert!((value.stddev_interval_days - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn single_member_has_no_statistics() {
        assert!(interval_stats(&cluster(&[0])).is_none());
        let policy = SUGGESTIONS_POLICY.with_min_occurrences(1);
        assert!(analyze_clusters(vec![cluster(&[0])], &policy).is_empty());
    }

    #[test]
    fn same_day_duplicates_count_as_separate_occurrences() {
        let stats = interval_stats(&cluster(&[-14, -7, -7, 0]));
        assert!(stats.is_some());
        if let Some(value) = stats {
            assert_eq!(value.occurrence_count, 4);
            assert!((value.avg_interval_days - 14.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn inconsistent_cluster_is_rejected_only_under_consistency_filter() {
        let clusters = vec![cluster(&[-40, -10, 0])];
        assert!(analyze_clusters(clusters.clone(), &DASHBOARD_POLICY).is_empty());
        let accepted = analyze_clusters(clusters, &SUGGESTIONS_POLICY);
        assert_eq!(accepted.len(), 1);
    }

    #[test]
    fn too_frequent_or_too_rare_clusters_are_dropped() {
        let daily = cluster(&[-3, -2, -1, 0]);
        let rare = cluster(&[-1000, -500, 0]);
        assert!(analyze_clusters(vec![daily, rare], &SUGGESTIONS_POLICY).is_empty());
    }
}
