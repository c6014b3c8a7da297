//! Greedy merchant clustering.
//!
//! Every amount bucket gets exactly one canonical description, taken from its
//! earliest transaction. Other descriptions in the bucket either fold into that
//! canonical label or keep their own, so two distinct merchants with similar
//! names at the same amount can merge, and a renamed merchant whose label drifts
//! far from the canonical one can split. There is no transitive
//! merging between off-canonical labels.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::forecast::similarity::DescriptionSimilarity;
use crate::forecast::types::{MerchantCluster, NormalizedTransaction};

/// Canonical description per amount bucket. Ties on date keep the first row seen.
pub fn canonical_descriptions(rows: &[NormalizedTransaction]) -> BTreeMap<Decimal, String> {
    let mut earliest: BTreeMap<Decimal, &NormalizedTransaction> = BTreeMap::new();
    for row in rows {
        earliest
            .entry(row.norm_amount)
            .and_modify(|current| {
                if row.date < current.date {
                    *current = row;
                }
            })
            .or_insert(row);
    }

    earliest
        .into_iter()
        .map(|(amount, row)| (amount, row.upper_description.clone()))
        .collect()
}

pub fn merchant_key_for(
    row: &NormalizedTransaction,
    canonical: &str,
    similarity: &dyn DescriptionSimilarity,
    threshold: f64,
) -> String {
    if row.upper_description == canonical
        || similarity.similarity(&row.upper_description, canonical) > threshold
    {
        return canonical.to_string();
    }
    row.upper_description.clone()
}

pub fn cluster_merchants(
    rows: &[NormalizedTransaction],
    similarity: &dyn DescriptionSimilarity,
    threshold: f64,
) -> Vec<MerchantCluster> {
    let canonical_by_amount = canonical_descriptions(rows);

    let mut grouped: BTreeMap<(String, Decimal), Vec<NormalizedTransaction>> = BTreeMap::new();
    for row in rows {
        let Some(canonical) = canonical_by_amount.get(&row.norm_amount) else {
            continue;
        };
        let merchant_key = merchant_key_for(row, canonical, similarity, threshold);
        grouped
            .entry((merchant_key, row.norm_amount))
            .or_default()
            .push(row.clone());
    }

    let clusters = grouped
        .into_iter()
        .map(|((merchant_key, norm_amount), mut members)| {
            // Stable: same-date members keep input order.
            members.sort_by_key(|member| member.date);
            MerchantCluster {
                merchant_key,
                norm_amount,
                members,
            }
        })
        .collect::<Vec<MerchantCluster>>();

    debug!(
        buckets = canonical_by_amount.len(),
        clusters = clusters.len(),
        "clustered transactions by merchant"
    );
    clusters
}
