//! Player-count reconciliation
//!
//! Merges local review votes with the catalog's best/recommended poll
//! results. Buckets run 1..=6 where 6 means "6 or more". A bucket with no
//! local votes but a poll role gets a fixed seed entry so that new games are
//! never shown with empty statistics.

use crate::types::VoteRow;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Highest bucket; raw counts above it collapse into it
pub const MAX_BUCKET: u32 = 6;

/// Percentage at or above which an entry is highlighted
pub const HIGHLIGHT_THRESHOLD: f64 = 70.0;

/// Percentage below which an entry is hidden
pub const VISIBILITY_THRESHOLD: f64 = 30.0;

/// Denominator padding representing the catalog's weight
pub const CATALOG_BASE_WEIGHT: u32 = 10;

const BEST_SEED_VOTES: u32 = 10;
const BEST_SEED_PERCENTAGE: f64 = 70.0;
const RECOMMENDED_SEED_VOTES: u32 = 7;
const RECOMMENDED_SEED_PERCENTAGE: f64 = 50.0;

/// Display classification for a statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayPriority {
    Highlight,
    Normal,
    Hidden,
}

impl DisplayPriority {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= HIGHLIGHT_THRESHOLD {
            Self::Highlight
        } else if percentage >= VISIBILITY_THRESHOLD {
            Self::Normal
        } else {
            Self::Hidden
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Highlight => "highlight",
            Self::Normal => "normal",
            Self::Hidden => "hidden",
        }
    }
}

/// Catalog poll role of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PollRole {
    Best,
    Recommended,
}

impl PollRole {
    fn seed_votes(self) -> u32 {
        match self {
            Self::Best => BEST_SEED_VOTES,
            Self::Recommended => RECOMMENDED_SEED_VOTES,
        }
    }

    fn seed_percentage(self) -> f64 {
        match self {
            Self::Best => BEST_SEED_PERCENTAGE,
            Self::Recommended => RECOMMENDED_SEED_PERCENTAGE,
        }
    }

    fn seed_priority(self) -> DisplayPriority {
        match self {
            Self::Best => DisplayPriority::Highlight,
            Self::Recommended => DisplayPriority::Normal,
        }
    }
}

/// Collapse a raw player count into its bucket; 0 has no bucket
pub fn normalize_bucket(raw: u32) -> Option<u32> {
    match raw {
        0 => None,
        n => Some(n.min(MAX_BUCKET)),
    }
}

/// Display label for a bucket
pub fn bucket_label(bucket: u32) -> String {
    if bucket >= MAX_BUCKET {
        format!("{} or more", MAX_BUCKET)
    } else {
        format!("{} players", bucket)
    }
}

/// Bucketed poll sets with recommended made disjoint from best
pub fn normalize_poll_counts(best: &[u32], recommended: &[u32]) -> (BTreeSet<u32>, BTreeSet<u32>) {
    let best: BTreeSet<u32> = best.iter().filter_map(|c| normalize_bucket(*c)).collect();
    let recommended = recommended
        .iter()
        .filter_map(|c| normalize_bucket(*c))
        .filter(|bucket| !best.contains(bucket))
        .collect();
    (best, recommended)
}

/// Reconciled statistic for one bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerCountStat {
    pub bucket: u32,
    pub label: String,
    pub role: Option<PollRole>,
    /// Local review votes
    pub review_votes: u32,
    /// Votes contributed by the catalog poll role
    pub seed_votes: u32,
    pub total_votes: u32,
    pub percentage: f64,
    pub display_priority: DisplayPriority,
}

/// `(votes / (reviews + base weight)) × 100`, capped at 100, one decimal
pub(crate) fn weighted_percentage(votes: u32, total_reviews: u32) -> f64 {
    let denominator = f64::from(total_reviews + CATALOG_BASE_WEIGHT);
    let percentage = (f64::from(votes) / denominator * 100.0).min(100.0);
    (percentage * 10.0).round() / 10.0
}

/// Reconcile local votes with the catalog poll
///
/// Output is sorted by percentage descending, then bucket descending, with at
/// most one entry per bucket. No bucket ever carries both poll roles.
pub fn reconcile(
    local_votes: &[VoteRow],
    best_counts: &[u32],
    recommended_counts: &[u32],
) -> Vec<PlayerCountStat> {
    let (best, recommended) = normalize_poll_counts(best_counts, recommended_counts);
    let role_of = |bucket: u32| {
        if best.contains(&bucket) {
            Some(PollRole::Best)
        } else if recommended.contains(&bucket) {
            Some(PollRole::Recommended)
        } else {
            None
        }
    };

    let mut by_bucket: BTreeMap<u32, PlayerCountStat> = BTreeMap::new();

    for row in local_votes {
        let Some(bucket) = normalize_bucket(row.player_count) else {
            continue;
        };
        if row.votes == 0 {
            continue;
        }

        let role = role_of(bucket);
        let seed_votes = role.map(PollRole::seed_votes).unwrap_or(0);
        let total_votes = row.votes + seed_votes;
        let percentage = weighted_percentage(total_votes, row.total_reviews);

        keep_higher(
            &mut by_bucket,
            PlayerCountStat {
                bucket,
                label: bucket_label(bucket),
                role,
                review_votes: row.votes,
                seed_votes,
                total_votes,
                percentage,
                display_priority: DisplayPriority::from_percentage(percentage),
            },
        );
    }

    for bucket in best.iter().chain(&recommended) {
        if by_bucket.contains_key(bucket) {
            continue;
        }
        let Some(role) = role_of(*bucket) else {
            continue;
        };

        by_bucket.insert(
            *bucket,
            PlayerCountStat {
                bucket: *bucket,
                label: bucket_label(*bucket),
                role: Some(role),
                review_votes: 0,
                seed_votes: role.seed_votes(),
                total_votes: role.seed_votes(),
                percentage: role.seed_percentage(),
                display_priority: role.seed_priority(),
            },
        );
    }

    let mut stats: Vec<PlayerCountStat> = by_bucket.into_values().collect();
    stats.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(Ordering::Equal)
            .then(b.bucket.cmp(&a.bucket))
    });
    stats
}

fn keep_higher(by_bucket: &mut BTreeMap<u32, PlayerCountStat>, stat: PlayerCountStat) {
    match by_bucket.get(&stat.bucket) {
        Some(existing) if existing.percentage >= stat.percentage => {}
        _ => {
            by_bucket.insert(stat.bucket, stat);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(player_count: u32, votes: u32, total_reviews: u32) -> VoteRow {
        VoteRow {
            player_count,
            votes,
            total_reviews,
        }
    }

    fn find(stats: &[PlayerCountStat], bucket: u32) -> &PlayerCountStat {
        stats.iter().find(|s| s.bucket == bucket).unwrap()
    }

    #[test]
    fn test_best_overrides_recommended_for_same_bucket() {
        let stats = reconcile(&[row(4, 0, 0)], &[4], &[2, 3, 4]);

        assert_eq!(stats.len(), 3);

        let four = find(&stats, 4);
        assert_eq!(four.role, Some(PollRole::Best));
        assert_eq!(four.display_priority, DisplayPriority::Highlight);
        assert_eq!(four.percentage, 70.0);

        for bucket in [2, 3] {
            let stat = find(&stats, bucket);
            assert_eq!(stat.role, Some(PollRole::Recommended));
            assert_eq!(stat.display_priority, DisplayPriority::Normal);
            assert_eq!(stat.seed_votes, 7);
        }

        // Highest percentage first, ties by descending bucket
        let order: Vec<u32> = stats.iter().map(|s| s.bucket).collect();
        assert_eq!(order, vec![4, 3, 2]);
    }

    #[test]
    fn test_large_counts_collapse_into_six() {
        let stats = reconcile(&[], &[7, 8], &[6, 10]);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].bucket, 6);
        assert_eq!(stats[0].role, Some(PollRole::Best));
        assert_eq!(stats[0].label, "6 or more");
    }

    #[test]
    fn test_local_votes_add_seed() {
        // 5 of 10 reviews voted for 3; the catalog calls 3 best
        let stats = reconcile(&[row(3, 5, 10)], &[3], &[]);

        let three = find(&stats, 3);
        assert_eq!(three.review_votes, 5);
        assert_eq!(three.total_votes, 15);
        assert_eq!(three.percentage, 75.0);
        assert_eq!(three.display_priority, DisplayPriority::Highlight);
    }

    #[test]
    fn test_local_votes_without_role() {
        let stats = reconcile(&[row(5, 2, 10)], &[], &[]);

        let five = find(&stats, 5);
        assert_eq!(five.role, None);
        assert_eq!(five.percentage, 10.0);
        assert_eq!(five.display_priority, DisplayPriority::Hidden);
    }

    #[test]
    fn test_percentage_capped_at_hundred() {
        let stats = reconcile(&[row(2, 30, 5)], &[2], &[]);
        assert_eq!(find(&stats, 2).percentage, 100.0);
    }

    #[test]
    fn test_duplicate_buckets_keep_higher() {
        // Raw 7 and 9 both land in bucket 6
        let stats = reconcile(&[row(7, 2, 10), row(9, 8, 10)], &[], &[]);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].review_votes, 8);
        assert_eq!(stats[0].percentage, 40.0);
    }

    #[test]
    fn test_no_bucket_in_both_roles() {
        let stats = reconcile(&[row(2, 1, 3), row(3, 1, 3)], &[2, 3], &[1, 2, 3, 4]);

        for stat in &stats {
            if stat.role == Some(PollRole::Recommended) {
                assert!(![2, 3].contains(&stat.bucket));
            }
        }
        let buckets: BTreeSet<u32> = stats.iter().map(|s| s.bucket).collect();
        assert_eq!(buckets.len(), stats.len());
    }

    #[test]
    fn test_zero_count_ignored() {
        let stats = reconcile(&[row(0, 4, 4)], &[0], &[]);
        assert!(stats.is_empty());
    }

    #[test]
    fn test_normalize_poll_counts() {
        let (best, recommended) = normalize_poll_counts(&[4, 9], &[2, 3, 4, 6, 7]);
        assert_eq!(best.into_iter().collect::<Vec<_>>(), vec![4, 6]);
        assert_eq!(recommended.into_iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_priority_thresholds() {
        assert_eq!(DisplayPriority::from_percentage(70.0), DisplayPriority::Highlight);
        assert_eq!(DisplayPriority::from_percentage(69.9), DisplayPriority::Normal);
        assert_eq!(DisplayPriority::from_percentage(30.0), DisplayPriority::Normal);
        assert_eq!(DisplayPriority::from_percentage(29.9), DisplayPriority::Hidden);
    }
}
