//! Per-game display statistics
//!
//! Combines reviewer tag votes with the game's catalog-derived site tags.
//! A tag present in the game's site set counts as ten catalog votes; the
//! denominator is padded by the same weight, so a catalog tag with no review
//! votes starts at 100% on a brand-new game and drifts as reviews arrive.

use crate::error::ServiceError;
use crate::player_counts::{
    reconcile, weighted_percentage, DisplayPriority, PlayerCountStat, CATALOG_BASE_WEIGHT,
    VISIBILITY_THRESHOLD,
};
use crate::ports::GameStore;
use crate::types::{GameRecord, LocalId, TagVote, VoteKind, VoteRow};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// Vote statistic for one mechanic or category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagStat {
    pub name: String,
    pub review_votes: u32,
    pub catalog_votes: u32,
    pub total_votes: u32,
    pub total_reviews: u32,
    pub percentage: f64,
    pub display_priority: DisplayPriority,
}

/// Display statistics for a game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStats {
    pub mechanics: Vec<TagStat>,
    pub categories: Vec<TagStat>,
    pub player_counts: Vec<PlayerCountStat>,
}

/// Visible tag statistics, most supported first
///
/// The universe is the game's site tags plus every tag a reviewer voted for.
/// Entries under the visibility threshold are dropped.
pub fn tag_stats(site_tags: &BTreeSet<String>, votes: &[TagVote], total_reviews: u32) -> Vec<TagStat> {
    let mut review_votes: BTreeMap<&str, u32> = site_tags.iter().map(|t| (t.as_str(), 0)).collect();
    for vote in votes {
        *review_votes.entry(vote.value.as_str()).or_insert(0) += vote.votes;
    }

    let mut stats: Vec<TagStat> = review_votes
        .into_iter()
        .map(|(name, review_votes)| {
            let catalog_votes = if site_tags.contains(name) {
                CATALOG_BASE_WEIGHT
            } else {
                0
            };
            let total_votes = review_votes + catalog_votes;
            let percentage = weighted_percentage(total_votes, total_reviews);

            TagStat {
                name: name.to_string(),
                review_votes,
                catalog_votes,
                total_votes,
                total_reviews,
                percentage,
                display_priority: DisplayPriority::from_percentage(percentage),
            }
        })
        .filter(|stat| stat.percentage >= VISIBILITY_THRESHOLD)
        .collect();

    stats.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    stats
}

impl GameStats {
    /// Assemble statistics from a record and its review votes
    ///
    /// `player_count_votes` carries raw counts as strings; unparsable values
    /// are ignored.
    pub fn assemble(
        record: &GameRecord,
        mechanic_votes: &[TagVote],
        category_votes: &[TagVote],
        player_count_votes: &[TagVote],
        total_reviews: u32,
    ) -> Self {
        let vote_rows: Vec<VoteRow> = player_count_votes
            .iter()
            .filter_map(|vote| {
                vote.value.trim().parse::<u32>().ok().map(|player_count| VoteRow {
                    player_count,
                    votes: vote.votes,
                    total_reviews,
                })
            })
            .collect();

        let best: Vec<u32> = record.best_player_counts.iter().copied().collect();
        let recommended: Vec<u32> = record.recommended_player_counts.iter().copied().collect();

        Self {
            mechanics: tag_stats(&record.site_mechanics, mechanic_votes, total_reviews),
            categories: tag_stats(&record.site_categories, category_votes, total_reviews),
            player_counts: reconcile(&vote_rows, &best, &recommended),
        }
    }
}

/// Reads votes from persistence and assembles `GameStats`
pub struct StatsService {
    store: Arc<dyn GameStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    pub async fn game_stats(&self, game_id: LocalId) -> Result<GameStats, ServiceError> {
        let record = self
            .store
            .find_by_id(game_id)
            .await?
            .ok_or(ServiceError::GameNotFound(game_id))?;

        let total_reviews = self.store.published_review_total(game_id).await?;
        let mechanic_votes = self.store.review_votes(game_id, VoteKind::Mechanic).await?;
        let category_votes = self.store.review_votes(game_id, VoteKind::Category).await?;
        let player_count_votes = self.store.review_votes(game_id, VoteKind::PlayerCount).await?;

        debug!(
            "Assembling stats for game {} from {} published reviews",
            game_id, total_reviews
        );

        Ok(GameStats::assemble(
            &record,
            &mechanic_votes,
            &category_votes,
            &player_count_votes,
            total_reviews,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn vote(value: &str, votes: u32) -> TagVote {
        TagVote {
            value: value.to_string(),
            votes,
        }
    }

    #[test]
    fn test_catalog_tags_start_full() {
        let stats = tag_stats(&tags(&["協力", "セット収集"]), &[], 0);

        assert_eq!(stats.len(), 2);
        assert!(stats.iter().all(|s| s.percentage == 100.0));
        assert!(stats.iter().all(|s| s.display_priority == DisplayPriority::Highlight));
        // Equal percentages fall back to name order
        assert_eq!(stats[0].name, "セット収集");
    }

    #[test]
    fn test_review_votes_shift_percentages() {
        // 10 reviews: 8 confirm 協力, 2 suggest ドラフト
        let stats = tag_stats(
            &tags(&["協力"]),
            &[vote("協力", 8), vote("ドラフト", 2)],
            10,
        );

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].name, "協力");
        assert_eq!(stats[0].total_votes, 18);
        assert_eq!(stats[0].percentage, 90.0);
    }

    #[test]
    fn test_reviewer_only_tag_can_become_visible() {
        let stats = tag_stats(&tags(&[]), &[vote("ドラフト", 9)], 10);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].catalog_votes, 0);
        assert_eq!(stats[0].percentage, 45.0);
        assert_eq!(stats[0].display_priority, DisplayPriority::Normal);
    }

    #[test]
    fn test_catalog_tag_fades_without_votes() {
        // 30 reviews and nobody agrees: 10 / 40 = 25% -> dropped
        let stats = tag_stats(&tags(&["協力"]), &[], 30);
        assert!(stats.is_empty());
    }

    #[test]
    fn test_assemble_player_counts() {
        let mut record = GameRecord::new(1, Some(1), "Coup");
        record.best_player_counts = [5].into_iter().collect();
        record.recommended_player_counts = [3, 4, 6].into_iter().collect();

        let stats = GameStats::assemble(
            &record,
            &[],
            &[],
            &[vote("5", 4), vote("many", 3)],
            10,
        );

        assert_eq!(stats.player_counts.len(), 4);
        let five = &stats.player_counts[0];
        assert_eq!(five.bucket, 5);
        assert_eq!(five.review_votes, 4);
        assert_eq!(five.percentage, 70.0);
    }
}
