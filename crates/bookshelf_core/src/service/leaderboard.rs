//! Top-rated leaderboard ranking.
//!
//! # Invariants
//! - Ratings with fewer than `min_values` values never appear.
//! - Order is by `average` descending; equal averages keep scan order.
//! - Every rating beyond the cutoff whose average equals (`==`) the cutoff
//!   entry's average is included, so the board can exceed `cutoff_rank`.

use crate::config::LeaderboardConfig;
use crate::model::rating::{Rating, TopRatedEntry};

/// Ranks `ratings` into leaderboard entries. Pure; no store access.
pub fn rank_top_rated(ratings: Vec<Rating>, config: &LeaderboardConfig) -> Vec<TopRatedEntry> {
    let mut qualifying: Vec<Rating> = ratings
        .into_iter()
        .filter(|rating| rating.values.len() >= config.min_values)
        .collect();
    qualifying.sort_by(|left, right| right.average.total_cmp(&left.average));

    if config.cutoff_rank == 0 {
        return Vec::new();
    }
    if qualifying.len() > config.cutoff_rank {
        let threshold = qualifying[config.cutoff_rank - 1].average;
        let ties = qualifying[config.cutoff_rank..]
            .iter()
            .take_while(|rating| rating.average == threshold)
            .count();
        qualifying.truncate(config.cutoff_rank + ties);
    }

    qualifying.into_iter().map(TopRatedEntry::from).collect()
}
