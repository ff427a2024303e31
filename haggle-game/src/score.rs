//! Final scores and leaderboard ranking.
use serde::{Deserialize, Serialize};

use crate::constants::{LEADERBOARD_DISPLAY_LIMIT, LEADERBOARD_LIMIT};

/// One leaderboard row. The wire shape is `{"name": ..., "score": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: i64,
}

impl ScoreEntry {
    /// Build an entry, trimming the name. Blank names yield `None`.
    #[must_use]
    pub fn new(name: &str, score: i64) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            score,
        })
    }
}

/// Append `entry`, rank by score descending, and keep the best `limit`.
///
/// The sort is stable, so equal scores keep arrival order and a newcomer
/// ranks below anyone it ties with.
#[must_use]
pub fn merge_scores(
    mut existing: Vec<ScoreEntry>,
    entry: ScoreEntry,
    limit: usize,
) -> Vec<ScoreEntry> {
    existing.push(entry);
    rank_scores(existing, limit)
}

/// Sort descending by score (stable) and truncate.
#[must_use]
pub fn rank_scores(mut entries: Vec<ScoreEntry>, limit: usize) -> Vec<ScoreEntry> {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(limit);
    entries
}

/// Merge with the persisted limit of twenty entries.
#[must_use]
pub fn merge_into_leaderboard(existing: Vec<ScoreEntry>, entry: ScoreEntry) -> Vec<ScoreEntry> {
    merge_scores(existing, entry, LEADERBOARD_LIMIT)
}

/// The slice shown on the game-over screen.
#[must_use]
pub fn display_slice(entries: &[ScoreEntry]) -> &[ScoreEntry] {
    &entries[..entries.len().min(LEADERBOARD_DISPLAY_LIMIT)]
}

/// 1-based rank of the first entry matching `name` and `score`.
#[must_use]
pub fn rank_of(entries: &[ScoreEntry], name: &str, score: i64) -> Option<usize> {
    entries
        .iter()
        .position(|entry| entry.name == name && entry.score == score)
        .map(|index| index + 1)
}
