//! Statistics Engine
//!
//! Pure functions over a merged track sequence: genre ranking and coarse
//! listening-time metrics. No I/O, fully deterministic.

use crate::types::{GenreCount, LibraryStatistics, ListeningStats, Track};
use std::collections::HashMap;

/// Maximum number of ranked genres kept
pub const TOP_GENRE_LIMIT: usize = 10;

/// Track plays per listening session, fixed heuristic
pub const SESSION_TRACKS_MULTIPLIER: f64 = 3.5;

/// Compute genre ranking and listening metrics for `tracks`
pub fn compute_statistics(tracks: &[Track]) -> LibraryStatistics {
    LibraryStatistics {
        top_genres: rank_genres(tracks),
        listening_stats: listening_stats(tracks),
    }
}

/// Count primary genres, sort descending by count and keep the top ten
///
/// Ties keep first-seen order (`sort_by` is stable).
pub fn rank_genres(tracks: &[Track]) -> Vec<GenreCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<GenreCount> = Vec::new();

    for track in tracks {
        match index.get(track.genre.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(track.genre.as_str(), counts.len());
                counts.push(GenreCount::new(track.genre.clone(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_GENRE_LIMIT);
    counts
}

/// Total play time, total play count and average session length
///
/// Totals saturate at `u64::MAX`; values come straight from remote payloads.
pub fn listening_stats(tracks: &[Track]) -> ListeningStats {
    let total_play_time_ms = tracks
        .iter()
        .fold(0u64, |acc, t| acc.saturating_add(t.duration_ms));
    let total_play_count = tracks
        .iter()
        .fold(0u64, |acc, t| acc.saturating_add(t.play_count.unwrap_or(0)));

    ListeningStats {
        total_tracks: tracks.len(),
        total_play_time_ms,
        total_play_count,
        average_session_length_ms: average_session_length(total_play_time_ms, total_play_count),
    }
}

/// `(time / count) * 3.5`, 0 when nothing was played
pub fn average_session_length(total_play_time_ms: u64, total_play_count: u64) -> f64 {
    if total_play_count == 0 {
        return 0.0;
    }
    (total_play_time_ms as f64 / total_play_count as f64) * SESSION_TRACKS_MULTIPLIER
}
