//! Library snapshot
//!
//! The aggregate root of one pipeline invocation. Built once from the settled
//! source results and never mutated afterwards.
//!
//! # Merge policy
//! - Recent activity (the only track sequence the Statistics Engine sees) is
//!   `dedup(recently_played, library_songs)`, recently played first.
//! - Heavy rotation answers with albums, so it stays out of track-level
//!   statistics. Albums are merged separately as
//!   `dedup(heavy_rotation, library_albums)`.

use crate::dedup::dedup_by_id;
use crate::statistics::compute_statistics;
use crate::types::{
    Album, Artist, Collection, FetchError, GenreCount, LibraryStatistics, ListeningStats,
    MusicSummary, SourceData, SourceFailure, Track,
};
use serde::{Deserialize, Serialize};

/// Per-collection entities gathered before the snapshot is built
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSet {
    pub recently_played: Vec<Track>,
    pub library_songs: Vec<Track>,
    pub library_artists: Vec<Artist>,
    pub library_albums: Vec<Album>,
    pub heavy_rotation: Vec<Album>,
    pub music_summaries: Vec<MusicSummary>,
}

impl SourceSet {
    /// Place one fetch result in its collection slot
    ///
    /// # Errors
    /// `MalformedResponse` when the entity kind does not fit the collection
    pub fn insert(&mut self, collection: Collection, data: SourceData) -> Result<(), FetchError> {
        match (collection, data) {
            (Collection::RecentlyPlayed, SourceData::Tracks(v)) => self.recently_played = v,
            (Collection::LibrarySongs, SourceData::Tracks(v)) => self.library_songs = v,
            (Collection::LibraryArtists, SourceData::Artists(v)) => self.library_artists = v,
            (Collection::LibraryAlbums, SourceData::Albums(v)) => self.library_albums = v,
            (Collection::HeavyRotation, SourceData::Albums(v)) => self.heavy_rotation = v,
            (Collection::MusicSummaries, SourceData::Summaries(v)) => self.music_summaries = v,
            (collection, _) => {
                return Err(FetchError::MalformedResponse {
                    collection,
                    reason: "entity kind does not match collection".to_string(),
                })
            }
        }
        Ok(())
    }
}

/// Merged point-in-time view of the user's library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    pub recently_played: Vec<Track>,
    pub library_songs: Vec<Track>,
    pub library_artists: Vec<Artist>,
    pub library_albums: Vec<Album>,
    pub heavy_rotation: Vec<Album>,
    pub music_summaries: Vec<MusicSummary>,
    /// Deduplicated track sequence the statistics were computed from
    pub recent_activity: Vec<Track>,
    pub top_genres: Vec<GenreCount>,
    pub listening_stats: ListeningStats,
    pub succeeded_sources: Vec<Collection>,
    pub failed_sources: Vec<SourceFailure>,
}

impl LibrarySnapshot {
    /// Merge, deduplicate and compute statistics
    pub fn build(
        sources: SourceSet,
        succeeded_sources: Vec<Collection>,
        failed_sources: Vec<SourceFailure>,
    ) -> Self {
        let recent_activity =
            dedup_by_id([&sources.recently_played[..], &sources.library_songs[..]]);
        let LibraryStatistics {
            top_genres,
            listening_stats,
        } = compute_statistics(&recent_activity);

        Self {
            recently_played: sources.recently_played,
            library_songs: sources.library_songs,
            library_artists: sources.library_artists,
            library_albums: sources.library_albums,
            heavy_rotation: sources.heavy_rotation,
            music_summaries: sources.music_summaries,
            recent_activity,
            top_genres,
            listening_stats,
            succeeded_sources,
            failed_sources,
        }
    }

    /// Heavy-rotation albums followed by library albums, deduplicated
    pub fn albums(&self) -> Vec<Album> {
        dedup_by_id([&self.heavy_rotation[..], &self.library_albums[..]])
    }

    pub fn statistics(&self) -> LibraryStatistics {
        LibraryStatistics {
            top_genres: self.top_genres.clone(),
            listening_stats: self.listening_stats.clone(),
        }
    }

    /// Library songs flagged as loved
    pub fn loved_count(&self) -> usize {
        self.library_songs
            .iter()
            .filter(|t| t.loved == Some(true))
            .count()
    }

    pub fn is_degraded(&self) -> bool {
        !self.failed_sources.is_empty()
    }
}
