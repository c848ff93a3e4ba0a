//! Core Types and Trait Definitions for tunesona-analyzer
//!
//! Defines the entity model shared by every pipeline stage and the
//! [`SourceFetcher`] trait implemented once per remote collection.
//!
//! # Architecture
//! Single-pass pipeline, one invocation per "analyze" request:
//! - Source Fetchers: one bounded request per collection
//! - Aggregator: concurrent fan-out, settle-all, per-source isolation
//! - Deduplicator: order-preserving identifier dedup
//! - Statistics: genre ranking and listening metrics
//! - Persona: ordered rule dispatch over the top genres

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tunesona_common::Credential;

/// Genre used when a source reports none
pub const UNKNOWN_GENRE: &str = "Unknown";

// ============================================================================
// Collections
// ============================================================================

/// Logical remote collection a Source Fetcher reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    RecentlyPlayed,
    LibrarySongs,
    LibraryArtists,
    LibraryAlbums,
    HeavyRotation,
    MusicSummaries,
}

impl Collection {
    /// Every collection, in snapshot order
    pub const ALL: [Collection; 6] = [
        Collection::RecentlyPlayed,
        Collection::LibrarySongs,
        Collection::LibraryArtists,
        Collection::LibraryAlbums,
        Collection::HeavyRotation,
        Collection::MusicSummaries,
    ];

    /// Stable name used in logs and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Collection::RecentlyPlayed => "recently-played",
            Collection::LibrarySongs => "library-songs",
            Collection::LibraryArtists => "library-artists",
            Collection::LibraryAlbums => "library-albums",
            Collection::HeavyRotation => "heavy-rotation",
            Collection::MusicSummaries => "music-summaries",
        }
    }

    /// API path, relative to the configured host
    pub fn path(&self) -> &'static str {
        match self {
            Collection::RecentlyPlayed => "/v1/me/recent/played/tracks",
            Collection::LibrarySongs => "/v1/me/library/songs",
            Collection::LibraryArtists => "/v1/me/library/artists",
            Collection::LibraryAlbums => "/v1/me/library/albums",
            Collection::HeavyRotation => "/v1/me/history/heavy-rotation",
            Collection::MusicSummaries => "/v1/me/music-summaries",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A single song as reported by one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Identifier, unique within the source's namespace; never empty
    pub id: String,
    pub title: String,
    pub artist_name: String,
    pub album_name: String,
    /// Primary genre, `"Unknown"` when the source has none
    pub genre: String,
    /// Duration in milliseconds, 0 when the source has none
    pub duration_ms: u64,
    pub play_count: Option<u64>,
    /// Set for library songs with a non-zero play count
    pub loved: Option<bool>,
    pub added_at: Option<DateTime<Utc>>,
}

/// Album summary; track lists are not hydrated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub artist_name: String,
    pub release_date: Option<String>,
    pub track_count: u32,
    pub genre: String,
    pub artwork_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub genre: String,
    pub artwork_url: Option<String>,
}

/// Year-in-review record, kept opaque
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicSummary {
    pub id: String,
    pub kind: String,
    pub attributes: serde_json::Value,
}

/// Typed entities returned by one fetch
#[derive(Debug, Clone, PartialEq)]
pub enum SourceData {
    Tracks(Vec<Track>),
    Albums(Vec<Album>),
    Artists(Vec<Artist>),
    Summaries(Vec<MusicSummary>),
}

impl SourceData {
    /// Number of entities
    pub fn len(&self) -> usize {
        match self {
            SourceData::Tracks(v) => v.len(),
            SourceData::Albums(v) => v.len(),
            SourceData::Artists(v) => v.len(),
            SourceData::Summaries(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Genre label with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

impl GenreCount {
    pub fn new(genre: impl Into<String>, count: usize) -> Self {
        Self {
            genre: genre.into(),
            count,
        }
    }
}

/// Coarse listening-time metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListeningStats {
    pub total_tracks: usize,
    /// Sum of track durations, milliseconds
    pub total_play_time_ms: u64,
    /// Sum of play counts
    pub total_play_count: u64,
    /// `(total_play_time / total_play_count) * 3.5`, or 0 with no plays
    pub average_session_length_ms: f64,
}

/// Statistics Engine output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryStatistics {
    pub top_genres: Vec<GenreCount>,
    pub listening_stats: ListeningStats,
}

// ============================================================================
// Source Fetcher Trait
// ============================================================================

/// Query configuration for one fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Storefront locale, sent as `l`
    pub locale: String,
    /// Result-count limit, sent as `limit`
    pub limit: Option<u32>,
    /// Year filter, sent as `filter[year]`
    pub year: Option<i32>,
}

impl QueryConfig {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            limit: None,
            year: None,
        }
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Query-string parameters in request order
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("l".to_string(), self.locale.clone())];
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(year) = self.year {
            params.push(("filter[year]".to_string(), year.to_string()));
        }
        params
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self::new(tunesona_common::config::DEFAULT_LOCALE)
    }
}

/// One remote collection
///
/// Implementations perform exactly one request per call and never retry.
///
/// # Example
/// ```rust,ignore
/// let fetcher = RecentlyPlayedFetcher::new(client);
/// let query = QueryConfig::new("en-us").with_limit(Some(50));
/// let data = fetcher.fetch(&credential, &query).await?;
/// ```
#[async_trait::async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Collection this fetcher reads
    fn collection(&self) -> Collection;

    /// Fetch and map one page of the collection
    ///
    /// # Errors
    /// - `FetchError::SourceUnavailable` on transport failure or non-2xx status
    /// - `FetchError::MalformedResponse` when the payload cannot be mapped
    async fn fetch(
        &self,
        credential: &Credential,
        query: &QueryConfig,
    ) -> Result<SourceData, FetchError>;
}

/// Failure of a single collection fetch
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// Request failed (network or non-2xx status)
    #[error("Source {collection} unavailable (status {status:?}): {message}")]
    SourceUnavailable {
        collection: Collection,
        status: Option<u16>,
        message: String,
    },

    /// Payload could not be mapped to the expected shape
    #[error("Malformed response from {collection}: {reason}")]
    MalformedResponse {
        collection: Collection,
        reason: String,
    },
}

impl FetchError {
    pub fn collection(&self) -> Collection {
        match self {
            FetchError::SourceUnavailable { collection, .. }
            | FetchError::MalformedResponse { collection, .. } => *collection,
        }
    }

    /// HTTP status, when the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::SourceUnavailable { status, .. } => *status,
            FetchError::MalformedResponse { .. } => None,
        }
    }
}

/// Diagnostic record for a source that failed during aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub collection: Collection,
    pub status: Option<u16>,
    pub error: String,
}

impl From<&FetchError> for SourceFailure {
    fn from(err: &FetchError) -> Self {
        Self {
            collection: err.collection(),
            status: err.status(),
            error: err.to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
