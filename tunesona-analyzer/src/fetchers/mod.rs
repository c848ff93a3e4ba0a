//! Source Fetchers
//!
//! One fetcher per remote collection. Each performs a single request through
//! the injected [`QueryClient`] and maps the JSON payload into typed entities.
//!
//! # Fetchers
//! 1. **recently_played** - `/v1/me/recent/played/tracks` → tracks
//! 2. **library_songs** - `/v1/me/library/songs` → tracks with plays
//! 3. **library_artists** - `/v1/me/library/artists` → artists
//! 4. **library_albums** - `/v1/me/library/albums` → albums
//! 5. **heavy_rotation** - `/v1/me/history/heavy-rotation` → albums
//! 6. **music_summaries** - `/v1/me/music-summaries` → opaque summaries
//!
//! # Payload shape
//! Every collection answers `{ "data": [ { "id", "type", "attributes": {..} } ] }`.
//! Items with an empty `id` are dropped here so downstream stages can rely on
//! non-empty identifiers.

pub mod heavy_rotation;
pub mod library_albums;
pub mod library_artists;
pub mod library_songs;
pub mod music_summaries;
pub mod recently_played;

pub use heavy_rotation::HeavyRotationFetcher;
pub use library_albums::LibraryAlbumsFetcher;
pub use library_artists::LibraryArtistsFetcher;
pub use library_songs::LibrarySongsFetcher;
pub use music_summaries::MusicSummariesFetcher;
pub use recently_played::RecentlyPlayedFetcher;

use crate::client::{ClientError, QueryClient};
use crate::types::{Album, Collection, FetchError, QueryConfig, Track, UNKNOWN_GENRE};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use tunesona_common::Credential;

// ============================================================================
// Request helper
// ============================================================================

/// Issue the collection's request and classify transport failures
pub(crate) async fn request_collection(
    client: &dyn QueryClient,
    credential: &Credential,
    collection: Collection,
    query: &QueryConfig,
) -> Result<Vec<Resource>, FetchError> {
    let body = client
        .request(credential, collection.path(), &query.to_params())
        .await
        .map_err(|e| map_client_error(collection, e))?;

    parse_resources(collection, body)
}

fn map_client_error(collection: Collection, err: ClientError) -> FetchError {
    match err {
        ClientError::Status { status, message } => FetchError::SourceUnavailable {
            collection,
            status: Some(status),
            message,
        },
        ClientError::Transport(message) => FetchError::SourceUnavailable {
            collection,
            status: None,
            message,
        },
        ClientError::Decode(reason) => FetchError::MalformedResponse { collection, reason },
    }
}

// ============================================================================
// Raw payload types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ResourceList {
    data: Vec<Resource>,
}

/// One `data[]` item, attributes still untyped
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Resource {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub attributes: Option<serde_json::Value>,
}

impl Resource {
    /// Decode the attributes object into `T`
    pub(crate) fn attributes_as<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<T, FetchError> {
        let Some(attributes) = &self.attributes else {
            return Err(FetchError::MalformedResponse {
                collection,
                reason: format!("item {} has no attributes", self.id),
            });
        };

        serde_json::from_value(attributes.clone()).map_err(|e| FetchError::MalformedResponse {
            collection,
            reason: format!("item {}: {}", self.id, e),
        })
    }
}

fn parse_resources(
    collection: Collection,
    body: serde_json::Value,
) -> Result<Vec<Resource>, FetchError> {
    let list: ResourceList =
        serde_json::from_value(body).map_err(|e| FetchError::MalformedResponse {
            collection,
            reason: format!("expected object with data array: {}", e),
        })?;

    let total = list.data.len();
    let resources: Vec<Resource> = list
        .data
        .into_iter()
        .filter(|r| !r.id.trim().is_empty())
        .collect();

    if resources.len() < total {
        debug!(
            collection = %collection,
            dropped = total - resources.len(),
            "Dropped items without identifier"
        );
    }

    Ok(resources)
}

/// `attributes.artwork`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Artwork {
    pub url: Option<String>,
}

/// Song attributes shared by track-shaped collections
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct SongAttributes {
    pub name: String,
    pub artist_name: String,
    pub album_name: String,
    pub genre_names: Vec<String>,
    pub duration_in_millis: Option<u64>,
    pub play_count: Option<u64>,
    pub date_added: Option<String>,
}

impl SongAttributes {
    pub(crate) fn into_track(self, id: String, loved: Option<bool>) -> Track {
        Track {
            id,
            title: self.name,
            artist_name: self.artist_name,
            album_name: self.album_name,
            genre: primary_genre(&self.genre_names),
            duration_ms: self.duration_in_millis.unwrap_or(0),
            play_count: self.play_count,
            loved,
            added_at: self.date_added.as_deref().and_then(parse_timestamp),
        }
    }
}

/// Album attributes shared by album-shaped collections
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct AlbumAttributes {
    pub name: String,
    pub artist_name: String,
    pub release_date: Option<String>,
    pub track_count: Option<u32>,
    pub genre_names: Vec<String>,
    pub artwork: Option<Artwork>,
}

impl AlbumAttributes {
    pub(crate) fn into_album(self, id: String) -> Album {
        Album {
            id,
            name: self.name,
            artist_name: self.artist_name,
            release_date: self.release_date,
            track_count: self.track_count.unwrap_or(0),
            genre: primary_genre(&self.genre_names),
            artwork_url: self.artwork.and_then(|a| a.url),
        }
    }
}

/// Map every resource of an album-shaped collection
pub(crate) fn map_albums(
    collection: Collection,
    resources: Vec<Resource>,
) -> Result<Vec<Album>, FetchError> {
    resources
        .into_iter()
        .map(|r| {
            let attributes: AlbumAttributes = r.attributes_as(collection)?;
            Ok(attributes.into_album(r.id))
        })
        .collect()
}

// ============================================================================
// Field helpers
// ============================================================================

/// First genre name, or `"Unknown"`
pub(crate) fn primary_genre(genre_names: &[String]) -> String {
    genre_names
        .iter()
        .map(|g| g.trim())
        .find(|g| !g.is_empty())
        .unwrap_or(UNKNOWN_GENRE)
        .to_string()
}

/// RFC 3339 timestamp, `None` if unparsable
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

// ============================================================================
// Tests
// ============================================================================
