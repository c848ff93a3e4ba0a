//! Library Songs Fetcher
//!
//! Reads `/v1/me/library/songs`. Only songs the user has actually played
//! (`playCount > 0`) are kept; those are treated as loved.

use super::{request_collection, SongAttributes};
use crate::client::QueryClient;
use crate::types::{Collection, FetchError, QueryConfig, SourceData, SourceFetcher};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use tunesona_common::Credential;

/// Fetches played songs from the user's library
pub struct LibrarySongsFetcher {
    client: Arc<dyn QueryClient>,
}

impl LibrarySongsFetcher {
    pub fn new(client: Arc<dyn QueryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceFetcher for LibrarySongsFetcher {
    fn collection(&self) -> Collection {
        Collection::LibrarySongs
    }

    async fn fetch(
        &self,
        credential: &Credential,
        query: &QueryConfig,
    ) -> Result<SourceData, FetchError> {
        let collection = self.collection();
        let resources =
            request_collection(self.client.as_ref(), credential, collection, query).await?;
        let returned = resources.len();

        let mut tracks = Vec::with_capacity(returned);
        for resource in resources {
            let attributes: SongAttributes = resource.attributes_as(collection)?;
            if attributes.play_count.unwrap_or(0) > 0 {
                tracks.push(attributes.into_track(resource.id, Some(true)));
            }
        }

        debug!(
            collection = %collection,
            returned = returned,
            kept = tracks.len(),
            "Mapped played library songs"
        );
        Ok(SourceData::Tracks(tracks))
    }
}
