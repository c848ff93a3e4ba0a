//! Recently Played Fetcher
//!
//! Reads `/v1/me/recent/played/tracks`. This is the highest-precedence source
//! when tracks are merged into the recent-activity sequence.

use super::{request_collection, SongAttributes};
use crate::client::QueryClient;
use crate::types::{Collection, FetchError, QueryConfig, SourceData, SourceFetcher};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use tunesona_common::Credential;

/// Fetches the user's recently played tracks
pub struct RecentlyPlayedFetcher {
    client: Arc<dyn QueryClient>,
}

impl RecentlyPlayedFetcher {
    pub fn new(client: Arc<dyn QueryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceFetcher for RecentlyPlayedFetcher {
    fn collection(&self) -> Collection {
        Collection::RecentlyPlayed
    }

    async fn fetch(
        &self,
        credential: &Credential,
        query: &QueryConfig,
    ) -> Result<SourceData, FetchError> {
        let collection = self.collection();
        let resources =
            request_collection(self.client.as_ref(), credential, collection, query).await?;

        let tracks = resources
            .into_iter()
            .map(|r| {
                let attributes: SongAttributes = r.attributes_as(collection)?;
                Ok(attributes.into_track(r.id, None))
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        debug!(collection = %collection, count = tracks.len(), "Mapped tracks");
        Ok(SourceData::Tracks(tracks))
    }
}
