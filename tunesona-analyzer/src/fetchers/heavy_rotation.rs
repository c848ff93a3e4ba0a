//! Heavy Rotation Fetcher
//!
//! Reads `/v1/me/history/heavy-rotation`, which answers with albums rather
//! than songs. This endpoint is known to fail intermittently; the aggregator
//! absorbs that like any other source failure.

use super::{map_albums, request_collection};
use crate::client::QueryClient;
use crate::types::{Collection, FetchError, QueryConfig, SourceData, SourceFetcher};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use tunesona_common::Credential;

/// Fetches frequently replayed albums
pub struct HeavyRotationFetcher {
    client: Arc<dyn QueryClient>,
}

impl HeavyRotationFetcher {
    pub fn new(client: Arc<dyn QueryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceFetcher for HeavyRotationFetcher {
    fn collection(&self) -> Collection {
        Collection::HeavyRotation
    }

    async fn fetch(
        &self,
        credential: &Credential,
        query: &QueryConfig,
    ) -> Result<SourceData, FetchError> {
        let collection = self.collection();
        let resources =
            request_collection(self.client.as_ref(), credential, collection, query).await?;
        let albums = map_albums(collection, resources)?;

        debug!(collection = %collection, count = albums.len(), "Mapped heavy rotation albums");
        Ok(SourceData::Albums(albums))
    }
}
