//! Library Albums Fetcher
//!
//! Album track lists are not hydrated.

use super::{map_albums, request_collection};
use crate::client::QueryClient;
use crate::types::{Collection, FetchError, QueryConfig, SourceData, SourceFetcher};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use tunesona_common::Credential;

/// Fetches albums from the user's library
pub struct LibraryAlbumsFetcher {
    client: Arc<dyn QueryClient>,
}

impl LibraryAlbumsFetcher {
    pub fn new(client: Arc<dyn QueryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceFetcher for LibraryAlbumsFetcher {
    fn collection(&self) -> Collection {
        Collection::LibraryAlbums
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

        debug!(collection = %collection, count = albums.len(), "Mapped albums");
        Ok(SourceData::Albums(albums))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::ScriptedClient;
    use serde_json::json;

    #[tokio::test]
    async fn test_maps_albums() {
        let client = Arc::new(ScriptedClient::new().respond(
            "/v1/me/library/albums",
            json!({
                "data": [{
                    "id": "l.1",
                    "attributes": {
                        "name": "SOUR",
                        "artistName": "Olivia Rodrigo",
                        "releaseDate": "2021-05-21",
                        "trackCount": 11,
                        "genreNames": ["Pop"],
                        "artwork": { "url": "https://img/sour.jpg" }
                    }
                }]
            }),
        ));
        let fetcher = LibraryAlbumsFetcher::new(client);

        let data = fetcher
            .fetch(&Credential::new("t"), &QueryConfig::default())
            .await
            .unwrap();

        let SourceData::Albums(albums) = data else {
            panic!("Expected albums");
        };
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].name, "SOUR");
        assert_eq!(albums[0].track_count, 11);
        assert_eq!(albums[0].release_date.as_deref(), Some("2021-05-21"));
        assert_eq!(albums[0].artwork_url.as_deref(), Some("https://img/sour.jpg"));
    }
}
