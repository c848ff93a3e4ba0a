//! Library Artists Fetcher

use super::{request_collection, Artwork};
use crate::client::QueryClient;
use crate::types::{Artist, Collection, FetchError, QueryConfig, SourceData, SourceFetcher};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use tunesona_common::Credential;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ArtistAttributes {
    name: String,
    genre_names: Vec<String>,
    artwork: Option<Artwork>,
}

/// Fetches artists from the user's library
pub struct LibraryArtistsFetcher {
    client: Arc<dyn QueryClient>,
}

impl LibraryArtistsFetcher {
    pub fn new(client: Arc<dyn QueryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceFetcher for LibraryArtistsFetcher {
    fn collection(&self) -> Collection {
        Collection::LibraryArtists
    }

    async fn fetch(
        &self,
        credential: &Credential,
        query: &QueryConfig,
    ) -> Result<SourceData, FetchError> {
        let collection = self.collection();
        let resources =
            request_collection(self.client.as_ref(), credential, collection, query).await?;

        let artists = resources
            .into_iter()
            .map(|r| {
                let attributes: ArtistAttributes = r.attributes_as(collection)?;
                Ok(Artist {
                    id: r.id,
                    name: attributes.name,
                    genre: super::primary_genre(&attributes.genre_names),
                    artwork_url: attributes.artwork.and_then(|a| a.url),
                })
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        debug!(collection = %collection, count = artists.len(), "Mapped artists");
        Ok(SourceData::Artists(artists))
    }
}
