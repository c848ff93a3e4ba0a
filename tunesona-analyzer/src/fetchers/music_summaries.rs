//! Music Summaries Fetcher
//!
//! Reads `/v1/me/music-summaries`. The aggregator supplies the current year as
//! `filter[year]`; attributes are kept as raw JSON.

use super::request_collection;
use crate::client::QueryClient;
use crate::types::{
    Collection, FetchError, MusicSummary, QueryConfig, SourceData, SourceFetcher,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use tunesona_common::Credential;

/// Fetches year-in-review summary records
pub struct MusicSummariesFetcher {
    client: Arc<dyn QueryClient>,
}

impl MusicSummariesFetcher {
    pub fn new(client: Arc<dyn QueryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceFetcher for MusicSummariesFetcher {
    fn collection(&self) -> Collection {
        Collection::MusicSummaries
    }

    async fn fetch(
        &self,
        credential: &Credential,
        query: &QueryConfig,
    ) -> Result<SourceData, FetchError> {
        let collection = self.collection();
        let resources =
            request_collection(self.client.as_ref(), credential, collection, query).await?;

        let summaries: Vec<MusicSummary> = resources
            .into_iter()
            .map(|r| MusicSummary {
                id: r.id,
                kind: r.kind,
                attributes: r.attributes.unwrap_or(serde_json::Value::Null),
            })
            .collect();

        debug!(collection = %collection, count = summaries.len(), "Mapped music summaries");
        Ok(SourceData::Summaries(summaries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::ScriptedClient;
    use serde_json::json;

    #[tokio::test]
    async fn test_keeps_raw_attributes_and_sends_year() {
        let client = Arc::new(ScriptedClient::new().respond(
            "/v1/me/music-summaries",
            json!({
                "data": [{ "id": "2024", "type": "music-summaries", "attributes": { "year": 2024 } }]
            }),
        ));
        let fetcher = MusicSummariesFetcher::new(client.clone());

        let data = fetcher
            .fetch(&Credential::new("t"), &QueryConfig::default().with_year(2024))
            .await
            .unwrap();

        let SourceData::Summaries(summaries) = data else {
            panic!("Expected summaries");
        };
        assert_eq!(summaries[0].kind, "music-summaries");
        assert_eq!(summaries[0].attributes["year"], 2024);

        let calls = client.recorded_calls();
        assert!(calls[0]
            .1
            .contains(&("filter[year]".to_string(), "2024".to_string())));
    }
}
