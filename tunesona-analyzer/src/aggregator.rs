//! Fan-out Aggregator
//!
//! Runs every configured Source Fetcher concurrently and waits for all of them
//! to settle. A failing source contributes nothing and is recorded in the
//! snapshot diagnostics; it never aborts or delays the others. The invocation
//! fails only when every source fails.

use crate::client::QueryClient;
use crate::error::PipelineError;
use crate::fetchers::{
    HeavyRotationFetcher, LibraryAlbumsFetcher, LibraryArtistsFetcher, LibrarySongsFetcher,
    MusicSummariesFetcher, RecentlyPlayedFetcher,
};
use crate::snapshot::{LibrarySnapshot, SourceSet};
use crate::types::{Collection, FetchError, QueryConfig, SourceData, SourceFailure, SourceFetcher};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tunesona_common::config::QuerySettings;
use tunesona_common::{Clock, Credential};

/// One fetcher together with the query it runs with
#[derive(Clone)]
pub struct SourcePlan {
    pub fetcher: Arc<dyn SourceFetcher>,
    pub query: QueryConfig,
}

impl SourcePlan {
    pub fn new(fetcher: Arc<dyn SourceFetcher>, query: QueryConfig) -> Self {
        Self { fetcher, query }
    }
}

/// Settled result of one source
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub collection: Collection,
    pub result: Result<SourceData, FetchError>,
}

/// Concurrent fan-out over a fixed set of sources
///
/// # Example
/// ```rust,ignore
/// let aggregator = LibraryAggregator::new(vec![
///     SourcePlan::new(Arc::new(RecentlyPlayedFetcher::new(client.clone())), query.clone()),
///     SourcePlan::new(Arc::new(LibrarySongsFetcher::new(client)), query),
/// ]);
/// let snapshot = aggregator.build_library_snapshot(&credential).await?;
/// ```
pub struct LibraryAggregator {
    plans: Vec<SourcePlan>,
}

impl LibraryAggregator {
    pub fn new(plans: Vec<SourcePlan>) -> Self {
        Self { plans }
    }

    /// The six standard collections backed by one query client
    ///
    /// `limit` applies to every collection except heavy rotation, which uses
    /// `heavy_rotation_limit`. Music summaries are filtered to the clock's
    /// current year.
    pub fn standard(
        client: Arc<dyn QueryClient>,
        settings: &QuerySettings,
        clock: &dyn Clock,
    ) -> Self {
        let base = QueryConfig::new(settings.locale.clone());
        let limited = base.clone().with_limit(settings.limit);

        let plans = vec![
            SourcePlan::new(
                Arc::new(RecentlyPlayedFetcher::new(Arc::clone(&client))),
                limited.clone(),
            ),
            SourcePlan::new(
                Arc::new(LibrarySongsFetcher::new(Arc::clone(&client))),
                limited.clone(),
            ),
            SourcePlan::new(
                Arc::new(LibraryArtistsFetcher::new(Arc::clone(&client))),
                limited.clone(),
            ),
            SourcePlan::new(
                Arc::new(LibraryAlbumsFetcher::new(Arc::clone(&client))),
                limited,
            ),
            SourcePlan::new(
                Arc::new(HeavyRotationFetcher::new(Arc::clone(&client))),
                base.clone().with_limit(settings.heavy_rotation_limit),
            ),
            SourcePlan::new(
                Arc::new(MusicSummariesFetcher::new(client)),
                base.with_year(clock.current_year()),
            ),
        ];

        Self::new(plans)
    }

    /// Number of configured sources
    pub fn count(&self) -> usize {
        self.plans.len()
    }

    /// Fetch every source concurrently, one outcome per plan, in plan order
    ///
    /// Never short-circuits: every future runs to completion.
    pub async fn fetch_all(&self, credential: &Credential) -> Vec<SourceOutcome> {
        let futures = self.plans.iter().map(|plan| {
            let fetcher = Arc::clone(&plan.fetcher);
            let query = plan.query.clone();
            async move {
                let collection = fetcher.collection();
                let result = fetcher.fetch(credential, &query).await;
                match &result {
                    Ok(data) => {
                        debug!(collection = %collection, count = data.len(), "Source fetched");
                    }
                    Err(e) => {
                        warn!(
                            collection = %collection,
                            error = %e,
                            "Source failed (isolated, contributing no entities)"
                        );
                    }
                }
                SourceOutcome { collection, result }
            }
        });

        join_all(futures).await
    }

    /// Fan out, settle all, merge into a snapshot
    ///
    /// # Errors
    /// - `PipelineError::NoSourcesConfigured` with an empty plan list
    /// - `PipelineError::AllSourcesFailed` when no source succeeded
    pub async fn build_library_snapshot(
        &self,
        credential: &Credential,
    ) -> Result<LibrarySnapshot, PipelineError> {
        if self.plans.is_empty() {
            return Err(PipelineError::NoSourcesConfigured);
        }

        let outcomes = self.fetch_all(credential).await;

        let mut sources = SourceSet::default();
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();

        for outcome in outcomes {
            let inserted = outcome
                .result
                .and_then(|data| sources.insert(outcome.collection, data));
            match inserted {
                Ok(()) => succeeded.push(outcome.collection),
                Err(e) => failed.push(SourceFailure::from(&e)),
            }
        }

        if succeeded.is_empty() {
            warn!(failed = failed.len(), "All sources failed");
            return Err(PipelineError::AllSourcesFailed { failures: failed });
        }

        let snapshot = LibrarySnapshot::build(sources, succeeded, failed);
        info!(
            succeeded = snapshot.succeeded_sources.len(),
            failed = snapshot.failed_sources.len(),
            tracks = snapshot.listening_stats.total_tracks,
            "Library snapshot built"
        );
        Ok(snapshot)
    }
}

// ============================================================================
// Mock Fetchers for Testing
// ============================================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use async_trait::async_trait;

    /// Fetcher returning canned data or a canned failure
    pub struct MockFetcher {
        pub collection: Collection,
        pub data: Option<SourceData>,
    }

    impl MockFetcher {
        pub fn new(collection: Collection, data: SourceData) -> Self {
            Self {
                collection,
                data: Some(data),
            }
        }

        pub fn failing(collection: Collection) -> Self {
            Self {
                collection,
                data: None,
            }
        }
    }

    #[async_trait]
    impl SourceFetcher for MockFetcher {
        fn collection(&self) -> Collection {
            self.collection
        }

        async fn fetch(
            &self,
            _credential: &Credential,
            _query: &QueryConfig,
        ) -> Result<SourceData, FetchError> {
            match &self.data {
                Some(data) => Ok(data.clone()),
                None => Err(FetchError::SourceUnavailable {
                    collection: self.collection,
                    status: Some(503),
                    message: "Mock failure".to_string(),
                }),
            }
        }
    }
}
