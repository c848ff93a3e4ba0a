//! Analysis pipeline
//!
//! One invocation: obtain a credential once, fan out to every source, build
//! the snapshot, classify the persona. Invocations share no state, so a
//! caller may retry the whole run freely.

use crate::aggregator::LibraryAggregator;
use crate::error::{PipelineError, PipelineResult};
use crate::persona::{derive_persona, PersonaResult};
use crate::prompt::build_analysis_prompt;
use crate::snapshot::LibrarySnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use tunesona_common::time::{millis_to_rounded_hours, millis_to_rounded_minutes};
use tunesona_common::CredentialProvider;

/// Snapshot plus the persona derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub snapshot: LibrarySnapshot,
    pub persona: PersonaResult,
}

impl AnalysisReport {
    /// Classify an already-built snapshot
    pub fn from_snapshot(snapshot: LibrarySnapshot) -> Self {
        let persona = derive_persona(&snapshot.top_genres);
        Self { snapshot, persona }
    }

    /// Analysis prompt for an external text-generation service
    pub fn analysis_prompt(&self) -> String {
        build_analysis_prompt(&self.snapshot)
    }

    /// Human-readable summary
    pub fn render_text(&self) -> String {
        let stats = &self.snapshot.listening_stats;
        let mut lines = vec![
            format!("Persona: {} ({})", self.persona.label, self.persona.mood),
            format!("Prompt: {}", self.persona.prompt),
            String::new(),
            format!("Tracks analyzed: {}", stats.total_tracks),
            format!(
                "Total play time: {} hours",
                millis_to_rounded_hours(stats.total_play_time_ms as f64)
            ),
            format!("Total plays: {}", stats.total_play_count),
            format!(
                "Average session: {} minutes",
                millis_to_rounded_minutes(stats.average_session_length_ms)
            ),
            String::new(),
            "Top genres:".to_string(),
        ];

        for (rank, genre) in self.snapshot.top_genres.iter().enumerate() {
            lines.push(format!("{:>3}. {} ({})", rank + 1, genre.genre, genre.count));
        }

        lines.push(String::new());
        let succeeded: Vec<&str> = self
            .snapshot
            .succeeded_sources
            .iter()
            .map(|c| c.name())
            .collect();
        lines.push(format!("Sources ok: {}", succeeded.join(", ")));
        for failure in &self.snapshot.failed_sources {
            lines.push(format!("Source failed: {} ({})", failure.collection, failure.error));
        }

        lines.join("\n")
    }
}

/// Aggregator bound to a credential provider
pub struct LibraryPipeline {
    aggregator: LibraryAggregator,
    provider: Arc<dyn CredentialProvider>,
}

impl LibraryPipeline {
    pub fn new(aggregator: LibraryAggregator, provider: Arc<dyn CredentialProvider>) -> Self {
        Self {
            aggregator,
            provider,
        }
    }

    /// Fetch a fresh snapshot
    ///
    /// The provider is asked exactly once; the credential is never refreshed
    /// mid-run.
    pub async fn build_library_snapshot(&self) -> PipelineResult<LibrarySnapshot> {
        let credential = self
            .provider
            .get_valid_credential()
            .await
            .map_err(PipelineError::from_provider)?;

        self.aggregator.build_library_snapshot(&credential).await
    }

    /// Snapshot and persona for one "analyze" action
    pub async fn analyze(&self) -> PipelineResult<AnalysisReport> {
        let snapshot = self.build_library_snapshot().await?;
        let report = AnalysisReport::from_snapshot(snapshot);

        info!(
            provider = self.provider.name(),
            persona = %report.persona.archetype,
            top_genre = report.snapshot.top_genres.first().map(|g| g.genre.as_str()).unwrap_or("-"),
            "Analysis complete"
        );
        Ok(report)
    }
}
