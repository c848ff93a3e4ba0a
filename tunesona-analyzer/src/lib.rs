//! tunesona-analyzer library interface
//!
//! Music-library aggregation and persona classification. Exposes the
//! pipeline stages individually so integration tests and alternative data
//! sources (demo data) can drive them directly.

pub mod aggregator;
pub mod client;
pub mod config;
pub mod dedup;
pub mod demo;
pub mod error;
pub mod fetchers;
pub mod persona;
pub mod pipeline;
pub mod prompt;
pub mod snapshot;
pub mod statistics;
pub mod types;

pub use crate::aggregator::{LibraryAggregator, SourcePlan};
pub use crate::error::{PipelineError, PipelineResult};
pub use crate::persona::{derive_persona, Archetype, PersonaResult};
pub use crate::pipeline::{AnalysisReport, LibraryPipeline};
pub use crate::snapshot::LibrarySnapshot;
pub use crate::statistics::compute_statistics;
