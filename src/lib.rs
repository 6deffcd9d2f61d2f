// folio: terminal portfolio backed by the GitHub REST API.
// The aggregator fetches, enriches, and caches projects and recent commits.

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod contact;
pub mod error;
pub mod github;

pub use aggregator::{Aggregator, AggregatorOptions, CommitLogEntry, EnrichMode, RepositorySummary};
pub use config::Config;
pub use error::{FolioError, Result};
