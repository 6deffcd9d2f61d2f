// GitHub API module.
// Provides the retrying client, transport seam, and response types.

pub mod client;
pub mod endpoints;
pub mod pagination;
pub mod types;

pub use client::{Api, ApiResponse, GitHubClient, RetryPolicy, Transport};
pub use types::*;
