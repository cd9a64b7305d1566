//! Upstream commit sources.
//!
//! - `github`: paginated client for the GitHub commit-listing endpoint
//! - `cache`: revalidation-window cache wrapping any source

pub mod cache;
pub mod github;

pub use cache::RevalidatingSource;
pub use github::{GithubConfig, GithubSource};

use async_trait::async_trait;

use crate::models::RawCommit;

#[async_trait]
pub trait CommitSource: Send + Sync {
    /// Up to `limit` commits, newest first. Upstream failures are logged and
    /// shorten the result instead of failing it.
    async fn fetch_recent(&self, limit: usize) -> Vec<RawCommit>;
}
