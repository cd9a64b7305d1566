//! Revalidation cache for upstream commits.
//!
//! Keeps the last successful fetch in memory so page loads inside the
//! revalidation window do not hit the upstream API again.
//! - A hit needs an entry younger than the window that was fetched with at
//!   least the requested limit; the result is truncated to the request.
//! - Empty fetches are never stored, so a failed upstream is retried on the
//!   next request.
//!
//! Used by: `FeedService` in feed/mod.rs

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::models::RawCommit;
use crate::source::CommitSource;

struct CachedFetch {
    commits: Vec<RawCommit>,
    limit: usize,
    fetched_at: Instant,
}

pub struct RevalidatingSource<S> {
    inner: S,
    window: Duration,
    entry: Mutex<Option<CachedFetch>>,
}

impl<S: CommitSource> RevalidatingSource<S> {
    pub fn new(inner: S, window: Duration) -> Self {
        Self {
            inner,
            window,
            entry: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<S: CommitSource> CommitSource for RevalidatingSource<S> {
    async fn fetch_recent(&self, limit: usize) -> Vec<RawCommit> {
        if limit == 0 {
            return Vec::new();
        }

        // Held across the upstream call so concurrent misses fetch once.
        let mut entry = self.entry.lock().await;
        if let Some(cached) = entry.as_ref() {
            if cached.fetched_at.elapsed() < self.window && cached.limit >= limit {
                tracing::debug!(
                    "Serving {} cached commits ({:?} old)",
                    limit.min(cached.commits.len()),
                    cached.fetched_at.elapsed()
                );
                return cached.commits.iter().take(limit).cloned().collect();
            }
        }

        let commits = self.inner.fetch_recent(limit).await;
        if commits.is_empty() {
            return commits;
        }

        *entry = Some(CachedFetch {
            commits: commits.clone(),
            limit,
            fetched_at: Instant::now(),
        });
        commits
    }
}
