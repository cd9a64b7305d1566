//! The changelog pipeline: fetch → parse → filter → annotate.
//!
//! - `parser`: raw upstream record to `ParsedCommit` with category and stats
//! - `filter`: category / hide-stats criteria
//! - `comments`: comment counts per commit from the store

pub mod comments;
pub mod filter;
pub mod parser;

use std::sync::Arc;

use crate::models::{FeedEntry, FeedPage};
use crate::source::CommitSource;
use crate::store::CommentStore;

use comments::get_comment_counts;
use filter::{filter_commits, FilterCriteria};
use parser::parse_commit;

pub struct FeedService {
    source: Arc<dyn CommitSource>,
    store: Arc<dyn CommentStore>,
    limit: usize,
}

impl FeedService {
    pub fn new(source: Arc<dyn CommitSource>, store: Arc<dyn CommentStore>, limit: usize) -> Self {
        Self {
            source,
            store,
            limit,
        }
    }

    /// Builds one changelog page. Never fails: an unreachable upstream gives
    /// an empty page and a failed count lookup shows as zero comments.
    pub async fn load(&self, criteria: &FilterCriteria) -> FeedPage {
        let raw = self.source.fetch_recent(self.limit).await;
        let fetched = raw.len();

        let parsed = raw.iter().map(parse_commit).collect();
        let commits = filter_commits(parsed, criteria);

        let shas: Vec<&str> = commits.iter().map(|c| c.sha.as_str()).collect();
        let counts = get_comment_counts(self.store.as_ref(), shas.as_slice());

        let entries = commits
            .into_iter()
            .map(|commit| {
                let comment_count = counts.get(&commit.sha).copied().unwrap_or(0);
                FeedEntry {
                    commit,
                    comment_count,
                }
            })
            .collect();

        FeedPage {
            entries,
            criteria: criteria.clone(),
            fetched,
        }
    }
}
