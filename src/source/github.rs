use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};

use crate::models::RawCommit;
use crate::source::CommitSource;

/// GitHub caps `per_page` at 100.
pub const MAX_PER_PAGE: usize = 100;
const MAX_PAGES: usize = 50;

#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub branch: Option<String>,
    pub token: Option<String>,
    pub timeout: Duration,
}

pub struct GithubSource {
    client: reqwest::Client,
    config: GithubConfig,
}

impl GithubSource {
    pub fn new(config: GithubConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn commits_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/commits",
            self.config.api_base.trim_end_matches('/'),
            self.config.owner,
            self.config.repo
        )
    }

    async fn fetch_page(&self, page: usize, per_page: usize) -> Result<Vec<RawCommit>, String> {
        let mut query = vec![
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ];
        if let Some(branch) = &self.config.branch {
            query.push(("sha", branch.clone()));
        }

        let mut request = self
            .client
            .get(self.commits_url())
            .query(&query)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!("commit-feed/", env!("CARGO_PKG_VERSION")));
        if let Some(token) = &self.config.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            let remaining = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("?")
                .to_string();
            return Err(format!("status {} (rate limit remaining: {})", status, remaining));
        }

        response
            .json::<Vec<RawCommit>>()
            .await
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl CommitSource for GithubSource {
    async fn fetch_recent(&self, limit: usize) -> Vec<RawCommit> {
        let mut commits: Vec<RawCommit> = Vec::new();
        if limit == 0 {
            return commits;
        }

        // Page numbers are only stable for a fixed page size.
        let per_page = limit.min(MAX_PER_PAGE);
        for page in 1..=MAX_PAGES {
            let batch = match self.fetch_page(page, per_page).await {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::warn!(
                        "Fetching commits for {}/{} page {} failed: {}",
                        self.config.owner,
                        self.config.repo,
                        page,
                        e
                    );
                    break;
                }
            };

            let exhausted = batch.len() < per_page;
            commits.extend(batch);
            if exhausted || commits.len() >= limit {
                break;
            }
        }

        commits.truncate(limit);
        tracing::debug!("Fetched {} commits from {}", commits.len(), self.commits_url());
        commits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};

    #[derive(Clone)]
    struct Upstream {
        total: usize,
        /// Pages at or after this number answer 500.
        fail_from_page: Option<usize>,
        hits: Arc<AtomicUsize>,
    }

    async fn list_commits(
        State(upstream): State<Upstream>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Result<Json<Vec<RawCommit>>, StatusCode> {
        upstream.hits.fetch_add(1, Ordering::SeqCst);
        let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        let per_page: usize = params.get("per_page").and_then(|p| p.parse().ok()).unwrap_or(30);

        if upstream.fail_from_page.is_some_and(|f| page >= f) {
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }

        let start = (page - 1) * per_page;
        let end = (start + per_page).min(upstream.total);
        let commits = (start..end)
            .map(|i| RawCommit {
                sha: format!("{:040x}", upstream.total - i),
                ..Default::default()
            })
            .collect();
        Ok(Json(commits))
    }

    async fn spawn_upstream(total: usize, fail_from_page: Option<usize>) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let state = Upstream {
            total,
            fail_from_page,
            hits: hits.clone(),
        };
        let app = Router::new()
            .route("/repos/{owner}/{repo}/commits", get(list_commits))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), hits)
    }

    fn source(api_base: String) -> GithubSource {
        GithubSource::new(GithubConfig {
            api_base,
            owner: "acme".to_string(),
            repo: "site".to_string(),
            branch: None,
            token: Some("test-token".to_string()),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_zero_limit_makes_no_request() {
        let (base, hits) = spawn_upstream(10, None).await;
        let commits = source(base).fetch_recent(0).await;
        assert!(commits.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_paginates_up_to_limit() {
        let (base, hits) = spawn_upstream(500, None).await;
        let commits = source(base).fetch_recent(250).await;
        assert_eq!(commits.len(), 250);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        // newest first, as delivered
        assert_eq!(commits[0].sha, format!("{:040x}", 500));
        assert_eq!(commits[249].sha, format!("{:040x}", 251));
    }

    #[tokio::test]
    async fn test_stops_when_source_exhausted() {
        let (base, hits) = spawn_upstream(30, None).await;
        let commits = source(base).fetch_recent(200).await;
        assert_eq!(commits.len(), 30);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_degrades_to_empty() {
        let (base, _) = spawn_upstream(30, Some(1)).await;
        assert!(source(base).fetch_recent(20).await.is_empty());
    }

    #[tokio::test]
    async fn test_later_page_failure_keeps_earlier_pages() {
        let (base, _) = spawn_upstream(500, Some(2)).await;
        let commits = source(base).fetch_recent(150).await;
        assert_eq!(commits.len(), 100);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_empty() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let commits = source(format!("http://{}", addr)).fetch_recent(10).await;
        assert!(commits.is_empty());
    }
}
