//! Changelog page.
//!
//! GET /changelog?category=&hideStats=
//! GET /            (same page, same parameters)
//!
//! `category` defaults to `all`; `hideStats` is on unless it is exactly
//! `"false"`. The response is HTML and cacheable for the revalidation window.

use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::feed::filter::FilterCriteria;
use crate::render::render_changelog;
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_changelog))
        .route("/changelog", get(get_changelog))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ChangelogQuery {
    category: Option<String>,
    #[serde(rename = "hideStats")]
    hide_stats: Option<String>,
}

async fn get_changelog(
    State(state): State<AppState>,
    Query(query): Query<ChangelogQuery>,
) -> impl IntoResponse {
    let criteria = FilterCriteria::from_query(query.category.as_deref(), query.hide_stats.as_deref());
    let page = state.feed.load(&criteria).await;
    tracing::debug!(
        "Changelog {:?}: {} of {} commits",
        criteria,
        page.entries.len(),
        page.fetched
    );

    let cache_control = format!("public, max-age={}", state.revalidate.as_secs());
    (
        [(header::CACHE_CONTROL, cache_control)],
        Html(render_changelog(&page)),
    )
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::routes;
    use crate::routes::test_support::{body_string, raw, state};

    fn commits() -> Vec<crate::models::RawCommit> {
        vec![
            raw("aaa111122223333", "Add wallet chat"),
            raw("bbb111122223333", "Weekly stats\n\nDistributed 1000 tokens to 50 holders"),
            raw("ccc111122223333", "Fix mint availability check"),
        ]
    }

    async fn get(uri: &str) -> anyhow::Result<(StatusCode, Option<String>, String)> {
        let tmp = TempDir::new()?;
        let app = routes(state(&tmp, commits())?);
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty())?)
            .await?;
        let status = response.status();
        let cache = response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok((status, cache, body_string(response).await))
    }

    #[tokio::test]
    async fn test_defaults_hide_stats() -> anyhow::Result<()> {
        let (status, cache, html) = get("/changelog").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("public, max-age=60"));
        assert!(html.contains("Add wallet chat"));
        assert!(html.contains("Fix mint availability check"));
        assert!(!html.contains("Weekly stats"));
        Ok(())
    }

    #[tokio::test]
    async fn test_show_stats_with_category() -> anyhow::Result<()> {
        let (_, _, html) = get("/?category=stats&hideStats=false").await?;
        assert!(html.contains("Weekly stats"));
        assert!(!html.contains("Add wallet chat"));
        assert!(html.contains("<dt>Holders</dt><dd>50</dd>"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_category_is_empty() -> anyhow::Result<()> {
        let (status, _, html) = get("/changelog?category=memes").await?;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("No commits to show."));
        Ok(())
    }
}
