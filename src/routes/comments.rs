//! Community comments on commits.
//!
//! Comments are keyed by the full 40-character commit id in lowercase, the
//! same form the changelog looks counts up under.
//!
//! - GET /api/v1/commits/{sha}/comments
//!   Comments on one commit, most upvoted first, then oldest first.
//!
//! - POST /api/v1/commits/{sha}/comments { wallet, body }
//!   Adds a comment. Wallet-gated: the wallet must be a base58 address.
//!
//! - POST /api/v1/commits/{sha}/comments/{id}/upvote { wallet }
//!   One upvote per wallet per comment.
//!
//! - GET /api/v1/comments/counts?ids=sha1,sha2
//!   Comment count per commit id.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::feed::comments::get_comment_counts;
use crate::models::{Comment, NewComment, UpvoteRequest};
use crate::routes::AppState;

pub const MAX_COMMENT_LEN: usize = 500;
const MAX_COUNT_IDS: usize = 100;
const SHA_LEN: usize = 40;
const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/commits/{sha}/comments",
            get(list_comments).post(add_comment),
        )
        .route(
            "/api/v1/commits/{sha}/comments/{id}/upvote",
            post(upvote_comment),
        )
        .route("/api/v1/comments/counts", get(comment_counts))
        .with_state(state)
}

/// Accepts a full commit id in either case and returns it lowercased.
fn normalize_sha(sha: &str) -> Result<String> {
    let valid = sha.len() == SHA_LEN && sha.chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(sha.to_ascii_lowercase())
    } else {
        Err(AppError::InvalidInput(format!("not a full commit id: {}", sha)))
    }
}

fn validate_wallet(wallet: &str) -> Result<()> {
    let valid = (32..=44).contains(&wallet.len())
        && wallet.chars().all(|c| BASE58_ALPHABET.contains(c));
    if valid {
        Ok(())
    } else {
        Err(AppError::Unauthorized("a connected wallet is required".to_string()))
    }
}

async fn list_comments(
    State(state): State<AppState>,
    Path(sha): Path<String>,
) -> Result<Json<Vec<Comment>>> {
    let sha = normalize_sha(&sha)?;
    let mut comments = state.store.comments_for(&sha)?;
    comments.sort_by(|a, b| {
        b.upvotes
            .cmp(&a.upvotes)
            .then(a.created_at.cmp(&b.created_at))
    });
    Ok(Json(comments))
}

async fn add_comment(
    State(state): State<AppState>,
    Path(sha): Path<String>,
    Json(request): Json<NewComment>,
) -> Result<(StatusCode, Json<Comment>)> {
    let sha = normalize_sha(&sha)?;
    let wallet = request.wallet.trim();
    validate_wallet(wallet)?;

    let body = request.body.trim();
    if body.is_empty() {
        return Err(AppError::InvalidInput("comment is empty".to_string()));
    }
    if body.chars().count() > MAX_COMMENT_LEN {
        return Err(AppError::InvalidInput(format!(
            "comment is longer than {} characters",
            MAX_COMMENT_LEN
        )));
    }

    let comment = Comment {
        id: uuid::Uuid::new_v4().to_string(),
        sha,
        wallet: wallet.to_string(),
        body: body.to_string(),
        created_at: chrono::Utc::now().timestamp(),
        upvotes: 0,
        voters: Vec::new(),
    };
    state.store.insert(&comment)?;
    tracing::info!("Comment {} added to {} by {}", comment.id, comment.sha, comment.wallet);

    Ok((StatusCode::CREATED, Json(comment)))
}

async fn upvote_comment(
    State(state): State<AppState>,
    Path((sha, id)): Path<(String, String)>,
    Json(request): Json<UpvoteRequest>,
) -> Result<Json<Comment>> {
    let sha = normalize_sha(&sha)?;
    let wallet = request.wallet.trim();
    validate_wallet(wallet)?;

    let comment = state.store.upvote(&sha, &id, wallet)?;
    Ok(Json(comment))
}

#[derive(Debug, Deserialize)]
struct CountsQuery {
    #[serde(default)]
    ids: String,
}

async fn comment_counts(
    State(state): State<AppState>,
    Query(query): Query<CountsQuery>,
) -> Result<Json<HashMap<String, usize>>> {
    let ids: Vec<String> = query
        .ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    if ids.len() > MAX_COUNT_IDS {
        return Err(AppError::InvalidInput(format!(
            "at most {} ids per request",
            MAX_COUNT_IDS
        )));
    }

    Ok(Json(get_comment_counts(state.store.as_ref(), ids.as_slice())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::feed::filter::FilterCriteria;
    use crate::routes::test_support::{body_string, raw, state};

    const SHA: &str = "abc1234567890abcdef01234567890abcdef0123";
    const WALLET: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";
    const OTHER_WALLET: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = body_string(response).await;
        (status, serde_json::from_str(&body).unwrap_or(Value::Null))
    }

    #[test]
    fn test_validate_wallet() {
        assert!(validate_wallet(WALLET).is_ok());
        assert!(validate_wallet("").is_err());
        assert!(validate_wallet("0x52908400098527886E0F7030069857D2E4169EE7").is_err());
        assert!(validate_wallet(&"1".repeat(45)).is_err());
    }

    #[test]
    fn test_normalize_sha() {
        assert_eq!(normalize_sha(SHA).unwrap(), SHA);
        assert_eq!(normalize_sha(&SHA.to_uppercase()).unwrap(), SHA);
        assert!(normalize_sha("abc1234").is_err());
        assert!(normalize_sha(&format!("{}0", SHA)).is_err());
        assert!(normalize_sha("../../etc").is_err());
    }

    #[tokio::test]
    async fn test_comment_flow() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let app = routes(state(&tmp, Vec::new())?);
        let uri = format!("/api/v1/commits/{}/comments", SHA);

        let (status, first) =
            send(&app, post_json(&uri, json!({"wallet": WALLET, "body": " gm "}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["body"], "gm");
        assert_eq!(first["sha"], SHA);

        let (status, second) =
            send(&app, post_json(&uri, json!({"wallet": OTHER_WALLET, "body": "wagmi"}))).await;
        assert_eq!(status, StatusCode::CREATED);

        let second_id = second["id"].as_str().unwrap().to_string();
        let upvote_uri = format!("{}/{}/upvote", uri, second_id);
        let (status, upvoted) = send(&app, post_json(&upvote_uri, json!({"wallet": WALLET}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(upvoted["upvotes"], 1);

        let (status, _) = send(&app, post_json(&upvote_uri, json!({"wallet": WALLET}))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, listed) = send(&app, get_req(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0]["id"], second_id.as_str());

        let counts_uri = format!("/api/v1/comments/counts?ids={},def5678,{}", SHA, SHA);
        let (status, counts) = send(&app, get_req(&counts_uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(counts[SHA], 2);
        assert_eq!(counts["def5678"], 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_comment_requires_wallet() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let app = routes(state(&tmp, Vec::new())?);
        let uri = format!("/api/v1/commits/{}/comments", SHA);

        let (status, body) =
            send(&app, post_json(&uri, json!({"wallet": "nobody", "body": "hi"}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].as_str().unwrap().contains("wallet"));

        let (status, _) = send(&app, post_json(&uri, json!({"wallet": WALLET, "body": "   "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let long = "x".repeat(MAX_COMMENT_LEN + 1);
        let (status, _) = send(&app, post_json(&uri, json!({"wallet": WALLET, "body": long}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_upvote_unknown_comment() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let app = routes(state(&tmp, Vec::new())?);
        let uri = format!("/api/v1/commits/{}/comments/nope/upvote", SHA);
        let (status, _) = send(&app, post_json(&uri, json!({"wallet": WALLET}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_comments_keyed_by_full_lowercase_sha() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let state = state(&tmp, vec![raw(SHA, "Add chat")])?;
        let app = routes(state.clone());

        let upper = format!("/api/v1/commits/{}/comments", SHA.to_uppercase());
        let (status, created) =
            send(&app, post_json(&upper, json!({"wallet": WALLET, "body": "gm"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["sha"], SHA);

        let short = format!("/api/v1/commits/{}/comments", &SHA[..7]);
        let (status, _) =
            send(&app, post_json(&short, json!({"wallet": WALLET, "body": "gm"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let upvote_uri = format!("{}/{}/upvote", upper, created["id"].as_str().unwrap());
        let (status, _) = send(&app, post_json(&upvote_uri, json!({"wallet": OTHER_WALLET}))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, listed) = send(&app, get_req(&format!("/api/v1/commits/{}/comments", SHA))).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["upvotes"], 1);

        let counts_uri = format!("/api/v1/comments/counts?ids={}", SHA.to_uppercase());
        let (_, counts) = send(&app, get_req(&counts_uri)).await;
        assert_eq!(counts[SHA], 1);

        let page = state.feed.load(&FilterCriteria::default()).await;
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].comment_count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_bad_sha_rejected() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let app = routes(state(&tmp, Vec::new())?);
        let (status, _) = send(&app, get_req("/api/v1/commits/xyz/comments")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }
}
