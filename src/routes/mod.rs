//! HTTP route handlers.
//!
//! Each submodule defines routes for a feature area:
//! - `changelog`: the server-rendered commit feed (GET /, GET /changelog)
//! - `comments`: wallet-gated comments and upvotes on commits
//! - `health`: liveness probe
//! - `assets`: embedded stylesheet

pub mod assets;
pub mod changelog;
pub mod comments;
pub mod health;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use crate::feed::FeedService;
use crate::store::SharedStore;

#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<FeedService>,
    pub store: SharedStore,
    /// Revalidation window advertised in Cache-Control on the changelog.
    pub revalidate: Duration,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(changelog::routes(state.clone()))
        .merge(comments::routes(state))
        .merge(health::routes())
        .merge(assets::routes())
}
