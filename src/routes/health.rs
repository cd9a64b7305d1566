use axum::{response::IntoResponse, routing::get, Json, Router};

pub fn routes() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
