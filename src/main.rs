//! Commit Feed - community changelog for a token project
//!
//! Serves a server-rendered changelog built from the project's recent
//! commits, annotated with community comment counts, plus a small JSON API
//! for wallet-gated comments and upvotes.
//!
//! # Usage
//! ```bash
//! commit-feed --repo acme/site                 # Start server
//! commit-feed --repo acme/site --open          # Start and open browser
//! GITHUB_TOKEN=... commit-feed --repo acme/site --port 8080
//! ```

mod config;
mod error;
mod feed;
mod models;
mod render;
mod routes;
mod source;
mod store;

use std::sync::Arc;

use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use feed::FeedService;
use routes::AppState;
use source::{CommitSource, GithubSource, RevalidatingSource};
use store::{CommentStore, SledCommentStore};

/// Commit Feed - community changelog with wallet-gated comments
#[derive(Parser)]
#[command(name = "commit-feed")]
#[command(about = "Community changelog built from recent commits", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    /// Address to bind the server to
    #[arg(long, env = "BIND_ADDRESS", default_value = "127.0.0.1")]
    bind: String,

    /// Port to run the server on
    #[arg(short, long, env = "PORT", default_value = "3001")]
    port: u16,

    /// Open browser automatically after starting
    #[arg(short, long)]
    open: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = cli.config;
    if config.github_token.is_none() {
        tracing::warn!("No GITHUB_TOKEN set, upstream requests are rate limited");
    }

    let github = GithubSource::new(config.github())?;
    let source: Arc<dyn CommitSource> =
        Arc::new(RevalidatingSource::new(github, config.revalidate()));

    std::fs::create_dir_all(&config.data_dir)?;
    let sled_store = Arc::new(SledCommentStore::open(&config.data_dir)?);
    let store: Arc<dyn CommentStore> = sled_store.clone();

    let state = AppState {
        feed: Arc::new(FeedService::new(source, store.clone(), config.limit)),
        store,
        revalidate: config.revalidate(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", cli.bind, cli.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to {}: {}", addr, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    let url = format!("http://{}", addr);
    tracing::info!(
        "Serving changelog for {}/{} on {}",
        config.repo.owner,
        config.repo.name,
        url
    );
    println!();
    println!("  Repository: {}/{}", config.repo.owner, config.repo.name);
    println!("  Comments:   {}", config.data_dir.display());
    println!("  Server:     {}", url);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    if cli.open {
        if let Err(e) = open::that(&url) {
            eprintln!("  Warning: Could not open browser: {}", e);
        }
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    sled_store.flush()?;
    Ok(())
}
