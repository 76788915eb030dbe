//! HTTP API for running crawls
//!
//! `POST /api/crawl` takes `{"url": ..., "maxPages": ...}`, `GET /api/crawl`
//! takes the same fields as query parameters. Both answer with the page
//! records as JSON, or as a CSV attachment when `?format=csv` is given.

mod handlers;

pub use handlers::{ApiError, CrawlBody, CrawlQuery};

use crate::config::Config;
use crate::crawler::{Fetcher, HttpFetcher};
use crate::LensError;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared state for every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: Arc<dyn Fetcher>,
}

impl AppState {
    /// Builds state with an HTTP fetcher configured from `config`
    pub fn from_config(config: Config) -> Result<Self, LensError> {
        let fetcher = HttpFetcher::new(&config.crawler, &config.user_agent)?;
        Ok(Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
        })
    }
}

/// Builds the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/crawl",
            get(handlers::crawl_get).post(handlers::crawl_post),
        )
        .with_state(state)
}

/// Binds `server.bind-address` and serves until Ctrl-C
pub async fn serve(config: Config) -> Result<(), LensError> {
    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let state = AppState::from_config(config)?;
    serve_on(listener, state).await
}

/// Serves the API on an already bound listener until Ctrl-C
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<(), LensError> {
    tracing::info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
