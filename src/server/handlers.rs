//! Request handlers for the crawl API

use crate::crawler::{CrawlRequest, PageRecord, Session};
use crate::report::export_csv_string;
use crate::server::AppState;
use crate::LensError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

/// JSON body of `POST /api/crawl`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlBody {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub max_pages: i64,
}

/// Query string of `GET /api/crawl`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlQuery {
    pub url: Option<String>,
    pub max_pages: Option<String>,
    pub format: Option<String>,
}

/// Query string accepted alongside a POST body
#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    pub format: Option<String>,
}

/// Errors returned to API clients
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<LensError> for ApiError {
    fn from(e: LensError) -> Self {
        match e {
            LensError::Config(e) => Self::BadRequest(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Self::Internal(message) => {
                tracing::error!("Request failed: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}

/// POST /api/crawl
pub async fn crawl_post(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
    body: Result<Json<CrawlBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|_| ApiError::BadRequest("Invalid request body".to_string()))?;

    if body.url.trim().is_empty() || body.max_pages <= 0 {
        return Err(ApiError::BadRequest(
            "URL and maxPages must be provided and valid".to_string(),
        ));
    }

    let pages = run_crawl(&state, &body.url, body.max_pages as usize).await?;
    render(pages, query.format.as_deref())
}

/// GET /api/crawl
pub async fn crawl_get(
    State(state): State<AppState>,
    Query(query): Query<CrawlQuery>,
) -> Result<Response, ApiError> {
    let url = match query.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => return Err(ApiError::BadRequest("Missing 'url' parameter".to_string())),
    };

    let max_pages = match query.max_pages.as_deref().map(str::trim) {
        None | Some("") => state.config.server.default_max_pages,
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(ApiError::BadRequest(format!(
                    "Invalid 'maxPages' parameter: {}",
                    raw
                )))
            }
        },
    };

    let pages = run_crawl(&state, &url, max_pages).await?;
    render(pages, query.format.as_deref())
}

async fn run_crawl(
    state: &AppState,
    url: &str,
    max_pages: usize,
) -> Result<Vec<PageRecord>, ApiError> {
    let request = CrawlRequest::new(url, max_pages).map_err(LensError::from)?;
    tracing::info!("Starting crawl on: {} (max {} pages)", url, max_pages);

    let session = Session::new(
        request,
        Arc::clone(&state.fetcher),
        state.config.crawler.workers,
    )?;
    Ok(session.run().await?)
}

fn render(pages: Vec<PageRecord>, format: Option<&str>) -> Result<Response, ApiError> {
    if format.map_or(false, |f| f.eq_ignore_ascii_case("csv")) {
        let csv = export_csv_string(&pages).map_err(|e| ApiError::Internal(e.to_string()))?;
        return Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment;filename=seo_report.csv",
                ),
            ],
            csv,
        )
            .into_response());
    }

    Ok(Json(pages).into_response())
}
