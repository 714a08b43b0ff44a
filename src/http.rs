//! HTTP surface for the projects API.
//!
//! Handlers only parse arguments and shape responses; all logic lives in
//! [`scan`](crate::scan) and [`query`](crate::query). Every request re-reads
//! storage, so content edits show up without a restart.
//!
//! ## Endpoints
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /api/projects` | all projects, newest first |
//! | `GET /api/projects?featured=true` | featured projects only |
//! | `GET /api/projects?slug=<s>` | one project (`slug` wins over `featured`) |
//! | `GET /api/projects/{slug}/related?limit=N` | related projects (default limit from config) |
//! | `GET /api/projects/{slug}/navigation` | `{"previous": …, "next": …}` |
//!
//! Unknown slugs are `404 {"error": "Project not found"}`. A storage failure
//! is `500 {"error": "Failed to load projects"}`.
//!
//! Successful responses carry the configured `Cache-Control` and an `ETag`
//! (SHA-256 of the body). A matching `If-None-Match` gets `304 Not Modified`.

use crate::config::FolioConfig;
use crate::query::{self, ContentIndex};
use crate::scan::{self, ScanError};
use crate::store::ContentStore;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Project not found")]
    NotFound,

    #[error("Failed to load projects")]
    Storage(#[from] ScanError),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Storage(e) => {
                error!(error = %e, "content scan failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(e) => {
                error!(error = %e, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Shared handler state: the content store and the loaded config.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FolioConfig>,
    pub store: Arc<dyn ContentStore>,
}

impl AppState {
    pub fn new(config: FolioConfig, store: impl ContentStore + 'static) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }
}

#[derive(Deserialize)]
pub struct ProjectsParams {
    featured: Option<String>,
    slug: Option<String>,
}

#[derive(Deserialize)]
pub struct RelatedParams {
    limit: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/projects", get(projects_handler))
        .route("/api/projects/{slug}/related", get(related_handler))
        .route("/api/projects/{slug}/navigation", get(navigation_handler))
        .with_state(state)
}

pub async fn projects_handler(
    State(state): State<AppState>,
    Query(params): Query<ProjectsParams>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let index = load_index(&state).await?;

    if let Some(slug) = params.slug {
        let project = index.find_by_slug(&slug).ok_or(AppError::NotFound)?;
        return cached_json(&state, &headers, project);
    }

    let featured = params
        .featured
        .is_some_and(|f| f.eq_ignore_ascii_case("true"));
    let projects = if featured {
        index.list_featured()
    } else {
        index.list_all()
    };
    cached_json(&state, &headers, &projects)
}

pub async fn related_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<RelatedParams>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let limit = parse_limit(params.limit.as_deref(), state.config.related.default_limit);
    let index = load_index(&state).await?;
    let related = index.related(&slug, limit).ok_or(AppError::NotFound)?;
    cached_json(&state, &headers, &related)
}

pub async fn navigation_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let index = load_index(&state).await?;
    let nav = index.navigation(&slug).ok_or(AppError::NotFound)?;
    cached_json(&state, &headers, &nav)
}

/// A positive integer limit, or `default` when missing, zero, or unparseable.
fn parse_limit(raw: Option<&str>, default: usize) -> usize {
    query::effective_limit(raw.and_then(|s| s.trim().parse().ok()), default)
}

/// Scan storage on the blocking pool and index the result.
async fn load_index(state: &AppState) -> Result<ContentIndex, AppError> {
    let store = Arc::clone(&state.store);
    let config = Arc::clone(&state.config);
    let default_date = config
        .content
        .parsed_default_date()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let report = tokio::task::spawn_blocking(move || scan::scan(store.as_ref(), &config.content))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ContentIndex::new(report.records, default_date))
}

/// Strong ETag for a response body.
fn etag_for(body: &[u8]) -> String {
    format!("\"{:x}\"", Sha256::digest(body))
}

/// Weak comparison of an `If-None-Match` list against `etag`: a `W/` prefix
/// on either side is ignored, and `*` matches anything.
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    let opaque = |tag: &str| {
        let tag = tag.trim();
        tag.strip_prefix("W/").unwrap_or(tag).to_string()
    };
    let etag = opaque(etag);
    if_none_match
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || opaque(candidate) == etag)
}

/// Serialize `value` as a cacheable JSON response.
fn cached_json<T: Serialize + ?Sized>(
    state: &AppState,
    request_headers: &HeaderMap,
    value: &T,
) -> Result<Response, AppError> {
    let body = serde_json::to_vec(value).map_err(|e| AppError::Internal(e.to_string()))?;
    let etag = etag_for(&body);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_str(&state.config.server.cache_control)
            .map_err(|e| AppError::Internal(e.to_string()))?,
    );
    headers.insert(
        header::ETAG,
        HeaderValue::from_str(&etag).map_err(|e| AppError::Internal(e.to_string()))?,
    );

    let not_modified = request_headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| etag_matches(v, &etag));
    if not_modified {
        return Ok((StatusCode::NOT_MODIFIED, headers).into_response());
    }

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Ok((StatusCode::OK, headers, body).into_response())
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(state: AppState) -> std::io::Result<()> {
    let address = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = router(state);

    let listener = TcpListener::bind(&address).await?;
    info!("Serving projects API on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
