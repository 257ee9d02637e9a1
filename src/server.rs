//! HTTP surface for the proxy
//!
//! One data endpoint backed by the freshness gate and history updater, plus
//! a health check. All request state lives in [`AppState`]; each request runs
//! the full gate, fetch and persist sequence independently, with no mutual
//! exclusion across concurrent refreshes (last write wins on the store).

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::cache::RecordStore;
use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::fng::FngClient;
use crate::history::{self, Freshness, HistoryRecord};

/// Shared state handed to request handlers
#[derive(Clone)]
pub struct AppState {
    config: Arc<ProxyConfig>,
    store: Arc<dyn RecordStore>,
    fng: FngClient,
}

impl AppState {
    /// Builds the application state from configuration and a record store
    pub fn new(config: ProxyConfig, store: Arc<dyn RecordStore>) -> Self {
        let fng = FngClient::new(&config);
        Self {
            config: Arc::new(config),
            store,
            fng,
        }
    }
}

/// Builds the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/data", get(get_data))
        .route("/health", get(health))
        .with_state(state)
}

/// Binds the listener and serves requests until the process exits
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Serves the rolling index history, refreshing it once per calendar day
///
/// A record produced on the current calendar day is served unchanged.
/// Otherwise one sample is fetched downstream, appended to the series, and
/// the new record is written back with the retention TTL before being
/// returned. Any failure aborts the request without touching the store.
async fn get_data(State(state): State<AppState>) -> Result<Json<HistoryRecord>, ApiError> {
    let config = &state.config;
    let now = Utc::now();

    let prior = state.store.read(&config.cache_key).await?;

    if history::decide(prior.as_ref(), now, config.utc_offset) == Freshness::Fresh {
        // decide returns Fresh only for a present same-day record
        if let Some(record) = prior {
            info!("serving same-day cached record");
            return Ok(Json(record));
        }
    }

    info!("cache stale, refreshing from downstream");
    let record = history::refresh(
        prior.as_ref(),
        now,
        config.utc_offset,
        config.max_days,
        || state.fng.fetch_sample(),
    )
    .await?;

    state
        .store
        .write(&config.cache_key, &record, config.cache_ttl_secs)
        .await?;

    Ok(Json(record))
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "fngproxy",
    }))
}

/// Error wrapper rendering [`ProxyError`] as the JSON error response
struct ApiError(ProxyError);

impl From<ProxyError> for ApiError {
    fn from(err: ProxyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("request failed: {}", self.0);
        let body = Json(json!({ "error": self.0.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
