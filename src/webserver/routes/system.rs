use axum::{extract::State, response::Response, routing::get, Router};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::cache::CacheMetrics;
use crate::webserver::state::AppState;
use crate::webserver::utils::success_response;

// =============================================================================
// RESPONSE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub entries: usize,
    pub ttl_secs: u64,
    pub capacity: usize,
    pub hit_rate: f64,
    pub metrics: CacheMetrics,
}

// =============================================================================
// ROUTES
// =============================================================================

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/api/cache/stats", get(cache_stats))
}

async fn health(State(state): State<Arc<AppState>>) -> Response {
    success_response(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
        uptime_seconds: state.uptime_seconds(),
    })
}

async fn cache_stats(State(state): State<Arc<AppState>>) -> Response {
    let metrics = state.analyzer.cache_metrics();
    success_response(CacheStatsResponse {
        entries: state.analyzer.cached_entries(),
        ttl_secs: state.config.signals.cache_ttl_secs,
        capacity: state.config.signals.cache_capacity,
        hit_rate: metrics.hit_rate(),
        metrics,
    })
}
