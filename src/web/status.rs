//! Health and status handlers.

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::trace;
use ts_rs::TS;

use crate::state::AppState;

#[derive(Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CacheInfo {
    entries: usize,
    in_flight: usize,
}

#[derive(Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StatusResponse {
    version: String,
    commit: String,
    caches: BTreeMap<String, CacheInfo>,
}

/// Health check endpoint
pub(super) async fn health() -> Json<Value> {
    trace!("health check requested");
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Status endpoint: build info plus per-resource cache counters.
pub(super) async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let caches = state
        .catalog
        .stats()
        .into_iter()
        .map(|(name, stats)| {
            (
                name.to_owned(),
                CacheInfo {
                    entries: stats.entries,
                    in_flight: stats.in_flight,
                },
            )
        })
        .collect();

    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: env!("GIT_COMMIT_HASH").to_string(),
        caches,
    })
}
