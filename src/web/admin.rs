//! Admin endpoints for cache management.

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;
use tracing::info;
use ts_rs::TS;

use crate::state::AppState;

#[derive(Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PurgeResponse {
    entries_cleared: usize,
}

/// `POST /api/admin/catalog/purge` -- drop every cached catalog entry.
///
/// The next read per resource falls through to the database.
pub(super) async fn purge_catalog(State(state): State<AppState>) -> Json<PurgeResponse> {
    let entries_cleared = state.catalog.purge_all();
    info!(entries_cleared, "catalog caches purged");
    Json(PurgeResponse { entries_cleared })
}
