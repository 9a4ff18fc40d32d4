//! Song listing handlers.

use axum::extract::State;
use axum::response::Response;

use crate::data;
use crate::state::AppState;
use crate::web::error::{ApiError, db_error};
use crate::web::routes::{cache, with_cache_control};

const SONGS_KEY: &str = "latest";

/// `GET /api/songs` -- most recently added songs across the catalog.
pub(super) async fn list_songs(State(state): State<AppState>) -> Result<Response, ApiError> {
    let pool = state.db_pool.clone();
    let limit = state.latest_songs_limit;
    let songs = state
        .catalog
        .songs
        .load(SONGS_KEY, move || async move {
            data::songs::list_latest(&pool, limit).await
        })
        .await
        .map_err(|e| db_error("Song listing", e))?;

    Ok(with_cache_control(&*songs, cache::CATALOG))
}
