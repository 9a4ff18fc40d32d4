//! Artist directory and per-artist album handlers.

use axum::extract::{Path, State};
use axum::response::Response;

use crate::data;
use crate::state::AppState;
use crate::web::error::{ApiError, db_error};
use crate::web::routes::{cache, with_cache_control};

const ARTISTS_KEY: &str = "artists";

/// `GET /api/artists`
pub(super) async fn list_artists(State(state): State<AppState>) -> Result<Response, ApiError> {
    let pool = state.db_pool.clone();
    let artists = state
        .catalog
        .artists
        .load(ARTISTS_KEY, move || async move {
            data::artists::list_all(&pool).await
        })
        .await
        .map_err(|e| db_error("Artist listing", e))?;

    Ok(with_cache_control(&*artists, cache::CATALOG))
}

/// `GET /api/artists/{slug}/albums`
pub(super) async fn artist_albums(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let albums = {
        let pool = state.db_pool.clone();
        let slug = slug.clone();
        let key = slug.clone();
        state
            .catalog
            .artist_albums
            .load(&key, move || async move {
                data::artists::albums_for_slug(&pool, &slug).await
            })
            .await
            .map_err(|e| db_error("Artist album listing", e))?
    };

    match albums.as_ref() {
        Some(list) => Ok(with_cache_control(list, cache::BROWSE)),
        None => Err(ApiError::unknown_artist(&slug)),
    }
}
