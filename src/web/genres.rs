//! Genre listing and per-genre song handlers.

use axum::extract::{Path, State};
use axum::response::Response;

use crate::data;
use crate::state::AppState;
use crate::web::error::{ApiError, db_error};
use crate::web::routes::{cache, with_cache_control};

const GENRES_KEY: &str = "genres";

/// `GET /api/genres`
pub(super) async fn list_genres(State(state): State<AppState>) -> Result<Response, ApiError> {
    let pool = state.db_pool.clone();
    let genres = state
        .catalog
        .genres
        .load(GENRES_KEY, move || async move {
            data::genres::list_all(&pool).await
        })
        .await
        .map_err(|e| db_error("Genre listing", e))?;

    Ok(with_cache_control(&*genres, cache::CATALOG))
}

/// `GET /api/genres/{slug}/songs`
pub(super) async fn genre_songs(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let songs = {
        let pool = state.db_pool.clone();
        let slug = slug.clone();
        let key = slug.clone();
        state
            .catalog
            .genre_songs
            .load(&key, move || async move {
                data::genres::songs_for_slug(&pool, &slug).await
            })
            .await
            .map_err(|e| db_error("Genre song listing", e))?
    };

    match songs.as_ref() {
        Some(list) => Ok(with_cache_control(list, cache::BROWSE)),
        None => Err(ApiError::unknown_genre(&slug)),
    }
}
