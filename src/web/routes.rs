//! Web API router construction and shared response utilities.

use axum::http::HeaderValue;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer};

use crate::state::AppState;
use crate::web::middleware::request_id::RequestIdLayer;
use crate::web::{admin, artists, genres, songs, status};

/// Cache-Control presets for public endpoints.
///
/// `s-maxage` mirrors the in-process TTL so edge caches expire in step with
/// us; `stale-while-revalidate` lets them serve stale content while
/// re-fetching in the background.
pub mod cache {
    /// Whole-catalog listings (genres, artists, songs). Mirrors the 1h TTL.
    pub const CATALOG: &str = "public, max-age=300, s-maxage=3600, stale-while-revalidate=300";
    /// Per-slug browse lookups. Mirrors the 5m TTL.
    pub const BROWSE: &str = "public, max-age=60, s-maxage=300, stale-while-revalidate=120";
    /// Admin endpoints -- never cache.
    pub const ADMIN: &str = "private, no-store, must-revalidate";
}

/// Wraps a JSON response with a `Cache-Control` header.
pub fn with_cache_control<T: serde::Serialize>(value: T, header: &'static str) -> Response {
    let mut response = Json(value).into_response();
    response.headers_mut().insert(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(header),
    );
    response
}

/// Creates the web server router
pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(status::health))
        .route("/status", get(status::status))
        .route("/genres", get(genres::list_genres))
        .route("/genres/{slug}/songs", get(genres::genre_songs))
        .route("/artists", get(artists::list_artists))
        .route("/artists/{slug}/albums", get(artists::artist_albums))
        .route("/songs", get(songs::list_songs))
        .with_state(app_state.clone());

    let admin_router = Router::new()
        .route("/admin/catalog/purge", post(admin::purge_catalog))
        .layer(axum::middleware::map_response(
            |mut resp: Response| async move {
                resp.headers_mut().insert(
                    axum::http::header::CACHE_CONTROL,
                    HeaderValue::from_static(cache::ADMIN),
                );
                resp
            },
        ))
        .with_state(app_state);

    let router = Router::new().nest("/api", api_router).nest("/api", admin_router);

    router.layer((
        // Outermost: per-request ID span + severity-proportional response logging.
        RequestIdLayer,
        // The frontend dev server runs on its own origin.
        CorsLayer::permissive(),
        CompressionLayer::new(),
        TimeoutLayer::new(Duration::from_secs(30)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CACHE_CONTROL;

    #[test]
    fn with_cache_control_sets_the_header() {
        let response = with_cache_control(vec!["pop", "rock"], cache::CATALOG);
        assert_eq!(
            response.headers().get(CACHE_CONTROL).unwrap(),
            &HeaderValue::from_static(cache::CATALOG)
        );
    }
}
