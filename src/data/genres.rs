//! Database operations for the `genres` table.

use crate::data::models::{Genre, SongSummary};
use anyhow::{Context, Result};
use sqlx::PgPool;

/// All genres with song counts, ordered by name.
pub async fn list_all(pool: &PgPool) -> Result<Vec<Genre>> {
    let rows = sqlx::query_as::<_, Genre>(
        r#"
        SELECT g.id, g.slug, g.name, COUNT(s.id) AS song_count
        FROM genres g
        LEFT JOIN songs s ON s.genre_id = g.id
        GROUP BY g.id, g.slug, g.name
        ORDER BY g.name
        "#,
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch genres")?;
    Ok(rows)
}

/// Songs for one genre, or `None` if no such genre exists.
///
/// The absent-genre case is distinct from a genre with zero songs, which
/// returns `Some` of an empty list.
pub async fn songs_for_slug(pool: &PgPool, slug: &str) -> Result<Option<Vec<SongSummary>>> {
    let genre_id: Option<i32> = sqlx::query_scalar("SELECT id FROM genres WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("failed to look up genre by slug")?;

    let Some(genre_id) = genre_id else {
        return Ok(None);
    };

    let rows = sqlx::query_as::<_, SongSummary>(
        r#"
        SELECT s.id, s.title, a.name AS artist_name, al.title AS album_title, s.duration_seconds
        FROM songs s
        JOIN artists a ON a.id = s.artist_id
        LEFT JOIN albums al ON al.id = s.album_id
        WHERE s.genre_id = $1
        ORDER BY s.title, s.id
        "#,
    )
    .bind(genre_id)
    .fetch_all(pool)
    .await
    .context("failed to fetch songs for genre")?;

    Ok(Some(rows))
}
