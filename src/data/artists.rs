//! Database operations for the `artists` and `albums` tables.

use crate::data::models::{Album, ArtistSummary};
use anyhow::{Context, Result};
use sqlx::PgPool;

/// The artist directory with album and song counts, ordered by name.
pub async fn list_all(pool: &PgPool) -> Result<Vec<ArtistSummary>> {
    let rows = sqlx::query_as::<_, ArtistSummary>(
        r#"
        SELECT
            a.id,
            a.slug,
            a.name,
            (SELECT COUNT(*) FROM albums al WHERE al.artist_id = a.id) AS album_count,
            (SELECT COUNT(*) FROM songs s WHERE s.artist_id = a.id) AS song_count
        FROM artists a
        ORDER BY a.name
        "#,
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch artists")?;
    Ok(rows)
}

/// Albums for one artist, newest release first, or `None` if no such artist
/// exists.
pub async fn albums_for_slug(pool: &PgPool, slug: &str) -> Result<Option<Vec<Album>>> {
    let artist_id: Option<i32> = sqlx::query_scalar("SELECT id FROM artists WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("failed to look up artist by slug")?;

    let Some(artist_id) = artist_id else {
        return Ok(None);
    };

    let rows = sqlx::query_as::<_, Album>(
        r#"
        SELECT al.id, al.slug, al.title, al.released_on, COUNT(s.id) AS track_count
        FROM albums al
        LEFT JOIN songs s ON s.album_id = al.id
        WHERE al.artist_id = $1
        GROUP BY al.id, al.slug, al.title, al.released_on
        ORDER BY al.released_on DESC NULLS LAST, al.title
        "#,
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await
    .context("failed to fetch albums for artist")?;

    Ok(Some(rows))
}
