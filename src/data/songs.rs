//! Database operations for the `songs` table.

use crate::data::models::SongSummary;
use anyhow::{Context, Result};
use sqlx::PgPool;

/// Most recently added songs across the catalog.
pub async fn list_latest(pool: &PgPool, limit: i64) -> Result<Vec<SongSummary>> {
    let rows = sqlx::query_as::<_, SongSummary>(
        r#"
        SELECT s.id, s.title, a.name AS artist_name, al.title AS album_title, s.duration_seconds
        FROM songs s
        JOIN artists a ON a.id = s.artist_id
        LEFT JOIN albums al ON al.id = s.album_id
        ORDER BY s.created_at DESC, s.id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
    .context("failed to fetch latest songs")?;
    Ok(rows)
}
