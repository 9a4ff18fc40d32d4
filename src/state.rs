//! Application state shared across the web handlers.

use crate::cache::{CacheStats, FetchCache};
use crate::config::Config;
use crate::data::models::{Album, ArtistSummary, Genre, SongSummary};
use sqlx::PgPool;
use std::time::Duration;

/// One fetch-through cache per logical catalog resource.
///
/// Whole-catalog listings share the longer catalog TTL; per-slug browse
/// lookups use the shorter browse TTL. Each cache is isolated; purging or
/// refreshing one resource never disturbs another.
#[derive(Clone)]
pub struct CatalogCaches {
    pub genres: FetchCache<Vec<Genre>>,
    pub artists: FetchCache<Vec<ArtistSummary>>,
    pub songs: FetchCache<Vec<SongSummary>>,
    /// Keyed by genre slug. `None` caches a confirmed-absent genre.
    pub genre_songs: FetchCache<Option<Vec<SongSummary>>>,
    /// Keyed by artist slug.
    pub artist_albums: FetchCache<Option<Vec<Album>>>,
}

impl CatalogCaches {
    pub fn new(catalog_ttl: Duration, browse_ttl: Duration) -> Self {
        Self {
            genres: FetchCache::new("genres", catalog_ttl),
            artists: FetchCache::new("artists", catalog_ttl),
            songs: FetchCache::new("songs", catalog_ttl),
            genre_songs: FetchCache::new("genre_songs", browse_ttl),
            artist_albums: FetchCache::new("artist_albums", browse_ttl),
        }
    }

    /// Entry/in-flight counts for every resource, for the status endpoint.
    pub fn stats(&self) -> [(&'static str, CacheStats); 5] {
        [
            (self.genres.name(), self.genres.stats()),
            (self.artists.name(), self.artists.stats()),
            (self.songs.name(), self.songs.stats()),
            (self.genre_songs.name(), self.genre_songs.stats()),
            (self.artist_albums.name(), self.artist_albums.stats()),
        ]
    }

    /// Clear every cache, returning the total number of entries dropped.
    pub fn purge_all(&self) -> usize {
        self.genres.clear()
            + self.artists.clear()
            + self.songs.clear()
            + self.genre_songs.clear()
            + self.artist_albums.clear()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub catalog: CatalogCaches,
    pub latest_songs_limit: i64,
}

impl AppState {
    pub fn new(db_pool: PgPool, config: &Config) -> Self {
        Self {
            db_pool,
            catalog: CatalogCaches::new(config.catalog_ttl(), config.browse_ttl()),
            latest_songs_limit: config.latest_songs_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purge_reports_total_dropped() {
        let caches = CatalogCaches::new(Duration::from_secs(60), Duration::from_secs(60));
        assert_eq!(caches.purge_all(), 0);

        futures::executor::block_on(async {
            caches
                .genres
                .load("genres", || async { Ok(Vec::new()) })
                .await
                .unwrap();
            caches
                .genre_songs
                .load("pop", || async { Ok(Some(Vec::new())) })
                .await
                .unwrap();
        });

        assert_eq!(caches.purge_all(), 2);
        assert_eq!(caches.stats().iter().map(|(_, s)| s.entries).sum::<usize>(), 0);
    }
}
