//! Row types returned by the catalog queries.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use ts_rs::TS;

/// A genre with its catalog size.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Genre {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub song_count: i64,
}

/// Directory entry for an artist.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ArtistSummary {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub album_count: i64,
    pub song_count: i64,
}

/// An album as listed on an artist page.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Album {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub released_on: Option<NaiveDate>,
    pub track_count: i64,
}

/// A song as listed in browse views.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SongSummary {
    pub id: i32,
    pub title: String,
    pub artist_name: String,
    pub album_title: Option<String>,
    pub duration_seconds: i32,
}
