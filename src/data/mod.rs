//! Database query modules for the music catalog.

pub mod artists;
pub mod genres;
pub mod models;
pub mod songs;
