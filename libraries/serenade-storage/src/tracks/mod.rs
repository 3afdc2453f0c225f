//! Track persistence
//!
//! Tracks are listed in insertion order; that order becomes the playlist.

use crate::error::{Result, StorageError};
use crate::payload;
use serenade_core::{MediaId, NewTrack, Track};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

const SELECT_TRACKS: &str =
    "SELECT id, title, artist, source_url, mime, data, added_at FROM tracks ORDER BY seq";

fn from_row(row: &SqliteRow) -> Result<Track> {
    Ok(Track {
        id: MediaId::new(row.try_get::<String, _>("id")?),
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        data: payload::from_row(row)?,
        added_at: payload::timestamp_from_row(row)?,
    })
}

/// Get all tracks, oldest first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Track>> {
    let rows = sqlx::query(SELECT_TRACKS).fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

/// Insert a new track
pub async fn create(pool: &SqlitePool, track: NewTrack) -> Result<Track> {
    let id = MediaId::generate();
    let added_at = payload::now();
    let columns = payload::to_columns(&track.data);

    sqlx::query(
        "INSERT INTO tracks (id, title, artist, source_url, mime, data, added_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id.as_str())
    .bind(&track.title)
    .bind(&track.artist)
    .bind(columns.source_url)
    .bind(columns.mime)
    .bind(columns.data)
    .bind(added_at.timestamp())
    .execute(pool)
    .await?;

    debug!(%id, title = %track.title, "Track stored");

    Ok(Track {
        id,
        title: track.title,
        artist: track.artist,
        data: track.data,
        added_at,
    })
}

/// Delete a track by ID
pub async fn delete(pool: &SqlitePool, id: &MediaId) -> Result<()> {
    let result = sqlx::query("DELETE FROM tracks WHERE id = ?")
        .bind(id.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Track", id.as_str()));
    }

    Ok(())
}
