//! Carousel image persistence

use crate::error::{Result, StorageError};
use crate::payload;
use serenade_core::{Image, MediaId, NewImage};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

fn from_row(row: &SqliteRow) -> Result<Image> {
    Ok(Image {
        id: MediaId::new(row.try_get::<String, _>("id")?),
        data: payload::from_row(row)?,
        added_at: payload::timestamp_from_row(row)?,
    })
}

/// Get all images, oldest first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Image>> {
    let rows = sqlx::query("SELECT id, source_url, mime, data, added_at FROM images ORDER BY seq")
        .fetch_all(pool)
        .await?;
    rows.iter().map(from_row).collect()
}

/// Insert a new image
pub async fn create(pool: &SqlitePool, image: NewImage) -> Result<Image> {
    let id = MediaId::generate();
    let added_at = payload::now();
    let columns = payload::to_columns(&image.data);

    sqlx::query(
        "INSERT INTO images (id, source_url, mime, data, added_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id.as_str())
    .bind(columns.source_url)
    .bind(columns.mime)
    .bind(columns.data)
    .bind(added_at.timestamp())
    .execute(pool)
    .await?;

    debug!(%id, "Image stored");

    Ok(Image {
        id,
        data: image.data,
        added_at,
    })
}

/// Delete an image by ID
pub async fn delete(pool: &SqlitePool, id: &MediaId) -> Result<()> {
    let result = sqlx::query("DELETE FROM images WHERE id = ?")
        .bind(id.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Image", id.as_str()));
    }

    Ok(())
}
