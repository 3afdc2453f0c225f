//! Column mapping shared by the track and image tables
//!
//! A payload is stored either as `source_url` or as `mime` + `data`; the
//! schema enforces that exactly one of `source_url` and `data` is set.

use crate::error::{Result, StorageError};
use chrono::{DateTime, Utc};
use serenade_core::MediaData;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Columns of a payload, ready to bind
pub(crate) struct PayloadColumns<'a> {
    pub source_url: Option<&'a str>,
    pub mime: Option<&'a str>,
    pub data: Option<&'a [u8]>,
}

pub(crate) fn to_columns(data: &MediaData) -> PayloadColumns<'_> {
    match data {
        MediaData::Url(url) => PayloadColumns {
            source_url: Some(url),
            mime: None,
            data: None,
        },
        MediaData::Blob { mime, bytes } => PayloadColumns {
            source_url: None,
            mime: Some(mime),
            data: Some(bytes),
        },
    }
}

pub(crate) fn from_row(row: &SqliteRow) -> Result<MediaData> {
    let source_url: Option<String> = row.try_get("source_url")?;
    let data: Option<Vec<u8>> = row.try_get("data")?;

    match (source_url, data) {
        (Some(url), None) => Ok(MediaData::Url(url)),
        (None, Some(bytes)) => {
            let mime: Option<String> = row.try_get("mime")?;
            Ok(MediaData::Blob {
                mime: mime.unwrap_or_else(|| "application/octet-stream".to_string()),
                bytes,
            })
        }
        _ => Err(StorageError::corrupt("payload must be either a URL or a blob")),
    }
}

/// Current time truncated to what the schema stores (whole seconds)
pub(crate) fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now)
}

pub(crate) fn timestamp_from_row(row: &SqliteRow) -> Result<DateTime<Utc>> {
    let secs: i64 = row.try_get("added_at")?;
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StorageError::corrupt(format!("invalid timestamp: {secs}")))
}
