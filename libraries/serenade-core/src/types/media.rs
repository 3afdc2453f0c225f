/// Stored media: tracks and carousel images
use super::MediaId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload of a stored media item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaData {
    /// Remote or bundled file, played by URL
    Url(String),

    /// Uploaded bytes kept in the store
    Blob {
        /// MIME type (e.g. `audio/mpeg`)
        mime: String,
        /// Raw file contents
        bytes: Vec<u8>,
    },
}

impl MediaData {
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    pub fn blob(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Blob {
            mime: mime.into(),
            bytes,
        }
    }

    /// MIME type, if known
    pub fn mime(&self) -> Option<&str> {
        match self {
            Self::Url(_) => None,
            Self::Blob { mime, .. } => Some(mime),
        }
    }

    /// Size in bytes of a blob payload
    pub fn byte_len(&self) -> Option<usize> {
        match self {
            Self::Url(_) => None,
            Self::Blob { bytes, .. } => Some(bytes.len()),
        }
    }

    pub fn is_blob(&self) -> bool {
        matches!(self, Self::Blob { .. })
    }

    /// Short human-readable description (`url` or `mime, size`)
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Blob { mime, bytes } => format!("{mime}, {} bytes", bytes.len()),
        }
    }
}

/// A stored song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: MediaId,
    pub title: String,
    pub artist: String,
    pub data: MediaData,
    pub added_at: DateTime<Utc>,
}

/// Data for creating a new track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrack {
    pub title: String,
    pub artist: String,
    pub data: MediaData,
}

impl NewTrack {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, data: MediaData) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            data,
        }
    }
}

/// A stored carousel image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: MediaId,
    pub data: MediaData,
    pub added_at: DateTime<Utc>,
}

/// Data for creating a new image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewImage {
    pub data: MediaData,
}

impl NewImage {
    pub fn new(data: MediaData) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_reports_mime_and_size() {
        let data = MediaData::blob("audio/mpeg", vec![0; 32]);
        assert_eq!(data.mime(), Some("audio/mpeg"));
        assert_eq!(data.byte_len(), Some(32));
        assert!(data.is_blob());
        assert_eq!(data.describe(), "audio/mpeg, 32 bytes");
    }

    #[test]
    fn url_has_no_size() {
        let data = MediaData::url("/song-1.mp3");
        assert_eq!(data.mime(), None);
        assert_eq!(data.byte_len(), None);
        assert_eq!(data.describe(), "/song-1.mp3");
    }

    #[test]
    fn media_data_serializes_by_variant_name() {
        let json = serde_json::to_value(MediaData::url("/a.mp3")).unwrap();
        assert_eq!(json["url"], "/a.mp3");
    }
}
