//! Reading local files into media payloads
use crate::error::Result;
use serenade_core::MediaData;
use std::path::Path;

const FALLBACK_MIME: &str = "application/octet-stream";

/// MIME type from the file extension
pub fn guess_mime(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FALLBACK_MIME;
    };

    match ext.to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "wav" => "audio/wav",
        "m4a" | "aac" => "audio/mp4",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => FALLBACK_MIME,
    }
}

/// Read a file into a blob payload
///
/// `mime` overrides the extension-based guess.
pub async fn import_file(path: &Path, mime: Option<&str>) -> Result<MediaData> {
    let bytes = tokio::fs::read(path).await?;
    let mime = mime.unwrap_or_else(|| guess_mime(path));

    tracing::debug!(path = %path.display(), mime, size = bytes.len(), "Imported file");
    Ok(MediaData::blob(mime, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_common_types() {
        assert_eq!(guess_mime(Path::new("song.MP3")), "audio/mpeg");
        assert_eq!(guess_mime(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("noext")), FALLBACK_MIME);
        assert_eq!(guess_mime(Path::new("weird.xyz")), FALLBACK_MIME);
    }

    #[tokio::test]
    async fn imports_file_as_blob() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nossa.ogg");
        tokio::fs::write(&path, b"OggS....").await.unwrap();

        let data = import_file(&path, None).await.unwrap();
        assert_eq!(data.mime(), Some("audio/ogg"));
        assert_eq!(data.byte_len(), Some(8));

        let data = import_file(&path, Some("audio/x-custom")).await.unwrap();
        assert_eq!(data.mime(), Some("audio/x-custom"));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let result = import_file(Path::new("/nope/missing.mp3"), None).await;
        assert!(matches!(result, Err(crate::error::CliError::Io(_))));
    }
}
