//! Session-scoped handles for stored media
//!
//! Blob payloads cannot be handed to an audio device directly, so the
//! registry issues opaque `blob:<uuid>` handles for them. URL payloads pass
//! through untouched. Handles live until revoked: explicitly, on
//! [`SourceRegistry::revoke_all`] before a media reload, or when the
//! registry is dropped.

use crate::error::{Result, SerenadeError};
use crate::types::MediaData;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use uuid::Uuid;

/// Prefix of every handle issued for blob payloads
pub const BLOB_SCHEME: &str = "blob:";

/// What a handle points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSource {
    /// Plain URL
    Url(String),

    /// Registered blob
    Blob { mime: String, bytes: Arc<[u8]> },
}

impl ResolvedSource {
    /// Size in bytes, for blobs
    pub fn byte_len(&self) -> Option<usize> {
        match self {
            Self::Url(_) => None,
            Self::Blob { bytes, .. } => Some(bytes.len()),
        }
    }
}

#[derive(Debug)]
struct BlobEntry {
    mime: String,
    bytes: Arc<[u8]>,
}

type HandleMap = Arc<RwLock<HashMap<String, BlobEntry>>>;

/// Owner of all live blob handles
#[derive(Debug, Default)]
pub struct SourceRegistry {
    handles: HandleMap,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a handle for `data`
    ///
    /// URLs come back unchanged; every blob gets a fresh handle.
    pub fn register(&self, data: &MediaData) -> String {
        match data {
            MediaData::Url(url) => url.clone(),
            MediaData::Blob { mime, bytes } => {
                let handle = format!("{BLOB_SCHEME}{}", Uuid::new_v4());
                self.write().insert(
                    handle.clone(),
                    BlobEntry {
                        mime: mime.clone(),
                        bytes: Arc::from(bytes.as_slice()),
                    },
                );
                debug!(%handle, size = bytes.len(), "Registered blob source");
                handle
            }
        }
    }

    /// Revoke one handle; returns whether it was live
    pub fn revoke(&self, handle: &str) -> bool {
        self.write().remove(handle).is_some()
    }

    /// Revoke every live handle, returning how many there were
    pub fn revoke_all(&self) -> usize {
        let mut handles = self.write();
        let count = handles.len();
        handles.clear();
        if count > 0 {
            debug!(count, "Revoked blob sources");
        }
        count
    }

    /// Number of live blob handles
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Read-only view for the audio device
    pub fn resolver(&self) -> SourceResolver {
        SourceResolver {
            handles: Arc::clone(&self.handles),
        }
    }

    pub fn resolve(&self, handle: &str) -> Result<ResolvedSource> {
        resolve_in(&self.handles, handle)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, BlobEntry>> {
        self.handles.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, BlobEntry>> {
        self.handles.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for SourceRegistry {
    fn drop(&mut self) {
        self.revoke_all();
    }
}

/// Cloneable lookup side of a [`SourceRegistry`]
///
/// Sees revocations immediately; once the registry is gone every blob
/// handle fails to resolve.
#[derive(Debug, Clone)]
pub struct SourceResolver {
    handles: HandleMap,
}

impl SourceResolver {
    /// Resolve a handle
    ///
    /// # Errors
    /// Returns `UnknownSource` for a blob handle that is not live
    pub fn resolve(&self, handle: &str) -> Result<ResolvedSource> {
        resolve_in(&self.handles, handle)
    }
}

fn resolve_in(handles: &HandleMap, handle: &str) -> Result<ResolvedSource> {
    if !handle.starts_with(BLOB_SCHEME) {
        return Ok(ResolvedSource::Url(handle.to_string()));
    }

    let handles = handles.read().unwrap_or_else(|e| e.into_inner());
    handles
        .get(handle)
        .map(|entry| ResolvedSource::Blob {
            mime: entry.mime.clone(),
            bytes: Arc::clone(&entry.bytes),
        })
        .ok_or_else(|| SerenadeError::UnknownSource(handle.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(size: usize) -> MediaData {
        MediaData::blob("audio/mpeg", vec![7; size])
    }

    #[test]
    fn urls_pass_through() {
        let registry = SourceRegistry::new();
        let handle = registry.register(&MediaData::url("/song-1.mp3"));

        assert_eq!(handle, "/song-1.mp3");
        assert!(registry.is_empty());
        assert_eq!(
            registry.resolve(&handle).unwrap(),
            ResolvedSource::Url("/song-1.mp3".to_string())
        );
    }

    #[test]
    fn blobs_get_unique_handles() {
        let registry = SourceRegistry::new();
        let a = registry.register(&blob(10));
        let b = registry.register(&blob(10));

        assert!(a.starts_with(BLOB_SCHEME));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve(&a).unwrap().byte_len(), Some(10));
    }

    #[test]
    fn revoke_all_invalidates_resolvers() {
        let registry = SourceRegistry::new();
        let resolver = registry.resolver();
        let handle = registry.register(&blob(4));
        assert!(resolver.resolve(&handle).is_ok());

        assert_eq!(registry.revoke_all(), 1);

        assert!(matches!(
            resolver.resolve(&handle),
            Err(SerenadeError::UnknownSource(_))
        ));
    }

    #[test]
    fn single_revoke() {
        let registry = SourceRegistry::new();
        let handle = registry.register(&blob(1));
        assert!(registry.revoke(&handle));
        assert!(!registry.revoke(&handle));
    }

    #[test]
    fn drop_revokes_everything() {
        let registry = SourceRegistry::new();
        let resolver = registry.resolver();
        let handles: Vec<_> = (0..3).map(|_| registry.register(&blob(2))).collect();

        drop(registry);

        for handle in handles {
            assert!(resolver.resolve(&handle).is_err());
        }
    }
}
