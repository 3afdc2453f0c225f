//! In-memory stores
//!
//! Same semantics as the `SQLite` stores, nothing persisted. Used for
//! ephemeral sessions and in tests.

use async_trait::async_trait;
use serenade_core::{
    error::Result, Image, MediaId, MediaStore, NewImage, NewTrack, SerenadeError,
    SettingsStore, Track,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MediaTables {
    tracks: Vec<Track>,
    images: Vec<Image>,
}

/// Media store kept in process memory
#[derive(Debug, Default)]
pub struct MemoryMediaStore {
    tables: RwLock<MediaTables>,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn list_tracks(&self) -> Result<Vec<Track>> {
        Ok(self.tables.read().await.tracks.clone())
    }

    async fn list_images(&self) -> Result<Vec<Image>> {
        Ok(self.tables.read().await.images.clone())
    }

    async fn save_track(&self, track: NewTrack) -> Result<Track> {
        let track = Track {
            id: MediaId::generate(),
            title: track.title,
            artist: track.artist,
            data: track.data,
            added_at: chrono::Utc::now(),
        };
        self.tables.write().await.tracks.push(track.clone());
        Ok(track)
    }

    async fn delete_track(&self, id: &MediaId) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.tracks.len();
        tables.tracks.retain(|track| &track.id != id);

        if tables.tracks.len() == before {
            return Err(SerenadeError::not_found("Track", id.as_str()));
        }
        Ok(())
    }

    async fn save_image(&self, image: NewImage) -> Result<Image> {
        let image = Image {
            id: MediaId::generate(),
            data: image.data,
            added_at: chrono::Utc::now(),
        };
        self.tables.write().await.images.push(image.clone());
        Ok(image)
    }

    async fn delete_image(&self, id: &MediaId) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.images.len();
        tables.images.retain(|image| &image.id != id);

        if tables.images.len() == before {
            return Err(SerenadeError::not_found("Image", id.as_str()));
        }
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.tracks.clear();
        tables.images.clear();
        Ok(())
    }
}

/// Settings store kept in process memory
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenade_core::MediaData;

    #[tokio::test]
    async fn tracks_keep_insertion_order() {
        let store = MemoryMediaStore::new();
        for title in ["Primeira", "Segunda", "Terceira"] {
            store
                .save_track(NewTrack::new(title, "Artista", MediaData::url("/x.mp3")))
                .await
                .unwrap();
        }

        let titles: Vec<_> = store
            .list_tracks()
            .await
            .unwrap()
            .into_iter()
            .map(|track| track.title)
            .collect();
        assert_eq!(titles, vec!["Primeira", "Segunda", "Terceira"]);
    }

    #[tokio::test]
    async fn deleting_unknown_id_is_not_found() {
        let store = MemoryMediaStore::new();
        let err = store
            .delete_image(&MediaId::new("missing"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn clear_all_empties_both_tables() {
        let store = MemoryMediaStore::new();
        store
            .save_track(NewTrack::new("a", "b", MediaData::url("/a.mp3")))
            .await
            .unwrap();
        store
            .save_image(NewImage::new(MediaData::blob("image/jpeg", vec![1, 2])))
            .await
            .unwrap();

        store.clear_all().await.unwrap();

        assert!(store.list_tracks().await.unwrap().is_empty());
        assert!(store.list_images().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn settings_overwrite() {
        let store = MemorySettingsStore::new();
        store.set_setting("custom_message", "um").await.unwrap();
        store.set_setting("custom_message", "dois").await.unwrap();
        assert_eq!(
            store.get_setting("custom_message").await.unwrap().as_deref(),
            Some("dois")
        );
        assert_eq!(store.get_setting("start_date").await.unwrap(), None);
    }
}
