use crate::{images, settings, tracks};
use async_trait::async_trait;
use serenade_core::{
    error::Result, Image, MediaId, MediaStore, NewImage, NewTrack, SettingsStore, Track,
};
use sqlx::SqlitePool;

/// Media store backed by `SQLite`
#[derive(Debug, Clone)]
pub struct SqliteMediaStore {
    pool: SqlitePool,
}

impl SqliteMediaStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl MediaStore for SqliteMediaStore {
    async fn list_tracks(&self) -> Result<Vec<Track>> {
        Ok(tracks::get_all(&self.pool).await?)
    }

    async fn list_images(&self) -> Result<Vec<Image>> {
        Ok(images::get_all(&self.pool).await?)
    }

    async fn save_track(&self, track: NewTrack) -> Result<Track> {
        Ok(tracks::create(&self.pool, track).await?)
    }

    async fn delete_track(&self, id: &MediaId) -> Result<()> {
        Ok(tracks::delete(&self.pool, id).await?)
    }

    async fn save_image(&self, image: NewImage) -> Result<Image> {
        Ok(images::create(&self.pool, image).await?)
    }

    async fn delete_image(&self, id: &MediaId) -> Result<()> {
        Ok(images::delete(&self.pool, id).await?)
    }

    async fn clear_all(&self) -> Result<()> {
        Ok(crate::clear_media(&self.pool).await?)
    }
}

/// Settings store backed by `SQLite`
#[derive(Debug, Clone)]
pub struct SqliteSettingsStore {
    pool: SqlitePool,
}

impl SqliteSettingsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        Ok(settings::get_setting(&self.pool, key).await?)
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        Ok(settings::set_setting(&self.pool, key, value).await?)
    }
}
