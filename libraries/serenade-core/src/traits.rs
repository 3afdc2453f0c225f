/// Store traits for Serenade
use crate::error::Result;
use crate::types::{parse_start_date, Image, MediaId, NewImage, NewTrack, SiteSettings, Track};
use async_trait::async_trait;
use tracing::warn;

/// Persistent collection of tracks and images
///
/// Listing order is insertion order; the playback playlist follows it.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// All tracks, oldest first
    async fn list_tracks(&self) -> Result<Vec<Track>>;

    /// All images, oldest first
    async fn list_images(&self) -> Result<Vec<Image>>;

    /// Store a new track
    async fn save_track(&self, track: NewTrack) -> Result<Track>;

    /// Delete a track
    ///
    /// # Errors
    /// Returns `NotFound` if no track has this ID
    async fn delete_track(&self, id: &MediaId) -> Result<()>;

    /// Store a new image
    async fn save_image(&self, image: NewImage) -> Result<Image>;

    /// Delete an image
    ///
    /// # Errors
    /// Returns `NotFound` if no image has this ID
    async fn delete_image(&self, id: &MediaId) -> Result<()>;

    /// Remove every track and image
    async fn clear_all(&self) -> Result<()>;
}

/// Key-value settings persistence
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a setting, `None` if never written
    async fn get_setting(&self, key: &str) -> Result<Option<String>>;

    /// Write a setting, replacing any previous value
    async fn set_setting(&self, key: &str, value: &str) -> Result<()>;
}

/// Load site settings, each stored key overriding `defaults`
///
/// A stored start date that no longer parses is ignored with a warning.
pub async fn load_site_settings(
    store: &dyn SettingsStore,
    defaults: &SiteSettings,
) -> Result<SiteSettings> {
    let mut settings = defaults.clone();

    if let Some(raw) = store.get_setting(SiteSettings::START_DATE_KEY).await? {
        match parse_start_date(&raw) {
            Ok(date) => settings.start_date = date,
            Err(e) => warn!(value = %raw, error = %e, "Ignoring stored start date"),
        }
    }

    if let Some(message) = store.get_setting(SiteSettings::CUSTOM_MESSAGE_KEY).await? {
        settings.custom_message = message;
    }

    Ok(settings)
}

/// Persist both site settings
pub async fn save_site_settings(store: &dyn SettingsStore, settings: &SiteSettings) -> Result<()> {
    store
        .set_setting(SiteSettings::START_DATE_KEY, &settings.start_date_string())
        .await?;
    store
        .set_setting(SiteSettings::CUSTOM_MESSAGE_KEY, &settings.custom_message)
        .await
}
