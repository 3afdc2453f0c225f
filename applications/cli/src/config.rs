/// Player configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use serenade_core::{parse_start_date, SiteSettings};
use serenade_playback::{ManualSkipBehavior, PlaybackConfig, RepeatMode};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "serenade.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_device")]
    pub device: DeviceSettings,

    #[serde(default = "default_defaults")]
    pub defaults: DefaultContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// `SQLite` database at `database_url`
    Sqlite,
    /// Nothing persisted
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_volume")]
    pub volume: u8,

    #[serde(default)]
    pub shuffle: bool,

    #[serde(default)]
    pub repeat: RepeatMode,

    #[serde(default = "default_history_size")]
    pub history_size: usize,

    #[serde(default)]
    pub manual_skip: ManualSkipBehavior,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceSettings {
    /// Interval between position updates
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Length assumed for URL tracks (nothing to measure)
    #[serde(default = "default_fallback_track_secs")]
    pub fallback_track_secs: u64,

    /// Bitrate used to derive a blob's length from its size
    #[serde(default = "default_blob_bytes_per_sec")]
    pub blob_bytes_per_sec: u64,
}

/// Built-in site content used while the stores are empty
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DefaultContent {
    #[serde(default = "default_start_date")]
    pub start_date: String,

    #[serde(default)]
    pub custom_message: String,

    #[serde(default = "default_tracks")]
    pub tracks: Vec<DefaultTrack>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DefaultTrack {
    pub title: String,
    pub artist: String,
    pub url: String,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `serenade.toml` is used if
    /// present. Environment variables (`SERENADE_PLAYBACK__VOLUME=80`)
    /// override both.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with SERENADE_)
        settings = settings.add_source(
            config::Environment::with_prefix("SERENADE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.volume > 100 {
            return Err(CliError::config(format!(
                "playback.volume must be 0-100, got {}",
                self.playback.volume
            )));
        }

        if self.device.tick_ms == 0 {
            return Err(CliError::config("device.tick_ms must be positive"));
        }

        if self.device.blob_bytes_per_sec == 0 {
            return Err(CliError::config("device.blob_bytes_per_sec must be positive"));
        }

        parse_start_date(&self.defaults.start_date)
            .map_err(|e| CliError::config(format!("defaults.start_date: {e}")))?;

        Ok(())
    }

    /// Settings for the playback controller
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            history_size: self.playback.history_size,
            volume: self.playback.volume,
            shuffle: self.playback.shuffle,
            repeat: self.playback.repeat,
            manual_skip: self.playback.manual_skip,
        }
    }

    /// Site settings shown until the settings store overrides them
    pub fn default_site_settings(&self) -> Result<SiteSettings> {
        let start_date = parse_start_date(&self.defaults.start_date)?;
        Ok(SiteSettings::new(start_date, self.defaults.custom_message.clone()))
    }
}

impl DeviceSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        backend: default_backend(),
        database_url: default_database_url(),
    }
}

fn default_backend() -> StorageBackend {
    StorageBackend::Sqlite
}

fn default_database_url() -> String {
    "sqlite://./data/serenade.db".to_string()
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        volume: default_volume(),
        shuffle: false,
        repeat: RepeatMode::Off,
        history_size: default_history_size(),
        manual_skip: ManualSkipBehavior::Resume,
    }
}

fn default_volume() -> u8 {
    70
}

fn default_history_size() -> usize {
    50
}

fn default_device() -> DeviceSettings {
    DeviceSettings {
        tick_ms: default_tick_ms(),
        fallback_track_secs: default_fallback_track_secs(),
        blob_bytes_per_sec: default_blob_bytes_per_sec(),
    }
}

fn default_tick_ms() -> u64 {
    250
}

fn default_fallback_track_secs() -> u64 {
    180
}

fn default_blob_bytes_per_sec() -> u64 {
    // 128 kbit/s
    16_000
}

fn default_defaults() -> DefaultContent {
    DefaultContent {
        start_date: default_start_date(),
        custom_message: String::new(),
        tracks: default_tracks(),
    }
}

fn default_start_date() -> String {
    "2025-11-04T01:00:00".to_string()
}

fn default_tracks() -> Vec<DefaultTrack> {
    (1..=3)
        .map(|n| DefaultTrack {
            title: format!("Música {n}"),
            artist: format!("Artista {n}"),
            url: format!("/song-{n}.mp3"),
        })
        .collect()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            playback: default_playback(),
            device: default_device(),
            defaults: default_defaults(),
        }
    }
}
