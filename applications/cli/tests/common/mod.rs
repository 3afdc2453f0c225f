//! Shared helpers for session tests

#![allow(dead_code)]

use serenade_cli::config::StorageBackend;
use serenade_cli::{CliConfig, Session};
use serenade_core::{MediaData, MediaStore, NewTrack, SettingsStore, SourceResolver};
use serenade_playback::NullDevice;
use serenade_storage::{MemoryMediaStore, MemorySettingsStore};
use std::sync::Arc;

/// In-memory stores shared between a test and its session
pub struct TestStores {
    pub media: Arc<MemoryMediaStore>,
    pub settings: Arc<MemorySettingsStore>,
}

impl TestStores {
    pub fn new() -> Self {
        Self {
            media: Arc::new(MemoryMediaStore::new()),
            settings: Arc::new(MemorySettingsStore::new()),
        }
    }

    pub fn media(&self) -> Arc<dyn MediaStore> {
        self.media.clone()
    }

    pub fn settings(&self) -> Arc<dyn SettingsStore> {
        self.settings.clone()
    }

    pub async fn add_url(&self, title: &str) {
        self.media
            .save_track(NewTrack::new(
                title,
                "Test Artist",
                MediaData::url(format!("/{}.mp3", title.to_lowercase())),
            ))
            .await
            .expect("save url track");
    }

    pub async fn add_blob(&self, title: &str, size: usize) {
        self.media
            .save_track(NewTrack::new(
                title,
                "Test Artist",
                MediaData::blob("audio/mpeg", vec![0x42; size]),
            ))
            .await
            .expect("save blob track");
    }
}

/// Memory-backed config with a fast, cheap simulated clock
pub fn config() -> CliConfig {
    let mut config = CliConfig::default();
    config.storage.backend = StorageBackend::Memory;
    config.device.tick_ms = 100;
    config.device.blob_bytes_per_sec = 1000;
    config
}

/// Open a session over a silent device, returning the session's resolver too
pub async fn open_silent(config: CliConfig, stores: &TestStores) -> (Session, SourceResolver) {
    let mut captured = None;
    let session = Session::open(config, stores.media(), stores.settings(), |resolver| {
        captured = Some(resolver.clone());
        Box::new(NullDevice)
    })
    .await
    .expect("open session");

    (session, captured.expect("device factory called"))
}
