//! Player session
//!
//! Owns everything with a lifetime tied to one run of the player: the
//! playback controller (and through it the device), the blob handle
//! registry, and the stores. All inputs arrive through one queue and are
//! handled one at a time, so the controller is never touched concurrently.

use crate::commands::ReplCommand;
use crate::config::CliConfig;
use crate::display;
use crate::error::Result;
use serenade_core::{
    load_site_settings, MediaStore, SettingsStore, SiteSettings, SourceRegistry, SourceResolver,
    Track,
};
use serenade_playback::{
    AudioDevice, DeviceEvent, PlaybackController, PlaybackEvent, PlaybackSnapshot, PlaylistTrack,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Everything the session reacts to, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    /// Progress reported by the audio device
    Device(DeviceEvent),
    /// A line typed by the user
    Line(String),
    /// Input closed (end of stdin or Ctrl-C)
    Shutdown,
}

/// What the input loop should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Keep going after printing the command help
    ShowHelp,
    Quit,
}

/// Where the current playlist came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistOrigin {
    Store,
    Defaults,
    Empty,
}

pub struct Session {
    // Dropped first: releases the device before handles are revoked
    controller: PlaybackController,
    registry: SourceRegistry,
    media: Arc<dyn MediaStore>,
    settings: Arc<dyn SettingsStore>,
    config: CliConfig,
    site: SiteSettings,
    origin: PlaylistOrigin,
}

impl Session {
    /// Open a session
    ///
    /// `make_device` receives the resolver for blob handles issued by this
    /// session.
    pub async fn open<F>(
        config: CliConfig,
        media: Arc<dyn MediaStore>,
        settings: Arc<dyn SettingsStore>,
        make_device: F,
    ) -> Result<Self>
    where
        F: FnOnce(SourceResolver) -> Box<dyn AudioDevice>,
    {
        let registry = SourceRegistry::new();
        let device = make_device(registry.resolver());

        let tracks = media.list_tracks().await?;
        let (playlist, origin) = build_playlist(&registry, &config, &tracks);
        let controller = PlaybackController::new(device, playlist, config.playback_config());

        let defaults = config.default_site_settings()?;
        let site = load_site_settings(settings.as_ref(), &defaults).await?;

        info!(
            tracks = controller.playlist().len(),
            origin = ?origin,
            blobs = registry.len(),
            "Session opened"
        );

        Ok(Self {
            controller,
            registry,
            media,
            settings,
            config,
            site,
            origin,
        })
    }

    /// Re-read tracks and settings from the stores
    ///
    /// Every blob handle from the previous load is revoked first.
    pub async fn reload_media(&mut self) -> Result<usize> {
        let tracks = self.media.list_tracks().await?;

        let revoked = self.registry.revoke_all();
        let (playlist, origin) = build_playlist(&self.registry, &self.config, &tracks);
        let len = playlist.len();
        self.controller.replace_playlist(playlist);
        self.origin = origin;

        let defaults = self.config.default_site_settings()?;
        self.site = load_site_settings(self.settings.as_ref(), &defaults).await?;

        info!(tracks = len, revoked, origin = ?origin, "Media reloaded");
        Ok(len)
    }

    /// Handle one queued input
    pub async fn handle(&mut self, input: SessionInput) -> Result<Flow> {
        match input {
            SessionInput::Device(event) => {
                self.controller.handle_device_event(event);
                Ok(Flow::Continue)
            }
            SessionInput::Line(line) => {
                if line.trim().is_empty() {
                    return Ok(Flow::Continue);
                }
                let command: ReplCommand = line.parse()?;
                self.execute(command).await
            }
            SessionInput::Shutdown => Ok(Flow::Quit),
        }
    }

    /// Run a player command
    pub async fn execute(&mut self, command: ReplCommand) -> Result<Flow> {
        debug!(?command, "Command");

        match command {
            ReplCommand::TogglePlay => self.controller.toggle_play(),
            ReplCommand::Next => self.controller.select_next(),
            ReplCommand::Previous => self.controller.select_previous(),
            ReplCommand::Seek(seconds) => self.controller.seek(seconds)?,
            ReplCommand::Volume(level) => self.controller.set_volume(level),
            ReplCommand::Shuffle => self.controller.toggle_shuffle(),
            ReplCommand::Repeat => self.controller.toggle_repeat(),
            ReplCommand::Reload => {
                self.reload_media().await?;
            }
            ReplCommand::Status => {}
            ReplCommand::Help => return Ok(Flow::ShowHelp),
            ReplCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Take the controller's pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.controller.drain_events()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.controller.snapshot()
    }

    /// One-line transport summary
    pub fn status_line(&self) -> String {
        display::status_line(&self.snapshot())
    }

    pub fn site(&self) -> &SiteSettings {
        &self.site
    }

    pub fn origin(&self) -> PlaylistOrigin {
        self.origin
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn playlist(&self) -> &[PlaylistTrack] {
        self.controller.playlist()
    }

    /// Live blob handles
    pub fn live_sources(&self) -> usize {
        self.registry.len()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        info!(blobs = self.registry.len(), "Closing session");
    }
}

/// Turn stored tracks into a playlist, registering blob payloads
///
/// Falls back to the configured default tracks when the store is empty.
fn build_playlist(
    registry: &SourceRegistry,
    config: &CliConfig,
    tracks: &[Track],
) -> (Vec<PlaylistTrack>, PlaylistOrigin) {
    if !tracks.is_empty() {
        let playlist = tracks
            .iter()
            .map(|track| {
                let handle = registry.register(&track.data);
                PlaylistTrack::new(track.title.clone(), track.artist.clone(), handle)
            })
            .collect();
        return (playlist, PlaylistOrigin::Store);
    }

    let playlist: Vec<_> = config
        .defaults
        .tracks
        .iter()
        .map(|track| PlaylistTrack::new(track.title.clone(), track.artist.clone(), track.url.clone()))
        .collect();

    if playlist.is_empty() {
        (playlist, PlaylistOrigin::Empty)
    } else {
        (playlist, PlaylistOrigin::Defaults)
    }
}
