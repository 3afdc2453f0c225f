//! Core types for playback control

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque handle to playable audio
///
/// Either a plain URL or a session-scoped blob handle issued by the
/// source registry. The controller never looks inside it; it only hands it
/// to the audio device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(String);

impl SourceRef {
    /// Create a new source reference
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Track as seen by the playback controller
///
/// Immutable once loaded. The ordered sequence of these is the playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistTrack {
    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Handle the device loads
    pub source_ref: SourceRef,
}

impl PlaylistTrack {
    /// Create a new playlist track
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        source_ref: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            source_ref: SourceRef::new(source_ref),
        }
    }

    /// Display metadata for the presentation layer
    pub fn info(&self) -> TrackInfo {
        TrackInfo {
            title: self.title.clone(),
            artist: self.artist.clone(),
        }
    }
}

/// Display metadata of the current track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub title: String,
    pub artist: String,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the last track ends
    #[default]
    Off,

    /// Loop the entire playlist
    All,

    /// Hold the current track on natural end
    One,
}

impl RepeatMode {
    /// Next mode in the fixed cycle `Off -> All -> One -> Off`
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::All => "all",
            Self::One => "one",
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RepeatMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "all" => Ok(Self::All),
            "one" => Ok(Self::One),
            other => Err(format!("unknown repeat mode: {other}")),
        }
    }
}

/// What a manual skip (next/previous) does to the play/pause state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManualSkipBehavior {
    /// Always resume playing on the new track
    #[default]
    Resume,

    /// Keep whatever play/pause state was active before the skip
    Preserve,
}

impl FromStr for ManualSkipBehavior {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resume" => Ok(Self::Resume),
            "preserve" => Ok(Self::Preserve),
            other => Err(format!("unknown manual skip behavior: {other}")),
        }
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Minimum history capacity (default: 50, grows with the playlist)
    pub history_size: usize,

    /// Initial volume (0-100, default: 70)
    pub volume: u8,

    /// Initial shuffle state (default: off)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Play state after manual next/previous (default: Resume)
    pub manual_skip: ManualSkipBehavior,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: 50,
            volume: 70,
            shuffle: false,
            repeat: RepeatMode::Off,
            manual_skip: ManualSkipBehavior::Resume,
        }
    }
}

/// Read-only view of the controller for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub current_index: Option<usize>,
    pub current_track: Option<TrackInfo>,
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub volume: u8,
    pub shuffle_enabled: bool,
    pub repeat_mode: RepeatMode,
    pub playlist_len: usize,
}
