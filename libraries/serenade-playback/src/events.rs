//! Playback Events
//!
//! Outbound notifications for the presentation layer. The controller queues
//! them during each transition; the UI drains the queue after dispatching
//! and re-renders from a fresh snapshot.

use crate::types::RepeatMode;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Play/pause state changed
    StateChanged {
        /// Whether audio is (believed to be) playing now
        is_playing: bool,
    },

    /// Current track changed
    TrackChanged {
        /// Index of the new current track
        index: usize,
        /// Index that was current before, if any
        previous_index: Option<usize>,
    },

    /// Current track restarted from the beginning (repeat one)
    TrackRestarted {
        /// Index of the restarted track
        index: usize,
    },

    /// Position or duration update
    PositionUpdate {
        /// Seconds into the track
        current_time: f64,
        /// Track length in seconds (0 while unknown)
        duration: f64,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
    },

    /// Shuffle toggled
    ShuffleChanged { enabled: bool },

    /// Repeat mode cycled
    RepeatChanged { mode: RepeatMode },

    /// Last track ended with repeat off; playback stopped
    PlaylistExhausted,

    /// Playlist was replaced by the media collaborator
    PlaylistReplaced {
        /// New playlist length
        length: usize,
    },

    /// A device request failed
    Error {
        /// Error message
        message: String,
    },
}

impl PlaybackEvent {
    /// Whether the event changes what the transport controls should show
    pub fn affects_transport(&self) -> bool {
        matches!(
            self,
            Self::StateChanged { .. }
                | Self::TrackChanged { .. }
                | Self::TrackRestarted { .. }
                | Self::PlaylistExhausted
                | Self::PlaylistReplaced { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_updates_do_not_affect_transport() {
        let event = PlaybackEvent::PositionUpdate {
            current_time: 1.0,
            duration: 2.0,
        };
        assert!(!event.affects_transport());
        assert!(PlaybackEvent::PlaylistExhausted.affects_transport());
    }
}
