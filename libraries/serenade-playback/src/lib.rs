//! Serenade - Playback State Machine
//!
//! Platform-agnostic audio playback control for Serenade.
//!
//! This crate provides:
//! - Track selection over an externally supplied playlist
//! - Shuffle without immediate repeats (history-backed cycles)
//! - Repeat modes (Off, All, One)
//! - Volume control (0-100, linear gain)
//! - Stale-event protection for asynchronous devices (load epochs)
//!
//! # Architecture
//!
//! The state machine is a pure function, [`transition`], which turns the
//! current [`PlaybackState`] and one [`Input`] into the next state and a list
//! of [`Effect`]s. [`PlaybackController`] owns the state, runs transitions and
//! applies their effects to an [`AudioDevice`].
//!
//! No dependency on storage, async runtimes or a concrete audio backend.
//! The host provides the device and feeds its [`DeviceEvent`]s back in.
//!
//! # Example
//!
//! ```rust
//! use serenade_playback::{NullDevice, PlaybackConfig, PlaybackController, PlaylistTrack};
//!
//! let playlist = vec![
//!     PlaylistTrack::new("First Dance", "The Band", "https://cdn/first.mp3"),
//!     PlaylistTrack::new("Our Song", "The Band", "https://cdn/ours.mp3"),
//! ];
//!
//! let mut controller =
//!     PlaybackController::new(Box::new(NullDevice), playlist, PlaybackConfig::default());
//!
//! controller.toggle_play();
//! controller.select_next();
//! assert_eq!(controller.snapshot().current_index, Some(1));
//!
//! for event in controller.drain_events() {
//!     println!("{event:?}");
//! }
//! ```

mod controller;
pub mod device;
mod error;
pub mod events;
mod history;
mod shuffle;
mod time;
pub mod transition;
pub mod types;
mod volume;

// Public exports
pub use controller::PlaybackController;
pub use device::{AudioDevice, DeviceEvent, LoadEpoch, NullDevice};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use history::History;
pub use shuffle::{pick_next, ShufflePick};
pub use time::format_time;
pub use transition::{
    transition, AdvanceTrigger, Command, Effect, Input, PlaybackState, Transition,
    TransitionContext,
};
pub use types::{
    ManualSkipBehavior, PlaybackConfig, PlaybackSnapshot, PlaylistTrack, RepeatMode, SourceRef,
    TrackInfo,
};
pub use volume::Volume;
