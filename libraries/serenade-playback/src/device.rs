//! Platform-agnostic audio output device
//!
//! Abstracts the host media element (browser audio tag, native sink, test
//! double). Requests are best-effort: the device may accept a request and
//! fail later, reporting back through [`DeviceEvent`].

use crate::error::Result;
use crate::types::SourceRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one track load
///
/// The controller bumps the epoch on every load. Events carrying an older
/// epoch belong to a superseded load and are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct LoadEpoch(u64);

impl LoadEpoch {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoadEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Audio output device driven by the playback controller
///
/// One device per controller; the controller is its only writer.
pub trait AudioDevice: Send {
    /// Load a track by reference, replacing whatever was loaded
    ///
    /// Every event the device emits for this track must carry `epoch`.
    fn load(&mut self, source: &SourceRef, epoch: LoadEpoch) -> Result<()>;

    /// Start or resume producing audio
    ///
    /// An `Err` means the request was refused synchronously. An asynchronous
    /// refusal is reported as [`DeviceEvent::PlayRejected`].
    fn play(&mut self) -> Result<()>;

    /// Stop producing audio, keeping the position
    fn pause(&mut self);

    /// Move the playback position (seconds)
    ///
    /// Clamping out-of-range positions is up to the device.
    fn seek(&mut self, seconds: f64) -> Result<()>;

    /// Set output gain in `0.0..=1.0`
    fn set_gain(&mut self, gain: f32);

    /// Release device resources
    ///
    /// Called once when the controller is dropped.
    fn release(&mut self) {}
}

/// Events reported by the device, in emission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceEvent {
    /// Playback position advanced
    TimeUpdate { epoch: LoadEpoch, seconds: f64 },

    /// Track metadata is available
    MetadataLoaded { epoch: LoadEpoch, duration: f64 },

    /// Track reached its natural end
    Ended { epoch: LoadEpoch },

    /// A previously accepted play request failed (autoplay policy, format...)
    PlayRejected { epoch: LoadEpoch, reason: String },
}

impl DeviceEvent {
    /// Load epoch the event belongs to
    pub fn epoch(&self) -> LoadEpoch {
        match self {
            Self::TimeUpdate { epoch, .. }
            | Self::MetadataLoaded { epoch, .. }
            | Self::Ended { epoch }
            | Self::PlayRejected { epoch, .. } => *epoch,
        }
    }
}

/// Device that accepts every request and produces nothing
///
/// Useful for headless runs and tests that only inspect state.
#[derive(Debug, Default)]
pub struct NullDevice;

impl AudioDevice for NullDevice {
    fn load(&mut self, _source: &SourceRef, _epoch: LoadEpoch) -> Result<()> {
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn seek(&mut self, _seconds: f64) -> Result<()> {
        Ok(())
    }

    fn set_gain(&mut self, _gain: f32) {}
}
