//! Shared helpers for playback integration tests

#![allow(dead_code)]

use serenade_playback::{
    AudioDevice, LoadEpoch, ManualSkipBehavior, PlaybackConfig, PlaybackController,
    PlaybackError, PlaylistTrack, Result, SourceRef,
};
use std::sync::{Arc, Mutex};

/// A request the controller sent to the device
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    Load { source: String, epoch: LoadEpoch },
    Play,
    Pause,
    Seek(f64),
    SetGain(f32),
    Release,
}

/// Knobs a test can flip while the controller owns the device
#[derive(Debug, Default)]
pub struct DeviceBehavior {
    pub refuse_play: bool,
    pub refuse_load: bool,
}

/// Device double that records every call
///
/// Clones share the same log, so the test keeps one handle after moving
/// the other into the controller.
#[derive(Debug, Clone, Default)]
pub struct RecordingDevice {
    calls: Arc<Mutex<Vec<DeviceCall>>>,
    behavior: Arc<Mutex<DeviceBehavior>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn refuse_play(&self, refuse: bool) {
        self.behavior.lock().unwrap().refuse_play = refuse;
    }

    pub fn refuse_load(&self, refuse: bool) {
        self.behavior.lock().unwrap().refuse_load = refuse;
    }

    /// Sources loaded so far, in order
    pub fn loaded_sources(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DeviceCall::Load { source, .. } => Some(source),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: DeviceCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl AudioDevice for RecordingDevice {
    fn load(&mut self, source: &SourceRef, epoch: LoadEpoch) -> Result<()> {
        self.record(DeviceCall::Load {
            source: source.as_str().to_string(),
            epoch,
        });
        if self.behavior.lock().unwrap().refuse_load {
            return Err(PlaybackError::device("unsupported format"));
        }
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.record(DeviceCall::Play);
        if self.behavior.lock().unwrap().refuse_play {
            return Err(PlaybackError::device("autoplay blocked"));
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.record(DeviceCall::Pause);
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        self.record(DeviceCall::Seek(seconds));
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        self.record(DeviceCall::SetGain(gain));
    }

    fn release(&mut self) {
        self.record(DeviceCall::Release);
    }
}

/// Playlist of `len` tracks named A, B, C, ...
pub fn playlist(len: usize) -> Vec<PlaylistTrack> {
    (0..len)
        .map(|i| {
            let name = char::from(b'A' + (i % 26) as u8);
            PlaylistTrack::new(
                format!("Track {name}"),
                "Test Artist",
                format!("https://media.test/{i}.mp3"),
            )
        })
        .collect()
}

pub fn config() -> PlaybackConfig {
    PlaybackConfig::default()
}

pub fn preserve_config() -> PlaybackConfig {
    PlaybackConfig {
        manual_skip: ManualSkipBehavior::Preserve,
        ..PlaybackConfig::default()
    }
}

/// Controller over a recording device, events from construction drained
pub fn controller_with(
    len: usize,
    config: PlaybackConfig,
) -> (PlaybackController, RecordingDevice) {
    let device = RecordingDevice::new();
    let mut controller =
        PlaybackController::with_seed(Box::new(device.clone()), playlist(len), config, 2024);
    controller.drain_events();
    device.clear();
    (controller, device)
}

pub fn controller(len: usize) -> (PlaybackController, RecordingDevice) {
    controller_with(len, config())
}

/// Start playback and forget the setup events
pub fn playing(len: usize) -> (PlaybackController, RecordingDevice) {
    let (mut controller, device) = controller(len);
    controller.toggle_play();
    controller.drain_events();
    device.clear();
    (controller, device)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
