//! Playback controller - owns the state and the audio device
//!
//! Every public operation funnels into [`PlaybackController::dispatch`],
//! which runs the pure [`transition`] and then applies the resulting effects
//! to the device in order. Device failures never roll a transition back,
//! except that a refused play leaves the controller paused.

use crate::{
    device::{AudioDevice, DeviceEvent, LoadEpoch},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    history::History,
    transition::{
        transition, AdvanceTrigger, Command, Effect, Input, PlaybackState, TransitionContext,
    },
    types::{PlaybackConfig, PlaybackSnapshot, PlaylistTrack, RepeatMode},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// Audio playback controller
///
/// Single owner of the playback state and of one [`AudioDevice`]. Not
/// thread-safe by itself; wrap it in the session that consumes the input
/// queue.
pub struct PlaybackController {
    device: Box<dyn AudioDevice>,
    playlist: Vec<PlaylistTrack>,
    state: PlaybackState,
    config: PlaybackConfig,
    rng: StdRng,

    /// Events for the presentation layer
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackController {
    /// Create a controller and load the first track (paused)
    pub fn new(
        device: Box<dyn AudioDevice>,
        playlist: Vec<PlaylistTrack>,
        config: PlaybackConfig,
    ) -> Self {
        Self::with_rng(device, playlist, config, StdRng::from_entropy())
    }

    /// Same as [`new`](Self::new) with a deterministic shuffle
    pub fn with_seed(
        device: Box<dyn AudioDevice>,
        playlist: Vec<PlaylistTrack>,
        config: PlaybackConfig,
        seed: u64,
    ) -> Self {
        Self::with_rng(device, playlist, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        device: Box<dyn AudioDevice>,
        playlist: Vec<PlaylistTrack>,
        config: PlaybackConfig,
        rng: StdRng,
    ) -> Self {
        let state = PlaybackState::new(&config);
        let len = playlist.len();

        let mut controller = Self {
            device,
            playlist,
            state,
            config,
            rng,
            pending_events: Vec::new(),
        };

        let gain = controller.state.volume.gain();
        controller.device.set_gain(gain);
        controller.dispatch(Input::PlaylistReplaced { len });

        info!(
            tracks = len,
            volume = controller.state.volume.level(),
            "Playback controller ready"
        );
        controller
    }

    // ===== Commands =====

    /// Flip play/pause (no-op on an empty playlist)
    pub fn toggle_play(&mut self) {
        self.dispatch(Input::Command(Command::TogglePlay));
    }

    /// Flip shuffle and start a fresh shuffle cycle
    pub fn toggle_shuffle(&mut self) {
        self.dispatch(Input::Command(Command::ToggleShuffle));
    }

    /// Cycle repeat mode `Off -> All -> One -> Off`
    pub fn toggle_repeat(&mut self) {
        self.dispatch(Input::Command(Command::ToggleRepeat));
    }

    /// Move the playback position
    ///
    /// # Errors
    ///
    /// Returns `NoTrackLoaded` when the playlist is empty.
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        if self.playlist.is_empty() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        self.dispatch(Input::Command(Command::Seek(seconds)));
        Ok(())
    }

    /// Set volume; any integer is clamped to `0..=100`
    pub fn set_volume(&mut self, level: i32) {
        self.dispatch(Input::Command(Command::SetVolume(level)));
    }

    /// Manual skip forward
    pub fn select_next(&mut self) {
        self.dispatch(Input::Command(Command::Next));
    }

    /// Manual skip back (undoes shuffle jumps while history lasts)
    pub fn select_previous(&mut self) {
        self.dispatch(Input::Command(Command::Previous));
    }

    /// Advance as if triggered by `trigger`
    pub fn advance(&mut self, trigger: AdvanceTrigger) {
        self.dispatch(Input::Advance(trigger));
    }

    /// Replace the playlist wholesale and reload the current track
    pub fn replace_playlist(&mut self, playlist: Vec<PlaylistTrack>) {
        let len = playlist.len();
        self.playlist = playlist;
        self.dispatch(Input::PlaylistReplaced { len });
    }

    /// Feed an event reported by the device
    pub fn handle_device_event(&mut self, event: DeviceEvent) {
        self.dispatch(Input::Device(event));
    }

    /// Run one input through the state machine and apply its effects
    pub fn dispatch(&mut self, input: Input) {
        let context = TransitionContext {
            playlist_len: self.playlist.len(),
            manual_skip: self.config.manual_skip,
            history_size: self.config.history_size,
        };

        let next = transition(&self.state, context, &input, &mut self.rng);

        if next.effects.is_empty() && next.state == self.state {
            if let Input::Device(event) = &input {
                if event.epoch() != self.state.load_epoch {
                    debug!(
                        event_epoch = %event.epoch(),
                        current_epoch = %self.state.load_epoch,
                        "Dropping stale device event"
                    );
                }
            }
            return;
        }

        if !matches!(input, Input::Device(DeviceEvent::TimeUpdate { .. })) {
            debug!(?input, effects = next.effects.len(), "Transition");
        }

        self.state = next.state;
        self.apply(next.effects);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        let mut skip_play = false;

        for effect in effects {
            match effect {
                Effect::Load { index, epoch } => {
                    skip_play = false;
                    if let Err(e) = self.load(index, epoch) {
                        warn!(index, %epoch, error = %e, "Failed to load track");
                        self.stop_after_failure(e.to_string());
                        skip_play = true;
                    }
                }
                Effect::Play => {
                    if skip_play {
                        continue;
                    }
                    if let Err(e) = self.device.play() {
                        warn!(error = %e, "Device refused to play");
                        self.stop_after_failure(e.to_string());
                    }
                }
                Effect::Pause => self.device.pause(),
                Effect::Seek(seconds) => {
                    if let Err(e) = self.device.seek(seconds) {
                        warn!(seconds, error = %e, "Seek failed");
                        self.pending_events.push(PlaybackEvent::Error {
                            message: e.to_string(),
                        });
                    }
                }
                Effect::SetGain(gain) => self.device.set_gain(gain),
                Effect::Emit(event) => {
                    // A failed play already reported the stop
                    let resumed = matches!(event, PlaybackEvent::StateChanged { is_playing: true });
                    if skip_play && resumed {
                        continue;
                    }
                    self.pending_events.push(event);
                }
            }
        }
    }

    fn load(&mut self, index: usize, epoch: LoadEpoch) -> Result<()> {
        let track = self
            .playlist
            .get(index)
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;

        debug!(index, %epoch, title = %track.title, "Loading track");
        self.device.load(&track.source_ref, epoch)
    }

    fn stop_after_failure(&mut self, message: String) {
        if self.state.is_playing {
            self.state.is_playing = false;
            self.pending_events
                .push(PlaybackEvent::StateChanged { is_playing: false });
        }
        self.pending_events.push(PlaybackEvent::Error { message });
    }

    // ===== State =====

    /// Read-only view for rendering
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_index: self.state.current_index,
            current_track: self.current_track().map(PlaylistTrack::info),
            is_playing: self.state.is_playing,
            current_time: self.state.current_time,
            duration: self.state.duration,
            volume: self.state.volume.level(),
            shuffle_enabled: self.state.shuffle_enabled,
            repeat_mode: self.state.repeat_mode,
            playlist_len: self.playlist.len(),
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn playlist(&self) -> &[PlaylistTrack] {
        &self.playlist
    }

    pub fn current_track(&self) -> Option<&PlaylistTrack> {
        self.state
            .current_index
            .and_then(|index| self.playlist.get(index))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.state.repeat_mode
    }

    pub fn volume(&self) -> u8 {
        self.state.volume.level()
    }

    /// Epoch of the most recent load; device events must carry it
    pub fn load_epoch(&self) -> LoadEpoch {
        self.state.load_epoch
    }

    pub fn shuffle_history(&self) -> &History {
        &self.state.shuffle_history
    }

    // ===== Events =====

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.device.release();
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("playlist_len", &self.playlist.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
