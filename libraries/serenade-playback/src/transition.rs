//! Pure playback transitions
//!
//! `transition(state, context, input, rng)` computes the next state and the
//! device requests needed to get there. Nothing here touches a device, so
//! every rule of the state machine can be tested in isolation.
//!
//! # Advance rules
//!
//! 1. Automatic advance under repeat-one restarts the same track. A manual
//!    skip always changes track.
//! 2. The index being left is recorded in the shuffle history.
//! 3. Shuffle picks a random unplayed index (new cycle once all were played);
//!    sequential mode moves to `(index + 1) % len`.
//! 4. Automatic advance off the last track with repeat off and shuffle off
//!    stops playback instead.

use crate::device::{DeviceEvent, LoadEpoch};
use crate::events::PlaybackEvent;
use crate::history::History;
use crate::shuffle::pick_next;
use crate::types::{ManualSkipBehavior, PlaybackConfig, RepeatMode};
use crate::volume::Volume;
use rand::Rng;

/// Commands issued by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    TogglePlay,
    ToggleShuffle,
    ToggleRepeat,
    Seek(f64),
    SetVolume(i32),
    Next,
    Previous,
}

/// What triggered a track advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceTrigger {
    /// Explicit "skip next" from the user
    Manual,
    /// Device reported natural end of track
    Automatic,
}

/// Everything the state machine reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(Command),
    Advance(AdvanceTrigger),
    Device(DeviceEvent),
    PlaylistReplaced { len: usize },
}

/// Device requests produced by a transition, applied in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Load { index: usize, epoch: LoadEpoch },
    Play,
    Pause,
    Seek(f64),
    SetGain(f32),
    Emit(PlaybackEvent),
}

/// Inputs to a transition that are not part of the state
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext {
    pub playlist_len: usize,
    pub manual_skip: ManualSkipBehavior,
    pub history_size: usize,
}

/// Playback state owned by the controller
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_index: Option<usize>,
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub volume: Volume,
    pub shuffle_enabled: bool,
    pub repeat_mode: RepeatMode,
    pub shuffle_history: History,
    pub load_epoch: LoadEpoch,
}

impl PlaybackState {
    /// Initial state for an empty playlist
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            current_index: None,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: Volume::new(config.volume),
            shuffle_enabled: config.shuffle,
            repeat_mode: config.repeat,
            shuffle_history: History::new(config.history_size),
            load_epoch: LoadEpoch::default(),
        }
    }
}

/// Result of one transition
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: PlaybackState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: &PlaybackState) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
        }
    }
}

/// Compute the next state for `input`
pub fn transition<R: Rng + ?Sized>(
    state: &PlaybackState,
    context: TransitionContext,
    input: &Input,
    rng: &mut R,
) -> Transition {
    let mut builder = Builder {
        state: state.clone(),
        effects: Vec::new(),
        context,
    };

    match input {
        Input::Command(command) => builder.command(command, rng),
        Input::Advance(trigger) => builder.advance(*trigger, rng),
        Input::Device(event) => {
            if event.epoch() != state.load_epoch || builder.loaded_index().is_none() {
                // Superseded load, or nothing loaded at all
                return Transition::unchanged(state);
            }
            builder.device_event(event, rng);
        }
        Input::PlaylistReplaced { len } => builder.playlist_replaced(*len),
    }

    builder.finish()
}

struct Builder {
    state: PlaybackState,
    effects: Vec<Effect>,
    context: TransitionContext,
}

impl Builder {
    fn finish(self) -> Transition {
        Transition {
            state: self.state,
            effects: self.effects,
        }
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.effects.push(Effect::Emit(event));
    }

    fn set_playing(&mut self, is_playing: bool) {
        if self.state.is_playing != is_playing {
            self.state.is_playing = is_playing;
            self.emit(PlaybackEvent::StateChanged { is_playing });
        }
    }

    /// Current index, only while the playlist is non-empty
    fn loaded_index(&self) -> Option<usize> {
        self.state
            .current_index
            .filter(|&index| index < self.context.playlist_len)
    }

    fn command<R: Rng + ?Sized>(&mut self, command: &Command, rng: &mut R) {
        match command {
            Command::TogglePlay => {
                if self.loaded_index().is_none() {
                    return;
                }
                let is_playing = !self.state.is_playing;
                self.set_playing(is_playing);
                self.effects
                    .push(if is_playing { Effect::Play } else { Effect::Pause });
            }
            Command::ToggleShuffle => {
                self.state.shuffle_enabled = !self.state.shuffle_enabled;
                self.state.shuffle_history.clear();
                self.emit(PlaybackEvent::ShuffleChanged {
                    enabled: self.state.shuffle_enabled,
                });
            }
            Command::ToggleRepeat => {
                self.state.repeat_mode = self.state.repeat_mode.cycle();
                self.emit(PlaybackEvent::RepeatChanged {
                    mode: self.state.repeat_mode,
                });
            }
            Command::Seek(seconds) => {
                if self.loaded_index().is_none() {
                    return;
                }
                self.effects.push(Effect::Seek(*seconds));
                if seconds.is_finite() && *seconds >= 0.0 {
                    self.state.current_time = *seconds;
                }
            }
            Command::SetVolume(level) => {
                self.state.volume.set_level(*level);
                self.effects.push(Effect::SetGain(self.state.volume.gain()));
                self.emit(PlaybackEvent::VolumeChanged {
                    level: self.state.volume.level(),
                });
            }
            Command::Next => self.advance(AdvanceTrigger::Manual, rng),
            Command::Previous => self.previous(),
        }
    }

    fn device_event<R: Rng + ?Sized>(&mut self, event: &DeviceEvent, rng: &mut R) {
        match event {
            DeviceEvent::TimeUpdate { seconds, .. } => {
                self.state.current_time = non_negative(*seconds);
                self.emit_position();
            }
            DeviceEvent::MetadataLoaded { duration, .. } => {
                self.state.duration = non_negative(*duration);
                self.emit_position();
            }
            DeviceEvent::Ended { .. } => self.advance(AdvanceTrigger::Automatic, rng),
            DeviceEvent::PlayRejected { reason, .. } => {
                self.set_playing(false);
                self.emit(PlaybackEvent::Error {
                    message: format!("playback rejected: {reason}"),
                });
            }
        }
    }

    fn emit_position(&mut self) {
        self.emit(PlaybackEvent::PositionUpdate {
            current_time: self.state.current_time,
            duration: self.state.duration,
        });
    }

    fn advance<R: Rng + ?Sized>(&mut self, trigger: AdvanceTrigger, rng: &mut R) {
        let Some(index) = self.loaded_index() else {
            return;
        };
        let len = self.context.playlist_len;

        match trigger {
            AdvanceTrigger::Automatic => {
                if self.state.repeat_mode == RepeatMode::One {
                    self.restart_current(index);
                    return;
                }

                let exhausted = !self.state.shuffle_enabled
                    && self.state.repeat_mode == RepeatMode::Off
                    && index + 1 == len;
                if exhausted {
                    self.state.current_time = 0.0;
                    self.effects.push(Effect::Pause);
                    self.effects.push(Effect::Seek(0.0));
                    self.set_playing(false);
                    self.emit(PlaybackEvent::PlaylistExhausted);
                    return;
                }

                let next = self.next_index(index, rng);
                self.load(next, Some(index));
                self.set_playing(true);
                self.effects.push(Effect::Play);
            }
            AdvanceTrigger::Manual => {
                if len <= 1 {
                    // Shuffle over a single track stays on it but still resumes
                    if self.state.shuffle_enabled {
                        self.after_manual_skip();
                    }
                    return;
                }
                let next = self.next_index(index, rng);
                self.load(next, Some(index));
                self.after_manual_skip();
            }
        }
    }

    fn previous(&mut self) {
        let Some(index) = self.loaded_index() else {
            return;
        };
        let len = self.context.playlist_len;
        if len <= 1 {
            return;
        }

        let popped = if self.state.shuffle_enabled {
            self.state.shuffle_history.pop().filter(|&i| i < len)
        } else {
            None
        };
        let previous = popped.unwrap_or((index + len - 1) % len);

        self.load(previous, Some(index));
        self.after_manual_skip();
    }

    fn after_manual_skip(&mut self) {
        let is_playing = match self.context.manual_skip {
            ManualSkipBehavior::Resume => true,
            ManualSkipBehavior::Preserve => self.state.is_playing,
        };
        self.set_playing(is_playing);
        if is_playing {
            self.effects.push(Effect::Play);
        }
    }

    /// Record `index` and pick the one to move to
    fn next_index<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) -> usize {
        let len = self.context.playlist_len;
        self.state.shuffle_history.push(index);

        if !self.state.shuffle_enabled {
            return (index + 1) % len;
        }

        let pick = pick_next(index, len, &self.state.shuffle_history, rng);
        if pick.cycle_completed {
            // New cycle starts from the track being left
            self.state.shuffle_history.clear();
            self.state.shuffle_history.push(index);
        }
        pick.index
    }

    fn restart_current(&mut self, index: usize) {
        self.state.current_time = 0.0;
        self.set_playing(true);
        self.effects.push(Effect::Seek(0.0));
        self.effects.push(Effect::Play);
        self.emit(PlaybackEvent::TrackRestarted { index });
    }

    fn load(&mut self, index: usize, previous_index: Option<usize>) {
        self.state.current_index = Some(index);
        self.state.load_epoch = self.state.load_epoch.next();
        self.state.current_time = 0.0;
        self.state.duration = 0.0;
        self.effects.push(Effect::Load {
            index,
            epoch: self.state.load_epoch,
        });
        self.emit(PlaybackEvent::TrackChanged {
            index,
            previous_index,
        });
    }

    fn playlist_replaced(&mut self, len: usize) {
        self.emit(PlaybackEvent::PlaylistReplaced { length: len });

        if len == 0 {
            self.state.current_index = None;
            // Outstanding device events belong to a track that is gone
            self.state.load_epoch = self.state.load_epoch.next();
            self.state.current_time = 0.0;
            self.state.duration = 0.0;
            self.state.shuffle_history.clear();
            if self.state.is_playing {
                self.effects.push(Effect::Pause);
            }
            self.set_playing(false);
            return;
        }

        let previous = self.state.current_index;
        let index = previous.filter(|&i| i < len).unwrap_or(0);

        self.state
            .shuffle_history
            .set_max_size(self.context.history_size.max(len));
        self.state.shuffle_history.retain_below(len);

        self.load(index, previous);
        if self.state.is_playing {
            self.effects.push(Effect::Play);
        }
    }
}

/// Clamp device-reported seconds; NaN and negatives become 0
fn non_negative(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn context(len: usize) -> TransitionContext {
        TransitionContext {
            playlist_len: len,
            manual_skip: ManualSkipBehavior::Resume,
            history_size: 50,
        }
    }

    fn loaded(len: usize) -> PlaybackState {
        let mut rng = StdRng::seed_from_u64(0);
        let state = PlaybackState::new(&PlaybackConfig::default());
        transition(&state, context(len), &Input::PlaylistReplaced { len }, &mut rng).state
    }

    fn step(state: &PlaybackState, len: usize, input: Input) -> Transition {
        let mut rng = StdRng::seed_from_u64(5);
        transition(state, context(len), &input, &mut rng)
    }

    #[test]
    fn initial_load_selects_first_track() {
        let state = loaded(3);
        assert_eq!(state.current_index, Some(0));
        assert_eq!(state.load_epoch, LoadEpoch::new(1));
        assert!(!state.is_playing);
    }

    #[test]
    fn toggle_play_emits_play_then_pause() {
        let state = loaded(2);

        let on = step(&state, 2, Input::Command(Command::TogglePlay));
        assert!(on.state.is_playing);
        assert!(on.effects.contains(&Effect::Play));

        let off = step(&on.state, 2, Input::Command(Command::TogglePlay));
        assert!(!off.state.is_playing);
        assert!(off.effects.contains(&Effect::Pause));
    }

    #[test]
    fn toggle_play_on_empty_playlist_is_noop() {
        let state = PlaybackState::new(&PlaybackConfig::default());
        let result = step(&state, 0, Input::Command(Command::TogglePlay));
        assert_eq!(result.state, state);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn stale_device_events_are_ignored() {
        let state = loaded(3);
        let stale = Input::Device(DeviceEvent::TimeUpdate {
            epoch: LoadEpoch::new(0),
            seconds: 42.0,
        });

        let result = step(&state, 3, stale);
        assert_eq!(result.state, state);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn nan_time_update_reads_as_zero() {
        let state = loaded(1);
        let result = step(
            &state,
            1,
            Input::Device(DeviceEvent::MetadataLoaded {
                epoch: state.load_epoch,
                duration: f64::NAN,
            }),
        );
        assert_eq!(result.state.duration, 0.0);
    }

    #[test]
    fn manual_next_under_repeat_one_changes_track() {
        let mut state = loaded(3);
        state.repeat_mode = RepeatMode::One;

        let result = step(&state, 3, Input::Command(Command::Next));
        assert_eq!(result.state.current_index, Some(1));
        assert!(result.state.is_playing);
    }

    #[test]
    fn load_bumps_epoch_and_resets_position() {
        let mut state = loaded(3);
        state.current_time = 12.0;
        state.duration = 200.0;

        let result = step(&state, 3, Input::Command(Command::Next));
        assert_eq!(result.state.load_epoch, state.load_epoch.next());
        assert_eq!(result.state.current_time, 0.0);
        assert_eq!(result.state.duration, 0.0);
        assert!(matches!(
            result.effects[0],
            Effect::Load { index: 1, .. }
        ));
    }

    #[test]
    fn preserve_policy_keeps_paused_state() {
        let state = loaded(3);
        let mut ctx = context(3);
        ctx.manual_skip = ManualSkipBehavior::Preserve;
        let mut rng = StdRng::seed_from_u64(1);

        let result = transition(&state, ctx, &Input::Command(Command::Next), &mut rng);
        assert_eq!(result.state.current_index, Some(1));
        assert!(!result.state.is_playing);
        assert!(!result.effects.contains(&Effect::Play));
    }

    #[test]
    fn seek_records_position_when_valid() {
        let state = loaded(2);
        let result = step(&state, 2, Input::Command(Command::Seek(30.5)));
        assert_eq!(result.state.current_time, 30.5);
        assert_eq!(result.effects, vec![Effect::Seek(30.5)]);

        let result = step(&state, 2, Input::Command(Command::Seek(-3.0)));
        assert_eq!(result.state.current_time, 0.0);
        assert_eq!(result.effects, vec![Effect::Seek(-3.0)]);
    }

    #[test]
    fn playlist_shrink_resets_index_to_zero() {
        let mut state = loaded(5);
        state.current_index = Some(4);
        state.shuffle_history.push(3);
        state.shuffle_history.push(1);

        let result = step(&state, 2, Input::PlaylistReplaced { len: 2 });
        assert_eq!(result.state.current_index, Some(0));
        assert_eq!(result.state.shuffle_history.to_vec(), vec![1]);
    }

    #[test]
    fn history_capacity_grows_with_playlist() {
        let state = loaded(120);
        assert_eq!(state.shuffle_history.max_size(), 120);
    }
}
