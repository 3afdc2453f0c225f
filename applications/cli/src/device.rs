//! Simulated audio output
//!
//! Stands in for a real sink: it "plays" by advancing a clock on a tokio
//! interval and reports progress through the session input queue, exactly
//! the way a media element reports time updates and end-of-track.

use crate::config::DeviceSettings;
use crate::session::SessionInput;
use serenade_core::{ResolvedSource, SourceResolver};
use serenade_playback::{AudioDevice, DeviceEvent, LoadEpoch, PlaybackError, Result, SourceRef};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

#[derive(Debug, Default)]
struct Transport {
    epoch: LoadEpoch,
    loaded: bool,
    playing: bool,
    position: f64,
    duration: f64,
    gain: f32,
}

/// Clock-driven device reporting into the session queue
pub struct SimulatedDevice {
    resolver: SourceResolver,
    events: mpsc::UnboundedSender<SessionInput>,
    settings: DeviceSettings,
    transport: Arc<Mutex<Transport>>,
    ticker: Option<JoinHandle<()>>,
}

impl SimulatedDevice {
    pub fn new(
        resolver: SourceResolver,
        events: mpsc::UnboundedSender<SessionInput>,
        settings: DeviceSettings,
    ) -> Self {
        Self {
            resolver,
            events,
            settings,
            transport: Arc::new(Mutex::new(Transport::default())),
            ticker: None,
        }
    }

    /// Track length in seconds for a resolved source
    pub fn duration_of(&self, source: &ResolvedSource) -> f64 {
        match source.byte_len() {
            Some(bytes) => bytes as f64 / self.settings.blob_bytes_per_sec as f64,
            None => self.settings.fallback_track_secs as f64,
        }
    }

    /// Output gain last applied
    pub fn gain(&self) -> f32 {
        self.lock().gain
    }

    fn lock(&self) -> MutexGuard<'_, Transport> {
        lock(&self.transport)
    }

    fn send(&self, event: DeviceEvent) {
        // Receiver gone means the session is shutting down
        let _ = self.events.send(SessionInput::Device(event));
    }

    fn ensure_ticker(&mut self) {
        if self.ticker.is_some() {
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No tokio runtime; simulated clock disabled");
            return;
        };

        let transport = Arc::clone(&self.transport);
        let events = self.events.clone();
        let tick = self.settings.tick();

        self.ticker = Some(handle.spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let step = tick.as_secs_f64();

            loop {
                interval.tick().await;

                let event = {
                    let mut transport = lock(&transport);
                    advance(&mut transport, step)
                };

                if let Some(event) = event {
                    if events.send(SessionInput::Device(event)).is_err() {
                        break;
                    }
                }
            }
        }));
    }
}

/// Move the clock forward by `step` seconds
fn advance(transport: &mut Transport, step: f64) -> Option<DeviceEvent> {
    if !transport.playing {
        return None;
    }

    transport.position += step;
    if transport.position >= transport.duration {
        transport.position = transport.duration;
        transport.playing = false;
        return Some(DeviceEvent::Ended {
            epoch: transport.epoch,
        });
    }

    Some(DeviceEvent::TimeUpdate {
        epoch: transport.epoch,
        seconds: transport.position,
    })
}

fn lock(transport: &Mutex<Transport>) -> MutexGuard<'_, Transport> {
    transport.lock().unwrap_or_else(|e| e.into_inner())
}

impl AudioDevice for SimulatedDevice {
    fn load(&mut self, source: &SourceRef, epoch: LoadEpoch) -> Result<()> {
        {
            let mut transport = self.lock();
            transport.epoch = epoch;
            transport.loaded = false;
            transport.playing = false;
            transport.position = 0.0;
            transport.duration = 0.0;
        }

        let resolved = self
            .resolver
            .resolve(source.as_str())
            .map_err(|e| PlaybackError::device(e.to_string()))?;
        let duration = self.duration_of(&resolved);

        {
            let mut transport = self.lock();
            transport.loaded = true;
            transport.duration = duration;
        }

        trace!(%source, %epoch, duration, "Simulated load");
        self.ensure_ticker();
        self.send(DeviceEvent::MetadataLoaded { epoch, duration });
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let mut transport = self.lock();
        if !transport.loaded {
            return Err(PlaybackError::device("no source loaded"));
        }
        transport.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.lock().playing = false;
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        let event = {
            let mut transport = self.lock();
            if !transport.loaded {
                return Err(PlaybackError::device("no source loaded"));
            }
            let target = if seconds.is_finite() { seconds } else { 0.0 };
            transport.position = target.clamp(0.0, transport.duration);
            DeviceEvent::TimeUpdate {
                epoch: transport.epoch,
                seconds: transport.position,
            }
        };
        self.send(event);
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        self.lock().gain = gain;
    }

    fn release(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        let mut transport = self.lock();
        transport.loaded = false;
        transport.playing = false;
        debug!("Simulated device released");
    }
}

impl Drop for SimulatedDevice {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}
