//! Terminal rendering of playback state
use serenade_playback::{format_time, PlaybackEvent, PlaybackSnapshot, PlaylistTrack};

/// Transport line, e.g. `▶ Música 1 - Artista 1  0:42 / 3:00  vol 70  shuffle  repeat all`
pub fn status_line(snapshot: &PlaybackSnapshot) -> String {
    let Some(track) = &snapshot.current_track else {
        return "(no tracks)".to_string();
    };

    let icon = if snapshot.is_playing { "▶" } else { "⏸" };
    let mut line = format!(
        "{icon} {} - {}  {} / {}  vol {}",
        track.title,
        track.artist,
        format_time(Some(snapshot.current_time)),
        format_time(Some(snapshot.duration)),
        snapshot.volume,
    );

    if snapshot.shuffle_enabled {
        line.push_str("  shuffle");
    }
    line.push_str("  repeat ");
    line.push_str(snapshot.repeat_mode.as_str());

    line
}

/// Message for events worth printing; position updates are silent
///
/// Track indices are looked up in `playlist`, so a batch of queued events
/// names each track it passed through.
pub fn describe_event(event: &PlaybackEvent, playlist: &[PlaylistTrack]) -> Option<String> {
    let text = match event {
        PlaybackEvent::StateChanged { is_playing: true } => "Playing".to_string(),
        PlaybackEvent::StateChanged { is_playing: false } => "Paused".to_string(),
        PlaybackEvent::TrackChanged { index, .. } => {
            let title = playlist
                .get(*index)
                .map(|track| track.title.as_str())
                .unwrap_or("?");
            format!("Track {}/{}: {title}", index + 1, playlist.len())
        }
        PlaybackEvent::TrackRestarted { .. } => "Repeating track".to_string(),
        PlaybackEvent::VolumeChanged { level } => format!("Volume {level}"),
        PlaybackEvent::ShuffleChanged { enabled } => {
            format!("Shuffle {}", if *enabled { "on" } else { "off" })
        }
        PlaybackEvent::RepeatChanged { mode } => format!("Repeat {mode}"),
        PlaybackEvent::PlaylistExhausted => "End of playlist".to_string(),
        PlaybackEvent::PlaylistReplaced { length } => format!("Playlist: {length} tracks"),
        PlaybackEvent::Error { message } => format!("Error: {message}"),
        PlaybackEvent::PositionUpdate { .. } => return None,
    };

    Some(text)
}
