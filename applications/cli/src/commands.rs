//! Interactive player commands
use crate::error::CliError;
use std::str::FromStr;

/// One line typed at the player prompt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplCommand {
    TogglePlay,
    Next,
    Previous,
    /// Seek to an absolute position in seconds
    Seek(f64),
    /// Set volume; out-of-range values are clamped by the controller
    Volume(i32),
    Shuffle,
    Repeat,
    Status,
    Reload,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  p, play, pause      toggle play/pause
  n, next             next track
  b, prev, previous   previous track
  seek <s|m:ss>       jump to a position
  vol <0-100>         set volume
  shuffle             toggle shuffle
  repeat              cycle repeat (off, all, one)
  status              show the transport line
  reload              re-read tracks and settings from storage
  help                this text
  q, quit             exit";

impl FromStr for ReplCommand {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();
        let arg = words.next();

        let command = match verb.as_str() {
            "p" | "play" | "pause" | "toggle" => Self::TogglePlay,
            "n" | "next" => Self::Next,
            "b" | "prev" | "previous" => Self::Previous,
            "seek" => Self::Seek(parse_position(require(arg, "seek")?)?),
            "vol" | "volume" => {
                let raw = require(arg, "volume")?;
                let level = raw
                    .parse::<i32>()
                    .map_err(|_| CliError::command(format!("invalid volume: {raw}")))?;
                Self::Volume(level)
            }
            "shuffle" => Self::Shuffle,
            "repeat" => Self::Repeat,
            "status" | "s" => Self::Status,
            "reload" => Self::Reload,
            "help" | "h" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return Err(CliError::command(s.trim())),
        };

        Ok(command)
    }
}

fn require<'a>(arg: Option<&'a str>, verb: &str) -> Result<&'a str, CliError> {
    arg.ok_or_else(|| CliError::command(format!("{verb} needs an argument")))
}

/// Parse `95`, `95.5` or `1:35` into seconds
pub fn parse_position(raw: &str) -> Result<f64, CliError> {
    let invalid = || CliError::command(format!("invalid position: {raw}"));

    let seconds = match raw.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
            let seconds: f64 = seconds.parse().map_err(|_| invalid())?;
            if !(0.0..60.0).contains(&seconds) {
                return Err(invalid());
            }
            minutes as f64 * 60.0 + seconds
        }
        None => raw.parse().map_err(|_| invalid())?,
    };

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(invalid());
    }
    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("p".parse::<ReplCommand>().unwrap(), ReplCommand::TogglePlay);
        assert_eq!("NEXT".parse::<ReplCommand>().unwrap(), ReplCommand::Next);
        assert_eq!("  prev ".parse::<ReplCommand>().unwrap(), ReplCommand::Previous);
        assert_eq!("q".parse::<ReplCommand>().unwrap(), ReplCommand::Quit);
    }

    #[test]
    fn seek_accepts_seconds_and_clock_format() {
        assert_eq!("seek 95".parse::<ReplCommand>().unwrap(), ReplCommand::Seek(95.0));
        assert_eq!("seek 1:35".parse::<ReplCommand>().unwrap(), ReplCommand::Seek(95.0));
        assert!("seek".parse::<ReplCommand>().is_err());
        assert!("seek 1:75".parse::<ReplCommand>().is_err());
        assert!("seek -3".parse::<ReplCommand>().is_err());
    }

    #[test]
    fn volume_keeps_out_of_range_values() {
        assert_eq!("vol 150".parse::<ReplCommand>().unwrap(), ReplCommand::Volume(150));
        assert_eq!("vol -5".parse::<ReplCommand>().unwrap(), ReplCommand::Volume(-5));
        assert!("vol loud".parse::<ReplCommand>().is_err());
    }

    #[test]
    fn unknown_command_is_reported() {
        let err = "dance".parse::<ReplCommand>().unwrap_err();
        assert!(matches!(err, CliError::Command(ref s) if s == "dance"));
    }
}
