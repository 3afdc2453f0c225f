/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unrecognized command: {0}")]
    Command(String),

    #[error(transparent)]
    Core(#[from] serenade_core::SerenadeError),

    #[error("Playback error: {0}")]
    Playback(#[from] serenade_playback::PlaybackError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }
}

impl From<serenade_storage::StorageError> for CliError {
    fn from(err: serenade_storage::StorageError) -> Self {
        // StorageError -> SerenadeError -> CliError
        CliError::Core(err.into())
    }
}
