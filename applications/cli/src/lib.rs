//! Serenade terminal player
//!
//! Library half of the `serenade` binary: configuration, the player
//! session, a clock-driven simulated output device and terminal rendering.
pub mod commands;
pub mod config;
pub mod device;
pub mod display;
pub mod error;
pub mod media;
pub mod session;

pub use config::CliConfig;
pub use device::SimulatedDevice;
pub use error::{CliError, Result};
pub use session::{Flow, PlaylistOrigin, Session, SessionInput};
