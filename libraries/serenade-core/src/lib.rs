//! Serenade Core
//!
//! Platform-agnostic domain types, store traits and error handling for
//! Serenade.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Image`, `MediaData`, `SiteSettings`
//! - **Store Traits**: `MediaStore`, `SettingsStore`
//! - **Source Handles**: `SourceRegistry` for blob payloads
//! - **Error Handling**: Unified `SerenadeError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use serenade_core::{MediaData, SourceRegistry};
//!
//! let registry = SourceRegistry::new();
//! let handle = registry.register(&MediaData::blob("audio/mpeg", vec![0; 1024]));
//! assert!(handle.starts_with("blob:"));
//!
//! registry.revoke_all();
//! assert!(registry.resolve(&handle).is_err());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod sources;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SerenadeError};
pub use sources::{ResolvedSource, SourceRegistry, SourceResolver, BLOB_SCHEME};
pub use traits::{load_site_settings, save_site_settings, MediaStore, SettingsStore};
pub use types::{
    format_start_date, parse_start_date, Image, MediaData, MediaId, NewImage, NewTrack,
    SiteSettings, Track,
};
