//! Serenade Storage
//!
//! `SQLite` persistence for Serenade media and settings, plus in-memory
//! stores with the same behaviour.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: `tracks`, `images` and `settings` each own their
//!   queries as free functions over a pool
//! - **Trait Adapters**: [`SqliteMediaStore`] / [`SqliteSettingsStore`]
//!   implement the core store traits on top of the slices
//! - **Ordering**: rows carry an autoincrement sequence; listing follows
//!   insertion order
//!
//! # Example
//!
//! ```rust,no_run
//! use serenade_storage::{create_pool, run_migrations, SqliteMediaStore};
//! use serenade_core::MediaStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://serenade.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteMediaStore::new(pool);
//! let tracks = store.list_tracks().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod memory;
mod payload;

// Vertical slices
pub mod images;
pub mod settings;
pub mod tracks;

pub use context::{SqliteMediaStore, SqliteSettingsStore};
pub use error::{Result, StorageError};
pub use memory::{MemoryMediaStore, MemorySettingsStore};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, info};

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before building any store.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    debug!("Database migrations applied");
    Ok(())
}

/// Create a new `SQLite` pool
///
/// Creates the database file (not its parent directory) if missing.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://serenade.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    // In-memory databases exist per connection
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    info!(url = %database_url, "Database pool ready");
    Ok(pool)
}

/// Delete every track and image in one transaction
pub async fn clear_media(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM tracks").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM images").execute(&mut *tx).await?;
    tx.commit().await?;

    info!("All media cleared");
    Ok(())
}
