//! Site settings persistence
//!
//! Plain key-value pairs. Known keys are defined on
//! [`serenade_core::SiteSettings`].
//!
//! # Example
//!
//! ```rust,no_run
//! use serenade_storage::settings;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! settings::set_setting(pool, "custom_message", "Te amo").await?;
//! let message = settings::get_setting(pool, "custom_message").await?;
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use sqlx::{Row, SqlitePool};

/// Get a single setting value
///
/// Returns `Ok(None)` if the key was never written.
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    row.map(|row| row.try_get::<String, _>("value"))
        .transpose()
        .map_err(Into::into)
}

/// Set a setting value, replacing any previous one
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO settings (key, value, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}
