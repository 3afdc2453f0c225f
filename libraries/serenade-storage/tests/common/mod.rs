//! Test helpers for storage integration tests
//!
//! Uses real `SQLite` files in a temporary directory, so migrations,
//! constraints and ordering behave as in production.

#![allow(dead_code)]

use serenade_core::{MediaData, NewTrack};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database that is deleted on drop
pub struct TestDb {
    pub pool: SqlitePool,
    pub url: String,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let url = format!("sqlite://{}", db_path.display());

        let pool = serenade_storage::create_pool(&url)
            .await
            .expect("Failed to create pool");
        serenade_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            url,
            _temp_dir: temp_dir,
        }
    }

    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }
}

pub fn url_track(title: &str) -> NewTrack {
    NewTrack::new(
        title,
        "Test Artist",
        MediaData::url(format!("/{}.mp3", title.to_lowercase())),
    )
}

pub fn blob_track(title: &str, size: usize) -> NewTrack {
    NewTrack::new(title, "Test Artist", MediaData::blob("audio/mpeg", vec![0xAB; size]))
}
