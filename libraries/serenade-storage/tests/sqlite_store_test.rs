//! Integration tests for the `SQLite` stores

mod common;

use common::{blob_track, url_track, TestDb};
use serenade_core::{
    load_site_settings, save_site_settings, parse_start_date, MediaData, MediaId, MediaStore,
    NewImage, SettingsStore, SiteSettings,
};
use serenade_storage::{SqliteMediaStore, SqliteSettingsStore};

#[tokio::test]
async fn tracks_list_in_insertion_order() {
    let db = TestDb::new().await;
    let store = SqliteMediaStore::new(db.pool());

    for title in ["Primeira", "Segunda", "Terceira"] {
        store.save_track(url_track(title)).await.unwrap();
    }

    let titles: Vec<_> = store
        .list_tracks()
        .await
        .unwrap()
        .into_iter()
        .map(|track| track.title)
        .collect();
    assert_eq!(titles, vec!["Primeira", "Segunda", "Terceira"]);
}

#[tokio::test]
async fn saved_track_reads_back_identically() {
    let db = TestDb::new().await;
    let store = SqliteMediaStore::new(db.pool());

    let saved = store.save_track(blob_track("Nossa", 2048)).await.unwrap();
    let listed = store.list_tracks().await.unwrap();

    assert_eq!(listed, vec![saved.clone()]);
    assert_eq!(saved.data.byte_len(), Some(2048));
    assert_eq!(saved.data.mime(), Some("audio/mpeg"));
}

#[tokio::test]
async fn deleting_keeps_remaining_order() {
    let db = TestDb::new().await;
    let store = SqliteMediaStore::new(db.pool());

    let a = store.save_track(url_track("A")).await.unwrap();
    let b = store.save_track(url_track("B")).await.unwrap();
    let c = store.save_track(url_track("C")).await.unwrap();

    store.delete_track(&b.id).await.unwrap();

    let ids: Vec<_> = store
        .list_tracks()
        .await
        .unwrap()
        .into_iter()
        .map(|track| track.id)
        .collect();
    assert_eq!(ids, vec![a.id, c.id]);
}

#[tokio::test]
async fn deleting_missing_media_is_not_found() {
    let db = TestDb::new().await;
    let store = SqliteMediaStore::new(db.pool());

    let err = store
        .delete_track(&MediaId::new("does-not-exist"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = store
        .delete_image(&MediaId::new("does-not-exist"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn images_round_trip_and_clear_all() {
    let db = TestDb::new().await;
    let store = SqliteMediaStore::new(db.pool());

    let photo = store
        .save_image(NewImage::new(MediaData::blob("image/jpeg", vec![1, 2, 3])))
        .await
        .unwrap();
    store
        .save_image(NewImage::new(MediaData::url("/placeholder-1.jpg")))
        .await
        .unwrap();
    store.save_track(url_track("A")).await.unwrap();

    let images = store.list_images().await.unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0], photo);

    store.clear_all().await.unwrap();
    assert!(store.list_images().await.unwrap().is_empty());
    assert!(store.list_tracks().await.unwrap().is_empty());
}

#[tokio::test]
async fn data_survives_reopening_the_database() {
    let db = TestDb::new().await;
    {
        let store = SqliteMediaStore::new(db.pool());
        store.save_track(url_track("Persisted")).await.unwrap();
    }

    let pool = serenade_storage::create_pool(&db.url).await.unwrap();
    serenade_storage::run_migrations(&pool).await.unwrap();
    let reopened = SqliteMediaStore::new(pool);

    let tracks = reopened.list_tracks().await.unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "Persisted");
}

#[tokio::test]
async fn settings_upsert() {
    let db = TestDb::new().await;
    let store = SqliteSettingsStore::new(db.pool());

    assert_eq!(store.get_setting("custom_message").await.unwrap(), None);

    store.set_setting("custom_message", "Oi").await.unwrap();
    store.set_setting("custom_message", "Te amo").await.unwrap();

    assert_eq!(
        store.get_setting("custom_message").await.unwrap().as_deref(),
        Some("Te amo")
    );
}

#[tokio::test]
async fn site_settings_override_defaults() {
    let db = TestDb::new().await;
    let store = SqliteSettingsStore::new(db.pool());
    let defaults = SiteSettings::default();

    assert_eq!(load_site_settings(&store, &defaults).await.unwrap(), defaults);

    let custom = SiteSettings::new(
        parse_start_date("2024-02-14T20:30:00").unwrap(),
        "Para sempre",
    );
    save_site_settings(&store, &custom).await.unwrap();

    assert_eq!(load_site_settings(&store, &defaults).await.unwrap(), custom);
}
