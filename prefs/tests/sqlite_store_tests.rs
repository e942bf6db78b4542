use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use prefs::model::{Channel, PreferenceRecord};
use prefs::store::sqlite_store::SqlitePreferenceStore;
use prefs::store::PreferenceStore;

/// One shared in-memory database; more than one pool connection would each
/// see their own empty `:memory:` instance.
async fn memory_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    SqlitePreferenceStore::ensure_schema(&pool).await?;
    Ok(pool)
}

fn record(channel: Channel) -> PreferenceRecord {
    PreferenceRecord {
        user_id: Uuid::new_v4(),
        channel,
    }
}

#[tokio::test]
async fn save_and_load_roundtrip() -> anyhow::Result<()> {
    let pool = memory_pool().await?;
    let store = SqlitePreferenceStore::from_pool(pool);

    let rec = record(Channel::Summary);
    store.save(&rec).await?;

    let loaded = store.load_all().await?;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0], rec);

    Ok(())
}

#[tokio::test]
async fn save_updates_existing_row() -> anyhow::Result<()> {
    let pool = memory_pool().await?;
    let store = SqlitePreferenceStore::from_pool(pool);

    let mut rec = record(Channel::Summary);
    store.save(&rec).await?;

    rec.channel = Channel::Silent;
    store.save(&rec).await?;

    let loaded = store.load_all().await?;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].channel, Channel::Silent);

    Ok(())
}

#[tokio::test]
async fn delete_removes_row() -> anyhow::Result<()> {
    let pool = memory_pool().await?;
    let store = SqlitePreferenceStore::from_pool(pool);

    let rec = record(Channel::Detailed);
    store.save(&rec).await?;
    assert_eq!(store.load_all().await?.len(), 1);

    store.delete(rec.user_id).await?;
    assert!(store.load_all().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn load_all_skips_unparseable_rows() -> anyhow::Result<()> {
    let pool = memory_pool().await?;

    // A row written by an older build, plus a healthy one.
    sqlx::query("INSERT INTO notify_preferences (user_id, channel) VALUES (?, ?)")
        .bind("not-a-uuid")
        .bind("Detailed")
        .execute(&pool)
        .await?;
    sqlx::query("INSERT INTO notify_preferences (user_id, channel) VALUES (?, ?)")
        .bind(Uuid::new_v4().to_string())
        .bind("Hotbar")
        .execute(&pool)
        .await?;

    let good = record(Channel::Summary);
    let store = SqlitePreferenceStore::from_pool(pool);
    store.save(&good).await?;

    // Bad rows are skipped, never fatal.
    let loaded = store.load_all().await?;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0], good);

    Ok(())
}
