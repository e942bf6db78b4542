use std::sync::Arc;

use tokio::test;
use uuid::Uuid;

use prefs::manager::PreferenceManager;
use prefs::model::{Channel, PreferenceRecord};
use prefs::store::PreferenceStore;

use mock_store::InMemoryPreferenceStore;

#[test]
async fn load_all_restores_stored_overrides() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryPreferenceStore::new());

    let user = Uuid::new_v4();
    store
        .save(&PreferenceRecord {
            user_id: user,
            channel: Channel::Summary,
        })
        .await?;

    let mgr = PreferenceManager::new(store.clone(), Channel::Detailed).await?;

    assert_eq!(mgr.get(user).await, Channel::Summary);
    assert_eq!(mgr.override_count().await, 1);

    Ok(())
}

#[test]
async fn unknown_user_follows_default() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryPreferenceStore::new());
    let mgr = PreferenceManager::new(store, Channel::Detailed).await?;

    assert_eq!(mgr.get(Uuid::new_v4()).await, Channel::Detailed);

    Ok(())
}

#[test]
async fn set_persists_override() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryPreferenceStore::new());
    let mgr = PreferenceManager::new(store.clone(), Channel::Detailed).await?;

    let user = Uuid::new_v4();
    mgr.set(user, Channel::Silent).await?;

    assert_eq!(mgr.get(user).await, Channel::Silent);

    // Confirm persisted
    let stored = store.map.lock().await.get(&user).cloned();
    assert_eq!(stored.map(|r| r.channel), Some(Channel::Silent));

    Ok(())
}

#[test]
async fn choosing_the_default_reclaims_the_record() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryPreferenceStore::new());
    let mgr = PreferenceManager::new(store.clone(), Channel::Detailed).await?;

    let user = Uuid::new_v4();
    mgr.set(user, Channel::Summary).await?;
    assert_eq!(store.map.lock().await.len(), 1);

    // Picking the default again removes the override entirely.
    mgr.set(user, Channel::Detailed).await?;
    assert!(store.map.lock().await.is_empty());
    assert_eq!(mgr.override_count().await, 0);

    Ok(())
}

#[test]
async fn reclaimed_user_tracks_a_later_default_change() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryPreferenceStore::new());
    let mgr = PreferenceManager::new(store, Channel::Detailed).await?;

    let user = Uuid::new_v4();
    mgr.set(user, Channel::Detailed).await?; // equal to default -> no record

    mgr.set_default(Channel::Summary).await;

    // No stale cached value: the user follows the new default.
    assert_eq!(mgr.get(user).await, Channel::Summary);

    Ok(())
}

#[test]
async fn load_all_clears_stale_entries() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryPreferenceStore::new());
    let mgr = PreferenceManager::new(store.clone(), Channel::Detailed).await?;

    let user = Uuid::new_v4();
    mgr.set(user, Channel::Silent).await?;

    // Record vanishes behind the manager's back (e.g. external cleanup).
    store.delete(user).await?;
    mgr.load_all().await?;

    assert_eq!(mgr.get(user).await, Channel::Detailed);

    Ok(())
}
