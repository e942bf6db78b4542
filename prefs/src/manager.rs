use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::{Channel, PreferenceRecord, UserId};
use crate::store::PreferenceStore;

/// Holds the in-memory live set of channel overrides and persists changes
/// to a store.
///
/// Reads happen on every warning/completion broadcast (per recipient, per
/// tick), writes only on user-initiated choices, so the map sits behind a
/// read-write lock rather than a mutex.
pub struct PreferenceManager<S: PreferenceStore> {
    overrides: Arc<RwLock<HashMap<UserId, Channel>>>,
    default_channel: Arc<RwLock<Channel>>,
    store: Arc<S>,
}

impl<S: PreferenceStore> PreferenceManager<S> {
    /// Initialize a fresh manager from the store (load_all).
    pub async fn new(store: Arc<S>, default_channel: Channel) -> anyhow::Result<Self> {
        let manager = Self {
            overrides: Arc::new(RwLock::new(HashMap::new())),
            default_channel: Arc::new(RwLock::new(default_channel)),
            store,
        };

        manager.load_all().await?;
        Ok(manager)
    }

    /// Clear the in-memory map and re-read every durable record.
    ///
    /// Rows the store could not parse were already skipped (and logged)
    /// on its side.
    pub async fn load_all(&self) -> anyhow::Result<()> {
        let records = self.store.load_all().await?;

        let mut overrides = self.overrides.write().await;
        overrides.clear();

        for r in records {
            overrides.insert(r.user_id, r.channel);
        }

        Ok(())
    }

    /// The channel to use for `user_id`: their override, or the current
    /// default.
    pub async fn get(&self, user_id: UserId) -> Channel {
        if let Some(channel) = self.overrides.read().await.get(&user_id) {
            return *channel;
        }
        *self.default_channel.read().await
    }

    /// Record a user's explicit channel choice.
    ///
    /// A choice equal to the current default is stored as *no* override:
    /// the durable row is deleted and the user follows the default from
    /// then on, including future default changes.
    pub async fn set(&self, user_id: UserId, channel: Channel) -> anyhow::Result<()> {
        let default = *self.default_channel.read().await;

        if channel == default {
            self.store.delete(user_id).await?;
            self.overrides.write().await.remove(&user_id);
            return Ok(());
        }

        // Persist first, then update memory.
        self.store
            .save(&PreferenceRecord { user_id, channel })
            .await?;
        self.overrides.write().await.insert(user_id, channel);

        Ok(())
    }

    /// Change the configured default channel.
    ///
    /// Existing overrides are untouched; users without one follow the new
    /// default immediately.
    pub async fn set_default(&self, channel: Channel) {
        *self.default_channel.write().await = channel;
    }

    pub async fn default_channel(&self) -> Channel {
        *self.default_channel.read().await
    }

    /// Number of stored overrides (diagnostics).
    pub async fn override_count(&self) -> usize {
        self.overrides.read().await.len()
    }
}
