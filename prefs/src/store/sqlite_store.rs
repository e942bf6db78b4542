//! SqlitePreferenceStore
//! ---------------------
//! SQLite-backed implementation of the `PreferenceStore` trait used by
//! `manager::PreferenceManager`. It is responsible for durable persistence
//! of per-user channel overrides so that:
//!
//!  - explicit user choices survive restarts
//!  - the manager operates purely in-memory between writes
//!  - a corrupt row degrades to the default channel, never to a failed boot

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::warn;

use super::PreferenceStore;
use crate::model::{Channel, PreferenceRecord, UserId};

/// SQLite persistence backend for notification preferences.
///
/// One row per user who has made an explicit choice:
///
///   - schema creation on startup
///   - loading persisted overrides (`load_all`), skipping unparseable rows
///   - upsert semantics (`save`)
///   - permanent removal (`delete`) when a choice collapses to the default
pub struct SqlitePreferenceStore {
    pool: SqlitePool,
}

impl SqlitePreferenceStore {
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new SQLite-backed store and ensure schema exists.
    pub async fn new(path: &str) -> anyhow::Result<Self> {
        let pool = SqlitePool::connect(path).await?;
        Self::ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Creates the preferences table if it does not exist.
    pub async fn ensure_schema(pool: &SqlitePool) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notify_preferences (
                user_id TEXT PRIMARY KEY,
                channel TEXT NOT NULL
            );
        "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for SqlitePreferenceStore {
    /// Load every stored override.
    ///
    /// Called at startup (and on reload) by PreferenceManager to rebuild
    /// the in-memory map. A row that fails to parse is logged and skipped;
    /// that user simply follows the default until they choose again.
    async fn load_all(&self) -> anyhow::Result<Vec<PreferenceRecord>> {
        let rows = sqlx::query("SELECT user_id, channel FROM notify_preferences")
            .fetch_all(&self.pool)
            .await?;

        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            let user_str: String = row.get("user_id");
            let channel_str: String = row.get("channel");

            let user_id = match UserId::parse_str(&user_str) {
                Ok(id) => id,
                Err(e) => {
                    warn!(user_id = %user_str, error = %e, "skipping preference row: bad user id");
                    continue;
                }
            };

            let channel = match Channel::from_str(&channel_str) {
                Ok(c) => c,
                Err(e) => {
                    warn!(user_id = %user_str, channel = %channel_str, error = %e,
                        "skipping preference row: bad channel");
                    continue;
                }
            };

            records.push(PreferenceRecord { user_id, channel });
        }

        Ok(records)
    }

    /// Store or update one user's override.
    async fn save(&self, record: &PreferenceRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notify_preferences (user_id, channel)
            VALUES (?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                channel = excluded.channel;
        "#,
        )
        .bind(record.user_id.to_string())
        .bind(record.channel.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Permanently delete one user's override.
    ///
    /// Called by PreferenceManager when a user's choice equals the current
    /// default, reclaiming the row.
    async fn delete(&self, user_id: UserId) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM notify_preferences WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
