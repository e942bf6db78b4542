//! Durable storage for the sweep configuration.
//!
//! One JSON row. A config that fails to parse or validate degrades to
//! "no stored config" (the caller falls back to defaults) instead of
//! failing startup.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tracing::warn;

use crate::config::SweepConfig;

#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<Option<SweepConfig>>;
    async fn save(&self, cfg: &SweepConfig) -> anyhow::Result<()>;
}

/// SQLite persistence for the single sweep-config record.
pub struct SqliteConfigStore {
    pool: SqlitePool,
}

impl SqliteConfigStore {
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new SQLite-backed store and ensure schema exists.
    pub async fn new(path: &str) -> anyhow::Result<Self> {
        let pool = SqlitePool::connect(path).await?;
        Self::ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn ensure_schema(pool: &SqlitePool) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sweep_config (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                config_json TEXT NOT NULL
            );
        "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ConfigStore for SqliteConfigStore {
    async fn load(&self) -> anyhow::Result<Option<SweepConfig>> {
        let row = sqlx::query("SELECT config_json FROM sweep_config WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let json: String = row.get("config_json");

        let cfg: SweepConfig = match serde_json::from_str(&json) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(error = %e, "stored sweep config unreadable, falling back to defaults");
                return Ok(None);
            }
        };

        if let Err(e) = cfg.validate() {
            warn!(error = %e, "stored sweep config invalid, falling back to defaults");
            return Ok(None);
        }

        Ok(Some(cfg))
    }

    async fn save(&self, cfg: &SweepConfig) -> anyhow::Result<()> {
        let json = serde_json::to_string(cfg)?;

        sqlx::query(
            r#"
            INSERT INTO sweep_config (id, config_json)
            VALUES (1, ?)
            ON CONFLICT(id) DO UPDATE SET
                config_json = excluded.config_json;
        "#,
        )
        .bind(json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
