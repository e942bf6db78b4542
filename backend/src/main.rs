mod config;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tracing::info;

use common::logger::init_logger;
use common::time::now_ms;
use config::AppConfig;
use prefs::manager::PreferenceManager;
use prefs::model::{Channel, UserId};
use prefs::store::sqlite_store::SqlitePreferenceStore;
use scheduler::config::SweepConfig;
use scheduler::engine::SweepEngine;
use scheduler::store::{ConfigStore, SqliteConfigStore};
use scheduler::types::{CleanupExecutor, Notification, NotificationDispatcher, RecipientRegistry};

/// Stand-in executor until the host world/entity registry is wired in.
struct DummyCleanupExecutor;

#[async_trait::async_trait]
impl CleanupExecutor for DummyCleanupExecutor {
    async fn execute(&self, filter: &BTreeSet<String>) -> anyhow::Result<u64> {
        // TODO: Replace with the real host integration; removal happens
        // against the live entity registry, filtered by category.
        let _ = filter;
        Ok(0)
    }
}

/// Dispatcher that renders deliveries to the log. One match over the
/// closed channel enum owns the per-channel behavior.
struct LogDispatcher;

#[async_trait::async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn deliver(
        &self,
        user_id: UserId,
        note: &Notification,
        channel: Channel,
    ) -> anyhow::Result<()> {
        match channel {
            Channel::Silent => {}
            Channel::Summary => info!(user = %user_id, "{}", note.body),
            Channel::Detailed => {
                info!(user = %user_id, display_secs = note.display_secs, "{}", note.body)
            }
        }
        Ok(())
    }
}

/// Stand-in connected-user registry.
struct NoRecipients;

#[async_trait::async_trait]
impl RecipientRegistry for NoRecipients {
    async fn list_recipients(&self) -> Vec<UserId> {
        // TODO: Replace with the host's connected-user list.
        Vec::new()
    }
}

/// Connects the pool and ensures both schemas exist.
async fn init_pool(cfg: &AppConfig) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePool::connect(&cfg.database_url).await?;

    SqlitePreferenceStore::ensure_schema(&pool).await?;
    SqliteConfigStore::ensure_schema(&pool).await?;

    Ok(pool)
}

/// Restore the persisted sweep config, or seed the defaults on first run
/// (and whenever the stored record was unreadable).
async fn load_sweep_config(store: &SqliteConfigStore) -> anyhow::Result<SweepConfig> {
    if let Some(cfg) = store.load().await? {
        return Ok(cfg);
    }

    let cfg = SweepConfig::default();
    store.save(&cfg).await?;
    Ok(cfg)
}

/// Starts the fixed-cadence tick loop driving the engine.
fn start_sweep_loop(engine: Arc<SweepEngine<SqlitePreferenceStore>>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;
            engine.on_tick(now_ms()).await;
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("sweepd");

    let cfg = AppConfig::from_env();

    info!(database_url = %cfg.database_url, "starting sweepd");

    let pool = init_pool(&cfg).await?;

    let config_store = Arc::new(SqliteConfigStore::from_pool(pool.clone()));
    let sweep_cfg = load_sweep_config(&config_store).await?;

    let pref_store = Arc::new(SqlitePreferenceStore::from_pool(pool.clone()));
    let preferences =
        Arc::new(PreferenceManager::new(pref_store, sweep_cfg.default_channel()).await?);

    info!(
        overrides = preferences.override_count().await,
        filter = %sweep_cfg.filter_description(),
        "state restored"
    );

    let engine = Arc::new(SweepEngine::new(
        sweep_cfg,
        Arc::new(DummyCleanupExecutor),
        Arc::new(LogDispatcher),
        Arc::new(NoRecipients),
        preferences,
        config_store,
    ));

    engine.rearm_automatic(now_ms()).await;

    match engine.time_until_next_run(now_ms()).await {
        Some(secs) => info!(secs, "next sweep armed"),
        None => info!("automatic sweeps disabled"),
    }

    start_sweep_loop(engine.clone(), Duration::from_millis(cfg.poll_interval_ms));

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    Ok(())
}
