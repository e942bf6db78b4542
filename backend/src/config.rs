#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Database connection string.
    pub database_url: String,

    /// Cadence of the sweep-engine tick driver, in milliseconds.
    ///
    /// This bounds warning-timing precision: a warning threshold is
    /// detected at the first tick at or past it, so a coarser cadence
    /// means warnings land later (never lost). One second matches the
    /// countdown granularity; there is no point going much finer.
    pub poll_interval_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://sweepd_dev.db".to_string());

        let poll_interval_ms = std::env::var("POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1_000);

        Self {
            database_url,
            poll_interval_ms,
        }
    }
}
