use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Install the global tracing subscriber once.
///
/// Safe to call from every binary and test entry point; later calls are
/// no-ops. `RUST_LOG` overrides the default `info` filter.
pub fn init_logger(service_name: &'static str) {
    LOGGER_INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_target(true) // crate/module path on each line
            .with_line_number(true)
            .init();

        tracing::info!(service = service_name, "logger initialized");
    });
}
