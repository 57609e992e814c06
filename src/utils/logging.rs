//! Structured logging helpers shared by startup and the request layers.

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber. `RUST_LOG` takes precedence over
/// the configured level. A second call is a no-op.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn log_startup(component: &str, status: &str, detail: Option<&str>) {
    match detail {
        Some(detail) => info!(component, status, detail, "startup"),
        None => info!(component, status, "startup"),
    }
}

pub fn log_rule_set_loaded(path_rules: usize, header_rules: usize) {
    info!(path_rules, header_rules, "Expiry rule set built");
}
