//! # Expires Gateway
//!
//! An HTTP front end that stamps an `Expires` header on responses whose
//! request matches a configured rule:
//! - Compact duration grammar (`1y2m3d4h5i6s`)
//! - Ordered path rules, then header rules, first match wins
//! - Static file or reverse-proxy backend
//! - YAML configuration, validated once at startup

pub mod config;
pub mod errors;
pub mod app;
pub mod state;
pub mod proxy;
pub mod middleware;
pub mod features;
pub mod utils;
pub mod constants;

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

use crate::{config::GatewayConfig, state::AppState, utils::logging::*};

pub use crate::features::expires::{HeaderRule, PathRule, RuleSet, RuleSpec};
pub use crate::utils::{parse_duration, DurationSpan};

/// Starts the gateway with the given configuration file.
///
/// Fails before binding if the configuration or any expiry rule is invalid.
pub async fn run(config_path: PathBuf) -> Result<()> {
    let config = GatewayConfig::load(&config_path)?;

    init_tracing(&config.logging.level);
    log_startup("configuration", "loaded", config_path.to_str());

    let rules = config.rule_set()?;
    log_rule_set_loaded(rules.path_rules().len(), rules.header_rules().len());

    let app_state = Arc::new(AppState::new(rules, config.backend.clone()));
    let app = app::create_app(app_state)?;

    let listener = TcpListener::bind(&config.server.addr).await?;
    info!("Gateway listening on {}", &config.server.addr);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
