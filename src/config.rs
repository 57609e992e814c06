use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{constants::defaults, features::expires::{Directive, RuleSet}};

#[derive(Debug, Deserialize)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub expires: Vec<Directive>,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub addr: String
}

/// What the expiry layer wraps.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    Static { root: String },
    Proxy {
        upstream: String,
        #[serde(default = "default_max_body_size")]
        max_body_size: usize,
    },
}

fn default_max_body_size() -> usize {
    defaults::MAX_BODY_SIZE
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_log_level() -> String {
    defaults::LOG_LEVEL.to_string()
}

impl GatewayConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("invalid configuration in {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Compiles the `expires` block. Any error here must stop startup.
    pub fn rule_set(&self) -> Result<RuleSet> {
        RuleSet::from_directives(&self.expires).context("invalid expires block")
    }
}
