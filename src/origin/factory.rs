//! Origin factory
//!
//! Picks the origin implementation from configuration and CLI overrides.

use crate::config::schema::OriginConfig;
use crate::origin::http::HttpOrigin;
use crate::origin::network::{Network, OfflineOrigin};
use crate::origin::static_dir::StaticOrigin;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Kind of origin selected for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginKind {
    /// Deployed app over HTTP
    Http(String),
    /// Local build directory
    Static(PathBuf),
    /// No connectivity
    Offline,
}

impl OriginKind {
    /// Interpret an `--origin` value: URLs are HTTP, anything else is a directory
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Http(value.to_string())
        } else {
            Self::Static(PathBuf::from(value))
        }
    }

    /// Select the origin from configuration
    ///
    /// Precedence: offline flag, then CLI override, then `static_dir`, then `base_url`.
    pub fn select(config: &OriginConfig, cli_origin: Option<&str>, offline: bool) -> Self {
        if offline {
            return Self::Offline;
        }
        if let Some(value) = cli_origin {
            return Self::parse(value);
        }
        match &config.static_dir {
            Some(dir) => Self::Static(dir.clone()),
            None => Self::Http(config.base_url.clone()),
        }
    }
}

/// Create the network for an origin kind
pub fn create_origin(kind: &OriginKind, config: &OriginConfig) -> Arc<dyn Network> {
    match kind {
        OriginKind::Http(url) => Arc::new(HttpOrigin::new(
            url,
            Duration::from_secs(config.timeout_secs),
        )),
        OriginKind::Static(dir) => Arc::new(StaticOrigin::new(dir.clone())),
        OriginKind::Offline => Arc::new(OfflineOrigin),
    }
}
