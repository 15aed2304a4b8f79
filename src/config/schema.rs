//! Configuration schema for MediSketch
//!
//! Configuration is stored at `~/.config/medisketch/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Where content is fetched from
    pub origin: OriginConfig,

    /// Offline cache settings
    pub cache: CacheConfig,

    /// Content loading settings
    pub content: ContentConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
        }
    }
}

/// Content origin configuration
///
/// `static_dir` wins over `base_url` when both are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Base URL of the deployed app (e.g. "https://medisketch.example")
    pub base_url: String,

    /// Local directory laid out like the app's public/ folder
    pub static_dir: Option<PathBuf>,

    /// Per-request transport timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5173".to_string(),
            static_dir: None,
            timeout_secs: 30,
        }
    }
}

/// Offline cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache name prefix; the generation tag is "{name}-{version}"
    pub name: String,

    /// Build version of the current deployment
    pub version: String,

    /// Cache directory (defaults to the platform cache dir)
    pub dir: Option<PathBuf>,

    /// Assets fetched eagerly at install time
    pub precache: Vec<String>,

    /// Cached document served to navigations when the network is down
    pub offline_fallback: String,

    /// Activate immediately after install instead of waiting
    pub skip_waiting: bool,

    /// Sub-resource key prefixes that are written through like documents
    pub runtime_prefixes: Vec<String>,
}

impl CacheConfig {
    /// Generation tag for the current build
    pub fn generation_tag(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: "medisketch".to_string(),
            version: "v1".to_string(),
            dir: None,
            precache: vec![
                "/".to_string(),
                "/index.html".to_string(),
                "/manifest.json".to_string(),
            ],
            offline_fallback: "/index.html".to_string(),
            skip_waiting: true,
            runtime_prefixes: vec![],
        }
    }
}

/// Content loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Time allowed for a single document load
    pub timeout_ms: u64,

    /// Root of the content hierarchy on the origin
    pub data_root: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            data_root: "/data".to_string(),
        }
    }
}
