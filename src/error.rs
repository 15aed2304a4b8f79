//! Error types for MediSketch
//!
//! All modules use `MediResult<T>` as their return type. A cache miss is
//! never an error: lookups return `Option`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for MediSketch operations
pub type MediResult<T> = Result<T, MediError>;

/// All errors that can occur in MediSketch
#[derive(Error, Debug)]
pub enum MediError {
    // Content errors
    #[error("Timed out after {timeout_ms}ms loading {key}")]
    Timeout { key: String, timeout_ms: u64 },

    #[error("Content not found: {key} (HTTP {status})")]
    NotFound { key: String, status: u16 },

    #[error("Malformed content at {key}: {reason}")]
    MalformedContent { key: String, reason: String },

    #[error("Invalid content address: {0}")]
    InvalidAddress(String),

    // Network errors
    #[error("Network request failed for {key}: {reason}")]
    NetworkFailure { key: String, reason: String },

    // Cache errors
    #[error("Cache storage failure: {context}")]
    StorageFailure {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid cache generation tag: {0}")]
    InvalidGenerationTag(String),

    #[error("Lifecycle error: cannot {action} while {state}")]
    Lifecycle { action: String, state: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl MediError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a cache storage error with context
    pub fn storage(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::StorageFailure {
            context: context.into(),
            source,
        }
    }

    /// Create a network failure for a request key
    pub fn network(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NetworkFailure {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed content error for a request key
    pub fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedContent {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Check if the user can simply retry the action
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::NetworkFailure { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Timeout { .. } => Some("The origin is slow or unreachable. Try again."),
            Self::NetworkFailure { .. } => {
                Some("Check connectivity, or run `medisketch install` while online to cache the app shell")
            }
            Self::NotFound { .. } => {
                Some("Check that the JSON file exists under the origin's data/ directory")
            }
            Self::Lifecycle { .. } => Some("Run: medisketch install"),
            _ => None,
        }
    }
}
