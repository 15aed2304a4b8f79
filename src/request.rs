//! Request identity and the request/response values routed by the runtime

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Canonical identity of a requested resource: its path.
///
/// Query strings and fragments are dropped, scheme and host are dropped
/// for absolute URLs, and the path always starts with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestKey(String);

impl RequestKey {
    /// Normalise a raw path or URL into a request key
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        let path = match raw.find("://") {
            Some(pos) => {
                let after_scheme = &raw[pos + 3..];
                after_scheme
                    .find('/')
                    .map(|slash| &after_scheme[slash..])
                    .unwrap_or("/")
            }
            None => raw,
        };

        let end = path.find(['?', '#']).unwrap_or(path.len());
        let path = &path[..end];

        if path.starts_with('/') {
            Self(path.to_string())
        } else {
            Self(format!("/{}", path))
        }
    }

    /// The key as a path string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key falls under a path prefix
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Filesystem-safe name derived from the key (SHA256, first 16 hex chars)
    pub fn storage_name(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        let digest = hasher.finalize();
        hex::encode(&digest[..8])
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// What the requester intends to do with the response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Top-level navigation
    Document,
    Script,
    Style,
    Image,
    /// Data JSON fetched by the app itself
    Data,
    Other,
}

impl Destination {
    /// Whether this is a top-level navigation
    pub fn is_document(&self) -> bool {
        matches!(self, Self::Document)
    }

    /// Guess a sub-resource destination from the key's extension
    pub fn infer(key: &RequestKey) -> Self {
        let extension = key
            .as_str()
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "js" | "mjs" => Self::Script,
            "css" => Self::Style,
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "ico" => Self::Image,
            "json" => Self::Data,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Document => "document",
            Self::Script => "script",
            Self::Style => "style",
            Self::Image => "image",
            Self::Data => "data",
            Self::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// An outgoing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub key: RequestKey,
    pub destination: Destination,
}

impl Request {
    /// A top-level navigation request
    pub fn document(key: impl Into<RequestKey>) -> Self {
        Self {
            key: key.into(),
            destination: Destination::Document,
        }
    }

    /// A data sub-resource request
    pub fn data(key: impl Into<RequestKey>) -> Self {
        Self {
            key: key.into(),
            destination: Destination::Data,
        }
    }

    /// A sub-resource request, destination taken from the extension
    pub fn subresource(key: impl Into<RequestKey>) -> Self {
        let key = key.into();
        let destination = Destination::infer(&key);
        Self { key, destination }
    }
}

/// Where a response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Cache,
    Network,
    /// Cached root document served because the network failed
    OfflineFallback,
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache => write!(f, "cache"),
            Self::Network => write!(f, "network"),
            Self::OfflineFallback => write!(f, "offline-fallback"),
        }
    }
}

/// A response handed back to the requester
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub source: ResponseSource,
}

impl Response {
    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
