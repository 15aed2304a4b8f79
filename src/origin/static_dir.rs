//! Origin that serves a local build directory
//!
//! Mirrors how a static host serves the app's public/ folder: `/` maps to
//! `index.html`, missing files are 404, and paths never leave the root.

use crate::error::{MediError, MediResult};
use crate::origin::network::{content_type_for, Network, NetworkResponse};
use crate::request::RequestKey;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Serves files from a directory
#[derive(Debug, Clone)]
pub struct StaticOrigin {
    root: PathBuf,
}

impl StaticOrigin {
    /// Create an origin for a directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a request key to a file under the root, rejecting traversal
    fn resolve(&self, key: &RequestKey) -> Option<PathBuf> {
        let relative = key.as_str().trim_start_matches('/');
        let mut path = self.root.clone();

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }

        if key.as_str().ends_with('/') {
            path.push("index.html");
        }
        Some(path)
    }
}

#[async_trait]
impl Network for StaticOrigin {
    async fn fetch(&self, key: &RequestKey) -> MediResult<NetworkResponse> {
        if fs::metadata(&self.root).await.is_err() {
            return Err(MediError::network(
                key.as_str(),
                format!("origin directory {} is unavailable", self.root.display()),
            ));
        }

        let Some(path) = self.resolve(key) else {
            return Ok(NetworkResponse::status(403));
        };

        if fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
            return Ok(NetworkResponse::status(404));
        }

        match fs::read(&path).await {
            Ok(body) => {
                debug!("Served {} from {}", key, path.display());
                Ok(NetworkResponse::ok(content_type_for(key), body))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(NetworkResponse::status(404)),
            Err(e) => Err(MediError::network(key.as_str(), e.to_string())),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
