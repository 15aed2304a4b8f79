//! HTTP origin backed by ureq
//!
//! ureq is blocking, so each fetch runs on tokio's blocking pool.

use crate::error::{MediError, MediResult};
use crate::origin::network::{Network, NetworkResponse};
use crate::request::RequestKey;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// Fetches resources from a deployed app over HTTP
#[derive(Clone)]
pub struct HttpOrigin {
    base_url: String,
    agent: Agent,
}

impl HttpOrigin {
    /// Create an origin for a base URL
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    /// Full URL for a request key
    pub fn url_for(&self, key: &RequestKey) -> String {
        format!("{}{}", self.base_url, key)
    }
}

#[async_trait]
impl Network for HttpOrigin {
    async fn fetch(&self, key: &RequestKey) -> MediResult<NetworkResponse> {
        let url = self.url_for(key);
        let agent = self.agent.clone();
        let key_str = key.to_string();

        debug!("GET {}", url);
        let result = tokio::task::spawn_blocking(move || -> Result<NetworkResponse, String> {
            let mut response = agent.get(&url).call().map_err(|e| e.to_string())?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response
                .body_mut()
                .read_to_vec()
                .map_err(|e| e.to_string())?;

            Ok(NetworkResponse {
                status,
                content_type,
                body,
            })
        })
        .await
        .map_err(|e| MediError::Internal(format!("HTTP task failed: {}", e)))?;

        result.map_err(|reason| MediError::network(key_str, reason))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
