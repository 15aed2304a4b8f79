//! Network abstraction
//!
//! Anything that can turn a request key into a response is a `Network`:
//! an HTTP server, a local build directory, or nothing at all when offline.

use crate::error::{MediError, MediResult};
use crate::request::{RequestKey, Response, ResponseSource};
use async_trait::async_trait;

/// A raw response from the origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl NetworkResponse {
    /// Build a 200 response
    pub fn ok(content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    /// Build an empty response with a status
    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: vec![],
        }
    }

    /// Convert into a response that came over the network
    pub fn into_response(self) -> Response {
        Response {
            status: self.status,
            content_type: self.content_type,
            body: self.body,
            source: ResponseSource::Network,
        }
    }
}

/// Origin interface
///
/// Returns `Err(NetworkFailure)` only when no response could be obtained;
/// HTTP error statuses are ordinary responses.
#[async_trait]
pub trait Network: Send + Sync {
    /// Fetch a resource
    async fn fetch(&self, key: &RequestKey) -> MediResult<NetworkResponse>;

    /// Human-readable origin description for display
    fn describe(&self) -> String;
}

/// Network with no connectivity: every fetch fails
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineOrigin;

#[async_trait]
impl Network for OfflineOrigin {
    async fn fetch(&self, key: &RequestKey) -> MediResult<NetworkResponse> {
        Err(MediError::network(key.as_str(), "offline"))
    }

    fn describe(&self) -> String {
        "offline".to_string()
    }
}

/// Guess a content type from a path's extension
pub fn content_type_for(key: &RequestKey) -> Option<&'static str> {
    let path = key.as_str();
    if path.ends_with('/') {
        return Some("text/html");
    }

    let ext = path.rsplit_once('.').map(|(_, ext)| ext)?;
    match ext {
        "html" => Some("text/html"),
        "json" => Some("application/json"),
        "js" => Some("text/javascript"),
        "css" => Some("text/css"),
        "svg" => Some("image/svg+xml"),
        "png" => Some("image/png"),
        "webmanifest" => Some("application/manifest+json"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_always_fails() {
        let err = OfflineOrigin
            .fetch(&RequestKey::new("/index.html"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediError::NetworkFailure { .. }));
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_for(&RequestKey::new("/")), Some("text/html"));
        assert_eq!(
            content_type_for(&RequestKey::new("/data/PCEM1/Anatomie/lectures.json")),
            Some("application/json")
        );
        assert_eq!(content_type_for(&RequestKey::new("/favicon")), None);
    }

    #[test]
    fn network_response_into_response() {
        let response = NetworkResponse::ok(Some("text/html"), "<html></html>").into_response();
        assert_eq!(response.source, ResponseSource::Network);
        assert!(response.is_success());
        assert!(!NetworkResponse::status(404).into_response().is_success());
    }
}
