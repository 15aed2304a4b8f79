//! Request routing between the cache and the origin
//!
//! Policy, in order:
//! 1. Cache hit: serve it. No network, no freshness check. The
//!    interceptor's own generation is searched before any other.
//! 2. Navigation miss: fetch, write a 200 through to the cache. When the
//!    network fails, serve the cached offline fallback document.
//! 3. Sub-resource miss: pass through to the origin without caching,
//!    unless the key falls under a configured runtime-cache prefix.
//!
//! Concurrent misses for one key are not deduplicated; the last write wins.

use crate::cache::{CacheHandle, CacheStore, StoredResponse};
use crate::error::MediResult;
use crate::origin::{Network, NetworkResponse};
use crate::request::{Request, RequestKey, Response, ResponseSource};
use std::sync::Arc;
use tracing::{debug, warn};

/// Routes requests for one active cache generation
pub struct FetchInterceptor {
    store: Arc<CacheStore>,
    generation: CacheHandle,
    network: Arc<dyn Network>,
    offline_fallback: RequestKey,
    runtime_prefixes: Vec<String>,
}

impl FetchInterceptor {
    /// Create an interceptor writing into `generation`
    pub fn new(store: Arc<CacheStore>, generation: CacheHandle, network: Arc<dyn Network>) -> Self {
        Self {
            store,
            generation,
            network,
            offline_fallback: RequestKey::new("/index.html"),
            runtime_prefixes: vec![],
        }
    }

    /// Set the document served to navigations when offline
    pub fn with_offline_fallback(mut self, key: RequestKey) -> Self {
        self.offline_fallback = key;
        self
    }

    /// Set sub-resource prefixes that are written through like documents
    pub fn with_runtime_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.runtime_prefixes = prefixes;
        self
    }

    /// Tag of the generation this interceptor writes into
    pub fn generation_tag(&self) -> &str {
        self.generation.tag()
    }

    /// Route one request
    pub async fn intercept(&self, request: &Request) -> MediResult<Response> {
        if let Some(stored) = self.store.match_in(&self.generation, &request.key).await {
            debug!("Serving from cache: {}", request.key);
            return Ok(stored.into_response(ResponseSource::Cache));
        }

        if request.destination.is_document() {
            return self.navigate(&request.key).await;
        }

        let response = self.network.fetch(&request.key).await?;
        if self.is_runtime_cached(&request.key) {
            self.write_through(&request.key, &response).await;
        }
        Ok(response.into_response())
    }

    async fn navigate(&self, key: &RequestKey) -> MediResult<Response> {
        match self.network.fetch(key).await {
            Ok(response) => {
                self.write_through(key, &response).await;
                Ok(response.into_response())
            }
            Err(err) => {
                warn!("Navigation to {} failed: {}", key, err);
                match self.store.match_in(&self.generation, &self.offline_fallback).await {
                    Some(stored) => {
                        debug!("Serving offline fallback {} for {}", self.offline_fallback, key);
                        Ok(stored.into_response(ResponseSource::OfflineFallback))
                    }
                    None => Err(err),
                }
            }
        }
    }

    fn is_runtime_cached(&self, key: &RequestKey) -> bool {
        self.runtime_prefixes
            .iter()
            .any(|prefix| key.has_prefix(prefix))
    }

    /// Store a copy of a 200 response; storage failures are logged, not raised
    async fn write_through(&self, key: &RequestKey, response: &NetworkResponse) {
        if response.status != 200 {
            return;
        }

        let stored = StoredResponse::new(
            key.clone(),
            response.status,
            response.content_type.clone(),
            response.body.clone(),
        );
        if let Err(e) = self.store.put(&self.generation, &stored).await {
            warn!("Failed to cache {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediError;
    use crate::origin::mock::MockNetwork;
    use tempfile::TempDir;

    async fn setup(network: Arc<MockNetwork>) -> (FetchInterceptor, Arc<CacheStore>, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(CacheStore::new(temp.path()));
        let generation = store.open("medisketch-v1").await.unwrap();
        let interceptor = FetchInterceptor::new(store.clone(), generation, network);
        (interceptor, store, temp)
    }

    #[tokio::test]
    async fn hit_skips_network() {
        let network = Arc::new(MockNetwork::new().with("/index.html", "<html>v1</html>"));
        let (interceptor, _store, _temp) = setup(network.clone()).await;

        let first = interceptor.intercept(&Request::document("/index.html")).await.unwrap();
        assert_eq!(first.source, ResponseSource::Network);

        let second = interceptor.intercept(&Request::document("/index.html")).await.unwrap();
        assert_eq!(second.source, ResponseSource::Cache);
        assert_eq!(second.body, b"<html>v1</html>".to_vec());
        assert_eq!(network.calls(), 1);
    }

    #[tokio::test]
    async fn hit_is_served_even_when_origin_changed() {
        let network = Arc::new(MockNetwork::new().with("/", "old"));
        let (interceptor, _store, _temp) = setup(network.clone()).await;

        interceptor.intercept(&Request::document("/")).await.unwrap();
        network.set("/", NetworkResponse::ok(None, "new"));

        let response = interceptor.intercept(&Request::document("/")).await.unwrap();
        assert_eq!(response.body, b"old".to_vec());
    }

    #[tokio::test]
    async fn own_generation_wins_over_newer_install() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(CacheStore::new(temp.path()));
        let v9 = store.open("medisketch-v9").await.unwrap();
        let v10 = store.open("medisketch-v10").await.unwrap();
        for (handle, body) in [(&v9, "v9 shell"), (&v10, "v10 shell")] {
            let stored = StoredResponse::new(
                RequestKey::new("/index.html"),
                200,
                None,
                body.as_bytes().to_vec(),
            );
            store.put(handle, &stored).await.unwrap();
        }

        let network = Arc::new(MockNetwork::new());
        let interceptor = FetchInterceptor::new(store.clone(), v9, network.clone());

        let response = interceptor.intercept(&Request::document("/index.html")).await.unwrap();
        assert_eq!(response.body, b"v9 shell".to_vec());

        network.set_offline(true);
        let fallback = interceptor.intercept(&Request::document("/planner")).await.unwrap();
        assert_eq!(fallback.source, ResponseSource::OfflineFallback);
        assert_eq!(fallback.body, b"v9 shell".to_vec());
    }

    #[tokio::test]
    async fn storage_failure_still_returns_response() {
        let network = Arc::new(MockNetwork::new().with("/index.html", "<html>shell</html>"));
        let (interceptor, store, temp) = setup(network.clone()).await;
        std::fs::remove_dir_all(temp.path().join("medisketch-v1")).unwrap();

        let response = interceptor.intercept(&Request::document("/index.html")).await.unwrap();

        assert_eq!(response.source, ResponseSource::Network);
        assert_eq!(response.body, b"<html>shell</html>".to_vec());
        assert!(store.match_request(&RequestKey::new("/index.html")).await.is_none());
        assert!(!store.has_generation("medisketch-v1").await);
    }

    #[tokio::test]
    async fn navigation_non_200_is_not_cached() {
        let network = Arc::new(MockNetwork::new());
        let (interceptor, store, _temp) = setup(network).await;

        let response = interceptor.intercept(&Request::document("/missing")).await.unwrap();
        assert_eq!(response.status, 404);
        assert!(store.match_request(&RequestKey::new("/missing")).await.is_none());
    }

    #[tokio::test]
    async fn offline_navigation_serves_cached_root() {
        let network = Arc::new(MockNetwork::new().with("/index.html", "<html>shell</html>"));
        let (interceptor, _store, _temp) = setup(network.clone()).await;
        interceptor.intercept(&Request::document("/index.html")).await.unwrap();

        network.set_offline(true);
        let response = interceptor
            .intercept(&Request::document("/planner"))
            .await
            .unwrap();

        assert_eq!(response.source, ResponseSource::OfflineFallback);
        assert_eq!(response.body, b"<html>shell</html>".to_vec());
    }

    #[tokio::test]
    async fn offline_navigation_without_fallback_fails() {
        let network = Arc::new(MockNetwork::new());
        network.set_offline(true);
        let (interceptor, _store, _temp) = setup(network).await;

        let err = interceptor
            .intercept(&Request::document("/planner"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediError::NetworkFailure { .. }));
    }

    #[tokio::test]
    async fn sub_resources_are_never_cached() {
        let network = Arc::new(
            MockNetwork::new().with("/data/DCEM2/Cardiologie/hta.json", r#"{"id":"hta"}"#),
        );
        let (interceptor, store, _temp) = setup(network.clone()).await;
        let request = Request::data("/data/DCEM2/Cardiologie/hta.json");

        interceptor.intercept(&request).await.unwrap();
        interceptor.intercept(&request).await.unwrap();

        assert_eq!(network.calls(), 2);
        assert_eq!(store.generation_stats("medisketch-v1").await.unwrap().entries, 0);
    }

    #[tokio::test]
    async fn sub_resource_network_failure_propagates() {
        let network = Arc::new(MockNetwork::new());
        network.set_offline(true);
        let (interceptor, _store, _temp) = setup(network).await;

        let result = interceptor.intercept(&Request::data("/data/a/b/quizzes.json")).await;
        assert!(matches!(result, Err(MediError::NetworkFailure { .. })));
    }

    #[tokio::test]
    async fn runtime_prefix_writes_through() {
        let network = Arc::new(
            MockNetwork::new().with("/data/DCEM2/Cardiologie/hta.json", r#"{"id":"hta"}"#),
        );
        let (interceptor, store, _temp) = setup(network.clone()).await;
        let interceptor = interceptor.with_runtime_prefixes(vec!["/data/".to_string()]);
        let request = Request::data("/data/DCEM2/Cardiologie/hta.json");

        interceptor.intercept(&request).await.unwrap();
        network.set_offline(true);
        let cached = interceptor.intercept(&request).await.unwrap();

        assert_eq!(cached.source, ResponseSource::Cache);
        assert_eq!(network.calls(), 1);
        assert_eq!(store.generation_stats("medisketch-v1").await.unwrap().entries, 1);
    }
}
