//! In-memory origin for tests

use crate::error::{MediError, MediResult};
use crate::origin::network::{Network, NetworkResponse};
use crate::request::RequestKey;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Origin serving canned responses, counting every fetch
#[derive(Default)]
pub struct MockNetwork {
    responses: Mutex<HashMap<String, NetworkResponse>>,
    calls: AtomicUsize,
    offline: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a 200 response for a path
    pub fn with(self, path: &str, body: &str) -> Self {
        self.set(path, NetworkResponse::ok(None, body.as_bytes().to_vec()));
        self
    }

    pub fn set(&self, path: &str, response: NetworkResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(RequestKey::new(path).to_string(), response);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for MockNetwork {
    async fn fetch(&self, key: &RequestKey) -> MediResult<NetworkResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.offline.load(Ordering::SeqCst) {
            return Err(MediError::network(key.as_str(), "offline"));
        }

        let response = self.responses.lock().unwrap().get(key.as_str()).cloned();
        Ok(response.unwrap_or_else(|| NetworkResponse::status(404)))
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
