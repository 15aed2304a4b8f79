//! Turns content addresses into typed documents
//!
//! Every fetch goes through the shared runtime, so documents are served
//! from cache whenever the active generation holds them. A fetch that
//! outlives its timeout is abandoned, not cancelled: it keeps running in
//! the background and may still populate the cache.

use crate::content::address::{ContentAddress, ContentKind, ContentRequest, DEFAULT_DATA_ROOT};
use crate::content::document::{ContentDocument, ContentIndex};
use crate::error::{MediError, MediResult};
use crate::fetch::Runtime;
use crate::request::{Request, RequestKey, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default bound on a single content fetch
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Loads lectures, quizzes and exams for the views
pub struct ContentResolver {
    runtime: Arc<Runtime>,
    data_root: String,
    timeout: Duration,
}

impl ContentResolver {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self {
            runtime,
            data_root: DEFAULT_DATA_ROOT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the default fetch timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the path prefix content lives under
    pub fn with_data_root(mut self, data_root: impl Into<String>) -> Self {
        self.data_root = data_root.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Request key an address resolves to
    pub fn request_key(&self, address: &ContentAddress) -> RequestKey {
        address.request_key_under(&self.data_root)
    }

    /// Load a document with the default timeout
    pub async fn load_content(&self, request: &ContentRequest) -> MediResult<ContentDocument> {
        self.load_content_with_timeout(request, self.timeout).await
    }

    /// Load a document, failing with `Timeout` once `timeout` elapses
    ///
    /// Embedded documents are returned as-is without touching the network.
    pub async fn load_content_with_timeout(
        &self,
        request: &ContentRequest,
        timeout: Duration,
    ) -> MediResult<ContentDocument> {
        let address = match request {
            ContentRequest::Embedded(document) => {
                debug!("Using embedded {} {}", document.kind(), document.id());
                return Ok(document.clone());
            }
            ContentRequest::File(address) => address,
        };

        let key = self.request_key(address);
        let response = self.fetch_bounded(&key, timeout).await?;
        if !response.is_success() {
            return Err(MediError::NotFound {
                key: key.to_string(),
                status: response.status,
            });
        }

        ContentDocument::decode(address.kind, &key, &response.body)
    }

    /// List a subject's content of one kind
    ///
    /// A missing index means the subject has nothing of that kind yet and
    /// yields an empty list. Every other failure is returned.
    pub async fn list_content(
        &self,
        year_id: &str,
        subject_id: &str,
        kind: ContentKind,
    ) -> MediResult<ContentIndex> {
        let address = ContentAddress::index(year_id, subject_id, kind)?;
        let key = self.request_key(&address);
        let response = self.fetch_bounded(&key, self.timeout).await?;

        if !response.is_success() {
            debug!("No {} index at {} (HTTP {})", kind, key, response.status);
            return Ok(ContentIndex::empty(kind));
        }

        ContentIndex::decode(kind, &key, &response.body)
    }

    /// Prefer items already bundled with the view, listing from the origin
    /// only when there are none
    pub async fn list_content_or_embedded(
        &self,
        embedded: ContentIndex,
        year_id: &str,
        subject_id: &str,
    ) -> MediResult<ContentIndex> {
        if !embedded.is_empty() {
            return Ok(embedded);
        }
        self.list_content(year_id, subject_id, embedded.kind()).await
    }

    async fn fetch_bounded(&self, key: &RequestKey, timeout: Duration) -> MediResult<Response> {
        let runtime = self.runtime.clone();
        let request = Request::data(key.clone());
        let task = tokio::spawn(async move { runtime.fetch(&request).await });

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(MediError::Internal(format!("fetch task for {} failed: {}", key, e))),
            Err(_) => {
                let timeout_ms = saturating_millis(timeout);
                warn!("Fetch of {} exceeded {}ms", key, timeout_ms);
                Err(MediError::Timeout {
                    key: key.to_string(),
                    timeout_ms,
                })
            }
        }
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
