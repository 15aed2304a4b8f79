//! Client-side routing point
//!
//! Every content request goes through the runtime. While an interceptor is
//! active (claimed on activation) requests transit it; otherwise they go
//! straight to the origin.

use crate::error::MediResult;
use crate::fetch::interceptor::FetchInterceptor;
use crate::origin::Network;
use crate::request::{Request, Response};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Shared routing state for all clients of one process
pub struct Runtime {
    network: Arc<dyn Network>,
    controller: RwLock<Option<Arc<FetchInterceptor>>>,
}

impl Runtime {
    /// Create an uncontrolled runtime
    pub fn new(network: Arc<dyn Network>) -> Self {
        Self {
            network,
            controller: RwLock::new(None),
        }
    }

    /// The origin requests fall through to
    pub fn network(&self) -> Arc<dyn Network> {
        self.network.clone()
    }

    /// Route all subsequent requests through `interceptor`
    pub async fn claim(&self, interceptor: Arc<FetchInterceptor>) {
        info!(
            "Clients now controlled by generation {}",
            interceptor.generation_tag()
        );
        *self.controller.write().await = Some(interceptor);
    }

    /// Tag of the controlling generation, if any
    pub async fn controller_tag(&self) -> Option<String> {
        self.controller
            .read()
            .await
            .as_ref()
            .map(|i| i.generation_tag().to_string())
    }

    /// Issue a request
    pub async fn fetch(&self, request: &Request) -> MediResult<Response> {
        let controller = self.controller.read().await.clone();

        match controller {
            Some(interceptor) => interceptor.intercept(request).await,
            None => {
                debug!("Uncontrolled fetch: {}", request.key);
                Ok(self.network.fetch(&request.key).await?.into_response())
            }
        }
    }
}
