//! Wiring shared by the content commands
//!
//! Builds the origin, store and runtime for one invocation and restores
//! the lifecycle state a previous invocation left on disk.

use crate::cache::{CacheStore, LifecycleController};
use crate::config::{Config, ConfigManager};
use crate::content::ContentResolver;
use crate::error::MediResult;
use crate::fetch::Runtime;
use crate::origin::{create_origin, OriginKind};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Everything a content command needs
pub struct App {
    pub config: Config,
    pub store: Arc<CacheStore>,
    pub runtime: Arc<Runtime>,
    pub lifecycle: LifecycleController,
}

impl App {
    /// Assemble the layer against `origin`
    pub async fn open(config: &Config, origin: &OriginKind) -> MediResult<Self> {
        let network = create_origin(origin, &config.origin);
        debug!("Using origin {}", network.describe());

        let store = Arc::new(CacheStore::new(ConfigManager::cache_dir(config)));
        let runtime = Arc::new(Runtime::new(network));
        let mut lifecycle =
            LifecycleController::new(store.clone(), runtime.clone(), &config.cache);

        let state = lifecycle.restore().await?;
        debug!("Generation {} is {}", lifecycle.tag(), state);

        Ok(Self {
            config: config.clone(),
            store,
            runtime,
            lifecycle,
        })
    }

    /// Content resolver bound to this app's runtime
    pub fn resolver(&self) -> ContentResolver {
        ContentResolver::new(self.runtime.clone())
            .with_timeout(Duration::from_millis(self.config.content.timeout_ms))
            .with_data_root(self.config.content.data_root.clone())
    }
}
