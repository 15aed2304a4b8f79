//! Install/activate lifecycle of cache generations
//!
//! A new build installs its own generation and warms it with the precache
//! manifest, then waits. Activation deletes every other generation and
//! claims running clients, so exactly one generation is left.

use crate::cache::store::{CacheHandle, CacheStore, StoredResponse};
use crate::config::schema::CacheConfig;
use crate::error::{MediError, MediResult};
use crate::fetch::{FetchInterceptor, Runtime};
use crate::origin::Network;
use crate::request::RequestKey;
use futures_util::future::join_all;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lifecycle state of the current build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Nothing installed yet for this build
    Parsed,
    /// Warming the new generation
    Installing,
    /// Installed; an older generation still controls clients
    Waiting,
    /// Controls clients; older generations are gone
    Active,
    /// Install failed; the build will never activate
    Redundant,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsed => write!(f, "parsed"),
            Self::Installing => write!(f, "installing"),
            Self::Waiting => write!(f, "waiting"),
            Self::Active => write!(f, "active"),
            Self::Redundant => write!(f, "redundant"),
        }
    }
}

/// Outcome of an install
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub tag: String,
    /// Assets now in the cache
    pub cached: Vec<RequestKey>,
    /// Assets left out, with the reason
    pub skipped: Vec<(RequestKey, String)>,
}

/// Outcome of an activation
#[derive(Debug, Clone, Default)]
pub struct ActivationReport {
    pub tag: String,
    /// Superseded generations that were deleted
    pub deleted: Vec<String>,
}

/// Drives one build's generation through install and activation
pub struct LifecycleController {
    store: Arc<CacheStore>,
    runtime: Arc<Runtime>,
    network: Arc<dyn Network>,
    settings: CacheConfig,
    state: LifecycleState,
    generation: Option<CacheHandle>,
}

impl LifecycleController {
    /// Create a controller for the build described by `settings`
    pub fn new(store: Arc<CacheStore>, runtime: Arc<Runtime>, settings: &CacheConfig) -> Self {
        let network = runtime.network();
        Self {
            store,
            runtime,
            network,
            settings: settings.clone(),
            state: LifecycleState::Parsed,
            generation: None,
        }
    }

    /// Current state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Generation tag of this build
    pub fn tag(&self) -> String {
        self.settings.generation_tag()
    }

    fn transition_error(&self, action: &str) -> MediError {
        MediError::Lifecycle {
            action: action.to_string(),
            state: self.state.to_string(),
        }
    }

    /// Pick up where a previous process left off
    ///
    /// An existing generation for this build is active when it is the only
    /// one, and waiting otherwise; in the waiting case the oldest other
    /// generation keeps controlling clients.
    pub async fn restore(&mut self) -> MediResult<LifecycleState> {
        let tag = self.tag();
        if self.state != LifecycleState::Parsed || !self.store.has_generation(&tag).await {
            return Ok(self.state);
        }

        let generations = self.store.generations_by_age().await?;
        let generation = self.store.open(&tag).await?;
        self.generation = Some(generation.clone());

        match generations.iter().find(|t| **t != tag) {
            None => {
                self.runtime.claim(Arc::new(self.interceptor_for(generation))).await;
                self.state = LifecycleState::Active;
            }
            Some(previous) => {
                let previous = self.store.open(previous).await?;
                self.runtime.claim(Arc::new(self.interceptor_for(previous))).await;
                self.state = LifecycleState::Waiting;
            }
        }

        debug!("Restored generation {} as {}", tag, self.state);
        Ok(self.state)
    }

    /// Open this build's generation and warm it with the precache manifest
    ///
    /// Best effort: assets that fail to fetch are skipped and will be
    /// fetched from the network on first use.
    pub async fn install(&mut self) -> MediResult<InstallReport> {
        if !matches!(self.state, LifecycleState::Parsed | LifecycleState::Redundant) {
            return Err(self.transition_error("install"));
        }

        let tag = self.tag();
        info!("Installing generation {}", tag);
        self.state = LifecycleState::Installing;

        let generation = match self.store.open(&tag).await {
            Ok(generation) => generation,
            Err(e) => {
                self.state = LifecycleState::Redundant;
                return Err(e);
            }
        };

        let keys: Vec<RequestKey> = self
            .settings
            .precache
            .iter()
            .map(|asset| RequestKey::new(asset))
            .collect();

        let network = self.network.clone();
        let fetches = keys.into_iter().map(|key| {
            let network = network.clone();
            async move {
                let result = network.fetch(&key).await;
                (key, result)
            }
        });

        let mut report = InstallReport {
            tag: tag.clone(),
            ..Default::default()
        };

        for (key, result) in join_all(fetches).await {
            let response = match result {
                Ok(response) if response.status == 200 => response,
                Ok(response) => {
                    warn!("Precache of {} returned HTTP {}", key, response.status);
                    report.skipped.push((key, format!("HTTP {}", response.status)));
                    continue;
                }
                Err(e) => {
                    warn!("Precache of {} failed: {}", key, e);
                    report.skipped.push((key, e.to_string()));
                    continue;
                }
            };

            let stored =
                StoredResponse::new(key.clone(), response.status, response.content_type, response.body);
            match self.store.put(&generation, &stored).await {
                Ok(()) => report.cached.push(key),
                Err(e) => {
                    warn!("Storing precached {} failed: {}", key, e);
                    report.skipped.push((key, e.to_string()));
                }
            }
        }

        self.generation = Some(generation);
        self.state = LifecycleState::Waiting;
        info!(
            "Installed {}: {} cached, {} skipped",
            tag,
            report.cached.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Take over immediately instead of waiting for older clients to go away
    pub async fn skip_waiting(&mut self) -> MediResult<ActivationReport> {
        debug!("Skip-waiting requested for {}", self.tag());
        self.activate().await
    }

    /// Delete superseded generations and claim clients
    pub async fn activate(&mut self) -> MediResult<ActivationReport> {
        let generation = match (&self.state, &self.generation) {
            (LifecycleState::Waiting, Some(generation)) => generation.clone(),
            _ => return Err(self.transition_error("activate")),
        };

        let tag = generation.tag().to_string();
        info!("Activating generation {}", tag);

        let mut report = ActivationReport {
            tag: tag.clone(),
            ..Default::default()
        };

        for old in self.store.list_generations().await? {
            if old != tag {
                info!("Deleting old cache generation {}", old);
                if self.store.delete(&old).await? {
                    report.deleted.push(old);
                }
            }
        }

        self.runtime.claim(Arc::new(self.interceptor_for(generation))).await;
        self.state = LifecycleState::Active;
        Ok(report)
    }

    fn interceptor_for(&self, generation: CacheHandle) -> FetchInterceptor {
        FetchInterceptor::new(self.store.clone(), generation, self.network.clone())
            .with_offline_fallback(RequestKey::new(&self.settings.offline_fallback))
            .with_runtime_prefixes(self.settings.runtime_prefixes.clone())
    }
}
