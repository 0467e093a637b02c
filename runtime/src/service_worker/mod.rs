//! Service Worker Module
//!
//! The offline cache manager for the FoodFest PWA. It keeps exactly one live
//! generation of precached static assets and answers intercepted fetches from
//! it, going to the network only on a miss.
//!
//! The manager holds no lifecycle state of its own. Everything it needs lives
//! in the host's [`CacheStore`], keyed by the current [`CacheGeneration`]; the
//! host (see [`WorkerHost`]) decides when each handler runs and awaits it to
//! completion.

mod cache;
mod config;
mod events;
mod fetch;
mod lifecycle;

pub use cache::*;
pub use config::*;
pub use events::*;
pub use fetch::*;
pub use lifecycle::*;

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use thiserror::Error;

/// Service Worker error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceWorkerError {
    /// A manifest asset could not be fetched during install
    #[error("install failed: could not fetch {url}: {source}")]
    InstallFetch { url: String, source: NetworkError },
    /// A manifest asset answered with a non-2xx status during install
    #[error("install failed: {url} returned status {status}")]
    InstallStatus { url: String, status: u16 },
    /// Cache storage failure
    #[error(transparent)]
    Cache(#[from] CacheError),
    /// Live network failure, passed through unchanged
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// State transition invalid
    #[error("invalid state transition from {from:?} to {to:?}")]
    InvalidStateTransition {
        from: ServiceWorkerState,
        to: ServiceWorkerState,
    },
}

/// Handlers for the three host-delivered lifecycle events.
///
/// The host awaits each call to completion before considering the phase done.
#[async_trait]
pub trait LifecycleHandler: Send + Sync {
    /// Handle the install event
    async fn on_install(&self, event: &mut InstallEvent) -> Result<(), ServiceWorkerError>;

    /// Handle the activate event
    async fn on_activate(&self, event: &mut ActivateEvent) -> Result<(), ServiceWorkerError>;

    /// Handle an intercepted fetch; responds through the event
    async fn on_fetch(&self, event: &mut FetchEvent);
}

/// Offline cache manager
pub struct OfflineCacheManager {
    /// Deployment configuration
    config: CacheConfig,
    /// Current generation, derived once from the config
    generation: CacheGeneration,
    /// Host cache storage
    store: Arc<dyn CacheStore>,
    /// Live network
    network: Arc<dyn Network>,
}

impl OfflineCacheManager {
    /// Create a manager
    pub fn new(config: CacheConfig, store: Arc<dyn CacheStore>, network: Arc<dyn Network>) -> Self {
        let generation = config.generation();
        Self {
            config,
            generation,
            store,
            network,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get the current generation
    pub fn generation(&self) -> &CacheGeneration {
        &self.generation
    }

    /// Partitions activation deletes: owned by this app and not current.
    pub fn stale_partitions<'a>(&self, keys: &'a [String]) -> Vec<&'a str> {
        keys.iter()
            .map(String::as_str)
            .filter(|key| self.config.owns(key) && *key != self.generation.as_str())
            .collect()
    }

    /// Fetch one manifest asset for precaching
    async fn precache(&self, url: &str) -> Result<(Request, Response), ServiceWorkerError> {
        let request = Request::new(url);
        let response =
            self.network
                .fetch(&request)
                .await
                .map_err(|source| ServiceWorkerError::InstallFetch {
                    url: url.to_string(),
                    source,
                })?;

        if !response.ok() {
            return Err(ServiceWorkerError::InstallStatus {
                url: url.to_string(),
                status: response.status,
            });
        }
        Ok((request, response))
    }

    /// Cache-first lookup with network passthrough on a miss
    async fn respond(&self, request: &Request) -> FetchResult {
        if let Some(cached) = self.store.match_request(request).await? {
            log::debug!("[FoodFest SW] responding with cache: {}", request.url);
            return Ok(cached);
        }

        log::debug!("[FoodFest SW] file is not cached, fetching: {}", request.url);
        self.network.fetch(request).await.map_err(|err| {
            log::warn!("[FoodFest SW] fetch failed for {}: {}", request.url, err);
            ServiceWorkerError::from(err)
        })
    }
}

#[async_trait]
impl LifecycleHandler for OfflineCacheManager {
    async fn on_install(&self, event: &mut InstallEvent) -> Result<(), ServiceWorkerError> {
        event.wait_until();

        let name = self.generation.as_str();
        self.store.open(name).await?;
        log::info!("[FoodFest SW] installing cache: {}", name);

        // Nothing is written until every asset has arrived.
        let entries = try_join_all(self.config.manifest.iter().map(|url| self.precache(url))).await?;
        let count = entries.len();
        self.store.put_all(name, entries).await?;

        log::info!("[FoodFest SW] installed {} assets into {}", count, name);
        Ok(())
    }

    async fn on_activate(&self, event: &mut ActivateEvent) -> Result<(), ServiceWorkerError> {
        event.wait_until();

        let keys = self.store.keys().await?;
        let stale = self.stale_partitions(&keys);

        try_join_all(stale.into_iter().map(|key| async move {
            log::info!("[FoodFest SW] deleting cache: {}", key);
            self.store.delete(key).await
        }))
        .await?;

        log::info!("[FoodFest SW] activated {}", self.generation);
        Ok(())
    }

    async fn on_fetch(&self, event: &mut FetchEvent) {
        log::debug!("[FoodFest SW] fetch request: {}", event.request().url);
        let request = event.request().clone();
        let result = self.respond(&request).await;
        event.respond_with(result);
    }
}
