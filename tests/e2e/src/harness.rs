//! Test harness for running the service worker end to end
//!
//! One [`OfflineSite`] is one browser profile: a cache store and a network
//! shared by every worker version deployed into it.

use std::sync::Arc;

use foodfest_runtime::service_worker::AssetManifest;
use foodfest_runtime::{
    CacheConfig, MemoryCacheStorage, OfflineCacheManager, ServiceWorkerError, WorkerHost,
};

use crate::fixtures::RecordingNetwork;

/// Cache store and network for one origin
pub struct OfflineSite {
    pub storage: Arc<MemoryCacheStorage>,
    pub network: Arc<RecordingNetwork>,
}

impl OfflineSite {
    /// Site whose network serves every entry of `manifest`
    pub fn serving(manifest: &AssetManifest) -> Self {
        Self {
            storage: Arc::new(MemoryCacheStorage::new()),
            network: Arc::new(RecordingNetwork::serving(manifest)),
        }
    }

    /// Configuration with the default prefix and manifest at `version`
    pub fn version(version: &str) -> CacheConfig {
        CacheConfig {
            version: version.to_string(),
            ..CacheConfig::default()
        }
    }

    /// A parsed, not yet installed worker for `config`
    pub fn worker(&self, config: CacheConfig) -> WorkerHost {
        let manager = OfflineCacheManager::new(config, self.storage.clone(), self.network.clone());
        WorkerHost::new(Arc::new(manager), self.network.clone())
    }

    /// Install then activate a worker for `config`.
    ///
    /// On failure the host is handed back with the error; it is redundant by
    /// then.
    pub async fn deploy(
        &self,
        config: CacheConfig,
    ) -> Result<WorkerHost, (WorkerHost, ServiceWorkerError)> {
        let mut host = self.worker(config);
        if let Err(err) = host.install().await {
            log::warn!("[FoodFest E2E] deploy failed during install: {}", err);
            return Err((host, err));
        }
        if let Err(err) = host.activate().await {
            log::warn!("[FoodFest E2E] deploy failed during activate: {}", err);
            return Err((host, err));
        }
        Ok(host)
    }
}
