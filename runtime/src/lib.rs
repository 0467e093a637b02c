//! FoodFest Runtime
//!
//! Offline support for the FoodFest Progressive Web App. The crate hosts the
//! service worker that owns a versioned cache of static assets and answers
//! intercepted fetches from it.
//!
//! # Architecture
//!
//! - `service_worker::config`: deployment constants (prefix, version, asset manifest)
//! - `service_worker::cache`: named cache partitions and the `CacheStore` seam
//! - `service_worker::fetch`: request/response types and the `Network` seam
//! - `service_worker::events`: install / activate / fetch event payloads
//! - `service_worker::lifecycle`: host adapter driving the worker state machine
//! - `service_worker`: the `OfflineCacheManager` itself

pub mod service_worker;

pub use service_worker::{
    CacheConfig, CacheGeneration, CacheStore, LifecycleHandler, MemoryCacheStorage, Network,
    OfflineCacheManager, Request, Response, ServiceWorkerError, WorkerHost,
};
