//! Cache API Implementation
//!
//! Named cache partitions keyed by request URL, plus the `CacheStore` seam the
//! worker talks to. `MemoryCacheStorage` is the in-process store used by hosts
//! without persistent storage and by the tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use spin::RwLock;
use thiserror::Error;

use super::fetch::{Request, Response};

/// Default quota across all partitions (50 MB).
pub const DEFAULT_QUOTA: usize = 50 * 1024 * 1024;

/// Cache error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Partition does not exist
    #[error("cache partition not found: {0}")]
    NotFound(String),
    /// Writing would exceed the storage quota
    #[error("cache quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },
    /// Backend failure
    #[error("cache storage error: {0}")]
    Storage(String),
}

/// A cached request-response pair
#[derive(Debug, Clone)]
struct CacheEntry {
    request: Request,
    response: Response,
    size: usize,
}

impl CacheEntry {
    fn new(request: Request, response: Response) -> Self {
        let size = request.url.len() + response.size();
        Self {
            request,
            response,
            size,
        }
    }
}

/// One named cache partition
#[derive(Debug, Clone)]
pub struct Cache {
    /// Partition name
    name: String,
    /// URL -> entry
    entries: BTreeMap<String, CacheEntry>,
    /// Total size in bytes
    total_size: usize,
}

impl Cache {
    /// Create an empty partition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
            total_size: 0,
        }
    }

    /// Get partition name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a response by exact URL
    pub fn match_url(&self, url: &str) -> Option<&Response> {
        self.entries.get(url).map(|e| &e.response)
    }

    /// Store a request/response pair, replacing any entry for the same URL
    pub fn put(&mut self, request: Request, response: Response) {
        let key = request.url.clone();
        let entry = CacheEntry::new(request, response);
        let size = entry.size;

        if let Some(old) = self.entries.insert(key, entry) {
            self.total_size -= old.size;
        }
        self.total_size += size;
    }

    /// Delete an entry by URL
    pub fn delete(&mut self, url: &str) -> bool {
        if let Some(entry) = self.entries.remove(url) {
            self.total_size -= entry.size;
            true
        } else {
            false
        }
    }

    /// Cached URLs, sorted
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    /// Cached requests
    pub fn requests(&self) -> impl Iterator<Item = &Request> {
        self.entries.values().map(|e| &e.request)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this partition is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total size of entries
    pub fn size(&self) -> usize {
        self.total_size
    }

    /// Size `entries` would add once stored, accounting for replaced URLs
    fn growth(&self, entries: &[(Request, Response)]) -> isize {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for (request, response) in entries {
            seen.insert(&request.url, request.url.len() + response.size());
        }
        seen.iter()
            .map(|(url, size)| {
                let old = self.entries.get(*url).map(|e| e.size).unwrap_or(0);
                *size as isize - old as isize
            })
            .sum()
    }
}

/// Origin-scoped storage of named partitions.
///
/// Implementations serialize their own operations; callers never hold a
/// partition across an await point.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Open a partition, creating it if absent
    async fn open(&self, name: &str) -> Result<(), CacheError>;

    /// Store every pair into an opened partition, or none of them
    async fn put_all(&self, name: &str, entries: Vec<(Request, Response)>)
        -> Result<(), CacheError>;

    /// Names of all partitions, in creation order
    async fn keys(&self) -> Result<Vec<String>, CacheError>;

    /// Delete a partition; `false` if it did not exist
    async fn delete(&self, name: &str) -> Result<bool, CacheError>;

    /// Find a response for the exact request URL across all partitions
    async fn match_request(&self, request: &Request) -> Result<Option<Response>, CacheError>;
}

/// In-memory cache storage
pub struct MemoryCacheStorage {
    /// Partitions in creation order
    caches: RwLock<Vec<Cache>>,
    /// Quota (bytes)
    quota: usize,
}

impl MemoryCacheStorage {
    /// Create an empty storage with the default quota
    pub fn new() -> Self {
        Self::with_quota(DEFAULT_QUOTA)
    }

    /// Create an empty storage with a custom quota
    pub fn with_quota(quota: usize) -> Self {
        Self {
            caches: RwLock::new(Vec::new()),
            quota,
        }
    }

    /// Snapshot of a partition
    pub fn cache(&self, name: &str) -> Option<Cache> {
        self.caches.read().iter().find(|c| c.name == name).cloned()
    }

    /// Check if a partition exists
    pub fn has(&self, name: &str) -> bool {
        self.caches.read().iter().any(|c| c.name == name)
    }

    /// Names of all partitions
    pub fn names(&self) -> Vec<String> {
        self.caches.read().iter().map(|c| c.name.clone()).collect()
    }

    /// Bytes used across all partitions
    pub fn usage(&self) -> usize {
        self.caches.read().iter().map(|c| c.size()).sum()
    }

    /// Get quota
    pub fn quota(&self) -> usize {
        self.quota
    }
}

impl Default for MemoryCacheStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<(), CacheError> {
        let mut caches = self.caches.write();
        if !caches.iter().any(|c| c.name == name) {
            caches.push(Cache::new(name));
        }
        Ok(())
    }

    async fn put_all(
        &self,
        name: &str,
        entries: Vec<(Request, Response)>,
    ) -> Result<(), CacheError> {
        let mut caches = self.caches.write();
        let usage: usize = caches.iter().map(|c| c.size()).sum();
        let cache = caches
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| CacheError::NotFound(name.to_string()))?;

        let growth = cache.growth(&entries);
        let available = self.quota.saturating_sub(usage);
        if growth > 0 && growth as usize > available {
            return Err(CacheError::QuotaExceeded {
                needed: growth as usize,
                available,
            });
        }

        for (request, response) in entries {
            cache.put(request, response);
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.names())
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        let mut caches = self.caches.write();
        let before = caches.len();
        caches.retain(|c| c.name != name);
        Ok(caches.len() != before)
    }

    async fn match_request(&self, request: &Request) -> Result<Option<Response>, CacheError> {
        Ok(self
            .caches
            .read()
            .iter()
            .find_map(|c| c.match_url(&request.url).cloned()))
    }
}
