//! Catalog repository chain
//!
//! [`CatalogFetcher`] is the fetch-by-parameters contract shared by the HTTP
//! client and the caching decorator. [`CachedCatalog`] wraps any fetcher and
//! adds transparent response caching: callers cannot tell whether a page came
//! from the network or from the cache, and a broken cache never surfaces as
//! an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::client::FetchError;
use super::{CatalogPage, Endpoint};
use crate::cache::{cache_key, CacheStore};

/// Fetch-by-parameters capability for catalog pages
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// Fetches one catalog page.
    ///
    /// # Arguments
    /// * `endpoint` - Catalog section to query
    /// * `page` - 1-based page number
    /// * `limit` - Page size
    /// * `use_cache` - Per-call switch; `false` skips the cache entirely
    /// * `search` - Name filter; searched pages are never cached
    async fn fetch(
        &self,
        endpoint: Endpoint,
        page: u32,
        limit: u32,
        use_cache: bool,
        search: Option<&str>,
    ) -> Result<CatalogPage, FetchError>;
}

/// Caching decorator over a [`CatalogFetcher`]
///
/// Owns its [`CacheStore`] exclusively; the app layer reaches the cache only
/// through the administrative methods exposed here. Concurrent identical
/// misses are not coalesced: each call that misses performs its own network
/// round trip, and the last write wins.
pub struct CachedCatalog {
    inner: Box<dyn CatalogFetcher>,
    store: Mutex<CacheStore>,
    enabled: AtomicBool,
    /// TTL used for stored pages; `None` means the store default
    page_ttl: Option<Duration>,
}

impl CachedCatalog {
    /// Wraps a fetcher with the given cache store.
    pub fn new(inner: Box<dyn CatalogFetcher>, store: CacheStore) -> Self {
        Self {
            inner,
            store: Mutex::new(store),
            enabled: AtomicBool::new(true),
            page_ttl: None,
        }
    }

    /// Overrides the TTL applied to stored pages.
    ///
    /// Useful for tuning request classes separately, e.g. giving
    /// search-adjacent browse pages a fifth of the plain browse TTL.
    pub fn with_page_ttl(mut self, ttl: Duration) -> Self {
        self.page_ttl = Some(ttl);
        self
    }

    /// Removes every cached page.
    pub fn clear_cache(&self) {
        self.with_store(|store| store.clear());
    }

    /// Turns caching on or off for subsequent fetches.
    pub fn set_caching_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Whether fetches currently consult the cache
    pub fn is_caching_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Changes the store's default TTL for future writes.
    pub fn set_cache_expiry(&self, ttl: Duration) {
        self.with_store(|store| store.set_default_ttl(ttl));
    }

    /// Number of pages currently cached
    pub fn cached_pages(&self) -> usize {
        self.with_store(|store| store.len()).unwrap_or(0)
    }

    /// Runs a closure against the store, absorbing lock poisoning.
    ///
    /// A poisoned lock means some caller panicked mid-operation; the cache
    /// then degrades to a permanent miss rather than failing requests.
    fn with_store<R>(&self, f: impl FnOnce(&mut CacheStore) -> R) -> Option<R> {
        match self.store.lock() {
            Ok(mut store) => Some(f(&mut store)),
            Err(err) => {
                warn!(error = %err, "cache store lock poisoned, skipping cache");
                None
            }
        }
    }
}

#[async_trait]
impl CatalogFetcher for CachedCatalog {
    async fn fetch(
        &self,
        endpoint: Endpoint,
        page: u32,
        limit: u32,
        use_cache: bool,
        search: Option<&str>,
    ) -> Result<CatalogPage, FetchError> {
        // Search results are short-lived and highly specific; they bypass the
        // cache structurally, alongside the per-call and global switches.
        let bypass = !self.is_caching_enabled() || !use_cache || search.is_some();

        let key = if bypass {
            None
        } else {
            Some(cache_key(endpoint.as_str(), page, limit, search))
        };

        if let Some(ref key) = key {
            if let Some(cached) = self
                .with_store(|store| store.get::<CatalogPage>(key))
                .flatten()
            {
                debug!(key = key.as_str(), "cache hit");
                return Ok(cached);
            }
            debug!(key = key.as_str(), "cache miss");
        }

        let fetched = self
            .inner
            .fetch(endpoint, page, limit, use_cache, search)
            .await?;

        if let Some(ref key) = key {
            self.with_store(|store| store.set(key, &fetched, self.page_ttl));
        }

        Ok(fetched)
    }
}
