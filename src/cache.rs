// SPDX-License-Identifier: MPL-2.0
//! Shared resource cache with reference-counted retention.
//!
//! Independently negotiated fallback chains may load the same underlying
//! resource. The cache memoizes one in-flight or settled fetch per resolved
//! locator and keeps it alive for as long as any bundle holds a
//! [`CacheRef`]. Dropping one chain therefore never evicts entries another
//! live chain still references; an entry disappears only when its last
//! reference is released.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;

use crate::error::ResourceError;

/// Outcome of fetching one resource: data or a non-fatal error marker.
pub type ResourceResult<R> = Result<R, ResourceError>;

/// A memoized fetch; clones all settle to the same outcome.
pub type SharedFetch<R> = Shared<BoxFuture<'static, ResourceResult<R>>>;

struct Entry<R> {
    fetch: SharedFetch<R>,
    refs: usize,
}

type Entries<R> = Arc<Mutex<HashMap<String, Entry<R>>>>;

pub struct ResourceCache<R> {
    entries: Entries<R>,
}

impl<R> Clone for ResourceCache<R> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<R: Clone + Send + Sync + 'static> Default for ResourceCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone + Send + Sync + 'static> ResourceCache<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the memoized fetch for `locator`, starting it via `fetch` if
    /// this is the first retain, together with a guard that keeps the entry
    /// alive. Concurrent retains of one locator share a single underlying
    /// load.
    pub fn retain<F>(&self, locator: &str, fetch: F) -> (SharedFetch<R>, CacheRef<R>)
    where
        F: FnOnce() -> BoxFuture<'static, ResourceResult<R>>,
    {
        let mut entries = self.entries.lock().expect("resource cache poisoned");
        let entry = entries
            .entry(locator.to_string())
            .or_insert_with(|| Entry {
                fetch: fetch().shared(),
                refs: 0,
            });
        entry.refs += 1;

        (
            entry.fetch.clone(),
            CacheRef {
                entries: Arc::clone(&self.entries),
                locator: locator.to_string(),
            },
        )
    }

    #[must_use]
    pub fn contains(&self, locator: &str) -> bool {
        self.entries
            .lock()
            .expect("resource cache poisoned")
            .contains_key(locator)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("resource cache poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// RAII retention of one cache entry.
///
/// The entry is evicted when the last `CacheRef` for its locator drops.
pub struct CacheRef<R> {
    entries: Entries<R>,
    locator: String,
}

impl<R> Drop for CacheRef<R> {
    fn drop(&mut self) {
        let mut entries = self.entries.lock().expect("resource cache poisoned");
        if let Some(entry) = entries.get_mut(&self.locator) {
            entry.refs -= 1;
            if entry.refs == 0 {
                entries.remove(&self.locator);
            }
        }
    }
}
