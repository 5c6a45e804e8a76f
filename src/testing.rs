// SPDX-License-Identifier: MPL-2.0
//! Test support: an in-memory resource fetcher and a capturing error sink.
//!
//! Used by this crate's own tests and available to embedders who want to
//! exercise their localization setup without touching the file system.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use fluent_bundle::FluentResource;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use unic_langid::LanguageIdentifier;

use crate::bundle::ResourceFetcher;
use crate::cache::ResourceResult;
use crate::error::{LookupError, ResourceError};
use crate::reporter::ErrorReporter;

/// Serves FTL sources from memory, keyed by resolved locator.
///
/// Counts every underlying fetch so tests can assert that memoization and
/// content-equality short-circuits actually suppress loads.
pub struct MockFetcher {
    files: HashMap<String, String>,
    counts: Mutex<HashMap<String, usize>>,
}

impl MockFetcher {
    #[must_use]
    pub fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(locator, source)| ((*locator).to_string(), (*source).to_string()))
                .collect(),
            counts: Mutex::new(HashMap::new()),
        }
    }

    /// How many times `locator` was actually fetched.
    #[must_use]
    pub fn fetch_count(&self, locator: &str) -> usize {
        self.counts
            .lock()
            .expect("fetch counts poisoned")
            .get(locator)
            .copied()
            .unwrap_or(0)
    }

    /// Total underlying fetches across all locators.
    #[must_use]
    pub fn total_fetches(&self) -> usize {
        self.counts
            .lock()
            .expect("fetch counts poisoned")
            .values()
            .sum()
    }
}

impl ResourceFetcher for MockFetcher {
    type Resource = Arc<FluentResource>;

    fn fetch(
        &self,
        _locale: &LanguageIdentifier,
        locator: &str,
    ) -> BoxFuture<'static, ResourceResult<Self::Resource>> {
        *self
            .counts
            .lock()
            .expect("fetch counts poisoned")
            .entry(locator.to_string())
            .or_insert(0) += 1;

        let result = match self.files.get(locator) {
            None => Err(ResourceError::NotFound(locator.to_string())),
            Some(source) => FluentResource::try_new(source.clone())
                .map(Arc::new)
                .map_err(|(_, errors)| ResourceError::Parse(format!("{:?}", errors))),
        };
        async move { result }.boxed()
    }
}

/// Collects reported lookup errors for assertions.
#[derive(Default, Clone)]
pub struct CapturingReporter {
    errors: Arc<Mutex<Vec<LookupError>>>,
}

impl CapturingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<LookupError> {
        self.errors.lock().expect("captured errors poisoned").clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.lock().expect("captured errors poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.errors.lock().expect("captured errors poisoned").clear();
    }
}

impl ErrorReporter for CapturingReporter {
    fn report_errors(&self, errors: Vec<LookupError>) {
        self.errors
            .lock()
            .expect("captured errors poisoned")
            .extend(errors);
    }
}
