// SPDX-License-Identifier: MPL-2.0
//! Language-tagged bundles of lazily fetched resources.
//!
//! A [`Bundle`] is created by the resolver when a fallback chain is built and
//! stays inert until first use. Its fetch is memoized: concurrent or repeated
//! calls settle to the same outcome without duplicate loads. Activation
//! (building the message context from the non-error resources) is equally
//! idempotent, and the context is owned by the bundle for exactly as long as
//! some chain retains it.

use std::sync::Arc;

use futures_util::future::{join_all, BoxFuture};
use tokio::sync::OnceCell;
use unic_langid::LanguageIdentifier;

use crate::cache::{CacheRef, ResourceCache, ResourceResult};
use crate::context::MessageContext;

/// Loads one raw resource for one locale.
///
/// This is the embedding environment's side of the fetch: file I/O, embedded
/// assets, network, whatever the platform provides. The engine only requires
/// that each resource resolves independently to data or an error marker.
pub trait ResourceFetcher: Send + Sync + 'static {
    type Resource: Clone + Send + Sync + 'static;

    fn fetch(
        &self,
        locale: &LanguageIdentifier,
        locator: &str,
    ) -> BoxFuture<'static, ResourceResult<Self::Resource>>;
}

struct Fetched<R> {
    resources: Vec<ResourceResult<R>>,
    // Keeps the shared cache entries alive for this bundle's lifetime.
    _retained: Vec<CacheRef<R>>,
}

/// A lazily fetched collection of resources for one language.
pub struct Bundle<C: MessageContext> {
    language: LanguageIdentifier,
    locators: Vec<String>,
    fetcher: Arc<dyn ResourceFetcher<Resource = C::Resource>>,
    cache: ResourceCache<C::Resource>,
    fetched: OnceCell<Fetched<C::Resource>>,
    context: OnceCell<C>,
}

impl<C: MessageContext> Bundle<C> {
    pub fn new(
        language: LanguageIdentifier,
        locators: Vec<String>,
        fetcher: Arc<dyn ResourceFetcher<Resource = C::Resource>>,
        cache: ResourceCache<C::Resource>,
    ) -> Self {
        Self {
            language,
            locators,
            fetcher,
            cache,
            fetched: OnceCell::new(),
            context: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn language(&self) -> &LanguageIdentifier {
        &self.language
    }

    #[must_use]
    pub fn locators(&self) -> &[String] {
        &self.locators
    }

    /// Fetches all resources of this bundle, memoizing the outcome.
    ///
    /// Each resource resolves independently; a failed resource is an error
    /// marker in the returned slice, never a failure of the whole bundle.
    pub async fn fetch(&self) -> &[ResourceResult<C::Resource>] {
        let fetched = self
            .fetched
            .get_or_init(|| async {
                let mut retained = Vec::with_capacity(self.locators.len());
                let mut pending = Vec::with_capacity(self.locators.len());
                for locator in &self.locators {
                    let fetcher = Arc::clone(&self.fetcher);
                    let language = self.language.clone();
                    let target = locator.clone();
                    let (fetch, guard) = self
                        .cache
                        .retain(locator, move || fetcher.fetch(&language, &target));
                    retained.push(guard);
                    pending.push(fetch);
                }
                Fetched {
                    resources: join_all(pending).await,
                    _retained: retained,
                }
            })
            .await;
        &fetched.resources
    }

    /// Fetches (if needed) and builds the message context from the non-error
    /// resources. Idempotent: the first activation wins and later calls
    /// return the same context.
    pub async fn activate<F>(&self, create_context: &F) -> &C
    where
        F: Fn(&LanguageIdentifier) -> C + ?Sized,
    {
        self.context
            .get_or_init(|| async {
                let resources = self.fetch().await;
                let mut context = create_context(&self.language);
                for resource in resources.iter().filter_map(|r| r.as_ref().ok()) {
                    context.add_resource(resource.clone());
                }
                context
            })
            .await
    }

    /// The activated context, if any.
    #[must_use]
    pub fn cached_context(&self) -> Option<&C> {
        self.context.get()
    }

    /// Whether the fetch has already settled.
    #[must_use]
    pub fn is_fetched(&self) -> bool {
        self.fetched.initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FluentMessageContext;
    use crate::testing::MockFetcher;
    use crate::types::{L10nKey, ResolveMode};

    fn langid(tag: &str) -> LanguageIdentifier {
        tag.parse().expect("valid language tag")
    }

    fn bundle_for(
        fetcher: &Arc<MockFetcher>,
        cache: &ResourceCache<<MockFetcher as ResourceFetcher>::Resource>,
        tag: &str,
        locators: &[&str],
    ) -> Bundle<FluentMessageContext> {
        Bundle::new(
            langid(tag),
            locators.iter().map(|l| (*l).to_string()).collect(),
            Arc::clone(fetcher) as Arc<dyn ResourceFetcher<Resource = Arc<fluent_bundle::FluentResource>>>,
            cache.clone(),
        )
    }

    #[tokio::test]
    async fn concurrent_fetches_issue_one_load() {
        let fetcher = Arc::new(MockFetcher::new(&[("pl/app.ftl", "foo = Foo pl\n")]));
        let cache = ResourceCache::new();
        let bundle = bundle_for(&fetcher, &cache, "pl", &["pl/app.ftl"]);

        let (first, second) = tokio::join!(bundle.fetch(), bundle.fetch());
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert!(first[0].is_ok());
        assert_eq!(fetcher.fetch_count("pl/app.ftl"), 1);
    }

    #[tokio::test]
    async fn failed_resource_does_not_fail_the_bundle() {
        let fetcher = Arc::new(MockFetcher::new(&[("pl/app.ftl", "foo = Foo pl\n")]));
        let cache = ResourceCache::new();
        let bundle = bundle_for(&fetcher, &cache, "pl", &["pl/app.ftl", "pl/missing.ftl"]);

        let resources = bundle.fetch().await;
        assert!(resources[0].is_ok());
        assert!(resources[1].is_err());

        let context = bundle.activate(&FluentMessageContext::new).await;
        let keys = vec![L10nKey::new("foo")];
        let mut acc = vec![None];
        let errors = context.resolve_batch(&keys, ResolveMode::Value, &mut acc);
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn activation_is_idempotent() {
        let fetcher = Arc::new(MockFetcher::new(&[("de/app.ftl", "foo = Das Foo\n")]));
        let cache = ResourceCache::new();
        let bundle = bundle_for(&fetcher, &cache, "de", &["de/app.ftl"]);

        assert!(bundle.cached_context().is_none());
        let first = bundle.activate(&FluentMessageContext::new).await as *const _;
        let second = bundle.activate(&FluentMessageContext::new).await as *const _;
        assert_eq!(first, second);
        assert!(bundle.cached_context().is_some());
        assert_eq!(fetcher.fetch_count("de/app.ftl"), 1);
    }

    #[tokio::test]
    async fn dropping_the_bundle_releases_its_cache_entries() {
        let fetcher = Arc::new(MockFetcher::new(&[("de/app.ftl", "foo = Das Foo\n")]));
        let cache = ResourceCache::new();
        let bundle = bundle_for(&fetcher, &cache, "de", &["de/app.ftl"]);

        bundle.fetch().await;
        assert!(cache.contains("de/app.ftl"));

        drop(bundle);
        assert!(!cache.contains("de/app.ftl"));
    }

    #[tokio::test]
    async fn unfetched_bundle_retains_nothing() {
        let fetcher = Arc::new(MockFetcher::new(&[("de/app.ftl", "foo = Das Foo\n")]));
        let cache = ResourceCache::new();
        let bundle = bundle_for(&fetcher, &cache, "de", &["de/app.ftl"]);

        assert!(!bundle.is_fetched());
        drop(bundle);
        assert!(cache.is_empty());
    }
}
