// SPDX-License-Identifier: MPL-2.0
//! Language negotiation: turning a requested-language list into an ordered
//! fallback chain of bundles.
//!
//! [`BundleResolver`] is the built-in negotiator; embeddings with their own
//! negotiation supply any [`BundleGenerator`] instead.

use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use unic_langid::LanguageIdentifier;

use crate::bundle::{Bundle, ResourceFetcher};
use crate::cache::ResourceCache;
use crate::chain::FallbackChain;
use crate::context::MessageContext;
use crate::error::Result;

/// Produces fallback chains for language requests.
///
/// Called with `None` to resolve from the previously negotiated languages
/// (the initial interactive chain), or with an explicit request to
/// renegotiate. An explicit request must recompute strictly from its input;
/// the caller compares the outcome to the active chain by language content,
/// not object identity.
pub trait BundleGenerator: Send + Sync + 'static {
    type Context: MessageContext;

    fn request_bundles(
        &self,
        requested: Option<Vec<LanguageIdentifier>>,
    ) -> BoxFuture<'static, Result<FallbackChain<Self::Context>>>;
}

/// The built-in negotiator: requested languages intersected with the
/// available set, order preserving, with a guaranteed default-language tail.
pub struct BundleResolver<C: MessageContext> {
    available: Vec<LanguageIdentifier>,
    default_locale: LanguageIdentifier,
    resources: Vec<String>,
    fetcher: Arc<dyn ResourceFetcher<Resource = C::Resource>>,
    cache: ResourceCache<C::Resource>,
    negotiated: Mutex<Vec<LanguageIdentifier>>,
}

impl<C: MessageContext> BundleResolver<C> {
    /// `resources` are locator templates; every occurrence of `{locale}` is
    /// substituted with the bundle's language tag when chains are built.
    pub fn new(
        available: Vec<LanguageIdentifier>,
        default_locale: LanguageIdentifier,
        resources: Vec<String>,
        requested: Vec<LanguageIdentifier>,
        fetcher: Arc<dyn ResourceFetcher<Resource = C::Resource>>,
    ) -> Self {
        let resolver = Self {
            available,
            default_locale,
            resources,
            fetcher,
            cache: ResourceCache::new(),
            negotiated: Mutex::new(Vec::new()),
        };
        let initial = resolver.negotiate(&requested);
        *resolver.negotiated.lock().expect("negotiated languages poisoned") = initial;
        resolver
    }

    /// The shared resource cache backing every chain this resolver builds.
    #[must_use]
    pub fn cache(&self) -> &ResourceCache<C::Resource> {
        &self.cache
    }

    /// Requested ∩ available, order preserving, deduplicated, with the
    /// default locale appended when the request does not already include it.
    fn negotiate(&self, requested: &[LanguageIdentifier]) -> Vec<LanguageIdentifier> {
        let mut negotiated: Vec<LanguageIdentifier> = Vec::new();
        for lang in requested {
            if self.available.contains(lang) && !negotiated.contains(lang) {
                negotiated.push(lang.clone());
            }
        }
        if !negotiated.contains(&self.default_locale) {
            negotiated.push(self.default_locale.clone());
        }
        negotiated
    }

    /// Builds a fresh chain for the given languages. Bundles are new on
    /// every call; resource loads still deduplicate through the shared
    /// cache.
    fn chain_for(&self, languages: &[LanguageIdentifier]) -> FallbackChain<C> {
        let bundles = languages
            .iter()
            .map(|lang| {
                let locators = self
                    .resources
                    .iter()
                    .map(|template| template.replace("{locale}", &lang.to_string()))
                    .collect();
                Arc::new(Bundle::new(
                    lang.clone(),
                    locators,
                    Arc::clone(&self.fetcher),
                    self.cache.clone(),
                ))
            })
            .collect();
        FallbackChain::new(bundles)
    }

    fn resolve(&self, requested: Option<Vec<LanguageIdentifier>>) -> FallbackChain<C> {
        let languages = match requested {
            Some(requested) => {
                let negotiated = self.negotiate(&requested);
                *self
                    .negotiated
                    .lock()
                    .expect("negotiated languages poisoned") = negotiated.clone();
                negotiated
            }
            None => self
                .negotiated
                .lock()
                .expect("negotiated languages poisoned")
                .clone(),
        };
        self.chain_for(&languages)
    }
}

impl<C: MessageContext> BundleGenerator for BundleResolver<C> {
    type Context = C;

    fn request_bundles(
        &self,
        requested: Option<Vec<LanguageIdentifier>>,
    ) -> BoxFuture<'static, Result<FallbackChain<C>>> {
        let chain = self.resolve(requested);
        async move { Ok(chain) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FluentMessageContext;
    use crate::testing::MockFetcher;

    fn langid(tag: &str) -> LanguageIdentifier {
        tag.parse().expect("valid language tag")
    }

    fn langids(tags: &[&str]) -> Vec<LanguageIdentifier> {
        tags.iter().map(|t| langid(t)).collect()
    }

    fn resolver(requested: &[&str]) -> BundleResolver<FluentMessageContext> {
        BundleResolver::new(
            langids(&["pl", "de", "en-US"]),
            langid("en-US"),
            vec!["{locale}/app.ftl".to_string()],
            langids(requested),
            Arc::new(MockFetcher::new(&[])),
        )
    }

    #[tokio::test]
    async fn negotiation_appends_default_tail() {
        let chain = resolver(&["pl"]).request_bundles(None).await.expect("chain");
        let tags: Vec<String> = chain.languages().map(|l| l.to_string()).collect();
        assert_eq!(tags, vec!["pl", "en-US"]);
    }

    #[tokio::test]
    async fn unavailable_languages_are_skipped() {
        let chain = resolver(&["fr", "de"]).request_bundles(None).await.expect("chain");
        let tags: Vec<String> = chain.languages().map(|l| l.to_string()).collect();
        assert_eq!(tags, vec!["de", "en-US"]);
    }

    #[tokio::test]
    async fn duplicate_requests_are_deduplicated() {
        let chain = resolver(&["pl", "pl", "de"]).request_bundles(None).await.expect("chain");
        let tags: Vec<String> = chain.languages().map(|l| l.to_string()).collect();
        assert_eq!(tags, vec!["pl", "de", "en-US"]);
    }

    #[tokio::test]
    async fn default_locale_is_not_duplicated() {
        let chain = resolver(&["en-US", "pl"]).request_bundles(None).await.expect("chain");
        let tags: Vec<String> = chain.languages().map(|l| l.to_string()).collect();
        assert_eq!(tags, vec!["en-US", "pl"]);
    }

    #[tokio::test]
    async fn explicit_request_recomputes_and_is_remembered() {
        let resolver = resolver(&["pl"]);

        let first = resolver
            .request_bundles(Some(langids(&["de"])))
            .await
            .expect("chain");
        let tags: Vec<String> = first.languages().map(|l| l.to_string()).collect();
        assert_eq!(tags, vec!["de", "en-US"]);

        // A subsequent implicit request resolves from the new negotiation.
        let second = resolver.request_bundles(None).await.expect("chain");
        assert!(first.same_languages(&second));

        // Fresh bundles every time; equality is content, not identity.
        assert!(!Arc::ptr_eq(
            first.first().expect("bundle"),
            second.first().expect("bundle")
        ));
    }

    #[tokio::test]
    async fn locator_templates_substitute_the_locale() {
        let chain = resolver(&["pl"]).request_bundles(None).await.expect("chain");
        let head = chain.first().expect("bundle");
        assert_eq!(head.locators(), ["pl/app.ftl"]);
    }
}
