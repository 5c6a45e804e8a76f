// SPDX-License-Identifier: MPL-2.0
//! The orchestration engine: current-chain state, batched formatting with
//! transparent fallback, and race-safe language switching.
//!
//! # Design
//!
//! - **Single shared cell**: the current resolution lives in one mutex-held
//!   slot containing a memoized shared future. It is only ever replaced
//!   wholesale; readers clone it once at the start of an operation and never
//!   re-read it, so a later language switch cannot redirect a call that is
//!   already in flight.
//! - **Iterative fallback**: formatting walks the chain carrying an
//!   accumulator of best-known results per key. A bundle that fails some
//!   keys contributes what it can; the rest falls through to the next
//!   bundle. On exhaustion the unresolved keys surface as `None`
//!   placeholders rather than errors.
//! - **No cancellation**: a superseded chain keeps serving the calls that
//!   captured it until they complete.

use std::borrow::Cow;
use std::sync::{Arc, Mutex};

use fluent_bundle::FluentArgs;
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use unic_langid::LanguageIdentifier;

use crate::chain::FallbackChain;
use crate::context::{MessageContext, Resolved};
use crate::error::Result;
use crate::reporter::{ErrorReporter, LogReporter};
use crate::resolver::BundleGenerator;
use crate::types::{L10nKey, L10nMessage, ResolveMode};

type ContextFactory<C> = Arc<dyn Fn(&LanguageIdentifier) -> C + Send + Sync>;
type ChainFuture<C> = Shared<BoxFuture<'static, Result<FallbackChain<C>>>>;

/// The public entry point of the engine.
///
/// Holds the injected negotiation and context-factory collaborators and the
/// current interactive resolution. Construction installs the initial
/// resolution; being a lazy future, it is driven by the first caller and
/// memoized for everyone after.
pub struct Localization<G: BundleGenerator> {
    generator: Arc<G>,
    create_context: ContextFactory<G::Context>,
    reporter: Arc<dyn ErrorReporter>,
    interactive: Mutex<ChainFuture<G::Context>>,
}

impl<G: BundleGenerator> Localization<G> {
    pub fn new<F>(generator: G, create_context: F) -> Self
    where
        F: Fn(&LanguageIdentifier) -> G::Context + Send + Sync + 'static,
    {
        let generator = Arc::new(generator);
        let create_context: ContextFactory<G::Context> = Arc::new(create_context);
        let interactive = Mutex::new(resolve_and_activate(&generator, &create_context, None));
        Self {
            generator,
            create_context,
            reporter: Arc::new(LogReporter),
            interactive,
        }
    }

    /// Replaces the diagnostic sink. Purely observational; formatting
    /// behaves identically with any sink.
    #[must_use]
    pub fn with_reporter<R: ErrorReporter>(mut self, reporter: R) -> Self {
        self.reporter = Arc::new(reporter);
        self
    }

    /// Formats a batch of keys to plain values, in request order.
    ///
    /// Keys a bundle cannot resolve fall back along the chain; keys no
    /// bundle resolves come back as `None`. Only a negotiation failure
    /// produces an `Err`.
    pub async fn format_values<I>(&self, keys: I) -> Result<Vec<Option<String>>>
    where
        I: IntoIterator,
        I::Item: Into<L10nKey>,
    {
        let keys: Vec<L10nKey> = keys.into_iter().map(Into::into).collect();
        let chain = self.snapshot().await?;
        let results = self
            .format_with_fallback(&chain, keys, ResolveMode::Value)
            .await;
        Ok(results
            .into_iter()
            .map(|slot| slot.and_then(|resolved| resolved.entry.into_value()))
            .collect())
    }

    /// Single-key convenience over [`format_values`](Self::format_values).
    pub async fn format_value(
        &self,
        id: impl Into<Cow<'static, str>>,
        args: Option<FluentArgs<'static>>,
    ) -> Result<Option<String>> {
        let key = L10nKey {
            id: id.into(),
            args,
        };
        let mut values = self.format_values([key]).await?;
        Ok(values.pop().flatten())
    }

    /// Formats a batch of keys to structured messages (value plus
    /// attributes), with the same fallback semantics as `format_values`.
    pub async fn format_messages<I>(&self, keys: I) -> Result<Vec<Option<L10nMessage>>>
    where
        I: IntoIterator,
        I::Item: Into<L10nKey>,
    {
        let keys: Vec<L10nKey> = keys.into_iter().map(Into::into).collect();
        let chain = self.snapshot().await?;
        let results = self
            .format_with_fallback(&chain, keys, ResolveMode::Message)
            .await;
        Ok(results
            .into_iter()
            .map(|slot| slot.and_then(|resolved| resolved.entry.into_message()))
            .collect())
    }

    /// Renegotiates the fallback chain for a new language request.
    ///
    /// Waits for the current interactive chain to settle, then computes the
    /// new chain and compares it by language content. An identical outcome
    /// keeps the current chain and its activated head untouched; a different
    /// one activates its head and replaces the shared cell. Formatting calls
    /// that captured the old cell finish against the old chain.
    pub async fn request_languages(&self, requested: Vec<LanguageIdentifier>) -> Result<()> {
        let old_chain = self.snapshot().await?;

        let generator = Arc::clone(&self.generator);
        let create_context = Arc::clone(&self.create_context);
        let next: ChainFuture<G::Context> = async move {
            let new_chain = generator.request_bundles(Some(requested)).await?;
            if old_chain.same_languages(&new_chain) {
                Ok(old_chain)
            } else {
                if let Some(head) = new_chain.first() {
                    head.activate(&*create_context).await;
                }
                Ok(new_chain)
            }
        }
        .boxed()
        .shared();

        *self
            .interactive
            .lock()
            .expect("interactive resolution poisoned") = next.clone();

        next.await?;
        Ok(())
    }

    /// The current interactive chain, for inspection.
    pub async fn interactive(&self) -> Result<FallbackChain<G::Context>> {
        self.snapshot().await
    }

    /// Clones the current resolution out of the shared cell. The lock is
    /// held only for the clone, never across an await.
    fn snapshot(&self) -> ChainFuture<G::Context> {
        self.interactive
            .lock()
            .expect("interactive resolution poisoned")
            .clone()
    }

    /// Walks the chain head-first, accumulating per-key results.
    // Takes the keys by value: `&[L10nKey]` held across an await would make
    // the future non-`Send`, because `FluentArgs` is not `Sync`.
    async fn format_with_fallback(
        &self,
        chain: &FallbackChain<G::Context>,
        keys: Vec<L10nKey>,
        mode: ResolveMode,
    ) -> Vec<Option<Resolved>> {
        let mut acc: Vec<Option<Resolved>> = Vec::new();
        acc.resize_with(keys.len(), || None);

        for bundle in chain.bundles() {
            // The chain head was activated during resolution; for the rest
            // this is the activation point.
            let context = bundle.activate(&*self.create_context).await;
            let errors = context.resolve_batch(&keys, mode, &mut acc);
            if errors.is_empty() {
                return acc;
            }
            self.reporter.report_errors(errors);
        }

        acc
    }
}

/// Builds the shared resolution future: negotiate a chain, activate its
/// head. The head of an interactive chain is always ready before any
/// formatting call observes it.
fn resolve_and_activate<G: BundleGenerator>(
    generator: &Arc<G>,
    create_context: &ContextFactory<G::Context>,
    requested: Option<Vec<LanguageIdentifier>>,
) -> ChainFuture<G::Context> {
    let generator = Arc::clone(generator);
    let create_context = Arc::clone(create_context);
    async move {
        let chain = generator.request_bundles(requested).await?;
        if let Some(head) = chain.first() {
            head.activate(&*create_context).await;
        }
        Ok(chain)
    }
    .boxed()
    .shared()
}
