// SPDX-License-Identifier: MPL-2.0
//! Ordered bundle sequences representing fallback priority.

use std::fmt;
use std::sync::Arc;

use unic_langid::LanguageIdentifier;

use crate::bundle::Bundle;
use crate::context::MessageContext;

/// An ordered sequence of bundles, highest priority first.
///
/// Position encodes fallback priority: formatting tries the head first and
/// walks towards the tail on per-key errors. Chains are cheap to clone; the
/// bundles themselves are shared.
pub struct FallbackChain<C: MessageContext> {
    bundles: Vec<Arc<Bundle<C>>>,
}

impl<C: MessageContext> Clone for FallbackChain<C> {
    fn clone(&self) -> Self {
        Self {
            bundles: self.bundles.clone(),
        }
    }
}

impl<C: MessageContext> FallbackChain<C> {
    #[must_use]
    pub fn new(bundles: Vec<Arc<Bundle<C>>>) -> Self {
        Self { bundles }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            bundles: Vec::new(),
        }
    }

    #[must_use]
    pub fn bundles(&self) -> &[Arc<Bundle<C>>] {
        &self.bundles
    }

    #[must_use]
    pub fn first(&self) -> Option<&Arc<Bundle<C>>> {
        self.bundles.first()
    }

    pub fn languages(&self) -> impl Iterator<Item = &LanguageIdentifier> {
        self.bundles.iter().map(|bundle| bundle.language())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Content equality: same length and identical language tags at every
    /// position. Resource contents are deliberately not compared; two
    /// differently sourced chains with the same tags are considered equal.
    /// This is the gate that suppresses redundant re-activation when a
    /// language request resolves to the already-active chain.
    #[must_use]
    pub fn same_languages(&self, other: &Self) -> bool {
        self.bundles.len() == other.bundles.len()
            && self
                .languages()
                .zip(other.languages())
                .all(|(ours, theirs)| ours == theirs)
    }
}

impl<C: MessageContext> fmt::Debug for FallbackChain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.languages()).finish()
    }
}
