// SPDX-License-Identifier: MPL-2.0
//! `fluent_cascade` is a runtime localization engine built on Fluent.
//!
//! Given an ordered list of candidate languages it negotiates which resource
//! bundles to load, formats message lookups against them, and falls back
//! transparently to the next-best language when a lookup fails or a resource
//! errors. Language switches are race-safe: calls already in flight finish
//! against the chain they captured, later calls observe the new one.
//!
//! Resource syntax parsing is delegated to `fluent-bundle`; resource
//! enumeration and transport stay behind the [`bundle::ResourceFetcher`] and
//! [`resolver::BundleGenerator`] traits supplied by the embedding.

#![doc(html_root_url = "https://docs.rs/fluent-cascade/0.1.0")]

pub mod bundle;
pub mod cache;
pub mod chain;
pub mod config;
pub mod context;
pub mod error;
pub mod localization;
pub mod reporter;
pub mod resolver;
pub mod testing;
pub mod types;

pub use bundle::{Bundle, ResourceFetcher};
pub use cache::{CacheRef, ResourceCache, ResourceResult};
pub use chain::FallbackChain;
pub use context::{FluentMessageContext, MessageContext, Resolved};
pub use error::{Error, LookupError, LookupErrorKind, ResourceError, Result};
pub use localization::Localization;
pub use reporter::{ErrorReporter, LogReporter, NullReporter};
pub use resolver::{BundleGenerator, BundleResolver};
pub use types::{L10nAttribute, L10nEntry, L10nKey, L10nMessage, ResolveMode};
