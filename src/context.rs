// SPDX-License-Identifier: MPL-2.0
//! Message contexts: the queryable set of messages for one language.
//!
//! The engine consumes contexts through the [`MessageContext`] trait so the
//! message syntax stays an opaque capability. [`FluentMessageContext`] is the
//! bundled implementation over Fluent, using the concurrent `FluentBundle`
//! variant so contexts can be shared across threads.

use std::sync::Arc;

use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::FluentResource;
use unic_langid::LanguageIdentifier;

use crate::error::LookupError;
use crate::types::{L10nAttribute, L10nEntry, L10nKey, L10nMessage, ResolveMode};

/// A resolved key together with the locale that answered it.
///
/// The locale is metadata for diagnostics; public formatting operations
/// discard it when unwrapping results.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub entry: L10nEntry,
    pub locale: LanguageIdentifier,
}

/// The parsed, queryable messages for exactly one language.
///
/// Built incrementally by merging successfully fetched resources; the
/// override precedence between resources (last-wins for Fluent) is owned by
/// the implementation, not by the engine.
pub trait MessageContext: Send + Sync + 'static {
    /// The raw resource type merged into this context.
    type Resource: Clone + Send + Sync + 'static;

    fn locale(&self) -> &LanguageIdentifier;

    /// Merges one successfully fetched resource into the context.
    fn add_resource(&mut self, resource: Self::Resource);

    /// Attempts to resolve every key whose accumulator slot is still empty.
    ///
    /// `acc` has the same arity as `keys`. Slots already filled by a higher
    /// priority context are carried forward untouched, so prior fallback
    /// successes are never reformatted. Individual misses are reported in
    /// the returned vector; this method never panics for a missing key.
    fn resolve_batch(
        &self,
        keys: &[L10nKey],
        mode: ResolveMode,
        acc: &mut [Option<Resolved>],
    ) -> Vec<LookupError>;
}

/// [`MessageContext`] backed by a concurrent Fluent bundle.
pub struct FluentMessageContext {
    locale: LanguageIdentifier,
    bundle: FluentBundle<Arc<FluentResource>>,
}

impl FluentMessageContext {
    /// Takes the locale by reference so the constructor itself can serve as
    /// the context factory injected into the engine.
    #[must_use]
    pub fn new(locale: &LanguageIdentifier) -> Self {
        let bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        Self {
            locale: locale.clone(),
            bundle,
        }
    }

    fn format_value(&self, key: &L10nKey) -> Result<L10nEntry, LookupError> {
        let message = self
            .bundle
            .get_message(&key.id)
            .ok_or_else(|| LookupError::missing_message(&key.id, &self.locale))?;
        let pattern = message
            .value()
            .ok_or_else(|| LookupError::missing_value(&key.id, &self.locale))?;

        let mut errors = Vec::new();
        let value = self
            .bundle
            .format_pattern(pattern, key.args.as_ref(), &mut errors);
        if errors.is_empty() {
            Ok(L10nEntry::Value(value.into_owned()))
        } else {
            Err(LookupError::formatting(
                &key.id,
                &self.locale,
                join_errors(&errors),
            ))
        }
    }

    fn format_message(&self, key: &L10nKey) -> Result<L10nEntry, LookupError> {
        let message = self
            .bundle
            .get_message(&key.id)
            .ok_or_else(|| LookupError::missing_message(&key.id, &self.locale))?;

        let mut errors = Vec::new();
        let value = message.value().map(|pattern| {
            self.bundle
                .format_pattern(pattern, key.args.as_ref(), &mut errors)
                .into_owned()
        });
        let attributes = message
            .attributes()
            .map(|attribute| L10nAttribute {
                name: attribute.id().to_string(),
                value: self
                    .bundle
                    .format_pattern(attribute.value(), key.args.as_ref(), &mut errors)
                    .into_owned(),
            })
            .collect();

        if errors.is_empty() {
            Ok(L10nEntry::Message(L10nMessage { value, attributes }))
        } else {
            Err(LookupError::formatting(
                &key.id,
                &self.locale,
                join_errors(&errors),
            ))
        }
    }
}

impl MessageContext for FluentMessageContext {
    type Resource = Arc<FluentResource>;

    fn locale(&self) -> &LanguageIdentifier {
        &self.locale
    }

    fn add_resource(&mut self, resource: Self::Resource) {
        // Later resources override earlier keys.
        self.bundle.add_resource_overriding(resource);
    }

    fn resolve_batch(
        &self,
        keys: &[L10nKey],
        mode: ResolveMode,
        acc: &mut [Option<Resolved>],
    ) -> Vec<LookupError> {
        debug_assert_eq!(keys.len(), acc.len());
        let mut errors = Vec::new();

        for (key, slot) in keys.iter().zip(acc.iter_mut()) {
            if slot.is_some() {
                continue;
            }
            let attempt = match mode {
                ResolveMode::Value => self.format_value(key),
                ResolveMode::Message => self.format_message(key),
            };
            match attempt {
                Ok(entry) => {
                    *slot = Some(Resolved {
                        entry,
                        locale: self.locale.clone(),
                    });
                }
                Err(error) => errors.push(error),
            }
        }

        errors
    }
}

fn join_errors(errors: &[fluent_bundle::FluentError]) -> String {
    errors
        .iter()
        .map(|error| error.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupErrorKind;
    use fluent_bundle::FluentArgs;

    fn context(tag: &str, sources: &[&str]) -> FluentMessageContext {
        let mut ctx = FluentMessageContext::new(&tag.parse().expect("valid language tag"));
        for source in sources {
            let resource =
                FluentResource::try_new((*source).to_string()).expect("valid FTL source");
            ctx.add_resource(Arc::new(resource));
        }
        ctx
    }

    #[test]
    fn resolves_value_for_known_message() {
        let ctx = context("pl", &["foo = Foo pl\n"]);
        let keys = vec![L10nKey::new("foo")];
        let mut acc = vec![None];
        let errors = ctx.resolve_batch(&keys, ResolveMode::Value, &mut acc);
        assert!(errors.is_empty());
        assert_eq!(
            acc[0].as_ref().map(|r| r.entry.clone()),
            Some(L10nEntry::Value("Foo pl".to_string()))
        );
    }

    #[test]
    fn missing_message_reports_error_without_panicking() {
        let ctx = context("pl", &["foo = Foo pl\n"]);
        let keys = vec![L10nKey::new("bar")];
        let mut acc = vec![None];
        let errors = ctx.resolve_batch(&keys, ResolveMode::Value, &mut acc);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LookupErrorKind::MissingMessage);
        assert!(acc[0].is_none());
    }

    #[test]
    fn later_resource_overrides_earlier_key() {
        let ctx = context("en-US", &["foo = First\n", "foo = Second\n"]);
        let keys = vec![L10nKey::new("foo")];
        let mut acc = vec![None];
        ctx.resolve_batch(&keys, ResolveMode::Value, &mut acc);
        assert_eq!(
            acc[0].as_ref().map(|r| r.entry.clone()),
            Some(L10nEntry::Value("Second".to_string()))
        );
    }

    #[test]
    fn already_resolved_slots_are_left_untouched() {
        let ctx = context("en-US", &["foo = en value\n"]);
        let keys = vec![L10nKey::new("foo")];
        let prior = Resolved {
            entry: L10nEntry::Value("pl value".to_string()),
            locale: "pl".parse().expect("valid language tag"),
        };
        let mut acc = vec![Some(prior.clone())];
        let errors = ctx.resolve_batch(&keys, ResolveMode::Value, &mut acc);
        assert!(errors.is_empty());
        assert_eq!(acc[0], Some(prior));
    }

    #[test]
    fn formats_arguments_into_value() {
        let ctx = context("en-US", &["hello-user = Hello, { $name }!\n"]);
        let mut args = FluentArgs::new();
        args.set("name", "Ania");
        let keys = vec![L10nKey::with_args("hello-user", args)];
        let mut acc = vec![None];
        let errors = ctx.resolve_batch(&keys, ResolveMode::Value, &mut acc);
        assert!(errors.is_empty());
        let value = acc[0].clone().and_then(|r| r.entry.into_value());
        assert_eq!(value, Some("Hello, \u{2068}Ania\u{2069}!".to_string()));
    }

    #[test]
    fn message_mode_collects_attributes() {
        let ctx = context(
            "en-US",
            &["login-input = Predefined value\n    .title = Type your login email\n"],
        );
        let keys = vec![L10nKey::new("login-input")];
        let mut acc = vec![None];
        let errors = ctx.resolve_batch(&keys, ResolveMode::Message, &mut acc);
        assert!(errors.is_empty());
        let message = acc[0].clone().and_then(|r| r.entry.into_message()).expect("message");
        assert_eq!(message.value, Some("Predefined value".to_string()));
        assert_eq!(message.attributes.len(), 1);
        assert_eq!(message.attributes[0].name, "title");
        assert_eq!(message.attributes[0].value, "Type your login email");
    }

    #[test]
    fn message_without_value_still_resolves_in_message_mode() {
        let ctx = context("en-US", &["toolbar =\n    .tooltip = Open\n"]);
        let keys = vec![L10nKey::new("toolbar")];
        let mut acc = vec![None];
        let errors = ctx.resolve_batch(&keys, ResolveMode::Message, &mut acc);
        assert!(errors.is_empty());
        let message = acc[0].clone().and_then(|r| r.entry.into_message()).expect("message");
        assert_eq!(message.value, None);
        assert_eq!(message.attributes[0].name, "tooltip");
    }
}
