// SPDX-License-Identifier: MPL-2.0
//! Request and result types shared by the formatting operations.

use std::borrow::Cow;

use fluent_bundle::FluentArgs;

/// A single formatting request: a message identifier plus optional arguments.
///
/// Bare identifiers convert into a key with no arguments, so callers can mix
/// `"brand-name"` and `("hello-user", args)` in one batch.
#[derive(Debug)]
pub struct L10nKey {
    pub id: Cow<'static, str>,
    pub args: Option<FluentArgs<'static>>,
}

impl L10nKey {
    #[must_use]
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: id.into(),
            args: None,
        }
    }

    #[must_use]
    pub fn with_args(id: impl Into<Cow<'static, str>>, args: FluentArgs<'static>) -> Self {
        Self {
            id: id.into(),
            args: Some(args),
        }
    }
}

impl From<&'static str> for L10nKey {
    fn from(id: &'static str) -> Self {
        Self::new(id)
    }
}

impl From<String> for L10nKey {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl<I: Into<Cow<'static, str>>> From<(I, FluentArgs<'static>)> for L10nKey {
    fn from((id, args): (I, FluentArgs<'static>)) -> Self {
        Self::with_args(id, args)
    }
}

/// One formatted attribute of a structured message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L10nAttribute {
    pub name: String,
    pub value: String,
}

/// The structured-entity result of a lookup: the formatted value (if the
/// message has one) plus all formatted attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct L10nMessage {
    pub value: Option<String>,
    pub attributes: Vec<L10nAttribute>,
}

/// Which shape of result a batch resolution should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Just the formatted value string.
    Value,

    /// The full `L10nMessage` with attributes.
    Message,
}

/// A resolved result carried through the fallback accumulator.
#[derive(Debug, Clone, PartialEq)]
pub enum L10nEntry {
    Value(String),
    Message(L10nMessage),
}

impl L10nEntry {
    pub(crate) fn into_value(self) -> Option<String> {
        match self {
            L10nEntry::Value(value) => Some(value),
            L10nEntry::Message(message) => message.value,
        }
    }

    pub(crate) fn into_message(self) -> Option<L10nMessage> {
        match self {
            L10nEntry::Message(message) => Some(message),
            L10nEntry::Value(value) => Some(L10nMessage {
                value: Some(value),
                attributes: Vec::new(),
            }),
        }
    }
}
