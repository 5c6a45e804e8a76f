// SPDX-License-Identifier: MPL-2.0
use std::fmt;

use unic_langid::LanguageIdentifier;

/// Top-level error for the public `Localization` and settings operations.
///
/// Per-resource and per-key failures never surface here; they degrade into
/// fallback steps or placeholders instead. Only a failure of the negotiation
/// machinery itself (or of the configuration layer) reaches the caller.
#[derive(Debug, Clone)]
pub enum Error {
    Negotiation(String),
    Config(String),
    Io(String),
}

/// A single resource failed to load or parse.
///
/// Non-fatal: the resource is filtered out before context construction and
/// the owning bundle stays usable.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// The locator does not exist in the underlying store.
    NotFound(String),

    /// The underlying store failed (permissions, transport, ...).
    Io(String),

    /// The resource was fetched but its payload could not be parsed.
    Parse(String),
}

/// A requested key could not be resolved against one context.
///
/// Non-fatal: reported to the diagnostic sink and answered by falling back
/// to the next bundle in the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupError {
    pub kind: LookupErrorKind,
    pub id: String,
    pub locale: LanguageIdentifier,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupErrorKind {
    /// No message with this id exists in the context.
    MissingMessage,

    /// The message exists but has no value pattern to format.
    MissingValue,

    /// Formatting produced resolver errors (bad arguments, cyclic
    /// references, ...).
    Formatting(String),
}

impl LookupError {
    pub fn missing_message(id: &str, locale: &LanguageIdentifier) -> Self {
        Self {
            kind: LookupErrorKind::MissingMessage,
            id: id.to_string(),
            locale: locale.clone(),
        }
    }

    pub fn missing_value(id: &str, locale: &LanguageIdentifier) -> Self {
        Self {
            kind: LookupErrorKind::MissingValue,
            id: id.to_string(),
            locale: locale.clone(),
        }
    }

    pub fn formatting(id: &str, locale: &LanguageIdentifier, detail: String) -> Self {
        Self {
            kind: LookupErrorKind::Formatting(detail),
            id: id.to_string(),
            locale: locale.clone(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Negotiation(e) => write!(f, "Negotiation Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Io(e) => write!(f, "I/O Error: {}", e),
        }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::NotFound(locator) => write!(f, "Resource not found: {}", locator),
            ResourceError::Io(e) => write!(f, "Resource I/O error: {}", e),
            ResourceError::Parse(e) => write!(f, "Resource parse error: {}", e),
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LookupErrorKind::MissingMessage => {
                write!(f, "Missing message \"{}\" in locale {}", self.id, self.locale)
            }
            LookupErrorKind::MissingValue => {
                write!(f, "Message \"{}\" in locale {} has no value", self.id, self.locale)
            }
            LookupErrorKind::Formatting(detail) => write!(
                f,
                "Failed to format \"{}\" in locale {}: {}",
                self.id, self.locale, detail
            ),
        }
    }
}

impl std::error::Error for Error {}
impl std::error::Error for ResourceError {}
impl std::error::Error for LookupError {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
