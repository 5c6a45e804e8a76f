// SPDX-License-Identifier: MPL-2.0
//! Settings layer: declaring locales and resources in a `TOML` file.
//!
//! The engine itself only consumes injected collaborators; this module is
//! the convenience path for embeddings that describe their localization
//! setup declaratively:
//!
//! ```toml
//! default_locale = "en-US"
//! available = ["pl", "de", "en-US"]
//! requested = ["pl"]
//! resources = ["locales/{locale}/app.ftl"]
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::bundle::ResourceFetcher;
use crate::context::MessageContext;
use crate::error::{Error, Result};
use crate::resolver::BundleResolver;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Guaranteed tail of every fallback chain.
    pub default_locale: String,

    /// Languages with advertised resources.
    #[serde(default)]
    pub available: Vec<String>,

    /// Initial language request.
    #[serde(default)]
    pub requested: Vec<String>,

    /// Locator templates; `{locale}` is substituted per bundle.
    #[serde(default)]
    pub resources: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_locale: "en-US".to_string(),
            available: Vec::new(),
            requested: Vec::new(),
            resources: Vec::new(),
        }
    }
}

impl Settings {
    /// Builds the built-in resolver from these settings.
    ///
    /// Fails with a config error when any declared tag is not a valid
    /// language identifier.
    pub fn resolver<C: MessageContext>(
        &self,
        fetcher: Arc<dyn ResourceFetcher<Resource = C::Resource>>,
    ) -> Result<BundleResolver<C>> {
        let default_locale = parse_tag(&self.default_locale)?;
        let mut available = parse_tags(&self.available)?;
        if !available.contains(&default_locale) {
            available.push(default_locale.clone());
        }
        let requested = parse_tags(&self.requested)?;

        Ok(BundleResolver::new(
            available,
            default_locale,
            self.resources.clone(),
            requested,
            fetcher,
        ))
    }
}

fn parse_tag(tag: &str) -> Result<LanguageIdentifier> {
    tag.parse()
        .map_err(|_| Error::Config(format!("invalid language tag: {}", tag)))
}

fn parse_tags(tags: &[String]) -> Result<Vec<LanguageIdentifier>> {
    tags.iter().map(|tag| parse_tag(tag)).collect()
}

pub fn load_from_path(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path)?;
    let settings = toml::from_str(&contents)?;
    Ok(settings)
}

pub fn save_to_path(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string(settings)?;
    fs::write(path, contents)?;
    Ok(())
}
