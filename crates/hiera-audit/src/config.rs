//! run configuration
//!
//! Loaded from an optional yaml file. Every field has a default so an empty file (or no file at all)
//! yields [Config::default].
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Key of the template list inside the hierarchy definition
    pub hierarchy_key: String,

    /// Extension of configuration files, without the leading dot
    pub extension: String,

    /// Literal rewrites applied to each template before placeholders are expanded
    pub substitutions: Vec<Substitution>,

    /// Refuse to generate into an existing directory instead of asking
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hierarchy_key: ":hierarchy".to_owned(),
            extension: "yaml".to_owned(),
            substitutions: vec![],
            strict: false,
        }
    }
}

/// One `(search, replace)` pair of the literal pre-pass
#[derive(Deserialize, Debug, Clone, PartialEq, derive_new::new)]
pub struct Substitution {
    pub search: String,
    pub replace: String,
}

impl Substitution {
    pub fn apply(&self, template: &str) -> String {
        template.replace(&self.search, &self.replace)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!(path=%path.display(), "loading configuration");

        let text = std::fs::read_to_string(path).map_err(|e| Error::filesystem(path, e))?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&text).map_err(|source| Error::Yaml {
            path: path.to_owned(),
            source,
        })
    }
}
