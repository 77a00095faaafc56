//! provenance catalog
//!
//! [Catalog] maps every configuration key to the files defining it and the value each file assigns:
//!
//! ```yaml
//! db_host:
//!   prod/role.yaml: a
//!   common.yaml: b
//! ```
//!
//! The catalog never merges. Two files defining the same key are two entries, even if the values are equal.
//! Sources are kept in the order they were recorded, precedence is recovered with [Catalog::ordered_sources].
use crate::codec::YamlCodec;
use crate::error::{Error, Result};
use crate::pattern::MatcherSet;
use crate::scan::Classification;
use indexmap::{IndexMap, IndexSet};
use serde_yaml::Mapping;
use std::path::Path;

pub use serde_yaml::Value;

/// file -> value
pub type Sources = IndexMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: IndexMap<String, Sources>,
}

impl Catalog {
    /// Record the value `file` assigns to `key`
    ///
    /// Returns the previously recorded value of the same `(key, file)` pair.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        file: impl Into<String>,
        value: Value,
    ) -> Option<Value> {
        self.entries
            .entry(key.into())
            .or_default()
            .insert(file.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Sources> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in recording order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Sources)> {
        self.entries.iter()
    }

    /// Keys in lexicographic order
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Sources of `key`, most specific hierarchy level first
    ///
    /// Ties keep recording order.
    pub fn ordered_sources(&self, key: &str, matchers: &MatcherSet) -> Option<Vec<(&str, &Value)>> {
        let sources = self.entries.get(key)?;

        let mut ordered: Vec<(&str, &Value)> = sources
            .iter()
            .map(|(file, value)| (file.as_str(), value))
            .collect();
        if ordered.len() > 1 {
            ordered.sort_by_cached_key(|(file, _)| matchers.rank_of(file));
        }

        Some(ordered)
    }

    /// Whole catalog as a document: keys sorted, sources in precedence order
    pub fn to_document(&self, matchers: &MatcherSet) -> Value {
        let mut document = Mapping::with_capacity(self.entries.len());

        for key in self.sorted_keys() {
            let sources: Mapping = self
                .ordered_sources(key, matchers)
                .unwrap_or_default()
                .into_iter()
                .map(|(file, value)| (Value::from(file), value.clone()))
                .collect();
            document.insert(Value::from(key), Value::Mapping(sources));
        }

        Value::Mapping(document)
    }

    /// Inverse of [Catalog::to_document]
    ///
    /// `path` only names the origin of `document` in errors.
    pub fn from_document(document: Value, path: &Path) -> Result<Self> {
        let Value::Mapping(document) = document else {
            return Err(Error::schema(path, "catalog is not a mapping"));
        };

        let mut catalog = Self::default();
        for (key, sources) in document {
            let key = string_key(key, path)?;
            let Value::Mapping(sources) = sources else {
                return Err(Error::schema(
                    path,
                    format!("sources of {key:?} are not a mapping"),
                ));
            };

            for (file, value) in sources {
                let file = string_key(file, path)?;
                catalog.insert(key.clone(), file, value);
            }
        }

        Ok(catalog)
    }

    pub fn load(path: &Path, codec: &impl YamlCodec) -> Result<Self> {
        tracing::info!(path=%path.display(), "loading catalog");

        let text = std::fs::read_to_string(path).map_err(|e| Error::filesystem(path, e))?;
        let document = codec.load(&text).map_err(|source| Error::Yaml {
            path: path.to_owned(),
            source,
        })?;

        match document {
            Some(document) => Self::from_document(document, path),
            None => Ok(Self::default()),
        }
    }

    /// file -> {key: value}
    ///
    /// Files appear in the order they are first referenced, keys in catalog order.
    pub fn invert(&self) -> IndexMap<String, Mapping> {
        let mut files: IndexMap<String, Mapping> = IndexMap::new();

        for (key, sources) in &self.entries {
            for (file, value) in sources {
                files
                    .entry(file.clone())
                    .or_default()
                    .insert(Value::from(key.as_str()), value.clone());
            }
        }

        files
    }
}

fn string_key(key: Value, path: &Path) -> Result<String> {
    match key {
        Value::String(key) => Ok(key),
        other => Err(Error::schema(
            path,
            format!("key {other:?} is not a string"),
        )),
    }
}

/// Output of [build]
#[derive(Debug, Default)]
pub struct Build {
    pub catalog: Catalog,
    /// Classified files that contained no document, in processing order
    pub empty_files: Vec<String>,
}

/// Read every classified file below `root` into a [Catalog]
///
/// Buckets are processed from the least specific hierarchy level to the most specific one. A file classified under
/// several levels is read once. Stops at the first file that is not a mapping.
pub fn build(
    root: &Path,
    classification: &Classification,
    codec: &impl YamlCodec,
) -> Result<Build> {
    let mut build = Build::default();
    let mut visited: IndexSet<&str> = IndexSet::new();

    for bucket in classification.buckets().rev() {
        tracing::debug!(rank = bucket.rank, template = %bucket.template, files = bucket.files.len(), "reading hierarchy level");

        for file in &bucket.files {
            if !visited.insert(file.as_str()) {
                continue;
            }

            let path = root.join(file);
            let text = std::fs::read_to_string(&path).map_err(|e| Error::filesystem(&path, e))?;
            let document = codec
                .load(&text)
                .map_err(|source| Error::Yaml {
                    path: path.clone(),
                    source,
                })?;

            let Some(document) = document else {
                tracing::warn!(file, "Found empty file");
                build.empty_files.push(file.clone());
                continue;
            };

            let Value::Mapping(document) = document else {
                return Err(Error::schema(&path, "content is not a key/value mapping"));
            };

            for (key, value) in document {
                let key = string_key(key, &path)?;
                tracing::trace!(key, file, "recording");
                build.catalog.insert(key, file.as_str(), value);
            }
        }
    }

    tracing::info!(
        keys = build.catalog.len(),
        files = visited.len(),
        "catalog built"
    );

    Ok(build)
}

/// Utility macro to create a [Catalog]
///
/// ```
/// # use hiera_audit::catalog;
/// let catalog = catalog! {
///     "db_host" => { "prod/role.yaml" => "a", "common.yaml" => "b" },
///     "port" => { "common.yaml" => 5432 },
/// };
///
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog.get("db_host").unwrap().len(), 2);
/// ```
#[macro_export]
macro_rules! catalog {
    {} => {
        $crate::catalog::Catalog::default()
    };
    { $($key:expr => { $($file:expr => $value:expr),* $(,)? }),+ $(,)? } => {{
        let mut catalog = $crate::catalog::Catalog::default();
        $($(
            catalog.insert($key, $file, $crate::catalog::Value::from($value));
        )*)+
        catalog
    }};
}
