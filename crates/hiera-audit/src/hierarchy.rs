//! hierarchy definition
//!
//! Reads the ordered template list out of a hiera config file. Both layouts are understood:
//!
//! ```yaml
//! # hiera 3
//! :hierarchy:
//!   - "%{environment}/nodes/%{fqdn}"
//!   - common
//! ```
//!
//! ```yaml
//! # hiera 5
//! hierarchy:
//!   - name: nodes
//!     path: "nodes/%{trusted.certname}.yaml"
//!   - name: roles
//!     paths:
//!       - "roles/%{role}.yaml"
//!       - "roles/default.yaml"
//! ```
use crate::codec::YamlCodec;
use crate::error::{Error, Result};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Ordered hierarchy templates, most specific first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hierarchy {
    templates: Vec<String>,
}

impl Hierarchy {
    pub fn new(templates: Vec<String>) -> Self {
        Self { templates }
    }

    pub fn load(path: &Path, key: &str, codec: &impl YamlCodec) -> Result<Self> {
        tracing::info!(path=%path.display(), key, "loading hierarchy");

        let text = std::fs::read_to_string(path).map_err(|e| Error::filesystem(path, e))?;
        let Some(document) = codec.load(&text).map_err(|source| Error::Yaml {
            path: path.to_owned(),
            source,
        })?
        else {
            return Err(Error::schema(path, "hierarchy definition is empty"));
        };

        let Value::Mapping(document) = document else {
            return Err(Error::schema(path, "hierarchy definition is not a mapping"));
        };

        Self::from_mapping(&document, key).map_err(|reason| Error::schema(path, reason))
    }

    fn from_mapping(document: &Mapping, key: &str) -> std::result::Result<Self, String> {
        let levels = document
            .get(key)
            .or_else(|| document.get(alternate_key(key)))
            .ok_or_else(|| format!("missing key {key:?}"))?;

        let Value::Sequence(levels) = levels else {
            return Err(format!("{key:?} is not a list"));
        };

        let mut templates = vec![];
        for (index, level) in levels.iter().enumerate() {
            match level {
                Value::String(template) => templates.push(template.clone()),
                Value::Mapping(level) => {
                    if let Some(Value::String(template)) = level.get("path") {
                        templates.push(template.clone());
                    } else if let Some(Value::Sequence(paths)) = level.get("paths") {
                        for path in paths {
                            let Value::String(template) = path else {
                                return Err(format!("level {index}: paths must be strings"));
                            };
                            templates.push(template.clone());
                        }
                    } else {
                        return Err(format!("level {index}: no path or paths"));
                    }
                }
                _ => return Err(format!("level {index}: not a template")),
            }
        }

        if templates.is_empty() {
            return Err("hierarchy has no levels".to_owned());
        }

        Ok(Self { templates })
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }
}

/// `:hierarchy` (hiera 3) <-> `hierarchy` (hiera 5)
fn alternate_key(key: &str) -> &str {
    match key.strip_prefix(':') {
        Some(stripped) => stripped,
        None => match key {
            "hierarchy" => ":hierarchy",
            _ => key,
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::SerdeYaml;
    use pretty_assertions::assert_eq;

    fn load(text: &str) -> Result<Hierarchy> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hiera.yaml");
        std::fs::write(&path, text).unwrap();
        Hierarchy::load(&path, ":hierarchy", &SerdeYaml)
    }

    #[test]
    fn hiera3_layout() {
        let hierarchy = load(
            ":backends:\n  - yaml\n:hierarchy:\n  - \"%{environment}/nodes/%{fqdn}\"\n  - common\n",
        )
        .unwrap();

        assert_eq!(
            hierarchy.templates(),
            &["%{environment}/nodes/%{fqdn}", "common"]
        );
    }

    #[test]
    fn hiera5_layout() {
        let hierarchy = load(
            r#"
version: 5
hierarchy:
  - name: nodes
    path: "nodes/%{trusted.certname}.yaml"
  - name: roles
    paths:
      - "roles/%{role}.yaml"
      - "roles/default.yaml"
  - name: common
    path: common.yaml
"#,
        )
        .unwrap();

        assert_eq!(
            hierarchy.templates(),
            &[
                "nodes/%{trusted.certname}.yaml",
                "roles/%{role}.yaml",
                "roles/default.yaml",
                "common.yaml"
            ]
        );
    }

    #[test]
    fn missing_key() {
        let err = load("other: 1\n").unwrap_err();
        assert!(matches!(err, Error::Schema { reason, .. } if reason.contains(":hierarchy")));
    }

    #[test]
    fn empty_definition() {
        assert!(matches!(load(""), Err(Error::Schema { .. })));
    }

    #[test]
    fn hierarchy_without_levels() {
        let err = load(":hierarchy: []\n").unwrap_err();
        assert!(matches!(err, Error::Schema { reason, .. } if reason == "hierarchy has no levels"));
    }

    #[test]
    fn invalid_level() {
        assert!(matches!(
            load(":hierarchy:\n  - [a, b]\n"),
            Err(Error::Schema { .. })
        ));
    }

    #[test]
    fn missing_file() {
        let err = Hierarchy::load(Path::new("/nonexistent/hiera.yaml"), ":hierarchy", &SerdeYaml)
            .unwrap_err();
        assert!(matches!(err, Error::Filesystem { .. }));
    }

    #[test]
    fn alternate_keys() {
        assert_eq!(alternate_key(":hierarchy"), "hierarchy");
        assert_eq!(alternate_key("hierarchy"), ":hierarchy");
    }
}
