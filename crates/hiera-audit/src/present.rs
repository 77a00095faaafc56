//! precedence ordered presentation of a [Catalog]
//!
//! Keys are listed alphabetically. Each key lists its source files from the most specific hierarchy level to the
//! least specific one:
//!
//! ```yaml
//! db_host:
//!   prod/role.yaml: a
//!   common.yaml: b
//!
//! port:
//!   common.yaml: 5432
//! ```
use crate::catalog::{Catalog, Value};
use crate::codec::YamlCodec;
use crate::error::{Error, Result};
use crate::pattern::MatcherSet;
use serde_yaml::Mapping;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

/// Which keys to present
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    All,
    Key(&'a str),
}

/// `{key: {file: value, ...}}` with files in precedence order
pub fn provenance(catalog: &Catalog, matchers: &MatcherSet, key: &str) -> Result<Value> {
    let sources = catalog
        .ordered_sources(key, matchers)
        .ok_or_else(|| Error::KeyNotFound(key.to_owned()))?;

    let sources: Mapping = sources
        .into_iter()
        .map(|(file, value)| (Value::from(file), value.clone()))
        .collect();

    let mut block = Mapping::with_capacity(1);
    block.insert(Value::from(key), Value::Mapping(sources));
    Ok(Value::Mapping(block))
}

/// Render the selected keys
///
/// Yaml output is one block per key separated by an empty line, json output a single object.
pub fn render(
    catalog: &Catalog,
    matchers: &MatcherSet,
    selection: Selection,
    format: Format,
    codec: &impl YamlCodec,
) -> Result<String> {
    let keys = match selection {
        Selection::All => catalog.sorted_keys(),
        Selection::Key(key) => vec![key],
    };

    let blocks = keys
        .into_iter()
        .map(|key| provenance(catalog, matchers, key))
        .collect::<Result<Vec<_>>>()?;

    match format {
        Format::Yaml => {
            let mut rendered = String::new();
            for block in blocks {
                if !rendered.is_empty() {
                    rendered.push('\n');
                }
                let text = codec
                    .dump(&block)
                    .map_err(|e| Error::Render(Box::new(e)))?;
                rendered.push_str(&text);
            }
            Ok(rendered)
        }
        Format::Json => {
            let mut object = Mapping::new();
            for block in blocks {
                if let Value::Mapping(block) = block {
                    for (key, sources) in block {
                        object.insert(key, sources);
                    }
                }
            }

            to_json(&Value::Mapping(object))
        }
    }
}

/// Pretty printed json of `document`
///
/// Json only knows string keys. A mapping key of any other type (`80: http`) is an error instead of being turned
/// into a string, so json output never reads back different from the tree it came from.
pub fn to_json(document: &Value) -> Result<String> {
    ensure_string_keys(document, &mut vec![])?;

    let mut rendered =
        serde_json::to_string_pretty(document).map_err(|e| Error::Render(Box::new(e)))?;
    rendered.push('\n');
    Ok(rendered)
}

fn ensure_string_keys(value: &Value, location: &mut Vec<String>) -> Result<()> {
    match value {
        Value::Mapping(mapping) => {
            for (key, value) in mapping {
                let Value::String(key) = key else {
                    let key = serde_yaml::to_string(key).unwrap_or_default();
                    return Err(Error::Render(
                        format!(
                            "key {} at {} is not a string and cannot be written as json",
                            key.trim_end(),
                            location.join(" -> ")
                        )
                        .into(),
                    ));
                };

                location.push(key.clone());
                ensure_string_keys(value, location)?;
                location.pop();
            }
        }
        Value::Sequence(items) => {
            for item in items {
                ensure_string_keys(item, location)?;
            }
        }
        Value::Tagged(tagged) => ensure_string_keys(&tagged.value, location)?,
        _ => {}
    }

    Ok(())
}
