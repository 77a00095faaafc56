//! yaml codec
//!
//! Reading and writing of yaml text goes through [YamlCodec] so the pipeline never depends on a concrete yaml
//! library. [SerdeYaml] is the implementation used by the binary.
use serde_yaml::Value;

pub trait YamlCodec {
    /// Decode a document. An empty document (no content, only comments or an explicit `~`) is `None`.
    fn load(&self, text: &str) -> Result<Option<Value>, serde_yaml::Error>;

    /// Encode a value as a block style document
    ///
    /// The document must read back as the same value through [YamlCodec::load].
    fn dump(&self, value: &Value) -> Result<String, serde_yaml::Error>;
}

/// [YamlCodec] backed by [serde_yaml]
///
/// Output is always block style with two space indentation and no line wrapping.
///
/// Documents are read and written as YAML 1.2: only `true`/`false` are booleans and only `null`/`~` is null, so those
/// strings are quoted on output. The YAML 1.1 words `yes`, `no`, `on`, `off`, `y` and `n` are plain strings in 1.2
/// and are written unquoted. Generated files read back unchanged here, but a YAML 1.1 consumer such as ruby's psych
/// reads them as booleans.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerdeYaml;

impl YamlCodec for SerdeYaml {
    fn load(&self, text: &str) -> Result<Option<Value>, serde_yaml::Error> {
        use serde::Deserialize;

        // a stream without documents (blank or comments only) yields no deserializer at all
        let Some(document) = serde_yaml::Deserializer::from_str(text).next() else {
            return Ok(None);
        };

        match Value::deserialize(document)? {
            Value::Null => Ok(None),
            value => Ok(Some(value)),
        }
    }

    fn dump(&self, value: &Value) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(value)
    }
}
