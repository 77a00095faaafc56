//! error taxonomy shared by all stages of a run
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid hierarchy template {template:?}: {reason}")]
    Compilation { template: String, reason: String },

    #[error("{}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {reason}", path.display())]
    Schema { path: PathBuf, reason: String },

    #[error("{}: unable to parse yaml", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Key {0:?} does not exist")]
    KeyNotFound(String),

    #[error("Aborted")]
    AbortedByUser,

    #[error("{}: target directory already exists", .0.display())]
    TargetExists(PathBuf),

    #[error("unable to render output")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn filesystem(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.as_ref().to_owned(),
            source,
        }
    }

    pub(crate) fn schema(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Error::Schema {
            path: path.as_ref().to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn compilation(template: &str, reason: impl Into<String>) -> Self {
        Error::Compilation {
            template: template.to_owned(),
            reason: reason.into(),
        }
    }
}
