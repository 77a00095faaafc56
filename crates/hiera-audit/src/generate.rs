//! tree generator
//!
//! Expands a [Catalog] back into one yaml document per source file below a root directory.
//! Generation is not transactional: files written before a failure stay on disk.
use crate::catalog::{Catalog, Value};
use crate::codec::YamlCodec;
use crate::error::{Error, Result};
use std::path::{Component, Path};

/// Decides whether generation may write into an already existing root
pub trait Confirm {
    fn confirm(&mut self, root: &Path) -> bool;
}

// blanket impl for FnMut
impl<F> Confirm for F
where
    F: FnMut(&Path) -> bool,
{
    fn confirm(&mut self, root: &Path) -> bool {
        self(root)
    }
}

/// What to do when the root already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existing {
    /// ask [Confirm]
    Ask,
    /// fail with [Error::TargetExists]
    Refuse,
}

/// Write every file of `catalog` below `root`
///
/// Returns the generated root-relative file paths in the order they were written.
pub fn generate(
    catalog: &Catalog,
    root: &Path,
    existing: Existing,
    confirm: &mut impl Confirm,
    codec: &impl YamlCodec,
) -> Result<Vec<String>> {
    if root.exists() {
        match existing {
            Existing::Refuse => return Err(Error::TargetExists(root.to_owned())),
            Existing::Ask => {
                if !confirm.confirm(root) {
                    return Err(Error::AbortedByUser);
                }
                tracing::info!(root=%root.display(), "writing into existing directory");
            }
        }
    }

    let files = catalog.invert();

    // validate all paths before touching the filesystem
    for file in files.keys() {
        check_relative(file)?;
    }

    std::fs::create_dir_all(root).map_err(|e| Error::filesystem(root, e))?;

    let mut written = Vec::with_capacity(files.len());
    for (file, keys) in files {
        let path = root.join(&file);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::filesystem(parent, e))?;
        }

        let text = codec
            .dump(&Value::Mapping(keys))
            .map_err(|e| Error::Render(Box::new(e)))?;
        std::fs::write(&path, text).map_err(|e| Error::filesystem(&path, e))?;

        tracing::debug!(file, "generated");
        written.push(file);
    }

    tracing::info!(root=%root.display(), files = written.len(), "hierarchy generated");
    Ok(written)
}

/// Catalog paths must stay below the root
fn check_relative(file: &str) -> Result<()> {
    let escapes = file.is_empty()
        || Path::new(file)
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));

    if escapes {
        return Err(Error::filesystem(
            file,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path is not relative to the hierarchy root",
            ),
        ));
    }

    Ok(())
}
