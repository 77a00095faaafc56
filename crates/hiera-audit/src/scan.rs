//! hierarchy scanner
//!
//! Walks a hierarchy root and files every path under each [Matcher] it matches. Paths are relative to the root and
//! always use `/` as separator. A path can end up in several buckets, or in none. Symbolic links are skipped.
use crate::error::{Error, Result};
use crate::pattern::{Matcher, MatcherSet};
use std::path::Path;

/// Files assigned to one hierarchy level, in discovery order
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub rank: usize,
    pub template: String,
    pub files: Vec<String>,
}

/// Result of a scan, one [Bucket] per matcher in rank order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Classification {
    buckets: Vec<Bucket>,
}

impl Classification {
    pub fn new(matchers: &MatcherSet) -> Self {
        Self {
            buckets: matchers
                .iter()
                .map(|Matcher { rank, template, .. }| Bucket {
                    rank: *rank,
                    template: template.clone(),
                    files: vec![],
                })
                .collect(),
        }
    }

    /// Offer a root-relative path to every matcher; returns how many buckets took it
    pub fn classify(&mut self, matchers: &MatcherSet, path: &str) -> usize {
        let mut hits = 0;
        for (matcher, bucket) in matchers.iter().zip(self.buckets.iter_mut()) {
            if matcher.is_match(path) {
                bucket.files.push(path.to_owned());
                hits += 1;
            }
        }

        match hits {
            0 => tracing::trace!(path, "file matches no hierarchy level"),
            1 => tracing::trace!(path, "file classified"),
            _ => tracing::debug!(path, hits, "file matches several hierarchy levels"),
        }

        hits
    }

    pub fn bucket(&self, rank: usize) -> Option<&Bucket> {
        self.buckets.get(rank)
    }

    pub fn buckets(&self) -> impl DoubleEndedIterator<Item = &Bucket> {
        self.buckets.iter()
    }
}

/// Walk `root` and classify every file below it
pub fn scan(root: &Path, matchers: &MatcherSet) -> Result<Classification> {
    tracing::info!(root=%root.display(), levels = matchers.len(), "scanning hierarchy root");

    let metadata = std::fs::metadata(root).map_err(|e| Error::filesystem(root, e))?;
    if !metadata.is_dir() {
        return Err(Error::filesystem(root, std::io::Error::other("not a directory")));
    }

    let mut classification = Classification::new(matchers);

    for entry in walkdir::WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_owned();
            Error::filesystem(path, e.into())
        })?;

        // symlinks are never followed, a linked file is not part of the hierarchy
        if !entry.file_type().is_file() {
            tracing::trace!(path=%entry.path().display(), "skipping non-regular file");
            continue;
        }

        let path = relative_path(root, entry.path());
        classification.classify(matchers, &path);
    }

    Ok(classification)
}

/// Root-relative path with `/` separators
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
