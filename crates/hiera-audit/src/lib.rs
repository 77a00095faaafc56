//! # hiera-audit - audit and regenerate hierarchy-driven configuration trees
//!
//! ## Introduction for developers
//!
//! Read this to understand how `hiera-audit` works internally.
//!
//! ### Terms
//!
//! - a **hierarchy** is an ordered list of path templates, most specific first
//! - ...where a **template** is a path with `%{placeholder}`s, e.g. `%{environment}/nodes/%{fqdn}`
//! - ...and its position in the list is its **rank** (0 wins over everything else)
//! - a **configuration file** is a yaml mapping of keys to values living below the hierarchy **root**
//!
//! ### Compiling the hierarchy
//!
//! see [pattern::MatcherSet::compile]
//!
//! The hierarchy definition ([hierarchy::Hierarchy]) is compiled into one [pattern::Matcher] per template. Each
//! placeholder becomes a wildcard for a single path segment and the pattern is anchored to the end of the path.
//! Optional literal [config::Substitution]s rewrite templates before that happens.
//!
//! ### Scanning
//!
//! see [scan::scan]
//!
//! Every file below the root is offered to every matcher. The result is a [scan::Classification]: one bucket of
//! root-relative paths per matcher. A file may land in several buckets, files matching nothing are ignored.
//!
//! ### Building the catalog
//!
//! see [catalog::build]
//!
//! All classified files are read (least specific level first) and every key they define is recorded in the
//! [catalog::Catalog] together with the file and its value.
//!
//! | **key**   | **file**          | **value** |
//! |-----------|-------------------|-----------|
//! | `db_host` | `common.yaml`     | `b`       |
//! | `db_host` | `prod/role.yaml`  | `a`       |
//! | `port`    | `common.yaml`     | `5432`    |
//!
//! Nothing gets resolved. Deciding which value wins is left to the reader of the output.
//!
//! ### Output
//!
//! [present::render] lists keys alphabetically and orders each key's files by [pattern::MatcherSet::rank_of], the
//! rank of the first matcher a file matches.
//!
//! The whole catalog can also be written to a file ([catalog::Catalog::to_document]) and later turned back into a
//! tree of configuration files with [generate::generate].
//!
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod generate;
pub mod hierarchy;
pub mod pattern;
pub mod present;
pub mod scan;

pub use error::{Error, Result};
