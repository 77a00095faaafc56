//! Snapshot tests
//!
//! Reads the fixture hierarchy in /tests/fixtures/basic and compares if the
//! rendered provenance or the persisted catalog changes.

use hiera_audit::codec::{SerdeYaml, YamlCodec};
use hiera_audit::hierarchy::Hierarchy;
use hiera_audit::pattern::MatcherSet;
use hiera_audit::present::{self, Format, Selection};
use std::path::PathBuf;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/basic")
}

fn read_fixture() -> (hiera_audit::catalog::Build, MatcherSet) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("HIERA_AUDIT_LOG"))
        .with_writer(std::io::stderr)
        .try_init();

    let hierarchy = Hierarchy::load(&fixture().join("hiera.yaml"), ":hierarchy", &SerdeYaml)
        .expect("fixture hierarchy must load");
    let matchers = MatcherSet::compile(hierarchy.templates(), "yaml", &[]).unwrap();

    let root = fixture().join("data");
    let classification = hiera_audit::scan::scan(&root, &matchers).unwrap();
    let build = hiera_audit::catalog::build(&root, &classification, &SerdeYaml)
        .expect("fixture must be a valid hierarchy");

    (build, matchers)
}

#[test]
fn provenance() {
    let (build, matchers) = read_fixture();
    assert_eq!(build.empty_files, vec!["empty/common.yaml"]);

    let rendered = present::render(
        &build.catalog,
        &matchers,
        Selection::All,
        Format::Yaml,
        &SerdeYaml,
    )
    .unwrap();

    insta::assert_snapshot!("basic_provenance", rendered);
}

#[test]
fn persisted_catalog() {
    let (build, matchers) = read_fixture();

    let rendered = SerdeYaml
        .dump(&build.catalog.to_document(&matchers))
        .unwrap();

    insta::assert_snapshot!("basic_catalog", rendered);
}
