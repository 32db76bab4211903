//! Conformance tests that run YAML fixtures against atoma
//!
//! Run with: cargo test -p atoma-test --test conformance --features atoma-test/fixtures
//!
//! Note: This test file requires the `fixtures` feature to be enabled.

#![cfg(feature = "fixtures")]

use atoma_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the fixtures directory at the workspace root
fn fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .parent() // ext
        .and_then(|p| p.parent()) // workspace root
        .expect("Could not find workspace root")
        .join("fixtures")
}

/// Load and run all fixtures in a directory
fn run_fixtures_in_dir(dir: &Path) {
    if !dir.exists() {
        panic!("Fixtures directory does not exist: {}", dir.display());
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").path())
        .collect();
    entries.sort();

    for path in entries {
        if path
            .extension()
            .map_or(false, |e| e == "yaml" || e == "yml")
        {
            println!("Running fixture: {}", path.display());

            let yaml = fs::read_to_string(&path).expect("read yaml");

            // Parse potentially multiple fixtures (separated by ---)
            let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
                panic!("Failed to parse {}: {}", path.display(), e);
            });

            for fixture in fixtures {
                println!("  Running: {}", fixture.name);
                fixture.run_and_assert();
            }
        }
    }
}

#[test]
fn test_basics() {
    run_fixtures_in_dir(&fixtures_dir().join("01_basics"));
}

#[test]
fn test_aliases() {
    run_fixtures_in_dir(&fixtures_dir().join("02_aliases"));
}

#[test]
fn test_shortcuts() {
    run_fixtures_in_dir(&fixtures_dir().join("03_shortcuts"));
}

#[test]
fn test_overrides() {
    run_fixtures_in_dir(&fixtures_dir().join("04_overrides"));
}

#[test]
fn test_rendering() {
    run_fixtures_in_dir(&fixtures_dir().join("05_rendering"));
}
