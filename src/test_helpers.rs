//! Shared test utilities.
//!
//! Fixture writers for content trees and lookups that panic with a useful
//! message on a miss.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_docs(tmp.path(), &[("about.md", "# About"), ("guides/setup.md", "")]);
//! let report = generate(&config_for(tmp.path(), &tmp.path().join("out"))).unwrap();
//! let about = find_artifact(&report, "about.md");
//! ```

use std::fs;
use std::path::Path;

use crate::config::PagesConfig;
use crate::generate::{GenerateReport, PageArtifact};

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `(relative path, contents)` pairs under `root`, creating directories.
pub fn write_docs(root: &Path, docs: &[(&str, &str)]) {
    for (rel, contents) in docs {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
    }
}

/// Default config pointed at `source` and `output`.
pub fn config_for(source: &Path, output: &Path) -> PagesConfig {
    PagesConfig {
        source_dir: source.to_path_buf(),
        output_dir: output.to_path_buf(),
        ..PagesConfig::default()
    }
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find the artifact generated from `source`. Panics if not found.
pub fn find_artifact<'a>(report: &'a GenerateReport, source: &str) -> &'a PageArtifact {
    report
        .written
        .iter()
        .find(|a| a.source == source)
        .unwrap_or_else(|| {
            let sources: Vec<&str> = report.written.iter().map(|a| a.source.as_str()).collect();
            panic!("artifact for '{source}' not found. Available: {sources:?}")
        })
}

/// Read a written artifact. Panics with the directory listing if missing.
pub fn read_artifact(output: &Path, file_name: &str) -> String {
    fs::read_to_string(output.join(file_name)).unwrap_or_else(|_| {
        let names: Vec<String> = fs::read_dir(output)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default();
        panic!("artifact '{file_name}' not found. Available: {names:?}")
    })
}
