//! Page artifact generation.
//!
//! Turns every content document under the source directory into one page
//! artifact in the output directory:
//!
//! ```text
//! content/                          Pages/Generated/
//! ├── about.md              →       ├── About.razor
//! ├── getting-started.md    →       ├── GettingStarted.razor
//! └── guides/                       └── Setup.razor
//!     └── setup.md          →
//! ```
//!
//! ## Per-Document Flow
//!
//! ```text
//! raw text → frontmatter → comment directives (on the remainder)
//!          → resolve (with filename defaults) → render → write
//! ```
//!
//! ## Output Layout
//!
//! Artifacts are written flat. Nested source directories are not mirrored,
//! so `a/setup.md` and `b/setup.md` both produce `Setup.razor`. Writes happen
//! in sorted source order, so the last one wins deterministically. Every such
//! collision is logged and listed in the [`GenerateReport`].
//!
//! ## Failure Model
//!
//! Only an invalid [`PagesConfig`] stops a run, and it is rejected before the
//! filesystem is touched. A missing source directory yields an empty report.
//! A document that cannot be read or written is logged, recorded as a
//! [`Failure`], and skipped; the rest of the batch still runs. Artifacts
//! already written are never rolled back.
//!
//! ## Parallel Processing
//!
//! Documents are read and rendered in parallel using
//! [rayon](https://docs.rs/rayon). Writing is sequential.

use crate::config::{ConfigError, PagesConfig};
use crate::directives::parse_directives;
use crate::discover::{DiscoveryError, DocumentDiscovery, FsDiscovery};
use crate::emit::{artifact_file_name, content_ref, render_artifact};
use crate::frontmatter::{parse_frontmatter, try_parse_frontmatter};
use crate::resolve::{ResolvedConfig, resolve};
use crate::types::ContentDocument;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),
}

/// One rendered page, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageArtifact {
    /// Source-relative document path.
    pub source: String,
    /// Artifact file name inside the output directory.
    pub file_name: String,
    pub route: String,
    pub title: String,
    pub text: String,
}

/// A document that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub source: String,
    pub error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// Two documents produced the same artifact file name.
    ArtifactName,
    /// Two documents resolved to the same route.
    Route,
}

/// Two documents competing for one artifact name or route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub kind: CollisionKind,
    /// The artifact name or route both documents share.
    pub key: String,
    /// Document written first.
    pub replaced: String,
    /// Document written last. Its artifact is the one on disk.
    pub kept: String,
}

/// Outcome of a generation run.
#[derive(Debug, Default)]
pub struct GenerateReport {
    /// Every artifact written, in write order.
    pub written: Vec<PageArtifact>,
    pub failures: Vec<Failure>,
    pub collisions: Vec<Collision>,
    /// Set when the source directory did not exist.
    pub source_missing: bool,
}

/// Render one document. Pure: no I/O.
pub fn process_document(document: &ContentDocument, config: &PagesConfig) -> PageArtifact {
    let _span = info_span!("document", path = %document.path).entered();

    let (frontmatter, rest) = parse_frontmatter(&document.raw_text);
    let (directives, _) = parse_directives(rest);
    let resolved = resolve(
        frontmatter.as_ref(),
        directives.as_ref(),
        document.file_name(),
        config.route_prefix(),
    );
    debug!(
        route = %resolved.route,
        identifier = %resolved.identifier,
        frontmatter = frontmatter.is_some(),
        directives = directives.is_some(),
        "resolved page settings"
    );

    let reference = content_ref(&config.emit.content_base, &document.path);
    PageArtifact {
        source: document.path.clone(),
        file_name: artifact_file_name(&resolved.identifier, &config.emit),
        text: render_artifact(&resolved, &config.emit, &reference),
        route: resolved.route,
        title: resolved.title,
    }
}

/// Generate artifacts for every document under `config.source_dir`.
pub fn generate(config: &PagesConfig) -> Result<GenerateReport, GenerateError> {
    config.validate()?;

    let mut report = GenerateReport::default();
    if !config.source_dir.is_dir() {
        warn!(
            source = %config.source_dir.display(),
            "source directory does not exist; no artifacts generated"
        );
        report.source_missing = true;
        return Ok(report);
    }

    let documents = FsDiscovery::from_config(config).discover()?;
    fs::create_dir_all(&config.output_dir)?;
    info!(
        count = documents.len(),
        source = %config.source_dir.display(),
        output = %config.output_dir.display(),
        "generating page artifacts"
    );

    let rendered: Vec<Result<PageArtifact, Failure>> = documents
        .par_iter()
        .map(|path| {
            load_document(&config.source_dir, path)
                .map(|document| process_document(&document, config))
                .map_err(|e| Failure {
                    source: path.clone(),
                    error: format!("read failed: {e}"),
                })
        })
        .collect();

    let mut names: HashMap<String, String> = HashMap::new();
    let mut routes: HashMap<String, String> = HashMap::new();
    for result in rendered {
        let artifact = match result {
            Ok(artifact) => artifact,
            Err(failure) => {
                warn!(path = %failure.source, error = %failure.error, "skipping document");
                report.failures.push(failure);
                continue;
            }
        };

        let target = config.output_dir.join(&artifact.file_name);
        if let Err(e) = fs::write(&target, &artifact.text) {
            warn!(
                path = %artifact.source,
                target = %target.display(),
                error = %e,
                "skipping document"
            );
            report.failures.push(Failure {
                source: artifact.source,
                error: format!("write failed: {e}"),
            });
            continue;
        }

        record(
            &mut report,
            &mut names,
            CollisionKind::ArtifactName,
            &artifact.file_name,
            &artifact.source,
        );
        record(
            &mut report,
            &mut routes,
            CollisionKind::Route,
            &artifact.route,
            &artifact.source,
        );
        info!(
            path = %artifact.source,
            artifact = %artifact.file_name,
            route = %artifact.route,
            "wrote page artifact"
        );
        report.written.push(artifact);
    }

    Ok(report)
}

/// Generate with stock settings from `source` into `output`.
pub fn generate_dir(source: &Path, output: &Path) -> Result<GenerateReport, GenerateError> {
    generate(&PagesConfig {
        source_dir: source.to_path_buf(),
        output_dir: output.to_path_buf(),
        ..PagesConfig::default()
    })
}

fn load_document(source_dir: &Path, path: &str) -> std::io::Result<ContentDocument> {
    let raw_text = fs::read_to_string(source_dir.join(path))?;
    Ok(ContentDocument::new(path, raw_text))
}

/// Note `source` as the owner of `key`, recording a collision if it had one.
fn record(
    report: &mut GenerateReport,
    seen: &mut HashMap<String, String>,
    kind: CollisionKind,
    key: &str,
    source: &str,
) {
    if let Some(previous) = seen.insert(key.to_string(), source.to_string()) {
        warn!(
            kind = ?kind,
            key,
            replaced = %previous,
            kept = source,
            "documents collide; last write wins"
        );
        report.collisions.push(Collision {
            kind,
            key: key.to_string(),
            replaced: previous,
            kept: source.to_string(),
        });
    }
}

// ============================================================================
// Check
// ============================================================================

/// What the frontmatter parser made of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockStatus {
    Absent,
    Parsed,
    /// Malformed block; generation falls back to filename defaults.
    Invalid(String),
}

/// Result of inspecting one document without writing anything.
#[derive(Debug, Clone)]
pub struct DocumentCheck {
    pub source: String,
    pub frontmatter: BlockStatus,
    pub directives: bool,
    pub resolved: ResolvedConfig,
    pub file_name: String,
}

/// Outcome of a check run.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub source_dir: PathBuf,
    pub documents: Vec<DocumentCheck>,
    pub failures: Vec<Failure>,
}

impl CheckReport {
    /// Documents whose frontmatter could not be parsed.
    pub fn invalid(&self) -> impl Iterator<Item = &DocumentCheck> {
        self.documents
            .iter()
            .filter(|d| matches!(d.frontmatter, BlockStatus::Invalid(_)))
    }
}

/// Parse and resolve every document, reporting what each declares.
pub fn check(config: &PagesConfig) -> Result<CheckReport, GenerateError> {
    config.validate()?;
    let mut report = CheckReport {
        source_dir: config.source_dir.clone(),
        ..CheckReport::default()
    };

    for path in FsDiscovery::from_config(config).discover()? {
        match load_document(&config.source_dir, &path) {
            Ok(document) => report.documents.push(check_document(&document, config)),
            Err(e) => report.failures.push(Failure {
                source: path,
                error: format!("read failed: {e}"),
            }),
        }
    }
    Ok(report)
}

/// Inspect one document. Pure: no I/O.
pub fn check_document(document: &ContentDocument, config: &PagesConfig) -> DocumentCheck {
    let (frontmatter, status, rest) = match try_parse_frontmatter(&document.raw_text) {
        Ok(Some((frontmatter, rest))) => (Some(frontmatter), BlockStatus::Parsed, rest),
        Ok(None) => (None, BlockStatus::Absent, document.raw_text.as_str()),
        Err(e) => (None, BlockStatus::Invalid(e.to_string()), document.raw_text.as_str()),
    };
    let (directives, _) = parse_directives(rest);
    let resolved = resolve(
        frontmatter.as_ref(),
        directives.as_ref(),
        document.file_name(),
        config.route_prefix(),
    );
    DocumentCheck {
        source: document.path.clone(),
        frontmatter: status,
        directives: directives.is_some(),
        file_name: artifact_file_name(&resolved.identifier, &config.emit),
        resolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn doc(path: &str, text: &str) -> ContentDocument {
        ContentDocument::new(path, text)
    }

    // =========================================================================
    // process_document
    // =========================================================================

    #[test]
    fn plain_document_uses_filename_defaults() {
        let artifact =
            process_document(&doc("about.md", "# About us\n"), &PagesConfig::default());
        assert_eq!(artifact.file_name, "About.razor");
        assert_eq!(artifact.route, "/about");
        assert_eq!(artifact.title, "About");
        assert!(artifact.text.starts_with("@page \"/about\"\n"));
        assert!(artifact.text.contains("<PageTitle>About</PageTitle>"));
        assert!(artifact.text.contains("<h1>About</h1>"));
        assert!(artifact.text.contains("<MarkdownPage Src=\"content/about.md\"></MarkdownPage>"));
    }

    #[test]
    fn explicit_route_directive() {
        let text = "<!-- md-pages -->\n<!-- @page \"/custom/path\" -->\n# Body\n";
        let artifact = process_document(&doc("page.md", text), &PagesConfig::default());
        assert_eq!(artifact.route, "/custom/path");
        assert!(artifact.text.starts_with("@page \"/custom/path\"\n"));
    }

    #[test]
    fn directives_after_frontmatter_override_it() {
        let text = "---\ntitle: A\ndescription: D\n---\n\
                    <!-- md-pages -->\n<!-- title: B -->\nBody\n";
        let artifact = process_document(&doc("page.md", text), &PagesConfig::default());
        assert_eq!(artifact.title, "B");
        assert!(artifact.text.contains("content=\"D\""));
    }

    #[test]
    fn malformed_frontmatter_falls_back_to_defaults() {
        let text = "---\ntitle: [unclosed\n---\nBody\n";
        let artifact = process_document(&doc("broken-page.md", text), &PagesConfig::default());
        assert_eq!(artifact.title, "Broken Page");
        assert_eq!(artifact.route, "/broken-page");
    }

    #[test]
    fn nested_document_references_its_path() {
        let artifact = process_document(&doc("guides/setup.md", ""), &PagesConfig::default());
        assert_eq!(artifact.file_name, "Setup.razor");
        assert!(artifact.text.contains("Src=\"content/guides/setup.md\""));
    }

    #[test]
    fn base_route_prefixes_default_routes_only() {
        let config = PagesConfig {
            base_route: Some("docs".into()),
            ..PagesConfig::default()
        };
        let plain = process_document(&doc("about.md", ""), &config);
        assert_eq!(plain.route, "/docs/about");

        let explicit = process_document(&doc("about.md", "---\nroute: /team\n---\n"), &config);
        assert_eq!(explicit.route, "/team");
    }

    // =========================================================================
    // generate
    // =========================================================================

    #[test]
    fn writes_one_artifact_per_document() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("out");
        write_docs(
            &source,
            &[("about.md", "# About"), ("getting-started.md", ""), ("notes.txt", "")],
        );

        let report = generate(&config_for(&source, &output)).unwrap();
        assert_eq!(report.written.len(), 2);
        assert!(report.failures.is_empty());
        assert!(report.collisions.is_empty());

        let about = read_artifact(&output, "About.razor");
        assert_eq!(about, find_artifact(&report, "about.md").text);
        read_artifact(&output, "GettingStarted.razor");
    }

    #[test]
    fn output_is_flat() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("out");
        write_docs(&source, &[("guides/deep/setup.md", "")]);

        generate(&config_for(&source, &output)).unwrap();
        assert!(output.join("Setup.razor").is_file());
        assert!(!output.join("guides").exists());
    }

    #[test]
    fn colliding_names_last_write_wins() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("out");
        write_docs(
            &source,
            &[
                ("a/setup.md", "---\ntitle: First\n---\n"),
                ("b/setup.md", "---\ntitle: Second\n---\n"),
            ],
        );

        let report = generate(&config_for(&source, &output)).unwrap();
        assert!(read_artifact(&output, "Setup.razor").contains("<PageTitle>Second</PageTitle>"));

        let kinds: Vec<CollisionKind> = report.collisions.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CollisionKind::ArtifactName, CollisionKind::Route]);
        assert_eq!(report.collisions[0].replaced, "a/setup.md");
        assert_eq!(report.collisions[0].kept, "b/setup.md");
    }

    #[test]
    fn missing_source_generates_nothing() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("out");
        let report = generate(&config_for(&tmp.path().join("missing"), &output)).unwrap();
        assert!(report.source_missing);
        assert!(report.written.is_empty());
    }

    #[test]
    fn output_directory_is_created() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("deep/nested/out");
        write_docs(&source, &[("about.md", "")]);

        generate(&config_for(&source, &output)).unwrap();
        assert!(output.join("About.razor").is_file());
    }

    #[test]
    fn unreadable_document_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("out");
        write_docs(&source, &[("good.md", "")]);
        fs::write(source.join("binary.md"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let report = generate(&config_for(&source, &output)).unwrap();
        assert_eq!(report.written.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source, "binary.md");
        assert!(output.join("Good.razor").is_file());
    }

    #[test]
    fn invalid_config_fails_before_touching_disk() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("out");
        let config = PagesConfig {
            extension: String::new(),
            ..config_for(tmp.path(), &output)
        };
        assert!(matches!(generate(&config), Err(GenerateError::Config(_))));
        assert!(!output.exists());
    }

    #[test]
    fn generate_dir_uses_stock_settings() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("out");
        write_docs(&source, &[("index.md", "")]);

        let report = generate_dir(&source, &output).unwrap();
        assert_eq!(find_artifact(&report, "index.md").route, "/");
        read_artifact(&output, "Index.razor");
    }

    #[test]
    fn rerun_overwrites_with_identical_bytes() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("out");
        write_docs(&source, &[("about.md", "---\ntags: [a, b]\n---\n")]);

        let config = config_for(&source, &output);
        generate(&config).unwrap();
        let first = read_artifact(&output, "About.razor");
        generate(&config).unwrap();
        assert_eq!(read_artifact(&output, "About.razor"), first);
    }

    // =========================================================================
    // check
    // =========================================================================

    #[test]
    fn check_reports_block_status() {
        let tmp = TempDir::new().unwrap();
        write_docs(
            tmp.path(),
            &[
                ("plain.md", "# Plain"),
                ("front.md", "---\ntitle: Front\n---\n"),
                ("broken.md", "---\ntitle: x\n"),
                ("marked.md", "<!-- md-pages -->\n<!-- title: Marked -->\n"),
            ],
        );

        let report = check(&config_for(tmp.path(), &tmp.path().join("out"))).unwrap();
        let status = |source: &str| {
            report
                .documents
                .iter()
                .find(|d| d.source == source)
                .unwrap()
        };
        assert_eq!(status("plain.md").frontmatter, BlockStatus::Absent);
        assert_eq!(status("front.md").frontmatter, BlockStatus::Parsed);
        assert!(matches!(status("broken.md").frontmatter, BlockStatus::Invalid(_)));
        assert!(status("marked.md").directives);
        assert_eq!(status("marked.md").resolved.title, "Marked");
        assert_eq!(report.invalid().count(), 1);
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn check_document_matches_generation() {
        let document = doc("getting-started.md", "<!-- md-pages -->\n<!-- @page \"/start\" -->\n");
        let config = PagesConfig::default();
        let checked = check_document(&document, &config);
        let artifact = process_document(&document, &config);
        assert_eq!(checked.resolved.route, artifact.route);
        assert_eq!(checked.file_name, artifact.file_name);
    }
}
