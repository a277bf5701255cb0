//! End-to-end runs over a content tree on disk.

use md_pages::config::PagesConfig;
use md_pages::discover::{
    DirectoryProbe, DocumentDiscovery, ExistenceProbe, FsDiscovery, ProbeDiscovery, ProbeError,
};
use md_pages::generate::{generate, generate_dir};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Every file in `dir`, name → contents, sorted by name.
fn snapshot(dir: &Path) -> Vec<(String, String)> {
    let mut files: Vec<(String, String)> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .map(|p| {
            (
                p.file_name().unwrap().to_string_lossy().to_string(),
                fs::read_to_string(&p).unwrap(),
            )
        })
        .collect();
    files.sort();
    files
}

fn content_tree(root: &Path) {
    write(root, "about.md", "# About\n\nWho we are.\n");
    write(
        root,
        "getting-started.md",
        "---\ntitle: Start Here\ndescription: First steps\ntags: [intro, setup]\n---\n# Body\n",
    );
    write(
        root,
        "custom.md",
        "<!-- md-pages -->\n<!-- @page \"/custom/path\" -->\n<!-- showTitle: false -->\n# Custom\n",
    );
    write(root, "guides/User_Guide.md", "");
    write(root, "index.md", "Welcome\n");
}

// =========================================================================
// Generation
// =========================================================================

#[test]
fn about_page_scenario() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("content");
    let output = tmp.path().join("Pages");
    write(&source, "about.md", "# About\n\nWho we are.\n");

    generate_dir(&source, &output).unwrap();

    let text = fs::read_to_string(output.join("About.razor")).unwrap();
    assert_eq!(
        text,
        "@page \"/about\"\n\
         @using MarkdownPages.Components\n\
         \n\
         <PageTitle>About</PageTitle>\n\
         <h1>About</h1>\n\
         <MarkdownPage Src=\"content/about.md\"></MarkdownPage>\n"
    );
}

#[test]
fn full_tree() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("content");
    let output = tmp.path().join("out");
    content_tree(&source);

    let report = generate_dir(&source, &output).unwrap();
    assert_eq!(report.written.len(), 5);
    assert!(report.failures.is_empty());
    assert!(report.collisions.is_empty());

    let names: Vec<String> = snapshot(&output).into_iter().map(|(n, _)| n).collect();
    assert_eq!(
        names,
        vec![
            "About.razor",
            "Custom.razor",
            "GettingStarted.razor",
            "Index.razor",
            "UserGuide.razor",
        ]
    );

    let custom = fs::read_to_string(output.join("Custom.razor")).unwrap();
    assert!(custom.starts_with("@page \"/custom/path\"\n"));
    assert!(!custom.contains("<h1>"));

    let started = fs::read_to_string(output.join("GettingStarted.razor")).unwrap();
    assert!(started.starts_with("@page \"/getting-started\"\n"));
    assert!(started.contains("<PageTitle>Start Here</PageTitle>"));
    assert!(started.contains("<meta name=\"description\" content=\"First steps\">"));
    assert!(started.contains(
        "<div class=\"page-tags\"><span class=\"badge\">intro</span>\
         <span class=\"badge\">setup</span></div>"
    ));

    let guide = fs::read_to_string(output.join("UserGuide.razor")).unwrap();
    assert!(guide.starts_with("@page \"/user-guide\"\n"));
    assert!(guide.contains("<PageTitle>User Guide</PageTitle>"));
    assert!(guide.contains("Src=\"content/guides/User_Guide.md\""));

    let index = fs::read_to_string(output.join("Index.razor")).unwrap();
    assert!(index.starts_with("@page \"/\"\n"));
}

#[test]
fn generation_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("content");
    content_tree(&source);

    let first = tmp.path().join("first");
    let second = tmp.path().join("second");
    generate_dir(&source, &first).unwrap();
    generate_dir(&source, &second).unwrap();

    assert_eq!(snapshot(&first), snapshot(&second));
}

#[test]
fn malformed_frontmatter_does_not_stop_the_batch() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("content");
    let output = tmp.path().join("out");
    write(&source, "broken.md", "---\ntitle: [oops\n---\nBody\n");
    write(&source, "fine.md", "---\ntitle: Fine\n---\n");

    let report = generate_dir(&source, &output).unwrap();
    assert_eq!(report.written.len(), 2);
    let broken = fs::read_to_string(output.join("Broken.razor")).unwrap();
    assert!(broken.starts_with("@page \"/broken\"\n"));
    assert!(broken.contains("<PageTitle>Broken</PageTitle>"));
}

#[test]
fn configured_options_flow_through() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("docs");
    let output = tmp.path().join("out");
    write(&source, "about.md", "");
    write(&source, "nested/skipped.md", "");

    let mut config = PagesConfig {
        source_dir: source,
        output_dir: output.clone(),
        recursive: false,
        base_route: Some("docs".into()),
        ..PagesConfig::default()
    };
    config.emit.content_base = "_content/docs".into();
    config.emit.artifact_extension = "page".into();
    config.emit.renderer_namespace = "Site.Rendering".into();

    let report = generate(&config).unwrap();
    assert_eq!(report.written.len(), 1);

    let text = fs::read_to_string(output.join("About.page")).unwrap();
    assert!(text.starts_with("@page \"/docs/about\"\n@using Site.Rendering\n"));
    assert!(text.contains("Src=\"_content/docs/about.md\""));
}

#[test]
fn missing_source_is_not_an_error() {
    let tmp = TempDir::new().unwrap();
    let report = generate_dir(&tmp.path().join("nope"), &tmp.path().join("out")).unwrap();
    assert!(report.source_missing);
    assert!(report.written.is_empty());
}

// =========================================================================
// Discovery
// =========================================================================

#[tokio::test]
async fn route_map_scenario() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "home.md", "");
    write(tmp.path(), "about-us.md", "---\nroute: /team\n---\n");

    let routes = FsDiscovery::new(tmp.path(), "out")
        .discover_with_routes_async()
        .await
        .unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes["home.md"], "/home");
    assert_eq!(routes["about-us.md"], "/about-us");
}

#[tokio::test]
async fn probe_discovery_over_directory() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "home.md", "");
    write(tmp.path(), "about-us.md", "");

    let discovery = ProbeDiscovery::new(DirectoryProbe::new(tmp.path()), tmp.path(), "out")
        .with_candidates(["home.md", "about-us.md", "contact.md"]);
    let routes = discovery.discover_with_routes_async().await.unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes["home.md"], "/home");
    assert_eq!(routes["about-us.md"], "/about-us");

    write(tmp.path(), "contact.md", "");
    assert_eq!(discovery.discover_async().await.unwrap().len(), 2);
    discovery.invalidate();
    assert_eq!(discovery.discover_async().await.unwrap().len(), 3);
}

struct Unreachable;

#[async_trait::async_trait]
impl ExistenceProbe for Unreachable {
    async fn exists(&self, name: &str) -> Result<bool, ProbeError> {
        Err(ProbeError::Failed(format!("{name}: host unreachable")))
    }
}

#[tokio::test]
async fn failed_probes_yield_no_documents() {
    let discovery =
        ProbeDiscovery::new(Unreachable, "content", "out").with_candidates(["home.md"]);
    assert!(discovery.discover_async().await.unwrap().is_empty());
}
