//! Page artifact rendering.
//!
//! Every document becomes one Razor-style page component:
//!
//! ```text
//! @page "/docs/getting-started"
//! @layout DocsLayout
//! @using MarkdownPages.Components
//!
//! <PageTitle>Getting Started</PageTitle>
//! <HeadContent><meta name="description" content="First steps"></HeadContent>
//! <h1>Getting Started</h1>
//! <MarkdownPage Src="content/getting-started.md"></MarkdownPage>
//! <div class="page-tags"><span class="badge">intro</span></div>
//! ```
//!
//! The `@layout`, `<HeadContent>`, `<h1>`, and tag lines are only present
//! when the resolved settings call for them. The artifact references the
//! content rather than embedding it: the rendering component loads the
//! document at presentation time.
//!
//! Markup is built with [maud](https://maud.lambda.xyz/), so titles and
//! descriptions are HTML-escaped. `@` is doubled so the page framework does
//! not read user text as code. Output depends only on its inputs.

use crate::config::EmitConfig;
use crate::resolve::ResolvedConfig;
use maud::{Markup, html};

/// Render the artifact text for one document.
pub fn render_artifact(config: &ResolvedConfig, emit: &EmitConfig, content_ref: &str) -> String {
    let mut lines = vec![format!("@page \"{}\"", quote_escape(&config.route))];
    if let Some(layout) = &config.layout {
        lines.push(format!("@layout {}", layout.trim()));
    }
    lines.push(format!("@using {}", emit.renderer_namespace.trim()));
    lines.push(String::new());

    lines.push(page_title(&config.title).into_string());
    if let Some(description) = &config.description {
        lines.push(head_content(description).into_string());
    }
    if config.show_title {
        lines.push(heading(&config.title).into_string());
    }
    lines.push(content_embed(content_ref).into_string());
    if !config.tags.is_empty() {
        lines.push(tag_badges(&config.tags).into_string());
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Where the rendering component finds a document: `content_base` joined with
/// the document's source-relative path.
pub fn content_ref(content_base: &str, source_path: &str) -> String {
    let base = content_base.trim_matches('/');
    let path = source_path.trim_start_matches('/');
    if base.is_empty() {
        path.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// Artifact file name: identifier plus the configured extension.
pub fn artifact_file_name(identifier: &str, emit: &EmitConfig) -> String {
    format!(
        "{}.{}",
        identifier,
        emit.artifact_extension.trim_start_matches('.')
    )
}

fn page_title(title: &str) -> Markup {
    html! { PageTitle { (razor_text(title)) } }
}

fn head_content(description: &str) -> Markup {
    html! {
        HeadContent {
            meta name="description" content=(razor_text(description));
        }
    }
}

fn heading(title: &str) -> Markup {
    html! { h1 { (razor_text(title)) } }
}

fn content_embed(content_ref: &str) -> Markup {
    html! { MarkdownPage Src=(razor_text(content_ref)) {} }
}

fn tag_badges(tags: &[String]) -> Markup {
    html! {
        div class="page-tags" {
            @for tag in tags {
                span class="badge" { (razor_text(tag)) }
            }
        }
    }
}

/// Double `@` so it renders literally.
fn razor_text(text: &str) -> String {
    text.replace('@', "@@")
}

/// Escape for the inside of a C#-style string literal. Line breaks are
/// escaped so the literal stays on its directive line.
fn quote_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    escaped
}
