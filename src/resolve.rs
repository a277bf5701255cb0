//! Configuration merge.
//!
//! Each field is resolved independently. The first source that declares it
//! wins:
//!
//! ```text
//! route:       @page directive → route: directive → frontmatter → filename
//! title:       directive → frontmatter → filename
//! layout:      directive → frontmatter → unset
//! show_title:  directive → frontmatter → true
//! description: directive → frontmatter → unset
//! tags:        directive → frontmatter → empty
//! ```
//!
//! Filename-derived routes carry the base route prefix. Explicit routes are
//! used as written, with a leading `/` added if it is missing.
//!
//! Routes and layouts are written into single-line directives of the
//! artifact, so a declared value containing a line break or other control
//! character is dropped and the next source in line is used.

use crate::directives::CommentDirectives;
use crate::frontmatter::Frontmatter;
use crate::naming;
use crate::types::PageFields;
use tracing::warn;

/// The merged settings that drive artifact emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub route: String,
    pub title: String,
    /// Base name of the artifact, always derived from the filename.
    pub identifier: String,
    pub layout: Option<String>,
    pub show_title: bool,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// Frontmatter first, then every declared directive field on top.
pub fn merge_fields(
    frontmatter: Option<&Frontmatter>,
    directives: Option<&CommentDirectives>,
) -> PageFields {
    let mut merged = PageFields::default();
    if let Some(frontmatter) = frontmatter {
        merged.overlay(frontmatter);
    }
    if let Some(directives) = directives {
        merged.overlay(&directives.fields);
    }
    merged
}

/// Resolve the final settings for the document named `file_name`.
pub fn resolve(
    frontmatter: Option<&Frontmatter>,
    directives: Option<&CommentDirectives>,
    file_name: &str,
    base_route: Option<&str>,
) -> ResolvedConfig {
    let declared_route = directives.and_then(|d| d.route_directive.clone());
    let merged = merge_fields(frontmatter, directives);
    let stem = naming::file_stem(file_name);

    let explicit_route = single_line(declared_route, "route")
        .or_else(|| single_line(merged.route, "route"));
    let route = match explicit_route {
        Some(explicit) => normalize_route(explicit),
        None => naming::route_for(file_name, base_route),
    };

    ResolvedConfig {
        route,
        title: merged
            .title
            .unwrap_or_else(|| naming::title_from_name(stem)),
        identifier: naming::identifier_from_name(stem),
        layout: single_line(merged.layout, "layout"),
        show_title: merged.show_title.unwrap_or(true),
        description: merged.description,
        tags: merged.tags.unwrap_or_default(),
    }
}

/// `value`, unless it contains a control character.
fn single_line(value: Option<String>, field: &str) -> Option<String> {
    let value = value?;
    if value.chars().any(char::is_control) {
        warn!(field, value = ?value, "ignoring value with control characters");
        return None;
    }
    Some(value)
}

fn normalize_route(route: String) -> String {
    let route = route.trim();
    if route.starts_with('/') {
        route.to_string()
    } else {
        format!("/{route}")
    }
}
