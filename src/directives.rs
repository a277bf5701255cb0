//! Comment-directive configuration.
//!
//! The alternative to frontmatter: a run of one-line HTML comments at the
//! top of the document, opened by a marker comment.
//!
//! ```text
//! <!-- md-pages -->
//! <!-- @page "/custom/path" -->
//! <!-- title: Custom Title -->
//! <!-- showTitle: false -->
//! <!-- tags: rust, web -->
//! # Body starts at the first line that is not a one-line comment
//! ```
//!
//! The marker is matched case-insensitively with surrounding whitespace
//! ignored. The run ends at the first line that is not wholly a comment,
//! blank lines included. Unrecognized directives are skipped so newer
//! documents keep working with older builds.
//!
//! The parser runs on the text left after frontmatter extraction, so a
//! document may carry both dialects: frontmatter first, directives second.

use crate::types::{PageFields, non_empty, parse_bool, split_tags};
use tracing::debug;

/// Marker phrase of the opening comment.
pub const MARKER: &str = "md-pages";

/// Prefix of the explicit route declaration: `@page "/path"`.
pub const ROUTE_DIRECTIVE: &str = "@page";

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Settings declared through comment directives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDirectives {
    /// `route:`, `title:`, `layout:`, `showTitle:`, `description:`, `tags:`.
    pub fields: PageFields,
    /// Path from an `@page "..."` declaration. Beats every other route.
    pub route_directive: Option<String>,
}

/// Parse a leading directive block, returning it with the text that follows.
///
/// Returns `(None, text)` when the first line is not the marker comment.
pub fn parse_directives(text: &str) -> (Option<CommentDirectives>, &str) {
    let stripped = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = stripped.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (None, text);
    };
    match comment_body(first) {
        Some(body) if body.eq_ignore_ascii_case(MARKER) => {}
        _ => return (None, text),
    }

    let mut directives = CommentDirectives::default();
    let mut offset = first.len();
    for line in lines {
        let Some(body) = comment_body(line) else {
            break;
        };
        apply(&mut directives, body);
        offset += line.len();
    }
    (Some(directives), &stripped[offset..])
}

/// Inner text of a line that is exactly one `<!-- ... -->` comment.
fn comment_body(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix(COMMENT_OPEN)?
        .strip_suffix(COMMENT_CLOSE)
        .map(str::trim)
}

fn apply(directives: &mut CommentDirectives, body: &str) {
    if let Some(rest) = strip_route_directive(body) {
        match quoted(rest) {
            Some(path) => directives.route_directive = Some(path.to_string()),
            None => debug!(directive = body, "route declaration without a quoted path"),
        }
        return;
    }

    let Some((key, value)) = body.split_once(':') else {
        debug!(directive = body, "ignoring directive without a key");
        return;
    };
    let fields = &mut directives.fields;
    match key.trim().to_ascii_lowercase().as_str() {
        "route" => set(&mut fields.route, non_empty(value)),
        "title" => set(&mut fields.title, non_empty(value)),
        "layout" => set(&mut fields.layout, non_empty(value)),
        "description" => set(&mut fields.description, non_empty(value)),
        "showtitle" => match parse_bool(value) {
            Some(show) => fields.show_title = Some(show),
            None => debug!(value = value.trim(), "ignoring non-boolean showTitle"),
        },
        "tags" => {
            let tags = split_tags(value);
            set(&mut fields.tags, (!tags.is_empty()).then_some(tags));
        }
        other => debug!(key = other, "ignoring unrecognized directive"),
    }
}

/// Later declarations win, but an empty one does not erase an earlier value.
fn set<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Text after `@page` when the body is a route declaration.
fn strip_route_directive(body: &str) -> Option<&str> {
    let head = body.get(..ROUTE_DIRECTIVE.len())?;
    if !head.eq_ignore_ascii_case(ROUTE_DIRECTIVE) {
        return None;
    }
    let rest = &body[ROUTE_DIRECTIVE.len()..];
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() || c == '"' => Some(rest),
        Some(_) => None,
    }
}

/// Contents of the first non-empty `"..."` pair.
fn quoted(text: &str) -> Option<&str> {
    let start = text.find('"')? + 1;
    let len = text[start..].find('"')?;
    let inner = text[start..start + len].trim();
    (!inner.is_empty()).then_some(inner)
}
