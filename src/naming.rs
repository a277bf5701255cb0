//! Filename-derived names: routes, titles, and artifact identifiers.
//!
//! Every content document gets three names from its filename stem when the
//! document itself does not say otherwise:
//!
//! - **Route** (`slugify`): `User_Guide.md` → `/user-guide`
//! - **Title** (`title_from_name`): `getting-started.md` → "Getting Started"
//! - **Identifier** (`identifier_from_name`): `getting-started.md` → `GettingStarted`
//!
//! ## Slug Rules
//!
//! Lower-case, runs of spaces and underscores become one hyphen, runs of
//! hyphens collapse, leading/trailing hyphens are trimmed, and the result is
//! prefixed with `/`. Nothing else is touched: `Q&A.md` becomes `/q&a` and
//! `v1.2-notes.md` becomes `/v1.2-notes`. The stem `index` (any case) is the
//! root route `/`.
//!
//! Slugs are not unique: `Getting Started.md` and `getting_started.md` both
//! map to `/getting-started`.

use std::path::Path;

/// Title used when a filename has no usable words at all.
pub const UNTITLED: &str = "Untitled";

/// Prefix for identifiers that would otherwise be empty or start with a non-letter.
const IDENTIFIER_PREFIX: &str = "Page";

/// Filename without its extension. Directory components are dropped.
///
/// - `"about.md"` → `"about"`
/// - `"guides/setup.md"` → `"setup"`
/// - `"v1.2-notes.md"` → `"v1.2-notes"`
pub fn file_stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

/// Derive the default route segment for a filename stem.
pub fn slugify(stem: &str) -> String {
    let lower = stem.to_lowercase();
    if lower == "index" {
        return "/".to_string();
    }

    let mut slug = String::with_capacity(lower.len() + 1);
    let mut last_was_hyphen = false;
    for c in lower.chars() {
        if matches!(c, ' ' | '_' | '-') {
            if !last_was_hyphen {
                slug.push('-');
            }
            last_was_hyphen = true;
        } else {
            slug.push(c);
            last_was_hyphen = false;
        }
    }

    format!("/{}", slug.trim_matches('-'))
}

/// Default route for a document, with an optional base route prefix.
///
/// `route_for("about.md", Some("docs"))` → `/docs/about`. An empty or
/// slash-only prefix counts as no prefix.
pub fn route_for(file_name: &str, base_route: Option<&str>) -> String {
    let slug = slugify(file_stem(file_name));
    match base_route.map(|p| p.trim_matches('/')) {
        Some(prefix) if !prefix.is_empty() => {
            format!("/{}/{}", prefix, slug.trim_start_matches('/'))
        }
        _ => slug,
    }
}

/// Default display title for a filename stem.
pub fn title_from_name(stem: &str) -> String {
    let title = words(stem).map(capitalize).collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

/// Default artifact identifier for a filename stem.
///
/// Same words as the title, concatenated. The result is also used as a file
/// base name and a component type name, so whitespace splits words too,
/// anything that is not alphanumeric is dropped, and a leading non-letter
/// gets a `Page` prefix.
pub fn identifier_from_name(stem: &str) -> String {
    let joined: String = words(stem)
        .flat_map(str::split_whitespace)
        .map(capitalize)
        .collect::<String>()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();

    match joined.chars().next() {
        Some(c) if c.is_alphabetic() => joined,
        _ => format!("{IDENTIFIER_PREFIX}{joined}"),
    }
}

/// Non-empty segments between hyphens and underscores.
fn words(stem: &str) -> impl Iterator<Item = &str> {
    stem.split(['-', '_']).filter(|w| !w.is_empty())
}

/// Upper-case the first character, lower-case the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
