//! Shared types used by the parsers, the resolver, and the pipeline.

/// A content document read from the source directory. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDocument {
    /// Source-relative path with `/` separators (`guides/setup.md`).
    pub path: String,
    /// Full original text.
    pub raw_text: String,
}

impl ContentDocument {
    pub fn new(path: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            raw_text: raw_text.into(),
        }
    }

    /// File name including extension, without directories.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Page settings a document can declare about itself.
///
/// Both configuration dialects (frontmatter and comment directives) produce
/// this shape. `None` means "not declared", which is different from an
/// explicit value: `show_title: Some(false)` hides the heading, `None`
/// leaves the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFields {
    pub route: Option<String>,
    pub title: Option<String>,
    pub layout: Option<String>,
    pub show_title: Option<bool>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl PageFields {
    /// Copy every field declared in `other` over this one.
    pub fn overlay(&mut self, other: &PageFields) {
        if other.route.is_some() {
            self.route = other.route.clone();
        }
        if other.title.is_some() {
            self.title = other.title.clone();
        }
        if other.layout.is_some() {
            self.layout = other.layout.clone();
        }
        if other.show_title.is_some() {
            self.show_title = other.show_title;
        }
        if other.description.is_some() {
            self.description = other.description.clone();
        }
        if other.tags.is_some() {
            self.tags = other.tags.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == PageFields::default()
    }
}

/// Split a comma-separated tag list. Entries are trimmed; empty ones dropped.
pub fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// `true`/`false` in any case, surrounding whitespace ignored.
pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Trimmed value, or `None` when nothing is left.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
