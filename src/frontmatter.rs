//! YAML frontmatter extraction.
//!
//! A document may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Getting Started
//! route: /guide/start
//! showTitle: false
//! description: First steps
//! tags: [intro, setup]
//! ---
//! # Body starts here
//! ```
//!
//! Recognized keys: `route`, `title`, `layout`, `showTitle` (also
//! `show_title`), `description`, and `tags` (a YAML list, or one
//! comma-separated string). Other keys are ignored. Scalars are accepted in
//! any YAML form, so `title: 2024` is the title `"2024"`.
//!
//! A block that is unterminated or not valid YAML is logged and treated as
//! absent; the document is then processed with filename-derived defaults.

use crate::types::{PageFields, non_empty, parse_bool, split_tags};
use serde_yaml::Value;
use thiserror::Error;
use tracing::warn;

/// Fence line that opens and closes the block.
pub const DELIMITER: &str = "---";

/// Frontmatter has the same shape as every other page-settings source.
pub type Frontmatter = PageFields;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("frontmatter block is not closed by a `---` line")]
    Unterminated,
    #[error("invalid YAML in frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("frontmatter must be a key/value mapping")]
    NotAMapping,
}

/// Parse leading frontmatter, returning it with the text that follows.
///
/// Returns `(None, text)` when the document has no block, or when the block
/// is malformed (the failure is logged).
pub fn parse_frontmatter(text: &str) -> (Option<Frontmatter>, &str) {
    match try_parse_frontmatter(text) {
        Ok(Some((frontmatter, rest))) => (Some(frontmatter), rest),
        Ok(None) => (None, text),
        Err(e) => {
            warn!(error = %e, "ignoring malformed frontmatter");
            (None, text)
        }
    }
}

/// Like [`parse_frontmatter`], but reports malformed blocks to the caller.
///
/// `Ok(None)` means the document does not open with a `---` line.
pub fn try_parse_frontmatter(
    text: &str,
) -> Result<Option<(Frontmatter, &str)>, FrontmatterError> {
    let Some((block, rest)) = split_block(text)? else {
        return Ok(None);
    };
    if block.trim().is_empty() {
        return Ok(Some((Frontmatter::default(), rest)));
    }

    let value: Value = serde_yaml::from_str(block)?;
    let mapping = match value {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(Some((Frontmatter::default(), rest))),
        _ => return Err(FrontmatterError::NotAMapping),
    };

    let mut fields = Frontmatter::default();
    for (key, value) in &mapping {
        let Some(key) = key.as_str() else { continue };
        match key {
            "route" => fields.route = scalar(value),
            "title" => fields.title = scalar(value),
            "layout" => fields.layout = scalar(value),
            "showTitle" | "show_title" => fields.show_title = boolean(value),
            "description" => fields.description = scalar(value),
            "tags" => fields.tags = tags(value),
            _ => {}
        }
    }
    Ok(Some((fields, rest)))
}

/// Split `---`-fenced text into `(block, remainder)`.
fn split_block(text: &str) -> Result<Option<(&str, &str)>, FrontmatterError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok(None);
    };
    if strip_eol(first) != DELIMITER {
        return Ok(None);
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if strip_eol(line) == DELIMITER {
            return Ok(Some((&text[start..offset], &text[offset + line.len()..])));
        }
        offset += line.len();
    }
    Err(FrontmatterError::Unterminated)
}

fn strip_eol(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => parse_bool(s),
        _ => None,
    }
}

fn tags(value: &Value) -> Option<Vec<String>> {
    let tags: Vec<String> = match value {
        Value::Sequence(items) => items.iter().filter_map(scalar).collect(),
        Value::String(s) => split_tags(s),
        _ => return None,
    };
    (!tags.is_empty()).then_some(tags)
}
