//! CLI output formatting.
//!
//! Output leads with what a document *is* (its title and positional index)
//! and shows files as indented context lines beneath it.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! 001 About → About.razor
//!     Source: about.md
//!     Route: /about
//! 002 Setup → Setup.razor
//!     Source: guides/setup.md
//!     Route: /setup
//!
//! Collisions
//!     Setup.razor: a/setup.md replaced by b/setup.md
//!
//! Skipped
//!     notes.md: read failed: stream did not contain valid UTF-8
//!
//! Generated 2 artifacts
//! ```
//!
//! ## Routes
//!
//! ```text
//! /about-us  about-us.md
//! /home      home.md
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 About
//!     Source: about.md
//!     Route: /about → About.razor
//!     Frontmatter: parsed
//!     Directives: none
//!
//! Checked 1 document, 0 with invalid frontmatter
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::discover::RouteMap;
use crate::generate::{BlockStatus, CheckReport, CollisionKind, GenerateReport};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// `1 artifact`, `2 artifacts`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

// ============================================================================
// Generate
// ============================================================================

pub fn format_generate_report(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    if report.source_missing {
        lines.push("Source directory not found; nothing to generate".to_string());
        return lines;
    }

    for (i, artifact) in report.written.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            artifact.title,
            artifact.file_name
        ));
        lines.push(format!("    Source: {}", artifact.source));
        lines.push(format!("    Route: {}", artifact.route));
    }

    if !report.collisions.is_empty() {
        lines.push(String::new());
        lines.push("Collisions".to_string());
        for collision in &report.collisions {
            let what = match collision.kind {
                CollisionKind::ArtifactName => "",
                CollisionKind::Route => "route ",
            };
            lines.push(format!(
                "    {}{}: {} replaced by {}",
                what, collision.key, collision.replaced, collision.kept
            ));
        }
    }

    if !report.failures.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for failure in &report.failures {
            lines.push(format!("    {}: {}", failure.source, failure.error));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!("Generated {}", plural(report.written.len(), "artifact")));
    lines
}

pub fn print_generate_report(report: &GenerateReport) {
    for line in format_generate_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Routes
// ============================================================================

/// One line per document, routes left-aligned in a column.
pub fn format_routes(routes: &RouteMap) -> Vec<String> {
    if routes.is_empty() {
        return vec!["No documents found".to_string()];
    }
    let width = routes.values().map(|r| r.len()).max().unwrap_or(0);
    let mut entries: Vec<(&String, &String)> = routes.iter().collect();
    entries.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .map(|(name, route)| format!("{route:<width$}  {name}"))
        .collect()
}

/// The route map as a pretty-printed JSON object.
pub fn format_routes_json(routes: &RouteMap) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(routes)
}

pub fn print_routes(routes: &RouteMap) {
    for line in format_routes(routes) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_report(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, doc) in report.documents.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), doc.resolved.title));
        lines.push(format!("    Source: {}", doc.source));
        lines.push(format!(
            "    Route: {} \u{2192} {}",
            doc.resolved.route, doc.file_name
        ));
        let frontmatter = match &doc.frontmatter {
            BlockStatus::Absent => "none".to_string(),
            BlockStatus::Parsed => "parsed".to_string(),
            BlockStatus::Invalid(reason) => format!("invalid ({reason})"),
        };
        lines.push(format!("    Frontmatter: {}", frontmatter));
        lines.push(format!(
            "    Directives: {}",
            if doc.directives { "parsed" } else { "none" }
        ));
    }

    if !report.failures.is_empty() {
        lines.push(String::new());
        lines.push("Unreadable".to_string());
        for failure in &report.failures {
            lines.push(format!("    {}: {}", failure.source, failure.error));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Checked {}, {} with invalid frontmatter",
        plural(report.documents.len(), "document"),
        report.invalid().count()
    ));
    lines
}

pub fn print_check_report(report: &CheckReport) {
    for line in format_check_report(report) {
        println!("{}", line);
    }
}
