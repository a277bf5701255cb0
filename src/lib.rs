//! # md-pages
//!
//! Turns markdown content documents into routable page artifacts for a
//! component-based page framework, and answers "which pages exist, and at
//! which routes?" at runtime.
//!
//! A document can describe itself in two dialects: a YAML frontmatter block,
//! or a run of HTML comment directives. Whatever it leaves unsaid is derived
//! from its filename.
//!
//! ```text
//! content/getting-started.md              Pages/Generated/GettingStarted.razor
//! ┌──────────────────────────────┐        ┌─────────────────────────────────────┐
//! │ ---                          │        │ @page "/getting-started"            │
//! │ description: First steps     │   →    │ @using MarkdownPages.Components     │
//! │ ---                          │        │                                     │
//! │ <!-- md-pages -->            │        │ <PageTitle>Start Here</PageTitle>   │
//! │ <!-- title: Start Here -->   │        │ <HeadContent>...</HeadContent>      │
//! │ # Body                       │        │ <h1>Start Here</h1>                 │
//! └──────────────────────────────┘        │ <MarkdownPage Src="content/..." ... │
//!                                         └─────────────────────────────────────┘
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Filename → route slug, display title, and artifact identifier |
//! | [`frontmatter`] | `---` YAML block parser |
//! | [`directives`] | `<!-- md-pages -->` comment-directive parser |
//! | [`resolve`] | Field-by-field merge of both dialects over filename defaults |
//! | [`emit`] | Renders the page artifact text using Maud |
//! | [`discover`] | Document discovery: directory walk or probe-based, with route maps |
//! | [`generate`] | The pipeline: discover → parse → resolve → render → write |
//! | [`config`] | `md-pages.toml` loading, validation, and merging |
//! | [`types`] | Shared types (`ContentDocument`, `PageFields`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Directives Beat Frontmatter
//!
//! When both dialects declare a field, the comment directive wins. Fields are
//! merged one at a time, so a document can take its description from
//! frontmatter and its title from a directive.
//!
//! ## Artifacts Reference Content
//!
//! An artifact never embeds the markdown. It names the document, and the
//! rendering component loads it at presentation time. Regenerating is only
//! needed when a document is added, renamed, or reconfigured.
//!
//! ## Identifiers Come From Filenames
//!
//! A declared title changes what readers see, never the artifact's name.
//! Renaming a page's title cannot break references to its artifact.
//!
//! ## Every Run Is Complete
//!
//! There is no dirty-checking. Each run reprocesses every document and
//! output depends only on input, so two runs over the same content produce
//! byte-identical artifacts.

pub mod config;
pub mod directives;
pub mod discover;
pub mod emit;
pub mod frontmatter;
pub mod generate;
pub mod naming;
pub mod output;
pub mod resolve;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
