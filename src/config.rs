//! Tool configuration.
//!
//! Handles loading and validating `md-pages.toml`. Every key is optional and
//! falls back to its stock default; command-line flags override the file
//! (see `main.rs`).
//!
//! ## Config File Location
//!
//! `md-pages.toml` in the working directory is picked up automatically. Pass
//! `--config <path>` to use a different file. A missing file is not an error.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_dir = "content"          # Where content documents live
//! output_dir = "Pages/Generated"  # Where page artifacts are written (flat)
//! extension = "md"                # Document extension, matched case-insensitively
//! recursive = true                # Descend into subdirectories of source_dir
//! # base_route = "docs"           # Prefix for filename-derived routes
//!
//! [emit]
//! renderer_namespace = "MarkdownPages.Components"
//! content_base = "content"        # Prefix of the content reference in artifacts
//! artifact_extension = "razor"
//!
//! [probe]
//! candidates = ["index.md"]       # Names checked by probe-based discovery
//!
//! [processing]
//! max_processes = 4               # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "md-pages.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration for generation and discovery.
///
/// All fields have defaults. Config files need only specify the values they
/// want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagesConfig {
    /// Directory scanned for content documents.
    pub source_dir: PathBuf,
    /// Directory page artifacts are written to. Created if absent.
    pub output_dir: PathBuf,
    /// Extension of content documents, without the dot.
    pub extension: String,
    /// Whether to scan subdirectories of `source_dir`.
    pub recursive: bool,
    /// Prefix applied to filename-derived routes (`docs` → `/docs/about`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_route: Option<String>,
    /// Artifact rendering settings.
    pub emit: EmitConfig,
    /// Probe-based discovery settings.
    pub probe: ProbeConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("content"),
            output_dir: PathBuf::from("Pages/Generated"),
            extension: "md".to_string(),
            recursive: true,
            base_route: None,
            emit: EmitConfig::default(),
            probe: ProbeConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl PagesConfig {
    /// Reject configurations that cannot drive a scan.
    ///
    /// Called before any filesystem access so a bad invocation fails fast.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "source_dir must not be empty".into(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output_dir must not be empty".into(),
            ));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Validation("extension must not be empty".into()));
        }
        if self.emit.artifact_extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Validation(
                "emit.artifact_extension must not be empty".into(),
            ));
        }
        if self.emit.renderer_namespace.trim().is_empty() {
            return Err(ConfigError::Validation(
                "emit.renderer_namespace must not be empty".into(),
            ));
        }
        if self.emit.renderer_namespace.chars().any(char::is_control) {
            return Err(ConfigError::Validation(
                "emit.renderer_namespace must be a single line".into(),
            ));
        }
        Ok(())
    }

    /// Base route with surrounding slashes removed, or `None` when unset or empty.
    pub fn route_prefix(&self) -> Option<&str> {
        self.base_route
            .as_deref()
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty())
    }
}

/// How page artifacts are rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitConfig {
    /// Namespace imported so the artifact can use the rendering component.
    pub renderer_namespace: String,
    /// Prefix of the content reference, as seen by the rendering component.
    pub content_base: String,
    /// Extension of written artifacts, without the dot.
    pub artifact_extension: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            renderer_namespace: "MarkdownPages.Components".to_string(),
            content_base: "content".to_string(),
            artifact_extension: "razor".to_string(),
        }
    }
}

/// Candidate names for probe-based discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    pub candidates: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            candidates: vec!["index.md".to_string()],
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel document workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading
// =============================================================================

/// Parse and validate config file contents. Omitted keys keep their defaults.
pub fn parse_config(content: &str) -> Result<PagesConfig, ConfigError> {
    let config: PagesConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Read a config file. Returns `Ok(None)` if the file does not exist.
pub fn load_config_file(path: &Path) -> Result<Option<PagesConfig>, ConfigError> {
    if !path.is_file() {
        return Ok(None);
    }
    parse_config(&fs::read_to_string(path)?).map(Some)
}

/// Load configuration from `path`, or from `md-pages.toml` in the working
/// directory when `path` is `None`.
///
/// An explicitly named file must exist; the implicit one may be absent.
pub fn load_config(path: Option<&Path>) -> Result<PagesConfig, ConfigError> {
    let loaded = match path {
        Some(explicit) => {
            let config = load_config_file(explicit)?;
            if config.is_none() {
                return Err(ConfigError::Validation(format!(
                    "config file not found: {}",
                    explicit.display()
                )));
            }
            config
        }
        None => load_config_file(Path::new(CONFIG_FILE_NAME))?,
    };
    Ok(loaded.unwrap_or_default())
}

/// A fully-commented stock `md-pages.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# md-pages Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
# Command-line flags (--source, --output) override values from this file.

# Directory scanned for content documents.
source_dir = "content"

# Directory page artifacts are written to. Created if missing.
# Artifacts are written flat: subdirectories of source_dir are not mirrored.
output_dir = "Pages/Generated"

# Extension of content documents (matched case-insensitively).
extension = "md"

# Descend into subdirectories of source_dir.
recursive = true

# Prefix for filename-derived routes. With "docs", about.md becomes /docs/about.
# Explicit routes from frontmatter or comment directives are used as written.
# base_route = "docs"

# ---------------------------------------------------------------------------
# Artifact rendering
# ---------------------------------------------------------------------------
[emit]
# Namespace imported by every artifact so it can use the rendering component.
renderer_namespace = "MarkdownPages.Components"

# Prefix of the content reference handed to the rendering component.
# guides/setup.md is referenced as "content/guides/setup.md".
content_base = "content"

# Extension of written artifacts.
artifact_extension = "razor"

# ---------------------------------------------------------------------------
# Probe-based discovery (`md-pages routes --probe`)
# ---------------------------------------------------------------------------
[probe]
# File names whose existence is checked instead of listing the directory.
candidates = ["index.md"]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel document workers. Omit for auto (= number of CPU cores).
# Values above the core count are clamped down.
# max_processes = 4
"##
}
