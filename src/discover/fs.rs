//! Filesystem discovery.
//!
//! Walks the source directory with `walkdir` on every call. Hidden entries
//! (names starting with `.`) are skipped along with everything under them.
//! Unreadable entries are logged and skipped rather than failing the walk.

use super::{DiscoveryError, DocumentDiscovery};
use crate::config::PagesConfig;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Discovery by listing the source directory.
#[derive(Debug, Clone)]
pub struct FsDiscovery {
    source: PathBuf,
    output: PathBuf,
    extension: String,
    recursive: bool,
    base_route: Option<String>,
}

impl FsDiscovery {
    /// Recursive discovery of `.md` documents under `source`.
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            extension: "md".to_string(),
            recursive: true,
            base_route: None,
        }
    }

    pub fn from_config(config: &PagesConfig) -> Self {
        Self {
            source: config.source_dir.clone(),
            output: config.output_dir.clone(),
            extension: config.extension.trim_start_matches('.').to_string(),
            recursive: config.recursive,
            base_route: config.route_prefix().map(String::from),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_base_route(mut self, base_route: &str) -> Self {
        let prefix = base_route.trim_matches('/');
        self.base_route = (!prefix.is_empty()).then(|| prefix.to_string());
        self
    }

    /// Walk the source directory. A missing directory yields nothing.
    fn scan(&self) -> Vec<String> {
        if !self.source.is_dir() {
            warn!(
                source = %self.source.display(),
                "source directory does not exist; nothing to discover"
            );
            return Vec::new();
        }

        let mut walker = WalkDir::new(&self.source).min_depth(1);
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        let mut found = Vec::new();
        for entry in walker.into_iter().filter_entry(|e| !is_hidden(e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.matches_extension(entry.path()) {
                continue;
            }
            let relative = entry.path().strip_prefix(&self.source).unwrap_or(entry.path());
            found.push(identifier(relative));
        }

        found.sort();
        debug!(count = found.len(), source = %self.source.display(), "discovered documents");
        found
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|e| e.to_string_lossy().eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }
}

#[async_trait]
impl DocumentDiscovery for FsDiscovery {
    fn discover(&self) -> Result<Vec<String>, DiscoveryError> {
        Ok(self.scan())
    }

    async fn discover_async(&self) -> Result<Vec<String>, DiscoveryError> {
        let this = self.clone();
        Ok(tokio::task::spawn_blocking(move || this.scan()).await?)
    }

    fn base_route(&self) -> Option<&str> {
        self.base_route.as_deref()
    }

    fn source_directory(&self) -> &Path {
        &self.source
    }

    fn output_directory(&self) -> &Path {
        &self.output
    }
}

/// The walk root itself is never hidden, even when it is `.`.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Source-relative path with `/` separators on every platform.
fn identifier(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
