//! Content document discovery.
//!
//! [`DocumentDiscovery`] answers "which documents exist, and what routes do
//! they get?" without writing anything. Two implementations share it:
//!
//! | Variant | Type | How it finds documents |
//! |---------|------|------------------------|
//! | Filesystem | [`FsDiscovery`] | Walks the source directory on every call |
//! | Probe | [`ProbeDiscovery`] | Probes a candidate list, caches the verified set |
//!
//! Route maps hold filename-derived routes only. Routes declared inside a
//! document (frontmatter or `@page` directives) are applied by the generation
//! pipeline, so a discovered route can differ from the route the emitted page
//! ends up with.

pub mod fs;
pub mod probe;

pub use fs::FsDiscovery;
pub use probe::{DirectoryProbe, ExistenceProbe, ProbeDiscovery, ProbeError};

use crate::naming;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Document identifier → filename-derived route.
pub type RouteMap = BTreeMap<String, String>;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("discovery task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Candidates cannot be probed from sync code on a current-thread runtime.
    #[error("candidates not verified yet; use the async discovery methods")]
    Unverified,
}

/// A source of content document identifiers.
///
/// Identifiers are file names including the extension; documents in
/// subdirectories use their source-relative path (`guides/setup.md`).
#[async_trait]
pub trait DocumentDiscovery: Send + Sync {
    /// Identifiers of the documents that exist right now, sorted.
    fn discover(&self) -> Result<Vec<String>, DiscoveryError>;

    /// Async form of [`discover`](Self::discover).
    async fn discover_async(&self) -> Result<Vec<String>, DiscoveryError>;

    /// Prefix applied to every discovered route.
    fn base_route(&self) -> Option<&str>;

    fn source_directory(&self) -> &Path;

    fn output_directory(&self) -> &Path;

    /// Discovered identifiers mapped to their filename-derived routes.
    fn discover_with_routes(&self) -> Result<RouteMap, DiscoveryError> {
        Ok(route_map(self.discover()?, self.base_route()))
    }

    /// Async form of [`discover_with_routes`](Self::discover_with_routes).
    async fn discover_with_routes_async(&self) -> Result<RouteMap, DiscoveryError> {
        let names = self.discover_async().await?;
        Ok(route_map(names, self.base_route()))
    }
}

/// Map each identifier to its default route.
pub fn route_map(
    names: impl IntoIterator<Item = String>,
    base_route: Option<&str>,
) -> RouteMap {
    names
        .into_iter()
        .map(|name| {
            let route = naming::route_for(&name, base_route);
            (name, route)
        })
        .collect()
}
