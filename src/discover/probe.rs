//! Probe-based discovery.
//!
//! For runtimes that cannot list a directory, such as a sandboxed client
//! that only reaches content over HTTP. Discovery starts from a list of
//! candidate names and asks an [`ExistenceProbe`] about each one.
//!
//! All probes for a discovery run are issued at once and awaited together.
//! Found names are collected into one set behind a lock; nothing else is
//! shared between probes. A probe that errors counts as "absent" and never
//! fails the run.
//!
//! The verified set is cached until [`ProbeDiscovery::invalidate`] is called
//! or a candidate is added. Candidate lists belong to the instance, so two
//! discoveries never see each other's names.
//!
//! Only verified names are ever reported. The sync [`discover`] probes on the
//! spot when nothing is cached: inline on a multi-thread runtime, on a private
//! current-thread runtime outside of tokio. A current-thread runtime cannot
//! block on itself, so there it fails with [`DiscoveryError::Unverified`]
//! until the async path has filled the cache.
//!
//! [`discover`]: DocumentDiscovery::discover

use super::{DiscoveryError, DocumentDiscovery};
use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::runtime::{Builder, Handle, RuntimeFlavor};
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Probe failed: {0}")]
    Failed(String),
}

/// Out-of-band existence check for one candidate name.
#[async_trait]
pub trait ExistenceProbe: Send + Sync {
    async fn exists(&self, name: &str) -> Result<bool, ProbeError>;
}

/// Probe that checks names under a mounted directory.
#[derive(Debug, Clone)]
pub struct DirectoryProbe {
    root: PathBuf,
}

impl DirectoryProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ExistenceProbe for DirectoryProbe {
    async fn exists(&self, name: &str) -> Result<bool, ProbeError> {
        Ok(tokio::fs::try_exists(self.root.join(name)).await?)
    }
}

#[derive(Debug, Default)]
struct Cache {
    /// Bumped on every invalidation so a run that started earlier cannot
    /// store a stale result.
    generation: u64,
    verified: Option<Vec<String>>,
}

/// Discovery over a candidate list, verified by an [`ExistenceProbe`].
pub struct ProbeDiscovery<P> {
    probe: P,
    candidates: RwLock<BTreeSet<String>>,
    cache: Mutex<Cache>,
    source: PathBuf,
    output: PathBuf,
    base_route: Option<String>,
}

impl<P: ExistenceProbe> ProbeDiscovery<P> {
    pub fn new(probe: P, source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            probe,
            candidates: RwLock::new(BTreeSet::new()),
            cache: Mutex::new(Cache::default()),
            source: source.into(),
            output: output.into(),
            base_route: None,
        }
    }

    pub fn with_candidates<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates
            .write()
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_base_route(mut self, base_route: &str) -> Self {
        let prefix = base_route.trim_matches('/');
        self.base_route = (!prefix.is_empty()).then(|| prefix.to_string());
        self
    }

    /// Register another candidate name. Always drops the cached result.
    pub fn add_candidate(&self, name: impl Into<String>) {
        self.candidates.write().insert(name.into());
        self.invalidate();
    }

    /// Drop the cached result so the next async discovery probes again.
    pub fn invalidate(&self) {
        let mut cache = self.cache.lock();
        cache.generation += 1;
        cache.verified = None;
    }

    /// Candidate names, sorted.
    pub fn candidates(&self) -> Vec<String> {
        self.candidates.read().iter().cloned().collect()
    }

    fn cached(&self) -> Option<Vec<String>> {
        self.cache.lock().verified.clone()
    }

    /// Run the probes from sync code.
    fn probe_blocking(&self) -> Result<Vec<String>, DiscoveryError> {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                Ok(tokio::task::block_in_place(|| handle.block_on(self.probe_all())))
            }
            Ok(_) => Err(DiscoveryError::Unverified),
            Err(_) => {
                let runtime = Builder::new_current_thread().enable_all().build()?;
                Ok(runtime.block_on(self.probe_all()))
            }
        }
    }

    async fn probe_all(&self) -> Vec<String> {
        let generation = self.cache.lock().generation;
        let candidates = self.candidates();

        let found = Mutex::new(BTreeSet::new());
        join_all(candidates.iter().map(|name| {
            let found = &found;
            async move {
                match self.probe.exists(name).await {
                    Ok(true) => {
                        found.lock().insert(name.clone());
                    }
                    Ok(false) => {}
                    Err(e) => {
                        debug!(candidate = %name, error = %e, "probe failed; treating as absent");
                    }
                }
            }
        }))
        .await;

        let verified: Vec<String> = found.into_inner().into_iter().collect();
        debug!(
            probed = candidates.len(),
            found = verified.len(),
            "probe discovery finished"
        );

        let mut cache = self.cache.lock();
        if cache.generation == generation {
            cache.verified = Some(verified.clone());
        }
        verified
    }
}

#[async_trait]
impl<P: ExistenceProbe> DocumentDiscovery for ProbeDiscovery<P> {
    /// The cached verified set, probing first when nothing is cached.
    fn discover(&self) -> Result<Vec<String>, DiscoveryError> {
        match self.cached() {
            Some(verified) => Ok(verified),
            None => self.probe_blocking(),
        }
    }

    async fn discover_async(&self) -> Result<Vec<String>, DiscoveryError> {
        if let Some(verified) = self.cached() {
            return Ok(verified);
        }
        Ok(self.probe_all().await)
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
