//! In-memory fakes for the port traits (testing only)
//!
//! Provides `FixtureMaterializer`, `StaticManifestSource` and
//! `RecordingDiagnostics`, which satisfy the trait contracts without network
//! or version-control access.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use crate::{
    DiagnosticsSink, EntryKey, ManifestError, ManifestSource, MaterializeError, MaterializedTree,
    RepoEntry, RepositoryMaterializer, ScanDiagnostic,
};

// ---------------------------------------------------------------------------
// FixtureMaterializer
// ---------------------------------------------------------------------------

type TreeBuilder = Box<dyn Fn(&Path) -> std::io::Result<()> + Send + Sync>;

enum Fixture {
    Tree(TreeBuilder),
    Failure(String),
}

/// Materializer that builds registered fixture trees in fresh temp directories.
///
/// Entries with no registered fixture fail with `repository not found`.
/// Every root handed out is remembered so tests can check cleanup.
#[derive(Default)]
pub struct FixtureMaterializer {
    fixtures: HashMap<String, Fixture>,
    roots: Mutex<Vec<PathBuf>>,
    requests: Mutex<Vec<EntryKey>>,
}

impl FixtureMaterializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tree of `(relative path, content)` files.
    pub fn with_files(self, repo_url: &str, commit_sha: &str, files: &[(&str, &str)]) -> Self {
        let files: Vec<(String, String)> = files
            .iter()
            .map(|(path, content)| (path.to_string(), content.to_string()))
            .collect();
        self.with_tree(repo_url, commit_sha, move |root| {
            for (path, content) in &files {
                let path = root.join(path);
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, content)?;
            }
            Ok(())
        })
    }

    /// Registers a tree built by an arbitrary closure.
    pub fn with_tree(
        mut self,
        repo_url: &str,
        commit_sha: &str,
        build: impl Fn(&Path) -> std::io::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.fixtures
            .insert(fixture_key(repo_url, commit_sha), Fixture::Tree(Box::new(build)));
        self
    }

    /// Registers a materialization failure.
    pub fn with_failure(mut self, repo_url: &str, commit_sha: &str, message: &str) -> Self {
        self.fixtures.insert(
            fixture_key(repo_url, commit_sha),
            Fixture::Failure(message.to_string()),
        );
        self
    }

    /// Roots of every tree handed out so far.
    pub fn roots(&self) -> Vec<PathBuf> {
        self.roots.lock().unwrap().clone()
    }

    /// Keys of every entry requested so far, in request order.
    pub fn requests(&self) -> Vec<EntryKey> {
        self.requests.lock().unwrap().clone()
    }
}

fn fixture_key(repo_url: &str, commit_sha: &str) -> String {
    format!("{repo_url}:{commit_sha}")
}

#[async_trait]
impl RepositoryMaterializer for FixtureMaterializer {
    async fn materialize(
        &self,
        entry: &RepoEntry,
    ) -> Result<Box<dyn MaterializedTree>, MaterializeError> {
        let key = entry.key();
        self.requests.lock().unwrap().push(key.clone());

        match self.fixtures.get(key.as_str()) {
            None => Err(MaterializeError::Other(format!(
                "repository not found: {}",
                entry.repo_url()
            ))),
            Some(Fixture::Failure(message)) => Err(MaterializeError::Other(message.clone())),
            Some(Fixture::Tree(build)) => {
                let dir = tempfile::Builder::new()
                    .prefix("fixture-")
                    .tempdir()
                    .map_err(|e| MaterializeError::Workspace(e.to_string()))?;
                build(dir.path()).map_err(|e| MaterializeError::Other(e.to_string()))?;
                self.roots.lock().unwrap().push(dir.path().to_path_buf());
                Ok(Box::new(FixtureTree { dir }))
            }
        }
    }
}

#[derive(Debug)]
struct FixtureTree {
    dir: TempDir,
}

impl MaterializedTree for FixtureTree {
    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn release(self: Box<Self>) -> std::io::Result<()> {
        self.dir.close()
    }
}

// ---------------------------------------------------------------------------
// StaticManifestSource
// ---------------------------------------------------------------------------

/// Manifest source returning fixed text, or a fixed failure.
#[derive(Debug)]
pub struct StaticManifestSource {
    body: Result<String, u16>,
}

impl StaticManifestSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: Ok(body.into()),
        }
    }

    /// A source whose fetch fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self { body: Err(status) }
    }
}

#[async_trait]
impl ManifestSource for StaticManifestSource {
    fn location(&self) -> &str {
        "memory://manifest"
    }

    async fn fetch_lines(&self) -> Result<Vec<String>, ManifestError> {
        match &self.body {
            Ok(body) => Ok(body.lines().map(str::to_owned).collect()),
            Err(status) => Err(ManifestError::UnexpectedStatus(*status)),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingDiagnostics
// ---------------------------------------------------------------------------

/// Diagnostics sink that keeps every event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    events: Mutex<Vec<ScanDiagnostic>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<ScanDiagnostic> {
        self.events.lock().unwrap().clone()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn record(&self, diagnostic: ScanDiagnostic) {
        self.events.lock().unwrap().push(diagnostic);
    }
}
