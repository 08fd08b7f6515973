//! Port traits implemented by infrastructure crates.
//!
//! The scan domain defines *what* it needs from the outside world; the `github`
//! and `manifest` crates define *how* to supply it. Tests substitute the
//! in-memory implementations from [`crate::fakes`].

use std::path::Path;

use async_trait::async_trait;

use crate::{ManifestError, MaterializeError, RepoEntry, ScanDiagnostic};

// ---------------------------------------------------------------------------
// Repository materialization
// ---------------------------------------------------------------------------

/// A readable copy of a repository's tree at one commit.
///
/// Owned by the scanner for the duration of one entry. Implementations must
/// delete the tree when dropped so that release happens on every exit path;
/// [`MaterializedTree::release`] exists to surface cleanup failures.
pub trait MaterializedTree: Send + std::fmt::Debug {
    /// Root directory of the tree.
    fn root(&self) -> &Path;

    /// Deletes the tree, reporting any cleanup failure.
    fn release(self: Box<Self>) -> std::io::Result<()>;
}

/// Capability to fetch a repository's full tree at a pinned commit.
///
/// Whether this clones, downloads an archive, or reads a cache is the
/// implementation's concern. Every failure is reported as a
/// [`MaterializeError`]; the scanner records only its message.
#[async_trait]
pub trait RepositoryMaterializer: Send + Sync {
    /// Materializes `entry` into a fresh, independently named location.
    async fn materialize(
        &self,
        entry: &RepoEntry,
    ) -> Result<Box<dyn MaterializedTree>, MaterializeError>;
}

// ---------------------------------------------------------------------------
// Manifest retrieval
// ---------------------------------------------------------------------------

/// Source of raw manifest lines.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Human-readable location used in logs (e.g. the URL).
    fn location(&self) -> &str;

    /// Retrieves the manifest and splits it into lines.
    async fn fetch_lines(&self) -> Result<Vec<String>, ManifestError>;
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Receiver for non-fatal conditions that never reach the report.
pub trait DiagnosticsSink: Send + Sync {
    /// Records one diagnostic.
    fn record(&self, diagnostic: ScanDiagnostic);
}
