//! Error types for the scan domain.
//!
//! Errors fall into two groups with very different propagation rules:
//!
//! - [`ScanError`] covers setup failures (configuration, manifest download,
//!   report serialization). These are fatal: the run aborts and no report is
//!   produced.
//! - [`EntryError`] and its components ([`MaterializeError`],
//!   [`DiscoveryError`]) belong to one manifest entry. They are downgraded to
//!   data: the message is recorded under the entry's key in the report and the
//!   scan moves on.
//!
//! Per-Dockerfile read failures are not errors at all from the report's point
//! of view; they only reach the [`crate::DiagnosticsSink`].

use std::time::Duration;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Run-level errors
// ---------------------------------------------------------------------------

/// Errors that abort the whole run before (or after) entries are processed.
#[derive(Debug, Error)]
pub enum ScanError {
    /// No usable configuration could be resolved.
    ///
    /// Produced before any I/O, e.g. when neither `--url` nor
    /// `REPOSITORY_LIST_URL` supplies the manifest location.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// The manifest itself could not be retrieved.
    #[error("Error downloading repository list: {0}")]
    ManifestFetch(#[from] ManifestError),

    /// The finished report could not be serialized.
    #[error("Error marshaling JSON: {0}")]
    Report(#[from] serde_json::Error),
}

/// Failures of a [`crate::ManifestSource`].
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The request could not be sent or no response was received.
    #[error("HTTP GET error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("unexpected status code {0}")]
    UnexpectedStatus(u16),

    /// The response body could not be read to completion.
    #[error("error reading response body: {0}")]
    Body(String),
}

// ---------------------------------------------------------------------------
// Entry-level errors
// ---------------------------------------------------------------------------

/// Failures of a [`crate::RepositoryMaterializer`].
///
/// The scanner never inspects the variant; it records the rendered message.
/// Variants exist so adapters can report precisely and tests can match.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// The scratch directory for the checkout could not be created.
    #[error("failed to create temp dir: {0}")]
    Workspace(String),

    /// The version-control client could not be started at all.
    #[error("failed to run git: {0}")]
    Spawn(String),

    /// Cloning the repository failed (network, authentication, missing repo).
    #[error("git clone error: failed to clone {url}: {status} (output: {output})")]
    Clone {
        /// Repository URL that was being cloned.
        url: String,
        /// Exit status of the client.
        status: String,
        /// Combined stdout/stderr of the client.
        output: String,
    },

    /// Checking out the pinned commit failed (usually an unknown SHA).
    #[error("git checkout error: failed to checkout commit {commit}: {status} (output: {output})")]
    Checkout {
        /// Commit that was being checked out.
        commit: String,
        /// Exit status of the client.
        status: String,
        /// Combined stdout/stderr of the client.
        output: String,
    },

    /// The materialization did not finish within its per-entry time limit.
    #[error("materialization timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    /// Any other failure reported by an alternative materialization strategy.
    #[error("{0}")]
    Other(String),
}

/// Failure to walk a materialized tree.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The root of the tree could not be listed.
    ///
    /// Unreadable subdirectories do not produce this error; they are skipped.
    #[error("error finding Dockerfiles: failed to read {path}: {message}")]
    RootUnreadable {
        /// Path of the root directory.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },
}

/// Anything that fails a single manifest entry.
#[derive(Debug, Error)]
pub enum EntryError {
    /// The repository could not be materialized at the requested commit.
    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    /// The materialized tree could not be walked.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}
