//! Non-fatal scan diagnostics.
//!
//! Skipped manifest lines, unreadable subtrees, unreadable Dockerfiles and
//! failed cleanups are deliberately kept out of the report. They flow to an
//! injected [`DiagnosticsSink`]; production wiring uses [`TracingDiagnostics`].

use tracing::warn;

use crate::{DiagnosticsSink, DockerfilePath, EntryKey};

/// A condition worth reporting that does not change the scan outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanDiagnostic {
    /// A non-blank manifest line failed validation.
    LineSkipped {
        /// 1-based line number within the manifest.
        line_number: usize,
        /// The trimmed line text.
        line: String,
    },

    /// A directory inside a materialized tree could not be listed.
    SubtreeSkipped {
        /// Entry whose tree was being walked.
        entry: EntryKey,
        /// Path relative to the tree root.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },

    /// A discovered Dockerfile could not be read and was left out.
    DockerfileUnreadable {
        /// Entry the Dockerfile belongs to.
        entry: EntryKey,
        /// Path relative to the tree root.
        path: DockerfilePath,
        /// Underlying I/O error message.
        message: String,
    },

    /// A materialized tree could not be deleted.
    ReleaseFailed {
        /// Entry whose tree was being released.
        entry: EntryKey,
        /// Underlying I/O error message.
        message: String,
    },
}

/// Forwards diagnostics to `tracing` as warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn record(&self, diagnostic: ScanDiagnostic) {
        match diagnostic {
            ScanDiagnostic::LineSkipped { line_number, line } => {
                warn!(line_number, line = %line, "Skipping invalid manifest line");
            }
            ScanDiagnostic::SubtreeSkipped {
                entry,
                path,
                message,
            } => {
                warn!(entry = %entry, path = %path, error = %message, "Skipping unreadable directory");
            }
            ScanDiagnostic::DockerfileUnreadable {
                entry,
                path,
                message,
            } => {
                warn!(entry = %entry, path = %path, error = %message, "Error parsing Dockerfile");
            }
            ScanDiagnostic::ReleaseFailed { entry, message } => {
                warn!(entry = %entry, error = %message, "Failed to remove materialized repository");
            }
        }
    }
}
