//! The scan driver: manifest lines in, [`Report`] out.
//!
//! Entries are processed strictly in manifest order, one at a time:
//! materialize → discover → extract → release. The only state shared between
//! entries is the report under construction, and an entry touches it exactly
//! once, after its own processing has finished.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use crate::discovery::find_dockerfiles;
use crate::dockerfile::read_images;
use crate::validation::{validate_line, LineOutcome};
use crate::{
    DiagnosticsSink, DiscoveryError, DockerfileImages, EntryError, ManifestSource, RepoEntry,
    Report, RepositoryMaterializer, ScanDiagnostic, ScanError, ScanOptions, ScanSummary,
};

/// Everything a scan produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// The report to serialize.
    pub report: Report,
    /// Counters for logging.
    pub summary: ScanSummary,
}

/// Drives the per-entry pipeline over a manifest.
pub struct Scanner {
    materializer: Arc<dyn RepositoryMaterializer>,
    diagnostics: Arc<dyn DiagnosticsSink>,
    options: ScanOptions,
}

impl Scanner {
    /// Creates a scanner over the given ports.
    pub fn new(
        materializer: Arc<dyn RepositoryMaterializer>,
        diagnostics: Arc<dyn DiagnosticsSink>,
        options: ScanOptions,
    ) -> Self {
        Self {
            materializer,
            diagnostics,
            options,
        }
    }

    /// Fetches the manifest from `source`, then scans it.
    ///
    /// A fetch failure is fatal: nothing is scanned and no report exists.
    pub async fn scan_manifest(&self, source: &dyn ManifestSource) -> Result<ScanOutcome, ScanError> {
        info!(manifest = source.location(), "Downloading repository list");
        let lines = source.fetch_lines().await?;
        debug!(lines = lines.len(), "Repository list downloaded");
        Ok(self.scan(&lines).await)
    }

    /// Processes every manifest line and builds the report.
    ///
    /// Never fails: per-entry failures are recorded in the report and
    /// per-file failures go to the diagnostics sink.
    pub async fn scan<I, S>(&self, lines: I) -> ScanOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = Report::new();
        let mut summary = ScanSummary::default();

        for (index, raw) in lines.into_iter().enumerate() {
            summary.lines_read += 1;
            let entry = match validate_line(raw.as_ref()) {
                LineOutcome::Blank => {
                    summary.blank_lines += 1;
                    continue;
                }
                LineOutcome::Invalid => {
                    summary.skipped_lines += 1;
                    self.diagnostics.record(ScanDiagnostic::LineSkipped {
                        line_number: index + 1,
                        line: raw.as_ref().trim().to_string(),
                    });
                    continue;
                }
                LineOutcome::Entry(entry) => entry,
            };

            let key = entry.key();
            let span = info_span!("entry", entry = %key);
            match self
                .process_entry(&entry, &mut summary)
                .instrument(span)
                .await
            {
                Ok(images) => {
                    summary.entries_succeeded += 1;
                    report.record_success(key, images);
                }
                Err(err) => {
                    summary.entries_failed += 1;
                    warn!(entry = %key, error = %err, "Entry failed");
                    report.record_failure(key, err.to_string());
                }
            }
        }

        info!(
            lines_read = summary.lines_read,
            blank_lines = summary.blank_lines,
            skipped_lines = summary.skipped_lines,
            entries_succeeded = summary.entries_succeeded,
            entries_failed = summary.entries_failed,
            dockerfiles_parsed = summary.dockerfiles_parsed,
            dockerfiles_unreadable = summary.dockerfiles_unreadable,
            "Scan complete"
        );

        ScanOutcome { report, summary }
    }

    /// Materializes one entry, inspects it, and releases the tree whatever
    /// the inspection outcome.
    async fn process_entry(
        &self,
        entry: &RepoEntry,
        summary: &mut ScanSummary,
    ) -> Result<DockerfileImages, EntryError> {
        debug!(repo_url = %entry.repo_url(), commit = %entry.commit_sha(), "Materializing repository");
        let tree = self.materializer.materialize(entry).await?;

        let result = self.inspect_tree(entry, tree.root(), summary);

        if let Err(e) = tree.release() {
            self.diagnostics.record(ScanDiagnostic::ReleaseFailed {
                entry: entry.key(),
                message: e.to_string(),
            });
        }

        Ok(result?)
    }

    fn inspect_tree(
        &self,
        entry: &RepoEntry,
        root: &Path,
        summary: &mut ScanSummary,
    ) -> Result<DockerfileImages, DiscoveryError> {
        let discovered = find_dockerfiles(root)?;

        for skipped in discovered.skipped {
            self.diagnostics.record(ScanDiagnostic::SubtreeSkipped {
                entry: entry.key(),
                path: skipped.path,
                message: skipped.message,
            });
        }

        let mut images = DockerfileImages::new();
        for path in discovered.dockerfiles {
            match read_images(&root.join(path.as_str()), self.options.alias_split) {
                Ok(found) => {
                    debug!(path = %path, images = found.len(), "Parsed Dockerfile");
                    summary.dockerfiles_parsed += 1;
                    images.insert(path, found);
                }
                Err(e) => {
                    summary.dockerfiles_unreadable += 1;
                    self.diagnostics.record(ScanDiagnostic::DockerfileUnreadable {
                        entry: entry.key(),
                        path,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(images)
    }
}
