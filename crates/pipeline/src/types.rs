//! Shared value types for the scan domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! invariants spanning more than one value (a [`RepoEntry`] is only ever built
//! from a validated manifest line) or configure how the scan behaves.

use crate::{CommitSha, EntryKey, RepoUrl};

// ---------------------------------------------------------------------------
// Manifest entries
// ---------------------------------------------------------------------------

/// One validated `(repository URL, commit SHA)` pair from the manifest.
///
/// Constructed only by [`crate::validation::validate_line`], so holding a
/// `RepoEntry` means the URL matched `https://github.com/<path>.git` and the
/// SHA is 6–40 hex digits. Immutable; lives for one entry's processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    repo_url: RepoUrl,
    commit_sha: CommitSha,
}

impl RepoEntry {
    pub(crate) fn new(repo_url: RepoUrl, commit_sha: CommitSha) -> Self {
        Self {
            repo_url,
            commit_sha,
        }
    }

    /// Repository clone URL.
    pub fn repo_url(&self) -> &RepoUrl {
        &self.repo_url
    }

    /// Commit to materialize.
    pub fn commit_sha(&self) -> &CommitSha {
        &self.commit_sha
    }

    /// Key under which this entry's outcome is reported.
    pub fn key(&self) -> EntryKey {
        EntryKey::for_commit(&self.repo_url, &self.commit_sha)
    }
}

impl std::fmt::Display for RepoEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {}", self.repo_url, self.commit_sha)
    }
}

// ---------------------------------------------------------------------------
// Scan options
// ---------------------------------------------------------------------------

/// How a stage alias is separated from the image in a `FROM` argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AliasSplit {
    /// The alias is a separate whitespace-delimited token (`FROM img AS name`),
    /// so the image token is kept verbatim.
    #[default]
    Token,
    /// Historical behavior: cut the image token at the first case-sensitive
    /// `AS` substring and trim. Truncates names such as `org/BASE:1`.
    LegacySubstring,
}

/// Options the scanner receives from the composition root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Stage-alias handling for FROM extraction.
    pub alias_split: AliasSplit,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Counters describing one scan run.
///
/// Logged when the scan completes; never part of the serialized report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Manifest lines read, blank ones included.
    pub lines_read: usize,
    /// Blank or whitespace-only lines.
    pub blank_lines: usize,
    /// Non-blank lines that failed validation.
    pub skipped_lines: usize,
    /// Entries recorded under `data`.
    pub entries_succeeded: usize,
    /// Entries recorded under `errors`.
    pub entries_failed: usize,
    /// Dockerfiles whose FROM instructions were extracted.
    pub dockerfiles_parsed: usize,
    /// Dockerfiles discovered but unreadable.
    pub dockerfiles_unreadable: usize,
}

impl ScanSummary {
    /// Number of manifest lines that produced an entry.
    pub fn entries_processed(&self) -> usize {
        self.entries_succeeded + self.entries_failed
    }
}
