//! Manifest line validation.
//!
//! A manifest line is `https://github.com/<path>.git <sha>`: a GitHub clone URL,
//! one or more whitespace characters, and a 6–40 digit hex commit. Anything
//! else on the line, before or after, makes it invalid.

use std::sync::LazyLock;

use regex::Regex;

use crate::{CommitSha, RepoEntry, RepoUrl};

/// Full-line pattern. Character classes are spelled out in ASCII so the
/// accepted URL alphabet does not widen to Unicode word characters.
static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https://github\.com/[A-Za-z0-9_\-./]+\.git)[\t\n\x0C\r ]+([0-9a-fA-F]{6,40})$")
        .expect("manifest line pattern is valid")
});

/// Result of validating one raw manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Empty after trimming; skipped without any report.
    Blank,
    /// A well-formed entry.
    Entry(RepoEntry),
    /// Non-blank but malformed; skipped and reported as a diagnostic.
    Invalid,
}

/// Validates one manifest line.
pub fn validate_line(line: &str) -> LineOutcome {
    let line = line.trim();
    if line.is_empty() {
        return LineOutcome::Blank;
    }

    let Some(captures) = LINE_PATTERN.captures(line) else {
        return LineOutcome::Invalid;
    };

    match (
        RepoUrl::new(&captures[1]),
        CommitSha::new(&captures[2]),
    ) {
        (Some(url), Some(sha)) => LineOutcome::Entry(RepoEntry::new(url, sha)),
        _ => LineOutcome::Invalid,
    }
}
