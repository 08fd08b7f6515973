//! Recursive Dockerfile discovery within a materialized tree.
//!
//! Pure filesystem traversal: no process, network or logging dependencies.
//! Subtrees that cannot be listed are collected in [`Discovered::skipped`] for
//! the caller to report; only an unreadable root is an error.

use std::fs;
use std::path::Path;

use crate::{DiscoveryError, DockerfilePath};

/// Exact, case-sensitive base name that qualifies a file.
pub const DOCKERFILE_NAME: &str = "Dockerfile";

/// A directory (or directory entry) that could not be inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSubtree {
    /// Path relative to the scan root, forward-slash normalized.
    pub path: String,
    /// Underlying I/O error message.
    pub message: String,
}

/// Result of walking one tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    /// Qualifying files, in lexical tree-walk order.
    pub dockerfiles: Vec<DockerfilePath>,
    /// Subtrees left out of the walk.
    pub skipped: Vec<SkippedSubtree>,
}

/// Finds every file named exactly `Dockerfile` under `root`.
///
/// Directory entries are visited sorted by name, so the result is stable for
/// identical trees. Symlinked directories are not followed.
pub fn find_dockerfiles(root: &Path) -> Result<Discovered, DiscoveryError> {
    let mut discovered = Discovered::default();
    let entries = sorted_entries(root, Path::new(""), &mut discovered).map_err(|e| {
        DiscoveryError::RootUnreadable {
            path: root.display().to_string(),
            message: e.to_string(),
        }
    })?;

    visit(root, Path::new(""), entries, &mut discovered);
    Ok(discovered)
}

/// Lists a directory's entries sorted by file name.
///
/// An entry that cannot be read is recorded against `rel_dir` and left out;
/// its siblings are still returned.
fn sorted_entries(
    dir: &Path,
    rel_dir: &Path,
    out: &mut Discovered,
) -> std::io::Result<Vec<fs::DirEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(e) => out.skipped.push(skipped(rel_dir, &e)),
        }
    }
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

fn visit(root: &Path, rel_dir: &Path, entries: Vec<fs::DirEntry>, out: &mut Discovered) {
    for entry in entries {
        let rel_path = rel_dir.join(entry.file_name());

        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                out.skipped.push(skipped(&rel_path, &e));
                continue;
            }
        };

        if file_type.is_dir() {
            match sorted_entries(&root.join(&rel_path), &rel_path, out) {
                Ok(children) => visit(root, &rel_path, children, out),
                Err(e) => out.skipped.push(skipped(&rel_path, &e)),
            }
        } else if entry.file_name() == DOCKERFILE_NAME {
            if let Some(path) = DockerfilePath::new(normalize_path(&rel_path)) {
                out.dockerfiles.push(path);
            }
        }
    }
}

fn skipped(rel_path: &Path, err: &std::io::Error) -> SkippedSubtree {
    SkippedSubtree {
        path: normalize_path(rel_path),
        message: err.to_string(),
    }
}

/// Normalize path separators to forward slashes.
fn normalize_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}
