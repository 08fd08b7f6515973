//! Newtype domain identifiers.
//!
//! Every domain concept that has an identity is represented as a distinct newtype
//! wrapping a primitive. This prevents accidentally interchanging, for example,
//! a [`RepoUrl`] with a [`DockerfilePath`] even though both are strings under
//! the hood.
//!
//! All string-backed identifiers are totally ordered so they can key the
//! `BTreeMap`s of the [`crate::Report`]; that ordering is what makes the
//! serialized report byte-identical across runs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single scan run (one invocation of the CLI).
///
/// Attached to the root tracing span so every log event emitted while
/// processing one manifest can be correlated. Never written to the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanRunId(Uuid);

impl ScanRunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ScanRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: String-backed (manifest / repository names)
// ---------------------------------------------------------------------------

string_id! {
    /// A repository clone URL in `https://github.com/<path>.git` form.
    RepoUrl
}

string_id! {
    /// A Git commit SHA, abbreviated (6 characters) up to full length (40).
    CommitSha
}

string_id! {
    /// The `"{repo_url}:{commit_sha}"` key under which one manifest entry's
    /// result or error is recorded.
    EntryKey
}

string_id! {
    /// A path relative to the repository root identifying one discovered
    /// Dockerfile. Components are always separated by `/`.
    DockerfilePath
}

impl EntryKey {
    /// Builds the aggregation key for a repository URL and commit.
    pub fn for_commit(repo_url: &RepoUrl, commit_sha: &CommitSha) -> Self {
        Self(format!("{repo_url}:{commit_sha}"))
    }
}

// ---------------------------------------------------------------------------
// Image references
// ---------------------------------------------------------------------------

/// A base-image reference copied from a `FROM` instruction.
///
/// Free-form: `name`, `name:tag`, `name@digest`, or the name of an earlier
/// build stage. Unlike the identifiers above, no invariant is enforced, not
/// even non-emptiness, because the value is reported exactly as extracted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageReference(String);

impl ImageReference {
    /// Wraps an extracted reference verbatim.
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_ids_reject_empty_values() {
        assert!(RepoUrl::new("").is_none());
        assert!(DockerfilePath::new(String::new()).is_none());
        assert_eq!(
            CommitSha::new("abc123").map(|c| c.as_str().to_string()),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn entry_key_joins_url_and_commit_with_colon() {
        let url = RepoUrl::new("https://github.com/org/repo.git").unwrap();
        let sha = CommitSha::new("abc123").unwrap();
        assert_eq!(
            EntryKey::for_commit(&url, &sha).as_str(),
            "https://github.com/org/repo.git:abc123"
        );
    }

    #[test]
    fn image_reference_allows_empty() {
        assert_eq!(ImageReference::from_raw("").as_str(), "");
    }

    #[test]
    fn string_ids_serialize_as_plain_strings() {
        let path = DockerfilePath::new("a/b/Dockerfile").unwrap();
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"a/b/Dockerfile\"");
        let image = ImageReference::from_raw("alpine:3.19");
        assert_eq!(serde_json::to_string(&image).unwrap(), "\"alpine:3.19\"");
    }
}
