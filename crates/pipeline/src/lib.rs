//! Core scan domain for dockerfrom.
//!
//! Given the lines of a manifest of `(repository URL, commit SHA)` pairs, this
//! crate validates each line, materializes each repository at its commit
//! through a port, finds every file named exactly `Dockerfile`, extracts the
//! base images of its `FROM` instructions, and aggregates everything into one
//! [`Report`] keyed by `"{repo_url}:{commit_sha}"`. One entry's failure never
//! affects another's result.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no network, process or
//! async-runtime dependencies. It defines *what* is needed; infrastructure
//! crates (`github`, `manifest`) define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RepoUrl`, `EntryKey`, `DockerfilePath`, etc.) |
//! | [`types`] | `RepoEntry`, scan options, run summary |
//! | [`errors`] | Fatal and per-entry error types |
//! | [`validation`] | Manifest line validation |
//! | [`discovery`] | Recursive Dockerfile discovery |
//! | [`dockerfile`] | `FROM` instruction extraction |
//! | [`report`] | The aggregated report and its JSON form |
//! | [`scan`] | The sequential scan driver |
//! | [`ports`] | Traits implemented by infrastructure crates |
//! | [`diagnostics`] | Non-fatal diagnostics and the tracing sink |
//! | [`fakes`] | In-memory port implementations for tests |

pub mod diagnostics;
pub mod discovery;
pub mod dockerfile;
pub mod errors;
pub mod fakes;
pub mod identifiers;
pub mod ports;
pub mod report;
pub mod scan;
pub mod types;
pub mod validation;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use diagnostics::{ScanDiagnostic, TracingDiagnostics};
pub use errors::{DiscoveryError, EntryError, ManifestError, MaterializeError, ScanError};
pub use identifiers::{CommitSha, DockerfilePath, EntryKey, ImageReference, RepoUrl, ScanRunId};
pub use ports::{DiagnosticsSink, ManifestSource, MaterializedTree, RepositoryMaterializer};
pub use report::{DockerfileImages, Report};
pub use scan::{ScanOutcome, Scanner};
pub use types::{AliasSplit, RepoEntry, ScanOptions, ScanSummary};
pub use validation::{validate_line, LineOutcome};
