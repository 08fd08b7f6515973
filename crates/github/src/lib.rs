//! dockerfrom GitHub repository adapter.
//!
//! Implements the [`pipeline::RepositoryMaterializer`] trait by shelling out to
//! the `git` command-line client: a full clone into a fresh scratch directory,
//! followed by a checkout of the pinned commit.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. Process
//! spawning, scratch-directory management and time limits are handled here;
//! the [`pipeline`] crate only ever sees [`pipeline::MaterializedTree`].
//!
//! ## Cleanup
//!
//! Every checkout lives in its own `tempfile` directory (prefix `repo-`). The
//! directory is removed when the scanner releases the tree or, failing that,
//! when the handle is dropped. A clone abandoned by a timeout kills the `git`
//! child and removes its directory the same way.

mod git_cli;

pub use git_cli::{GitCheckout, GitCliConfig, GitCliMaterializer};
