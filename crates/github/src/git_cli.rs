//! `git` CLI materialization strategy.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use pipeline::{MaterializeError, MaterializedTree, RepoEntry, RepositoryMaterializer};
use tempfile::TempDir;
use tokio::process::Command;
use tracing::debug;

const SCRATCH_PREFIX: &str = "repo-";

/// Settings for [`GitCliMaterializer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCliConfig {
    /// Executable to run (default `git`).
    pub git_program: PathBuf,
    /// Parent directory for scratch checkouts. `None` uses the system temp dir.
    pub work_dir: Option<PathBuf>,
    /// Upper bound for one clone + checkout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for GitCliConfig {
    fn default() -> Self {
        Self {
            git_program: PathBuf::from("git"),
            work_dir: None,
            timeout: None,
        }
    }
}

/// Materializes repositories with `git clone` + `git checkout`.
#[derive(Debug, Clone, Default)]
pub struct GitCliMaterializer {
    config: GitCliConfig,
}

impl GitCliMaterializer {
    pub fn new(config: GitCliConfig) -> Self {
        Self { config }
    }

    /// Clones `url` into a fresh scratch directory and checks out `commit`.
    ///
    /// Not restricted to GitHub URLs: anything `git clone` accepts works,
    /// including local paths.
    pub async fn checkout(&self, url: &str, commit: &str) -> Result<GitCheckout, MaterializeError> {
        match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.clone_at_commit(url, commit))
                .await
                .map_err(|_| MaterializeError::TimedOut(limit))?,
            None => self.clone_at_commit(url, commit).await,
        }
    }

    async fn clone_at_commit(&self, url: &str, commit: &str) -> Result<GitCheckout, MaterializeError> {
        let dir = self
            .scratch_dir()
            .map_err(|e| MaterializeError::Workspace(e.to_string()))?;

        debug!(url, dir = %dir.path().display(), "Cloning repository");
        let clone = self
            .run_git(
                None,
                [
                    OsStr::new("clone"),
                    OsStr::new("--quiet"),
                    OsStr::new(url),
                    dir.path().as_os_str(),
                ],
            )
            .await?;
        if !clone.success {
            return Err(MaterializeError::Clone {
                url: url.to_string(),
                status: clone.status,
                output: clone.output,
            });
        }

        debug!(commit, "Checking out commit");
        let checkout = self
            .run_git(Some(dir.path()), ["checkout", "--quiet", commit])
            .await?;
        if !checkout.success {
            return Err(MaterializeError::Checkout {
                commit: commit.to_string(),
                status: checkout.status,
                output: checkout.output,
            });
        }

        Ok(GitCheckout { dir })
    }

    fn scratch_dir(&self) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        match &self.config.work_dir {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
    }

    async fn run_git<I, S>(&self, cwd: Option<&Path>, args: I) -> Result<GitOutput, MaterializeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.config.git_program);
        command
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(cwd) = cwd {
            command.current_dir(cwd);
        }

        let output = command
            .output()
            .await
            .map_err(|e| MaterializeError::Spawn(e.to_string()))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(GitOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            output: combined.trim().to_string(),
        })
    }
}

#[async_trait]
impl RepositoryMaterializer for GitCliMaterializer {
    async fn materialize(
        &self,
        entry: &RepoEntry,
    ) -> Result<Box<dyn MaterializedTree>, MaterializeError> {
        let checkout = self
            .checkout(entry.repo_url().as_str(), entry.commit_sha().as_str())
            .await?;
        Ok(Box::new(checkout))
    }
}

struct GitOutput {
    success: bool,
    status: String,
    output: String,
}

/// A checked-out working tree in a scratch directory.
#[derive(Debug)]
pub struct GitCheckout {
    dir: TempDir,
}

impl GitCheckout {
    /// Root of the working tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl MaterializedTree for GitCheckout {
    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn release(self: Box<Self>) -> std::io::Result<()> {
        self.dir.close()
    }
}
