//! Command-line flags and their resolution into scan configuration.
//!
//! Every setting can come from a flag or an environment variable; the flag
//! wins when both are present. Resolution happens once, before any I/O, and
//! the result is passed into the core explicitly.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use github::GitCliConfig;
use pipeline::{AliasSplit, ScanError, ScanOptions};

/// Environment variable consulted when `--url` is absent.
pub const MANIFEST_URL_ENV: &str = "REPOSITORY_LIST_URL";

#[derive(Debug, Parser)]
#[command(name = "dockerfrom")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Report the base images of every Dockerfile in a list of pinned repositories", long_about = None)]
pub struct Cli {
    /// URL of the plaintext file containing the repository list
    #[arg(long, env = "REPOSITORY_LIST_URL")]
    pub url: Option<String>,

    /// git executable used to clone repositories
    #[arg(long = "git", env = "DOCKERFROM_GIT", default_value = "git")]
    pub git_program: PathBuf,

    /// Parent directory for temporary checkouts (default: system temp dir)
    #[arg(long, env = "DOCKERFROM_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// Give up on a repository whose clone + checkout takes longer than this
    #[arg(long, env = "DOCKERFROM_CLONE_TIMEOUT_SECS")]
    pub clone_timeout_secs: Option<u64>,

    /// Timeout for downloading the repository list
    #[arg(long, env = "DOCKERFROM_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout_secs: u64,

    /// Cut image names at the first "AS" substring, as older reports did
    #[arg(long)]
    pub legacy_as_split: bool,

    /// Log output format (logs go to stderr; the report goes to stdout)
    #[arg(long, value_enum, env = "DOCKERFROM_LOG_FORMAT", default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Human-readable lines.
    Text,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub manifest_url: String,
    pub http_timeout: Duration,
    pub git: GitCliConfig,
    pub options: ScanOptions,
}

impl Cli {
    /// Resolves the flags into a [`ScanConfig`].
    pub fn resolve(&self) -> Result<ScanConfig, ScanError> {
        // clap only consults the environment when the flag is absent, so an
        // explicitly empty `--url` falls back here.
        let manifest_url = non_empty(self.url.as_deref())
            .or_else(|| non_empty(std::env::var(MANIFEST_URL_ENV).ok().as_deref()))
            .ok_or_else(|| ScanError::Configuration {
                message: format!(
                    "no repository list URL provided. Use --url or set {MANIFEST_URL_ENV}."
                ),
            })?;

        if self.http_timeout_secs == 0 {
            return Err(ScanError::Configuration {
                message: "--http-timeout-secs must be greater than zero".to_string(),
            });
        }
        let clone_timeout = match self.clone_timeout_secs {
            Some(0) => {
                return Err(ScanError::Configuration {
                    message: "--clone-timeout-secs must be greater than zero".to_string(),
                })
            }
            other => other.map(Duration::from_secs),
        };

        Ok(ScanConfig {
            manifest_url,
            http_timeout: Duration::from_secs(self.http_timeout_secs),
            git: GitCliConfig {
                git_program: self.git_program.clone(),
                work_dir: self.work_dir.clone(),
                timeout: clone_timeout,
            },
            options: ScanOptions {
                alias_split: if self.legacy_as_split {
                    AliasSplit::LegacySubstring
                } else {
                    AliasSplit::Token
                },
            },
        })
    }
}

/// Trims a setting, treating an empty value as absent.
fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
