//! dockerfrom CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: resolve flags and environment variables into a
//!    [`config::ScanConfig`] before any I/O. A missing manifest URL is fatal.
//! 2. **Wire observability**: configure `tracing-subscriber` (JSON or text,
//!    on stderr). All spans and events from every crate flow through it.
//! 3. **Construct infrastructure**: create the `HttpManifestSource`, the
//!    `GitCliMaterializer` and the tracing diagnostics sink, and inject them
//!    into the [`pipeline::Scanner`].
//! 4. **Emit the report**: print the pretty JSON report to stdout once.
//!
//! Fatal errors print `Error: ...` to stderr and exit with status 1; no report
//! is written in that case.

mod config;
mod observability;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use github::GitCliMaterializer;
use manifest::HttpManifestSource;
use pipeline::{ScanError, ScanRunId, Scanner, TracingDiagnostics};
use tracing::{info_span, Instrument};

use crate::config::{Cli, ScanConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    observability::init(cli.log_format);

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve()?;

    let run_id = ScanRunId::new_random();
    let report = scan(&config)
        .instrument(info_span!("scan", run_id = %run_id))
        .await?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{report}").context("failed to write report to stdout")?;
    Ok(())
}

async fn scan(config: &ScanConfig) -> Result<String, ScanError> {
    let source = HttpManifestSource::new(config.manifest_url.as_str(), config.http_timeout)?;
    let scanner = Scanner::new(
        Arc::new(GitCliMaterializer::new(config.git.clone())),
        Arc::new(TracingDiagnostics),
        config.options.clone(),
    );

    let outcome = scanner.scan_manifest(&source).await?;
    outcome.report.to_json_pretty()
}
