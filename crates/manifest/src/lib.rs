//! dockerfrom manifest source adapter.
//!
//! Implements the [`pipeline::ManifestSource`] trait by downloading the
//! repository list with `reqwest`. Any 2xx response is accepted; the body is
//! split into lines (`\n` or `\r\n`) and handed to the scanner unvalidated.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, TLS and timeouts live here. The
//! [`pipeline`] crate sees only [`pipeline::ManifestSource`] and
//! [`pipeline::ManifestError`].

use std::time::Duration;

use async_trait::async_trait;
use pipeline::{ManifestError, ManifestSource};
use tracing::debug;

/// Downloads the manifest from an HTTP(S) URL.
#[derive(Debug, Clone)]
pub struct HttpManifestSource {
    client: reqwest::Client,
    url: String,
}

impl HttpManifestSource {
    /// Builds a source with its own client and a whole-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ManifestError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dockerfrom/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ManifestError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, url))
    }

    /// Builds a source around an existing client.
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    fn location(&self) -> &str {
        &self.url
    }

    async fn fetch_lines(&self) -> Result<Vec<String>, ManifestError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ManifestError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManifestError::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ManifestError::Body(e.to_string()))?;
        debug!(bytes = body.len(), "Manifest body received");

        Ok(split_lines(&body))
    }
}

/// Splits a manifest body into lines without their terminators.
pub fn split_lines(body: &str) -> Vec<String> {
    body.lines().map(str::to_owned).collect()
}
