//! Sources the raw export bytes come from: the published spreadsheet URL, or a local copy.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::FetchError;

#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Human-readable location used in logs and errors.
    fn describe(&self) -> String;
    async fn fetch(&self) -> Result<Vec<u8>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;
        Ok(Self { client, url })
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn transport_error(&self, source: reqwest::Error) -> FetchError {
        if source.is_timeout() {
            FetchError::Timeout {
                url: self.url.clone(),
            }
        } else {
            FetchError::Transport {
                url: self.url.clone(),
                source,
            }
        }
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        debug!(url = %self.url, "requesting export");
        let response = self
            .client
            .get(self.url.as_str())
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| self.transport_error(err))?;
        info!(url = %self.url, bytes = body.len(), "fetched export");
        Ok(body.to_vec())
    }
}

#[derive(Debug, Clone)]
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SourceFetcher for FileFetcher {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })?;
        info!(path = %self.path.display(), bytes = body.len(), "read export");
        Ok(body)
    }
}

/// Serves a fixed body; lets callers feed an export they already hold.
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    body: Vec<u8>,
}

impl StaticFetcher {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self { body: body.into() }
    }
}

#[async_trait]
impl SourceFetcher for StaticFetcher {
    fn describe(&self) -> String {
        format!("<in-memory {} bytes>", self.body.len())
    }

    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        Ok(self.body.clone())
    }
}
