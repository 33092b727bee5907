//! Where company snapshots come from.

use crate::document::CompanySnapshot;
use async_trait::async_trait;
use hrdesk_core::{AppError, AppResult};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Read-only provider of the full current company state.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Human-readable origin, for logs
    fn describe(&self) -> String;

    async fn fetch(&self) -> AppResult<CompanySnapshot>;
}

/// Fetches the snapshot as JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: Client,
    url: String,
}

impl HttpSnapshotSource {
    pub fn new(url: impl Into<String>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Snapshot(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> AppResult<CompanySnapshot> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::Snapshot(format!("Request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Snapshot(format!(
                "Snapshot endpoint {} returned {}",
                self.url, status
            )));
        }

        response
            .json::<CompanySnapshot>()
            .await
            .map_err(|e| AppError::Snapshot(format!("Invalid snapshot body: {}", e)))
    }
}

/// Reads the snapshot from a JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> AppResult<CompanySnapshot> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}
