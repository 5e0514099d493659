use crate::domain::model::RemoteSource;
use crate::domain::ports::RemoteFetcher;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use std::path::Path;
use tempfile::TempDir;
use tokio::process::Command;

/// Fetches one file through a shallow, blob-filtered, sparse clone.
///
/// Only the requested path is materialized, inside a temporary directory that
/// is removed when the fetch returns, whatever the outcome.
#[derive(Debug, Clone)]
pub struct GitSparseFetcher {
    git_bin: String,
}

impl GitSparseFetcher {
    pub fn new() -> Self {
        Self {
            git_bin: "git".to_string(),
        }
    }

    pub fn with_git_bin(git_bin: impl Into<String>) -> Self {
        Self {
            git_bin: git_bin.into(),
        }
    }

    async fn run_git(&self, label: &str, args: &[&str]) -> Result<()> {
        tracing::debug!("Running git {}", args.join(" "));

        let output = Command::new(&self.git_bin)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .await
            .map_err(|e| SyncError::RemoteOperation {
                command: label.to_string(),
                stderr: format!("failed to execute {}: {}", self.git_bin, e),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(SyncError::RemoteOperation {
                command: label.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    async fn checkout_into(&self, source: &RemoteSource, dir: &Path) -> Result<()> {
        let dir = dir.to_string_lossy().into_owned();
        let dir = dir.as_str();

        self.run_git(
            "git clone",
            &[
                "clone",
                "--depth=1",
                "--filter=blob:none",
                "--sparse",
                "--branch",
                source.branch.as_str(),
                source.repository_url.as_str(),
                dir,
            ],
        )
        .await?;

        self.run_git(
            "git sparse-checkout",
            &[
                "-C",
                dir,
                "sparse-checkout",
                "set",
                "--no-cone",
                source.file_path.as_str(),
            ],
        )
        .await?;

        self.run_git("git checkout", &["-C", dir, "checkout"]).await
    }
}

impl Default for GitSparseFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteFetcher for GitSparseFetcher {
    async fn fetch_single_file(&self, source: &RemoteSource) -> Result<Vec<u8>> {
        let checkout = TempDir::new()?;
        tracing::debug!("Sparse checkout directory: {}", checkout.path().display());

        self.checkout_into(source, checkout.path()).await?;

        let target = checkout.path().join(&source.file_path);
        if !tokio::fs::try_exists(&target).await.unwrap_or(false) {
            return Err(SyncError::RemoteFileNotFound {
                path: source.file_path.clone(),
            });
        }

        let bytes = tokio::fs::read(&target).await?;
        tracing::debug!("Fetched {} ({} bytes)", source.file_path, bytes.len());

        // TempDir removes the checkout on drop for the early returns above
        checkout.close()?;
        Ok(bytes)
    }
}
