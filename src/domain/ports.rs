use crate::domain::model::{GeneratedBlock, PatchReport, RemoteMapping, RemoteSource};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Retrieves the raw bytes of a single file from a remote repository.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch_single_file(&self, source: &RemoteSource) -> Result<Vec<u8>>;
}

pub trait Storage: Send + Sync {
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn repository_url(&self) -> &str;
    fn file_path(&self) -> &str;
    fn branch(&self) -> &str;
    fn target_path(&self) -> &str;
    fn dry_run(&self) -> bool;

    fn remote_source(&self) -> RemoteSource {
        RemoteSource {
            repository_url: self.repository_url().to_string(),
            file_path: self.file_path().to_string(),
            branch: self.branch().to_string(),
        }
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Checks that must pass before anything touches the network.
    async fn preflight(&self) -> Result<()>;
    async fn extract(&self) -> Result<RemoteMapping>;
    async fn transform(&self, data: RemoteMapping) -> Result<GeneratedBlock>;
    async fn load(&self, block: GeneratedBlock) -> Result<PatchReport>;
}
