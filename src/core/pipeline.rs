use crate::core::patch;
use crate::core::transform;
use crate::core::{ConfigProvider, Pipeline, RemoteFetcher, Storage};
use crate::domain::model::{GeneratedBlock, PatchReport, RemoteMapping};
use crate::utils::error::{Result, SyncError};

pub struct LinkMapPipeline<F: RemoteFetcher, S: Storage, C: ConfigProvider> {
    fetcher: F,
    storage: S,
    config: C,
}

impl<F: RemoteFetcher, S: Storage, C: ConfigProvider> LinkMapPipeline<F, S, C> {
    pub fn new(fetcher: F, storage: S, config: C) -> Self {
        Self {
            fetcher,
            storage,
            config,
        }
    }
}

#[async_trait::async_trait]
impl<F: RemoteFetcher, S: Storage, C: ConfigProvider> Pipeline for LinkMapPipeline<F, S, C> {
    async fn preflight(&self) -> Result<()> {
        let target = self.config.target_path();
        if !self.storage.exists(target).await {
            return Err(SyncError::MissingTarget {
                path: target.into(),
            });
        }
        Ok(())
    }

    async fn extract(&self) -> Result<RemoteMapping> {
        let source = self.config.remote_source();
        tracing::debug!(
            "Fetching {} from {} (branch: {})",
            source.file_path,
            source.repository_url,
            source.branch
        );

        let bytes = self.fetcher.fetch_single_file(&source).await?;
        RemoteMapping::from_slice(&bytes)
    }

    async fn transform(&self, data: RemoteMapping) -> Result<GeneratedBlock> {
        Ok(transform::transform(&data))
    }

    async fn load(&self, block: GeneratedBlock) -> Result<PatchReport> {
        patch::apply_to_file(
            &self.storage,
            self.config.target_path(),
            &block,
            self.config.dry_run(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RemoteSource;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, content: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), content.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        fn empty() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<String> {
            let files = self.files.lock().await;
            files
                .get(path)
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        }
    }

    impl Storage for MockStorage {
        async fn exists(&self, path: &str) -> bool {
            self.files.lock().await.contains_key(path)
        }

        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                SyncError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct StaticFetcher {
        body: Vec<u8>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl RemoteFetcher for StaticFetcher {
        async fn fetch_single_file(&self, _source: &RemoteSource) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.clone())
        }
    }

    struct MockConfig {
        dry_run: bool,
    }

    impl ConfigProvider for MockConfig {
        fn repository_url(&self) -> &str {
            "https://example.com/cms.git"
        }

        fn file_path(&self) -> &str {
            "mapping.json"
        }

        fn branch(&self) -> &str {
            "main"
        }

        fn target_path(&self) -> &str {
            "zendesk.ts"
        }

        fn dry_run(&self) -> bool {
            self.dry_run
        }
    }

    const TARGET: &str = "export const ARTICLE_LINK_MAP: Record<string, string> = {\n  '9': '/old'\n} as const;\n";

    fn pipeline(
        body: &str,
        storage: MockStorage,
        dry_run: bool,
    ) -> (LinkMapPipeline<StaticFetcher, MockStorage, MockConfig>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = StaticFetcher {
            body: body.as_bytes().to_vec(),
            calls: calls.clone(),
        };
        (
            LinkMapPipeline::new(fetcher, storage, MockConfig { dry_run }),
            calls,
        )
    }

    #[tokio::test]
    async fn test_preflight_fails_without_target() {
        let (pipeline, calls) = pipeline("{}", MockStorage::empty(), false);

        let err = pipeline.preflight().await.unwrap_err();
        assert!(matches!(err, SyncError::MissingTarget { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_extract_parses_fetched_bytes() {
        let (pipeline, calls) = pipeline(
            r#"{"files": {"guide/setup.mdx": "1001"}}"#,
            MockStorage::with_file("zendesk.ts", TARGET),
            false,
        );

        let mapping = pipeline.extract().await.unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_extract_rejects_malformed_document() {
        let (pipeline, _) = pipeline("not json", MockStorage::with_file("zendesk.ts", TARGET), false);

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, SyncError::MalformedDocument(_)));
    }

    #[tokio::test]
    async fn test_load_writes_patched_target() {
        let storage = MockStorage::with_file("zendesk.ts", TARGET);
        let (pipeline, _) = pipeline(r#"{"files": {"new.mdx": "1"}}"#, storage.clone(), false);

        let mapping = pipeline.extract().await.unwrap();
        let block = pipeline.transform(mapping).await.unwrap();
        let report = pipeline.load(block).await.unwrap();

        assert!(report.changed);
        assert!(report.written);
        assert_eq!(report.entries, 1);
        assert_eq!(
            storage.get_file("zendesk.ts").await.unwrap(),
            "export const ARTICLE_LINK_MAP: Record<string, string> = {\n  '1': '/new'\n} as const;\n"
        );
    }

    #[tokio::test]
    async fn test_dry_run_leaves_target_untouched() {
        let storage = MockStorage::with_file("zendesk.ts", TARGET);
        let (pipeline, _) = pipeline(r#"{"files": {"new.mdx": "1"}}"#, storage.clone(), true);

        let mapping = pipeline.extract().await.unwrap();
        let block = pipeline.transform(mapping).await.unwrap();
        let report = pipeline.load(block).await.unwrap();

        assert!(report.changed);
        assert!(!report.written);
        assert_eq!(storage.get_file("zendesk.ts").await.unwrap(), TARGET);
    }

    #[tokio::test]
    async fn test_load_without_block_leaves_target_untouched() {
        let original = "export const SOMETHING = {};\n";
        let storage = MockStorage::with_file("zendesk.ts", original);
        let (pipeline, _) = pipeline(r#"{"files": {"new.mdx": "1"}}"#, storage.clone(), false);

        let block = pipeline.transform(pipeline.extract().await.unwrap()).await.unwrap();
        let err = pipeline.load(block).await.unwrap_err();

        assert!(matches!(err, SyncError::BlockNotFound { .. }));
        assert_eq!(storage.get_file("zendesk.ts").await.unwrap(), original);
    }
}
