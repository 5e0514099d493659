use crate::core::Pipeline;
use crate::domain::model::PatchReport;
use crate::utils::error::SyncError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preflight,
    Fetching,
    Transforming,
    Patching,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Preflight => "preflight",
            Stage::Fetching => "fetch",
            Stage::Transforming => "transform",
            Stage::Patching => "patch",
        };
        f.write_str(name)
    }
}

/// Terminal failure of a run: the stage that failed and why.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {error}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub error: SyncError,
}

impl StageError {
    pub fn user_friendly_message(&self) -> String {
        self.error.user_friendly_message()
    }
}

/// Runs one preflight -> fetch -> transform -> patch cycle. No stage is retried.
pub struct SyncEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SyncEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<PatchReport, StageError> {
        let fail = |stage: Stage| move |error: SyncError| StageError { stage, error };

        self.pipeline.preflight().await.map_err(fail(Stage::Preflight))?;

        tracing::info!("Fetching remote mapping...");
        let mapping = self.pipeline.extract().await.map_err(fail(Stage::Fetching))?;
        tracing::info!("Fetched {} mapped files", mapping.len());

        let block = self
            .pipeline
            .transform(mapping)
            .await
            .map_err(fail(Stage::Transforming))?;
        tracing::info!("Generated {} link entries", block.len());

        let report = self.pipeline.load(block).await.map_err(fail(Stage::Patching))?;
        tracing::debug!("Patch report: {:?}", report);

        Ok(report)
    }
}
