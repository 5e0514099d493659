#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REPOSITORY_URL: &str = "https://dub.duckduckgo.com/duckduckgo/help-pages-cms.git";
pub const DEFAULT_FILE_PATH: &str = "scripts/zendesk-sync/zendesk-mapping.json";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_TARGET_PATH: &str = "src/config/zendesk.ts";

/// Fully resolved settings for one run: defaults, then TOML file, then CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub repository_url: String,
    pub file_path: String,
    pub branch: String,
    pub target_path: String,
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            repository_url: DEFAULT_REPOSITORY_URL.to_string(),
            file_path: DEFAULT_FILE_PATH.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            target_path: DEFAULT_TARGET_PATH.to_string(),
            dry_run: false,
        }
    }
}

impl SyncConfig {
    /// Overlays every value the TOML file sets.
    pub fn merge_toml(&mut self, file: &toml_config::TomlConfig) {
        if let Some(source) = &file.source {
            if let Some(url) = &source.repository_url {
                self.repository_url = url.clone();
            }
            if let Some(path) = &source.file_path {
                self.file_path = path.clone();
            }
            if let Some(branch) = &source.branch {
                self.branch = branch.clone();
            }
        }
        if let Some(target) = &file.target {
            if let Some(path) = &target.path {
                self.target_path = path.clone();
            }
        }
    }
}

impl ConfigProvider for SyncConfig {
    fn repository_url(&self) -> &str {
        &self.repository_url
    }

    fn file_path(&self) -> &str {
        &self.file_path
    }

    fn branch(&self) -> &str {
        &self.branch
    }

    fn target_path(&self) -> &str {
        &self.target_path
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_repository_url("source.repository_url", &self.repository_url)?;
        validation::validate_non_empty_string("source.file_path", &self.file_path)?;
        validation::validate_non_empty_string("source.branch", &self.branch)?;
        validation::validate_path("target.path", &self.target_path)?;
        Ok(())
    }
}
