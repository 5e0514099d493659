use crate::config::toml_config::TomlConfig;
use crate::config::SyncConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "article-link-sync")]
#[command(about = "Sync ARTICLE_LINK_MAP in a local config file with the help-pages CMS mapping")]
pub struct CliConfig {
    /// TOML file with [source] and [target] settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Git repository holding the canonical mapping
    #[arg(long)]
    pub repository_url: Option<String>,

    /// Path of the mapping JSON inside the repository
    #[arg(long)]
    pub file_path: Option<String>,

    /// Branch to fetch the mapping from
    #[arg(long)]
    pub branch: Option<String>,

    /// File containing the ARTICLE_LINK_MAP declaration
    #[arg(long)]
    pub target: Option<String>,

    /// Compute the new map but do not write the target file
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// Defaults, then the TOML file if one was given, then explicit flags.
    pub fn resolve(&self) -> Result<SyncConfig> {
        let mut config = SyncConfig::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading configuration from {}", path.display());
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            config.merge_toml(&file);
        }

        if let Some(url) = &self.repository_url {
            config.repository_url = url.clone();
        }
        if let Some(file_path) = &self.file_path {
            config.file_path = file_path.clone();
        }
        if let Some(branch) = &self.branch {
            config.branch = branch.clone();
        }
        if let Some(target) = &self.target {
            config.target_path = target.clone();
        }
        config.dry_run = self.dry_run;

        Ok(config)
    }
}
