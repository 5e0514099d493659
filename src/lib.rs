pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{GitSparseFetcher, LocalStorage};
pub use config::SyncConfig;
pub use crate::core::{
    engine::{Stage, StageError, SyncEngine},
    pipeline::LinkMapPipeline,
};
pub use utils::error::{Result, SyncError};
