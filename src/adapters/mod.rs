// Adapters layer: concrete implementations for external systems (git, file system).

pub mod git;
pub mod storage;

pub use git::GitSparseFetcher;
pub use storage::LocalStorage;
