use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Git command failed ({command}): {stderr}")]
    RemoteOperation { command: String, stderr: String },

    #[error("File {path} not found after checkout")]
    RemoteFileNotFound { path: String },

    #[error("Invalid JSON in mapping file: {0}")]
    MalformedDocument(#[from] serde_json::Error),

    #[error("Target file not found at: {}", path.display())]
    MissingTarget { path: PathBuf },

    #[error("Could not find {name} in target file")]
    BlockNotFound { name: String },

    #[error("Found {count} candidate {name} blocks in target file, expected exactly one")]
    AmbiguousBlock { name: String, count: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl SyncError {
    /// Single-line diagnostic shown to the person running the tool.
    pub fn user_friendly_message(&self) -> String {
        let message = match self {
            SyncError::RemoteOperation { stderr, .. } => {
                format!("Git command failed: {}", stderr.trim())
            }
            other => other.to_string(),
        };
        message.replace('\n', " ")
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::ConfigError { .. }
                | SyncError::InvalidConfigValueError { .. }
                | SyncError::MissingConfigError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_message_is_single_line() {
        let err = SyncError::RemoteOperation {
            command: "git clone".to_string(),
            stderr: "fatal: repository not found\nhint: check the url\n".to_string(),
        };

        let message = err.user_friendly_message();
        assert!(!message.contains('\n'));
        assert!(message.starts_with("Git command failed: fatal: repository not found"));
    }

    #[test]
    fn test_config_errors_are_classified() {
        let err = SyncError::MissingConfigError {
            field: "source.branch".to_string(),
        };
        assert!(err.is_config_error());

        let err = SyncError::BlockNotFound {
            name: "ARTICLE_LINK_MAP".to_string(),
        };
        assert!(!err.is_config_error());
    }
}
