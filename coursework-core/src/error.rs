//! Error types for coursework-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::credentials::Secret;

/// All errors that can arise from credential store operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Reading or persisting a secret file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The user aborted the interactive prompt. Nothing was written.
    #[error("prompt for {} was cancelled: {reason}", secret.file_name())]
    PromptCancelled { secret: Secret, reason: String },

    /// The prompt returned a blank value.
    #[error("{} cannot be empty", secret.file_name())]
    EmptySecret { secret: Secret },

    /// `dirs::config_dir()` returned `None`.
    #[error("cannot determine the user config directory")]
    ConfigDirNotFound,
}

/// Convenience constructor for [`CredentialError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CredentialError {
    CredentialError::Io {
        path: path.into(),
        source,
    }
}
