//! Error types for coursework-sync.

use thiserror::Error;

use coursework_clients::ClientError;

/// All errors that can abort a sync pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reading Canvas assignments or existing Notion pages failed.
    #[error("failed to fetch {what}: {source}")]
    Fetch {
        what: &'static str,
        #[source]
        source: ClientError,
    },

    /// One write of the concurrent batch failed. Writes that completed
    /// before the failure stay applied.
    #[error("write batch aborted: {source}")]
    Write {
        #[source]
        source: ClientError,
    },
}

impl SyncError {
    /// True when the failing call went to Notion.
    pub fn is_notion(&self) -> bool {
        self.client_error().is_notion()
    }

    pub fn client_error(&self) -> &ClientError {
        match self {
            SyncError::Fetch { source, .. } | SyncError::Write { source } => source,
        }
    }
}
