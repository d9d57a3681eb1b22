//! Error types for coursework-clients.

use std::fmt;

use thiserror::Error;

/// Which remote API an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Canvas,
    Notion,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Canvas => f.write_str("Canvas"),
            Service::Notion => f.write_str("Notion"),
        }
    }
}

/// All errors that can arise from talking to Canvas or Notion.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Notion answered with an error object (`{"object":"error", ...}`).
    #[error("Notion API error {status} ({code}): {message}")]
    Notion {
        status: u16,
        code: String,
        message: String,
    },

    /// Canvas answered with a non-success status.
    #[error("Canvas API error {status}: {message}")]
    Canvas { status: u16, message: String },

    /// Transport failure (DNS, TLS, connection reset, ...).
    #[error("{service} request failed: {source}")]
    Http {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    /// A success response whose body did not match the expected shape.
    #[error("unexpected {service} response: {source}")]
    Decode {
        service: Service,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// True for every failure raised while talking to Notion.
    pub fn is_notion(&self) -> bool {
        match self {
            ClientError::Notion { .. } => true,
            ClientError::Canvas { .. } => false,
            ClientError::Http { service, .. } | ClientError::Decode { service, .. } => {
                *service == Service::Notion
            }
        }
    }

    pub(crate) fn http(service: Service, source: reqwest::Error) -> Self {
        ClientError::Http { service, source }
    }
}

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
