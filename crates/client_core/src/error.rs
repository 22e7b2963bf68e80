use shared::error::RecordError;
use thiserror::Error;

/// Network or server failure talking to the employee API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("request to employee API failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("employee API responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("employee API returned a malformed record: {0}")]
    MalformedRecord(#[from] RecordError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}
