use shared::error::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to news api failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid api url: {0}")]
    Url(#[from] url::ParseError),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("news api rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("malformed news api response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if ErrorCode::from_status(status).is_auth() {
            Self::Unauthorized(message)
        } else {
            Self::Rejected { status, message }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// The server understood the request and refused it (any 4xx).
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Unauthorized(_) => true,
            Self::Rejected { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("failed to access session file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("corrupt session file '{path}': {source}")]
    Corrupt {
        path: String,
        source: serde_json::Error,
    },
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
