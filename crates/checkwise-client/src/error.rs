use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("cannot reach prediction service at {0}")]
    Connection(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP request failed: {0}")]
    Request(String),

    /// Non-2xx response carrying the service's own `error` message.
    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("unexpected HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("client configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// The message the service itself supplied, if any.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Service { message, .. } => Some(message),
            _ => None,
        }
    }
}
