//! Remote error types.

/// Errors that can occur talking to the remote document service.
#[derive(Debug)]
pub enum RemoteError {
    /// The service could not be reached (connection, timeout, TLS)
    Unavailable(String),
    /// The service answered with a non-success status
    Api { status: u16, message: String },
    /// The response body could not be understood
    MalformedResponse(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::Unavailable(e) => write!(f, "Remote service unavailable: {}", e),
            RemoteError::Api { status, message } => {
                write!(f, "Remote service returned {}: {}", status, message)
            }
            RemoteError::MalformedResponse(e) => write!(f, "Malformed remote response: {}", e),
        }
    }
}

impl std::error::Error for RemoteError {}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RemoteError::MalformedResponse(e.to_string())
        } else {
            RemoteError::Unavailable(e.to_string())
        }
    }
}
