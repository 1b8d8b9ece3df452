use thiserror::Error;

/// Failure of a single call through `ApiClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    #[error(
        "API error (status {status}): {}",
        message.as_deref().unwrap_or("no message")
    )]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// The backend answered 401. The session has already been torn down by the
    /// expiry guard by the time a caller sees this.
    #[error("Unauthorized: {}", message.as_deref().unwrap_or("session expired"))]
    Unauthorized { message: Option<String> },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Response envelope carried no data")]
    MissingData,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// The human-readable `message` field of the backend's error payload, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Api { message, .. } | ApiError::Unauthorized { message } => message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// True when the failure says nothing about the credential itself:
    /// the backend was unreachable, timed out, or failed internally.
    pub fn is_transport(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// The backend refused the credentials or the registration payload.
    Rejected,
    /// The backend could not be reached.
    Network,
    /// The session was accepted but could not be written to durable storage.
    Storage,
}

/// Returned by `login` and `register`. The message is always fit for display.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
}

impl AuthError {
    /// Builds an error from a failed auth call, preferring the backend's own message.
    pub fn from_api(err: &ApiError, fallback: &str) -> Self {
        let kind = match err {
            ApiError::Network(_) => AuthErrorKind::Network,
            _ => AuthErrorKind::Rejected,
        };
        let message = err
            .backend_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string());
        AuthError { kind, message }
    }

    pub fn storage(err: &StoreError) -> Self {
        AuthError {
            kind: AuthErrorKind::Storage,
            message: format!("Could not save session: {err}"),
        }
    }
}

/// Failure of the durable session store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
