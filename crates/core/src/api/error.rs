use serde::Deserialize;
use thiserror::Error;

/// Failure talking to the inventory backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL and path did not form a valid URL.
    #[error("invalid request url {url}: {reason}")]
    InvalidUrl {
        /// The joined URL that failed to parse.
        url: String,
        /// Parser message.
        reason: String,
    },
    /// The backend answered with a non-success status.
    #[error("{}", describe_status(.status, .message))]
    Status {
        /// HTTP status code.
        status: u16,
        /// `message` field of the JSON error body, when present.
        message: Option<String>,
    },
    /// Transport failure, including timeouts.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Message supplied by the backend, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Backend message, falling back to `default`.
    pub fn user_message(&self, default: &str) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| default.to_string())
    }

    /// HTTP status for [`ApiError::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_body(status: u16, body: &[u8]) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
        }

        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty());
        ApiError::Status { status, message }
    }
}

fn describe_status(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("{message} (HTTP {status})"),
        None => format!("backend returned HTTP {status}"),
    }
}
