use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Why a fetch failed. Empty result bodies are deliberately *not* an error:
/// an empty page means the backend has no more pages and is handled by the
/// pagination state, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("server returned status {code}: {message}")]
    Status { code: u16, message: String },

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Transient failures get a retry affordance in the view; a malformed
    /// body or a client error will fail the same way again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Status { code, .. } => matches!(code, 408 | 429 | 500..=599),
            Self::Decode(_) | Self::InvalidUrl(_) => false,
        }
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Unable to connect. Please check your internet connection and try again.".into()
            }
            Self::Timeout => "The request timed out. Please try again.".into(),
            Self::Status { code, .. } if *code == 429 => {
                "Too many requests. Please wait a moment and try again.".into()
            }
            Self::Status { code, .. } if (500..=599).contains(code) => {
                "The server had a problem. Please try again.".into()
            }
            Self::Status { .. } => "The plant list could not be loaded.".into(),
            Self::Decode(_) => {
                "A data error occurred. Please contact support if this persists.".into()
            }
            Self::InvalidUrl(_) => {
                "The server address is misconfigured. Please restart the app.".into()
            }
        }
    }

    /// Classify a non-success HTTP status, pulling a message out of the body
    /// when the backend sent a structured error.
    #[must_use]
    pub fn from_status(code: u16, body: Option<&[u8]>) -> Self {
        let message = body
            .and_then(|b| serde_json::from_slice::<ApiErrorBody>(b).ok())
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP error: {code}"));

        Self::Status { code, message }
    }
}

impl From<&crux_http::Error> for FetchError {
    fn from(error: &crux_http::Error) -> Self {
        match error {
            crux_http::Error::Timeout => Self::Timeout,
            crux_http::Error::Json(message) => Self::Decode(message.clone()),
            crux_http::Error::Http(http) => {
                Self::from_status(u16::from(http.code), http.body.as_deref())
            }
            other => Self::Network(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<HashMap<String, String>>,
}
