use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Message reported for every failure where the request never completed.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to connect to the API. Please check that the API server is running and reachable.";

/// Message for a successful API-key response that matches no known shape.
pub const INVALID_RESPONSE_FORMAT: &str = "API returned an invalid response format";

/// Maximum length for response bodies echoed into log lines
const MAX_ERROR_BODY_LENGTH: usize = 500;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Every failure a resource call can produce.
///
/// `status()` is `0` only for [`ApiError::Network`]; the other variants carry
/// the literal HTTP status of the response that caused them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never reached the server or the server never answered.
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network { detail: String },

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        data: Option<Value>,
    },

    /// The server answered 2xx but the payload could not be used.
    #[error("{message}")]
    ResponseShape { status: u16, message: String },
}

/// The flat `{status, message, data}` view of an [`ApiError`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedError {
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiError {
    /// Build the error for a non-2xx response from its status and raw body.
    ///
    /// A JSON body with a non-empty `message` field supplies the message;
    /// anything else falls back to the status line.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let data = serde_json::from_slice::<Value>(body).ok();
        let message = data
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| Self::status_line(status));

        ApiError::Http {
            status: status.as_u16(),
            message,
            data,
        }
    }

    pub fn network(detail: impl Into<String>) -> Self {
        ApiError::Network {
            detail: detail.into(),
        }
    }

    /// A failure raised on our side before or after the exchange, such as an
    /// unserializable body. Reported as a 500 so it stays distinct from status 0.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            message: message.into(),
            data: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::Http {
            status: StatusCode::NOT_FOUND.as_u16(),
            message: message.into(),
            data: None,
        }
    }

    pub fn response_shape(status: u16, message: impl Into<String>) -> Self {
        ApiError::ResponseShape {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ApiError::Network { .. } => 0,
            ApiError::Http { status, .. } | ApiError::ResponseShape { status, .. } => *status,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            ApiError::Http { data, .. } => data.as_ref(),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == StatusCode::UNAUTHORIZED.as_u16()
    }

    pub fn to_normalized(&self) -> NormalizedError {
        NormalizedError {
            status: self.status(),
            message: self.message(),
            data: self.data().cloned(),
        }
    }

    fn status_line(status: StatusCode) -> String {
        match status.canonical_reason() {
            Some(reason) => format!("Error: {} {}", status.as_u16(), reason),
            None => format!("Error: {}", status.as_u16()),
        }
    }

    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &[u8]) -> String {
        let text = String::from_utf8_lossy(body);
        if text.len() <= MAX_ERROR_BODY_LENGTH {
            return text.into_owned();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &text[..end], text.len())
    }
}

impl From<ApiError> for NormalizedError {
    fn from(error: ApiError) -> Self {
        error.to_normalized()
    }
}
