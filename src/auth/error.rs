//! Error types for the login flow

use thiserror::Error;

/// Errors that can occur while logging in or persisting credentials
#[derive(Error, Debug)]
pub enum LoginError {
    /// Network or HTTP transport error
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-zero status code
    #[error("Provider returned status {code}: {message}")]
    Provider { code: i64, message: String },

    /// Provider answered with a body missing required fields
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// Scan URL could not be encoded as a QR code
    #[error("QR encoding error: {0}")]
    QrEncode(#[from] qrcode::types::QrError),

    /// QR image could not be written
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoginError {
    /// Whether a failed poll call should be retried on the next tick
    ///
    /// Only transport and decoding failures are transient; a decoded body
    /// without a status is treated as a provider failure.
    pub fn is_transient(&self) -> bool {
        matches!(self, LoginError::Transport(_) | LoginError::Json(_))
    }
}

/// Result type for login operations
pub type LoginResult<T> = Result<T, LoginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let transport = reqwest::Client::new().get("http://[::1").build().unwrap_err();
        assert!(LoginError::Transport(transport).is_transient());

        let json = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert!(LoginError::Json(json).is_transient());

        assert!(!LoginError::MalformedResponse("no data".to_string()).is_transient());
        assert!(!LoginError::Provider {
            code: -412,
            message: "request was banned".to_string(),
        }
        .is_transient());
    }
}
