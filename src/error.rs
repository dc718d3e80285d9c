//! Crate-wide error type and `Result` alias.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BriefLensError>;

/// Errors surfaced by the BriefLens client core.
///
/// The cache and citation modules never fail; everything here originates at
/// the backend HTTP boundary or the auth seam.
#[derive(Debug, Error)]
pub enum BriefLensError {
    /// Transport-level failure (connect, TLS, timeout) before a response
    /// status was available.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend API error ({status}): {message}")]
    Api {
        /// HTTP status code of the failed response.
        status: u16,
        /// Message extracted from the backend error body, or the raw body.
        message: String,
    },

    /// A response body could not be decoded into the expected shape.
    #[error("failed to decode backend response: {0}")]
    Decode(String),

    /// The configured base URL (or a path joined onto it) is invalid.
    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),

    /// The token provider could not supply a bearer token.
    #[error("auth token unavailable: {0}")]
    Auth(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_includes_status_and_message() {
        let err = BriefLensError::Api {
            status: 403,
            message: "connector not linked".into(),
        };
        let text = err.to_string();
        assert!(text.contains("403"));
        assert!(text.contains("connector not linked"));
    }

    #[test]
    fn test_auth_error_display() {
        let err = BriefLensError::Auth("session expired".into());
        assert!(err.to_string().contains("session expired"));
    }
}
