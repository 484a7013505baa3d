use thiserror::Error;

/// Top-level error type for the `wedly-api` crate.
///
/// Covers every failure mode of the REST surface: authentication,
/// transport, envelope-level API errors, and payload decoding.
/// `wedly-core` maps these into user-facing errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected, token missing/expired, or HTTP 401.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// The referenced resource does not exist (HTTP 404).
    #[error("Not found: {path}")]
    NotFound {
        path: String,
        message: Option<String>,
    },

    /// Structured error from the `{success, data, error}` envelope.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: u16,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Extract the API error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Api {
            message: "boom".into(),
            code: None,
            status: 503,
        };
        assert!(err.is_transient());

        let err = Error::Api {
            message: "bad input".into(),
            code: Some("VALIDATION_ERROR".into()),
            status: 400,
        };
        assert!(!err.is_transient());
        assert_eq!(err.api_error_code(), Some("VALIDATION_ERROR"));
    }

    #[test]
    fn not_found_is_classified() {
        let err = Error::NotFound {
            path: "/api/guests/x".into(),
            message: None,
        };
        assert!(err.is_not_found());
        assert!(!err.is_auth_expired());
    }
}
