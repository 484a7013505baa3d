// ── Core error types ──
//
// User-facing errors from wedly-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<wedly_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

use crate::qr::InvalidPayload;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    /// Bad input shape or value, recoverable by correcting the field.
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Referenced guest id is absent.
    #[error("Guest not found: {identifier}")]
    NotFound { identifier: String },

    /// Scanned code text is not a guest QR payload.
    #[error("Invalid QR payload")]
    InvalidPayload,

    // ── Transport errors ─────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// Backend error code (e.g. "VALIDATION_ERROR").
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    /// Local key-value store could not be read or written.
    #[error("Storage error: {message}")]
    Storage { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    /// A scan-session action was attempted in a state that does not allow it.
    #[error("Cannot {action} while the scanner is {state}")]
    InvalidTransition { action: String, state: String },

    #[error("Operation not supported by the {backend} backend: {operation}")]
    Unsupported { operation: String, backend: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Network or storage failure, shown with a generic retry prompt.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::Timeout | Self::Storage { .. }
        ) || matches!(self, Self::Api { status: Some(s), .. } if *s >= 500)
    }

    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            identifier: identifier.to_string(),
        }
    }
}

impl From<InvalidPayload> for CoreError {
    fn from(_: InvalidPayload) -> Self {
        Self::InvalidPayload
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage {
            message: err.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<wedly_api::Error> for CoreError {
    fn from(err: wedly_api::Error) -> Self {
        match err {
            wedly_api::Error::Authentication { message } => Self::AuthenticationFailed { message },
            wedly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout
                } else if e.is_connect() {
                    Self::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    Self::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            wedly_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            wedly_api::Error::Tls(msg) => Self::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            wedly_api::Error::NotFound { path, message } => Self::NotFound {
                identifier: message.unwrap_or(path),
            },
            wedly_api::Error::Api {
                message,
                code,
                status,
            } => {
                if status == 400 || status == 422 {
                    Self::Validation {
                        field: code.unwrap_or_else(|| "request".into()),
                        reason: message,
                    }
                } else {
                    Self::Api {
                        message,
                        code,
                        status: Some(status),
                    }
                }
            }
            wedly_api::Error::Deserialization { message, body: _ } => {
                Self::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
