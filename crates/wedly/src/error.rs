//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use wedly_config::ConfigError;
use wedly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const INVALID_PAYLOAD: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the wedding API at {url}")]
    #[diagnostic(
        code(wedly::connection_failed),
        help(
            "Check that the backend is running and accessible.\n\
             Reason: {reason}\n\
             Or work offline with: wedly --local ..."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(wedly::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(wedly::auth_failed),
        help(
            "Log in again with: wedly auth login <email>\n\
             Or pass a token with --token / WEDLY_TOKEN."
        )
    )]
    AuthFailed { message: String },

    // ── Guests ───────────────────────────────────────────────────────
    #[error("Guest '{identifier}' not found")]
    #[diagnostic(
        code(wedly::not_found),
        help("Run: wedly guests list --search <name> to find the guest")
    )]
    NotFound { identifier: String },

    #[error("'{name}' matches {count} guests")]
    #[diagnostic(
        code(wedly::ambiguous),
        help("Use the guest ID instead. Run: wedly guests list --search \"{name}\"")
    )]
    Ambiguous { name: String, count: usize },

    #[error("Invalid QR payload")]
    #[diagnostic(
        code(wedly::invalid_payload),
        help("The text is not a wedly guest code. Scan the code again.")
    )]
    InvalidPayload,

    // ── Backend ──────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(wedly::api_error))]
    ApiError { code: String, message: String },

    #[error("Storage error: {message}")]
    #[diagnostic(
        code(wedly::storage),
        help("Check that the data file is writable: --data-file <path>")
    )]
    Storage { message: String },

    #[error("'{operation}' is not available with the {backend} backend")]
    #[diagnostic(
        code(wedly::unsupported),
        help("Select a remote profile, or drop --local / --data-file.")
    )]
    Unsupported { operation: String, backend: String },

    #[error("Scanner error: {message}")]
    #[diagnostic(code(wedly::scanner))]
    Scanner { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wedly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(wedly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: wedly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(wedly::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(wedly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(wedly::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::InvalidPayload => exit_code::INVALID_PAYLOAD,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. }
            | Self::Ambiguous { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { field, reason } => CliError::Validation { field, reason },

            CoreError::NotFound { identifier } => CliError::NotFound { identifier },

            CoreError::InvalidPayload => CliError::InvalidPayload,

            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::Timeout => CliError::Timeout,

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Api {
                message,
                code,
                status,
            } => CliError::ApiError {
                code: code
                    .or_else(|| status.map(|s| s.to_string()))
                    .unwrap_or_else(|| "unknown".into()),
                message,
            },

            CoreError::Storage { message } => CliError::Storage { message },

            CoreError::InvalidTransition { action, state } => CliError::Scanner {
                message: format!("cannot {action} while the scanner is {state}"),
            },

            CoreError::Unsupported { operation, backend } => {
                CliError::Unsupported { operation, backend }
            }

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::NotFound {
                    identifier: "g1".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (CoreError::InvalidPayload, exit_code::INVALID_PAYLOAD),
            (CoreError::Timeout, exit_code::TIMEOUT),
            (
                CoreError::AuthenticationFailed {
                    message: "Token expired".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::Unsupported {
                    operation: "login".into(),
                    backend: "local".into(),
                },
                exit_code::UNSUPPORTED,
            ),
            (
                CoreError::Validation {
                    field: "name".into(),
                    reason: "is required".into(),
                },
                exit_code::USAGE,
            ),
        ];

        for (core, expected) in cases {
            let label = core.to_string();
            assert_eq!(CliError::from(core).exit_code(), expected, "{label}");
        }
    }

    #[test]
    fn api_error_falls_back_to_status() {
        let err = CliError::from(CoreError::Api {
            message: "boom".into(),
            code: None,
            status: Some(503),
        });
        match err {
            CliError::ApiError { code, .. } => assert_eq!(code, "503"),
            other => panic!("expected ApiError, got: {other:?}"),
        }
    }
}
