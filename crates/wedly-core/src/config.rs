// ── Runtime backend configuration ──
//
// These types describe *where* the guest list lives. They carry
// credential data and connection tuning, but never touch disk.
// The CLI constructs a `BookConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification strategy for the remote backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed dev servers).
    DangerAcceptInvalid,
}

/// Where guests are read from and written to.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// The wedding REST API.
    Remote {
        /// API base URL, including the `/api` prefix.
        url: Url,
        /// Bearer token from a previous login, if any.
        token: Option<SecretString>,
        tls: TlsVerification,
        timeout: Duration,
    },
    /// A JSON key-value file on this machine.
    Local { path: PathBuf },
    /// Process memory only; nothing survives exit.
    Memory,
}

/// Configuration for a single guest book.
///
/// Built by the CLI, passed to `GuestBook` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct BookConfig {
    pub backend: BackendConfig,
    /// Public site serving invitation pages, used for invitation links.
    pub invitation_base: Option<Url>,
}

impl BookConfig {
    pub fn remote(url: Url) -> Self {
        Self {
            backend: BackendConfig::Remote {
                url,
                token: None,
                tls: TlsVerification::default(),
                timeout: Duration::from_secs(30),
            },
            invitation_base: None,
        }
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendConfig::Local { path: path.into() },
            invitation_base: None,
        }
    }

    pub fn memory() -> Self {
        Self {
            backend: BackendConfig::Memory,
            invitation_base: None,
        }
    }
}
