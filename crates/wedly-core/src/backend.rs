// ── Backend selection ──
//
// The book talks either to the REST API or to a local key-value store.
// Construction happens here; the per-operation dispatch lives in `book`.

use std::sync::Arc;

use strum::{Display, EnumString};
use wedly_api::{ApiClient, TlsMode, TransportConfig};

use crate::config::{BackendConfig, TlsVerification};
use crate::error::CoreError;
use crate::store::{FileKv, LocalStore, MemoryKv};

/// Which kind of backend a book is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum BackendKind {
    Remote,
    Local,
}

pub(crate) enum Backend {
    Remote(ApiClient),
    Local(LocalStore),
}

impl Backend {
    pub(crate) fn from_config(config: &BackendConfig) -> Result<Self, CoreError> {
        match config {
            BackendConfig::Remote {
                url,
                token,
                tls,
                timeout,
            } => {
                let transport = TransportConfig {
                    tls: tls_to_transport(tls),
                    timeout: *timeout,
                };
                let client = ApiClient::new(url.clone(), &transport)?;
                if let Some(token) = token {
                    client.set_token(token.clone());
                }
                Ok(Self::Remote(client))
            }
            BackendConfig::Local { path } => {
                Ok(Self::Local(LocalStore::new(Arc::new(FileKv::new(path)))))
            }
            BackendConfig::Memory => Ok(Self::Local(LocalStore::new(Arc::new(MemoryKv::new())))),
        }
    }

    pub(crate) fn kind(&self) -> BackendKind {
        match self {
            Self::Remote(_) => BackendKind::Remote,
            Self::Local(_) => BackendKind::Local,
        }
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
