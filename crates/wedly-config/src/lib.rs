//! Shared configuration for wedly.
//!
//! TOML profiles, API token resolution (env + keyring + plaintext),
//! and translation to `wedly_core::BookConfig`. The CLI adds
//! `GlobalOpts`-aware wrappers on top.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wedly_core::{BackendConfig, BackendKind, BookConfig, DEFAULT_BASE_URL, TlsVerification};

const KEYRING_SERVICE: &str = "wedly";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named backend profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// "remote" (REST API) or "local" (JSON data file).
    #[serde(default = "default_backend")]
    pub backend: String,

    /// API base URL including the `/api` prefix.
    pub api_url: Option<String>,

    /// Bearer token (plaintext -- prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    pub token_env: Option<String>,

    /// Data file for the local backend.
    pub data_file: Option<PathBuf>,

    /// Public site serving invitation pages (e.g. "https://wedding.example.com").
    pub invitation_base: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

fn default_backend() -> String {
    BackendKind::Remote.to_string()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            api_url: None,
            token: None,
            token_env: None,
            data_file: None,
            invitation_base: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

impl Profile {
    /// Parse the `backend` field.
    pub fn backend_kind(&self) -> Result<BackendKind, ConfigError> {
        self.backend.parse().map_err(|_| ConfigError::Validation {
            field: "backend".into(),
            reason: format!("expected 'remote' or 'local', got '{}'", self.backend),
        })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "wedly", "wedly")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default data file for the local backend.
pub fn default_data_file() -> PathBuf {
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("guests.json");
            p
        },
        |dirs| dirs.data_dir().join("guests.json"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("wedly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("WEDLY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Token resolution (without CLI flags) ────────────────────────────

fn token_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))
}

/// Resolve a bearer token from the credential chain (no CLI flag step).
///
/// A missing token is not an error: the login endpoint needs none, and
/// the backend answers 401 for everything else.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = token_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    profile.token.clone().map(SecretString::from)
}

/// Store a bearer token in the system keyring after a login.
pub fn store_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    token_entry(profile_name)?.set_password(token.expose_secret())?;
    Ok(())
}

/// Remove a stored bearer token. A missing entry is not an error.
pub fn delete_token(profile_name: &str) -> Result<(), ConfigError> {
    match token_entry(profile_name)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ── Profile translation ─────────────────────────────────────────────

/// Build a `BookConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_book_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<BookConfig, ConfigError> {
    let invitation_base = profile
        .invitation_base
        .as_deref()
        .map(|raw| parse_url("invitation_base", raw))
        .transpose()?;

    let backend = match profile.backend_kind()? {
        BackendKind::Local => BackendConfig::Local {
            path: profile.data_file.clone().unwrap_or_else(default_data_file),
        },
        BackendKind::Remote => {
            let url = parse_url("api_url", profile.api_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

            let tls = if profile.insecure.unwrap_or(false) {
                TlsVerification::DangerAcceptInvalid
            } else if let Some(ref ca_path) = profile.ca_cert {
                TlsVerification::CustomCa(ca_path.clone())
            } else {
                TlsVerification::SystemDefaults
            };

            BackendConfig::Remote {
                url,
                token: resolve_token(profile, profile_name),
                tls,
                timeout: Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout)),
            }
        }
    };

    Ok(BookConfig {
        backend,
        invitation_base,
    })
}

/// Parse a URL setting, naming the field on failure.
pub fn parse_url(field: &str, raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })
}
