//! CLI configuration: a thin wrapper around `wedly_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--api-url, --data-file, --token, etc.).

use clap::ValueEnum;
use secrecy::SecretString;
use tracing::warn;

use wedly_core::{BackendConfig, BookConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use wedly_config::{
    Config, Defaults, Profile, config_path, delete_token, load_config_or_default, save_config,
    store_token,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Build a `BookConfig` from the config file, profile, and CLI overrides.
///
/// Without a matching profile the built-in defaults apply: the REST API
/// at the default base URL, or the default data file with `--local`.
/// Naming a profile explicitly that does not exist is an error.
pub fn build_book_config(global: &GlobalOpts) -> Result<BookConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => Profile::default(),
    };

    let profile = apply_overrides(profile, global, &cfg.defaults);
    let mut book = wedly_config::profile_to_book_config(&profile, &profile_name)?;

    // --token wins over the whole credential chain
    if let Some(ref token) = global.token {
        if let BackendConfig::Remote { token: slot, .. } = &mut book.backend {
            *slot = Some(SecretString::from(token.clone()));
        }
    }

    Ok(book)
}

/// Layer global flags and `[defaults]` onto a profile.
///
/// Flag > profile > defaults.
pub fn apply_overrides(mut profile: Profile, global: &GlobalOpts, defaults: &Defaults) -> Profile {
    if global.local || global.data_file.is_some() {
        profile.backend = "local".into();
    }
    if let Some(ref path) = global.data_file {
        profile.data_file = Some(path.clone());
    }
    if let Some(ref url) = global.api_url {
        profile.api_url = Some(url.clone());
    }
    if let Some(ref base) = global.invitation_base {
        profile.invitation_base = Some(base.clone());
    }

    profile.insecure = Some(global.insecure || profile.insecure.unwrap_or(defaults.insecure));
    profile.timeout = Some(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(defaults.timeout),
    );
    profile
}

/// Settle the output format and color mode.
///
/// Flag (or its env var) > `[defaults]` > built-in. An unknown value in
/// the config file is skipped with a warning so `wedly config` can still
/// repair it.
pub fn apply_display_defaults(global: &mut GlobalOpts, defaults: &Defaults) {
    global.output = global
        .output_flag
        .clone()
        .or_else(|| setting("defaults.output", &defaults.output))
        .unwrap_or_default();
    global.color = global
        .color_flag
        .clone()
        .or_else(|| setting("defaults.color", &defaults.color))
        .unwrap_or_default();
}

fn setting<T: ValueEnum>(key: &str, value: &str) -> Option<T> {
    T::from_str(value, true)
        .inspect_err(|_| warn!(key, value, "ignoring unknown config value"))
        .ok()
}
