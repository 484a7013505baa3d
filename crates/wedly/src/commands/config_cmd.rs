//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "backend = \"{}\"", p.backend);
        if let Some(ref url) = p.api_url {
            let _ = writeln!(out, "api_url = \"{url}\"");
        }
        if p.token.is_some() {
            let _ = writeln!(out, "token = \"****\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref path) = p.data_file {
            let _ = writeln!(out, "data_file = \"{}\"", path.display());
        }
        if let Some(ref base) = p.invitation_base {
            let _ = writeln!(out, "invitation_base = \"{base}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Copy of the config with plaintext tokens masked, for structured output.
fn redacted(cfg: &Config) -> Config {
    let profiles = cfg
        .profiles
        .iter()
        .map(|(name, p)| {
            let mut p = p.clone();
            if p.token.is_some() {
                p.token = Some("****".into());
            }
            (name.clone(), p)
        })
        .collect();

    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: config::Defaults {
            output: cfg.defaults.output.clone(),
            color: cfg.defaults.color.clone(),
            insecure: cfg.defaults.insecure,
            timeout: cfg.defaults.timeout,
        },
        profiles,
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn parse_flag(field: &str, value: &str) -> Result<bool, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: "must be 'true' or 'false'".into(),
    })
}

/// Set one profile key, validating the value where it has a shape.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key.replace('-', "_").as_str() {
        "backend" => {
            if !matches!(value.as_str(), "remote" | "local") {
                return Err(CliError::Validation {
                    field: "backend".into(),
                    reason: "must be 'remote' or 'local'".into(),
                });
            }
            profile.backend = value;
        }
        "api_url" => {
            wedly_config::parse_url("api_url", &value)?;
            profile.api_url = Some(value);
        }
        "invitation_base" => {
            wedly_config::parse_url("invitation_base", &value)?;
            profile.invitation_base = Some(value);
        }
        "token" => profile.token = Some(value),
        "token_env" => profile.token_env = Some(value),
        "data_file" => profile.data_file = Some(value.into()),
        "ca_cert" => profile.ca_cert = Some(value.into()),
        "insecure" => profile.insecure = Some(parse_flag("insecure", &value)?),
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: backend, api_url, token, \
                     token_env, data_file, invitation_base, ca_cert, insecure, timeout"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("wedly -- configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let backend_choices = &[
                "Wedding REST API (recommended)",
                "Local data file (offline, single device)",
            ];
            let backend = Select::new()
                .with_prompt("Where is the guest list kept?")
                .items(backend_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let mut profile = Profile::default();
            if backend == 0 {
                let api_url: String = Input::new()
                    .with_prompt("API base URL")
                    .default(wedly_core::DEFAULT_BASE_URL.into())
                    .interact_text()
                    .map_err(prompt_err)?;
                set_profile_key(&mut profile, "api_url", api_url)?;
            } else {
                let data_file: String = Input::new()
                    .with_prompt("Data file")
                    .default(wedly_config::default_data_file().display().to_string())
                    .interact_text()
                    .map_err(prompt_err)?;
                profile.backend = "local".into();
                profile.data_file = Some(data_file.into());
            }

            let invitation_base: String = Input::new()
                .with_prompt("Invitation site URL (blank to skip)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;
            if !invitation_base.trim().is_empty() {
                set_profile_key(&mut profile, "invitation_base", invitation_base)?;
            }

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            if backend == 0 {
                eprintln!("\n  Log in with: wedly auth login <email>");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(
                &global.output,
                &redacted(&cfg),
                format_config_redacted,
                |_| "config".into(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: wedly config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_profile_key_validates_shapes() {
        let mut profile = Profile::default();
        set_profile_key(&mut profile, "api-url", "https://rsvp.example.com/api".into()).unwrap();
        set_profile_key(&mut profile, "timeout", "10".into()).unwrap();

        assert_eq!(profile.api_url.as_deref(), Some("https://rsvp.example.com/api"));
        assert_eq!(profile.timeout, Some(10));
        assert!(set_profile_key(&mut profile, "backend", "cloud".into()).is_err());
        assert!(set_profile_key(&mut profile, "api_url", "nope".into()).is_err());
        assert!(set_profile_key(&mut profile, "colour", "red".into()).is_err());
    }

    #[test]
    fn tokens_are_masked() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "venue".into(),
            Profile {
                token: Some("secret-token".into()),
                ..Profile::default()
            },
        );

        let text = format_config_redacted(&cfg);
        assert!(text.contains("token = \"****\""));
        assert!(!text.contains("secret-token"));
        assert_eq!(
            redacted(&cfg).profiles["venue"].token.as_deref(),
            Some("****")
        );
    }
}
