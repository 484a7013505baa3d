//! REST API login handlers.

use secrecy::{ExposeSecret, SecretString};

use wedly_core::GuestBook;

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn profile_name(global: &GlobalOpts) -> String {
    config::active_profile_name(global, &config::load_config_or_default())
}

pub async fn handle(
    book: &GuestBook,
    args: AuthArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Login { email, print_token } => {
            let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            let (token, user) = book.login(&email, &SecretString::from(password)).await?;

            if print_token {
                println!("{}", token.expose_secret());
                return Ok(());
            }

            let profile = profile_name(global);
            config::store_token(&profile, &token)?;
            if !global.quiet {
                eprintln!(
                    "✓ Logged in as {} (token stored for profile '{profile}')",
                    user.email
                );
            }
            Ok(())
        }

        AuthCommand::Verify => {
            book.verify_session().await?;
            if !global.quiet {
                eprintln!("✓ Token accepted");
            }
            Ok(())
        }

        AuthCommand::Logout => {
            book.logout()?;
            let profile = profile_name(global);
            config::delete_token(&profile)?;
            if !global.quiet {
                eprintln!("✓ Token removed for profile '{profile}'");
            }
            Ok(())
        }
    }
}
