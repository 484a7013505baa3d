//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;

use wedly_core::{Guest, GuestBook, GuestFilter, GuestId};

use crate::error::CliError;

/// Resolve a guest identifier (ID or exact, case-insensitive name).
///
/// IDs win; a name must match exactly one guest.
pub async fn resolve_guest(book: &GuestBook, identifier: &str) -> Result<Guest, CliError> {
    if let Some(guest) = book.find(&GuestId::new(identifier)).await? {
        return Ok(guest);
    }

    let wanted = identifier.trim().to_lowercase();
    let mut matches: Vec<Guest> = book
        .list(&GuestFilter::search(identifier))
        .await?
        .into_iter()
        .filter(|g| g.name.to_lowercase() == wanted)
        .collect();

    match matches.len() {
        0 => Err(CliError::NotFound {
            identifier: identifier.into(),
        }),
        1 => Ok(matches.remove(0)),
        count => Err(CliError::Ambiguous {
            name: identifier.into(),
            count,
        }),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, the operation is refused.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: path.display().to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Run a backend call behind a spinner on interactive stderr.
pub async fn with_spinner<F, T>(message: &str, quiet: bool, fut: F) -> T
where
    F: Future<Output = T>,
{
    if quiet || !std::io::stderr().is_terminal() {
        return fut.await;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = fut.await;
    spinner.finish_and_clear();
    result
}
