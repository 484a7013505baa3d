//! Wedding details handlers.

use wedly_core::{GuestBook, WeddingConfig};

use crate::cli::{GlobalOpts, WeddingArgs, WeddingCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub(crate) fn detail(c: &WeddingConfig) -> String {
    let mut lines = vec![
        format!("Couple:    {} & {}", c.bride, c.groom),
        format!("Date:      {} {}", c.date, c.time),
        format!("Venue:     {}", c.venue),
        format!("Message:   {}", c.message),
    ];
    let optional = [
        ("Bride's parents", &c.bride_parents),
        ("Groom's parents", &c.groom_parents),
        ("Maps", &c.maps_url),
        ("Countdown", &c.countdown_date),
        ("Music", &c.music_url),
    ];
    for (label, value) in optional {
        if let Some(v) = value {
            lines.push(format!("{label}: {v}"));
        }
    }
    if let Some(ref story) = c.our_story {
        lines.push(format!("Story:     {} entries", story.len()));
    }
    if let Some(ref bank) = c.bank_account {
        lines.push(format!(
            "Gifts:     {} {} ({})",
            bank.bank_name, bank.account_number, bank.account_name
        ));
    }
    if let Some(ref quote) = c.quote {
        lines.push(format!("Quote:     \"{}\" -- {}", quote.content, quote.text));
    }
    lines.join("\n")
}

/// Blank input clears an optional field.
fn optional(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

/// Set one scalar field by name.
fn set_field(config: &mut WeddingConfig, key: &str, value: String) -> Result<(), CliError> {
    match key.replace('_', "-").as_str() {
        "bride" => config.bride = value,
        "groom" => config.groom = value,
        "date" => config.date = value,
        "time" => config.time = value,
        "venue" => config.venue = value,
        "message" => config.message = value,
        "bride-parents" => config.bride_parents = optional(value),
        "groom-parents" => config.groom_parents = optional(value),
        "maps-url" => config.maps_url = optional(value),
        "countdown-date" => config.countdown_date = optional(value),
        "music-url" => config.music_url = optional(value),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown wedding field '{other}'. Valid fields: bride, groom, date, time, \
                     venue, message, bride-parents, groom-parents, maps-url, countdown-date, \
                     music-url (use `wedding import` for story, gifts, and quote)"
                ),
            });
        }
    }
    Ok(())
}

pub async fn handle(
    book: &GuestBook,
    args: WeddingArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let saved = match args.command {
        WeddingCommand::Show => book.wedding_config().await?,

        WeddingCommand::Set { key, value } => {
            let mut config = book.wedding_config().await?;
            set_field(&mut config, &key, value)?;
            book.update_wedding_config(&config).await?
        }

        WeddingCommand::Import { path } => {
            let config: WeddingConfig = util::read_json_file(&path)?;
            book.update_wedding_config(&config).await?
        }
    };

    let out = output::render_single(&global.output, &saved, detail, |c| {
        format!("{} & {}", c.bride, c.groom)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_field_accepts_either_spelling() {
        let mut config = WeddingConfig::default();
        set_field(&mut config, "maps_url", "https://maps.example.com/x".into()).unwrap();
        set_field(&mut config, "venue", "Garden Terrace".into()).unwrap();

        assert_eq!(config.maps_url.as_deref(), Some("https://maps.example.com/x"));
        assert_eq!(config.venue, "Garden Terrace");
    }

    #[test]
    fn blank_value_clears_optional_field() {
        let mut config = WeddingConfig {
            music_url: Some("https://music.example.com/song.mp3".into()),
            ..WeddingConfig::default()
        };
        set_field(&mut config, "music-url", " ".into()).unwrap();
        assert_eq!(config.music_url, None);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut config = WeddingConfig::default();
        assert!(matches!(
            set_field(&mut config, "dress-code", "black tie".into()),
            Err(CliError::Validation { .. })
        ));
    }
}
