//! Personalized invitation and guest wishes handler.

use serde::Serialize;
use tabled::Tabled;

use wedly_core::{GuestBook, Invitation, NewWish, Wish};

use crate::cli::{GlobalOpts, InvitationArgs, InvitationCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct InvitationView {
    #[serde(flatten)]
    invitation: Invitation,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

fn detail(v: &InvitationView) -> String {
    let Invitation { guest, config } = &v.invitation;
    let mut lines = vec![
        format!("Dear {},", guest.name),
        String::new(),
        config.message.clone(),
        String::new(),
        format!("{} & {}", config.bride, config.groom),
        format!("{} at {}", config.date, config.time),
        config.venue.clone(),
    ];
    if guest.attendance_count > 1 {
        lines.push(format!("Seats reserved: {}", guest.attendance_count));
    }
    if let Some(ref maps) = config.maps_url {
        lines.push(format!("Directions: {maps}"));
    }
    if let Some(ref url) = v.url {
        lines.push(String::new());
        lines.push(url.clone());
    }
    lines.join("\n")
}

// ── Wishes ──────────────────────────────────────────────────────────

#[derive(Tabled)]
struct WishRow {
    #[tabled(rename = "From")]
    name: String,
    #[tabled(rename = "Wish")]
    message: String,
    #[tabled(rename = "Sent")]
    sent: String,
}

fn wish_detail(w: &Wish) -> String {
    format!(
        "{} ({})\n{}",
        w.name,
        w.created_at.format("%Y-%m-%d %H:%M"),
        w.message
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    book: &GuestBook,
    args: InvitationArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match (args.command, args.guest) {
        (Some(InvitationCommand::Wishes), _) => {
            let wishes = book.wishes().await?;
            let out = output::render_list(
                &global.output,
                &wishes,
                |w| WishRow {
                    name: w.name.clone(),
                    message: w.message.clone(),
                    sent: w.created_at.format("%Y-%m-%d").to_string(),
                },
                |w| w.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        (Some(InvitationCommand::Wish { name, message }), _) => {
            let wish = book.add_wish(&NewWish::new(name, message)).await?;
            let out = output::render_single(&global.output, &wish, wish_detail, |w| w.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        (None, Some(guest)) => show(book, &guest, global).await,

        (None, None) => Err(CliError::Validation {
            field: "guest".into(),
            reason: "a guest ID or name is required".into(),
        }),
    }
}

async fn show(book: &GuestBook, guest: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let found = util::resolve_guest(book, guest).await?;
    let invitation = book.invitation(&found.id).await?;
    let url = book.invitation_link(&found.id)?.map(String::from);

    let view = InvitationView { invitation, url };
    let out = output::render_single(&global.output, &view, detail, |v| {
        v.url
            .clone()
            .unwrap_or_else(|| v.invitation.guest.id.to_string())
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
