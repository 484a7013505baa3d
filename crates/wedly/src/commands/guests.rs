//! Guest command handlers.

use serde::Serialize;
use tabled::Tabled;

use wedly_core::{
    CheckInOutcome, Guest, GuestBook, GuestFilter, GuestUpdate, NewGuest, QrPayload, ScanRecord,
    Tone, qr,
};

use crate::cli::{GlobalOpts, GuestListArgs, GuestsArgs, GuestsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct GuestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "")]
    vip: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Party")]
    party: u32,
    #[tabled(rename = "Arrived")]
    arrived: String,
}

impl GuestRow {
    fn new(g: &Guest, color: bool) -> Self {
        Self {
            id: g.id.to_string(),
            name: g.name.clone(),
            vip: output::vip_badge(g.is_vip, color),
            group: g.group.clone().unwrap_or_default(),
            party: g.attendance_count,
            arrived: arrival(g),
        }
    }
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Scanned")]
    scanned_at: String,
    #[tabled(rename = "Guest")]
    name: String,
    #[tabled(rename = "")]
    vip: String,
    #[tabled(rename = "ID")]
    id: String,
}

fn arrival(g: &Guest) -> String {
    g.checked_in_at.map_or_else(
        || "-".into(),
        |at| at.format("%Y-%m-%d %H:%M").to_string(),
    )
}

pub(crate) fn detail(g: &Guest) -> String {
    [
        format!("ID:        {}", g.id),
        format!("Name:      {}", g.name),
        format!("VIP:       {}", if g.is_vip { "yes" } else { "no" }),
        format!("Group:     {}", g.group.as_deref().unwrap_or("-")),
        format!("Party:     {}", g.attendance_count),
        format!("Arrived:   {}", arrival(g)),
        format!("Added:     {}", g.created_at.format("%Y-%m-%d %H:%M")),
    ]
    .join("\n")
}

/// QR payload and invitation link for one guest.
#[derive(Serialize)]
struct QrView {
    id: String,
    name: String,
    payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    invitation_url: Option<String>,
}

fn qr_detail(v: &QrView) -> String {
    let mut lines = vec![
        format!("Guest:     {} ({})", v.name, v.id),
        format!("Payload:   {}", v.payload),
    ];
    if let Some(ref url) = v.invitation_url {
        lines.push(format!("Invite:    {url}"));
    }
    lines.join("\n")
}

fn payload_detail(p: &QrPayload) -> String {
    [
        format!("ID:        {}", p.id),
        format!("Name:      {}", p.name),
        format!("VIP:       {}", if p.vip { "yes" } else { "no" }),
    ]
    .join("\n")
}

fn list_filter(args: &GuestListArgs) -> GuestFilter {
    GuestFilter {
        search: args.search.clone(),
        vip: args.vip.then_some(true),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    book: &GuestBook,
    args: GuestsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        GuestsCommand::List(list) => {
            let filter = list_filter(&list);
            let listed =
                util::with_spinner("Loading guests", global.quiet, book.list(&filter)).await?;
            let guests: Vec<Guest> = listed
                .into_iter()
                .filter(|g| !list.arrived || g.checked_in)
                .filter(|g| !list.pending || !g.checked_in)
                .collect();

            let out = output::render_list(
                &global.output,
                &guests,
                |g| GuestRow::new(g, color),
                |g| g.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GuestsCommand::Get { guest } => {
            let g = util::resolve_guest(book, &guest).await?;
            let out = output::render_single(&global.output, &g, detail, |g| g.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GuestsCommand::Add {
            name,
            vip,
            group,
            party_size,
        } => {
            let mut new = NewGuest::named(name).vip(vip).party_size(party_size);
            if let Some(group) = group {
                new = new.group(group);
            }
            let created = book.create(new).await?;
            let out =
                output::render_single(&global.output, &created, detail, |g| g.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GuestsCommand::Update {
            guest,
            name,
            vip,
            group,
            party_size,
        } => {
            let update = GuestUpdate {
                name,
                is_vip: vip,
                group,
                attendance_count: party_size,
            };
            if update.is_empty() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "nothing to change; pass --name, --vip, --group, or --party-size"
                        .into(),
                });
            }
            let current = util::resolve_guest(book, &guest).await?;
            let updated = book.update(&current.id, &update).await?;
            let out =
                output::render_single(&global.output, &updated, detail, |g| g.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GuestsCommand::Delete { guest } => {
            let g = util::resolve_guest(book, &guest).await?;
            if !util::confirm(
                &format!("Remove {} from the guest list?", g.name),
                "guests delete",
                global.yes,
            )? {
                return Ok(());
            }
            book.delete(&g.id).await?;
            if !global.quiet {
                eprintln!("Removed {}", g.name);
            }
            Ok(())
        }

        GuestsCommand::CheckIn { guest, party_size } => {
            let g = util::resolve_guest(book, &guest).await?;
            let outcome = book.check_in(&g.id, party_size).await?;
            if !global.quiet {
                match &outcome {
                    CheckInOutcome::Welcomed(g) => {
                        eprintln!(
                            "{}",
                            output::paint(
                                &format!("Welcome, {} (party of {})", g.name, g.attendance_count),
                                Tone::Success,
                                color,
                            )
                        );
                    }
                    CheckInOutcome::AlreadyCheckedIn(g) => {
                        eprintln!(
                            "{}",
                            output::paint(
                                &format!("{} already checked in at {}", g.name, arrival(g)),
                                Tone::Warning,
                                color,
                            )
                        );
                    }
                }
            }
            let out = output::render_single(&global.output, outcome.guest(), detail, |g| {
                g.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GuestsCommand::Qr { guest } => {
            let g = util::resolve_guest(book, &guest).await?;
            let view = QrView {
                id: g.id.to_string(),
                name: g.name.clone(),
                payload: qr::encode(&g),
                invitation_url: book.invitation_link(&g.id)?.map(String::from),
            };
            let out = output::render_single(&global.output, &view, qr_detail, |v| {
                v.payload.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // Handled in main without a backend; kept for exhaustiveness.
        GuestsCommand::Decode { text } => decode(&text, global),

        GuestsCommand::History => {
            let history: Vec<ScanRecord> = book.scan_history()?;
            let out = output::render_list(
                &global.output,
                &history,
                |r| HistoryRow {
                    scanned_at: r.scanned_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    name: r.guest_name.clone(),
                    vip: output::vip_badge(r.is_vip, color),
                    id: r.guest_id.to_string(),
                },
                |r| r.guest_id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Decode scanned text and print the payload.
pub fn decode(text: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let payload = qr::decode(text).map_err(|_| CliError::InvalidPayload)?;
    let out = output::render_single(&global.output, &payload, payload_detail, |p| {
        p.id.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
