//! Door scanner: check guests in from QR codes read on stdin.
//!
//! Keyboard-wedge scanners type the code text followed by Enter, so each
//! line is one scan. While a guest is being verified the next line is the
//! operator's answer instead: Enter or `y` confirms, `n` skips, and a
//! number confirms with that party size. A scanner that fires twice on
//! one code is ignored until a different code arrives.

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

use wedly_core::{CodeSource, Detection, GuestBook, ScanDriver, ScanState, Tone};

use crate::cli::{GlobalOpts, ScanArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Code source ─────────────────────────────────────────────────────

struct StdinCodes {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinCodes {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl CodeSource for StdinCodes {
    async fn next_code(&mut self) -> std::io::Result<Option<String>> {
        self.lines.next_line().await
    }
}

// ── Operator answers ────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum Answer {
    Confirm,
    Skip,
    PartySize(u32),
    Unknown,
}

fn parse_answer(line: &str) -> Answer {
    match line.trim().to_lowercase().as_str() {
        "" | "y" | "yes" => Answer::Confirm,
        "n" | "no" | "skip" => Answer::Skip,
        other => other.parse().map_or(Answer::Unknown, Answer::PartySize),
    }
}

// ── Session tally ───────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    parties: u32,
    people: u32,
    repeats: u32,
    rejected: u32,
}

impl Tally {
    fn record(&mut self, state: &ScanState) {
        match state {
            ScanState::Welcomed { guest } => {
                self.parties += 1;
                self.people += guest.attendance_count;
            }
            ScanState::AlreadyCheckedIn { .. } => self.repeats += 1,
            ScanState::InvalidPayload | ScanState::GuestNotFound { .. } => self.rejected += 1,
            _ => {}
        }
    }

    fn summary(&self) -> String {
        format!(
            "Checked in {} parties ({} people); {} repeat scans; {} rejected codes",
            self.parties, self.people, self.repeats, self.rejected
        )
    }
}

// ── Rendering ───────────────────────────────────────────────────────

fn describe(state: &ScanState, color: bool) -> String {
    let headline = output::paint(state.title(), state.tone(), color);
    let vip = |is_vip: bool| {
        let badge = output::vip_badge(is_vip, color);
        if badge.is_empty() {
            badge
        } else {
            format!(" {badge}")
        }
    };

    match state {
        ScanState::Verifying { guest, party_size } => format!(
            "{headline}  {}{} ({}), party of {party_size}",
            guest.name,
            vip(guest.is_vip),
            guest.group.as_deref().unwrap_or("no group"),
        ),
        ScanState::Welcomed { guest } => format!(
            "{headline}  {}{}, party of {}",
            guest.name,
            vip(guest.is_vip),
            guest.attendance_count
        ),
        ScanState::AlreadyCheckedIn { guest } => format!(
            "{headline}  {} arrived at {}",
            guest.name,
            guest
                .checked_in_at
                .map_or_else(|| "-".into(), |at| at.format("%H:%M").to_string())
        ),
        ScanState::GuestNotFound { id } => format!("{headline}  no guest with ID {id}"),
        ScanState::CheckInFailed { message } | ScanState::SourceFailed { message } => {
            format!("{headline}  {message}")
        }
        other => format!("{headline}  {}", other.description()),
    }
}

fn report(state: &ScanState, global: &GlobalOpts, color: bool) {
    let out = output::render_single(
        &global.output,
        state,
        |s| describe(s, color),
        |s| s.name().to_owned(),
    );
    output::print_output(&out, global.quiet);
}

fn prompt(state: &ScanState, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    if let ScanState::Verifying { guest, party_size } = state {
        eprintln!(
            "Check in {} with a party of {party_size}? [Y/n/party size]",
            guest.name
        );
    }
}

// ── Handler ─────────────────────────────────────────────────────────

async fn check_in(
    driver: &ScanDriver,
    tally: &mut Tally,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    let state = driver.check_in().await?;
    tally.record(&state);
    report(&state, global, color);
    Ok(())
}

pub async fn handle(
    book: &GuestBook,
    args: &ScanArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    // Warm the cache before the first scan.
    util::with_spinner("Loading guests", global.quiet, book.refresh()).await?;

    let driver = ScanDriver::new(book.clone());
    let mut source = StdinCodes::new();
    let mut tally = Tally::default();
    // Text whose scan produced the result currently on screen.
    let mut shown: Option<String> = None;

    driver.session().start()?;
    if !global.quiet {
        eprintln!(
            "{}",
            output::paint(
                "Ready: scan a guest's QR code (Ctrl-D to stop)",
                Tone::Info,
                color
            )
        );
    }

    while let Some(line) = driver.read_code(&mut source).await {
        let state = driver.session().state();

        if matches!(state, ScanState::Verifying { .. }) {
            match parse_answer(&line) {
                Answer::Confirm => {
                    check_in(&driver, &mut tally, global, color).await?;
                    shown = None;
                }
                Answer::PartySize(n) => match driver.session().adjust_party_size(n) {
                    Ok(()) => {
                        check_in(&driver, &mut tally, global, color).await?;
                        shown = None;
                    }
                    Err(e) => {
                        eprintln!("{e}");
                        prompt(&state, global);
                    }
                },
                Answer::Skip => {
                    driver.session().cancel()?;
                    driver.session().start()?;
                    if !global.quiet {
                        eprintln!("Skipped");
                    }
                }
                Answer::Unknown => prompt(&state, global),
            }
            continue;
        }

        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if state.is_terminal() {
            if shown.as_deref() == Some(text) {
                debug!("repeat scan ignored");
                continue;
            }
            driver.scan_next()?;
        }

        match driver.process(text).await? {
            Detection::Dropped => debug!("scan dropped while busy"),
            Detection::Rejected | Detection::Accepted(_) => {
                let state = driver.session().state();
                tally.record(&state);
                report(&state, global, color);
                shown = state.is_terminal().then(|| text.to_owned());

                if matches!(state, ScanState::Verifying { .. }) {
                    if args.auto_confirm {
                        check_in(&driver, &mut tally, global, color).await?;
                    } else {
                        prompt(&state, global);
                    }
                }
            }
        }
    }

    if !global.quiet {
        eprintln!("{}", tally.summary());
    }

    match driver.session().state() {
        ScanState::SourceFailed { message } => Err(CliError::Scanner { message }),
        _ => Ok(()),
    }
}
