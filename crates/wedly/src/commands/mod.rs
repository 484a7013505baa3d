//! Command dispatch: bridges CLI args -> guest book calls -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod guests;
pub mod invitation;
pub mod scan;
pub mod stats;
pub mod util;
pub mod wedding;

use wedly_core::GuestBook;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, book: &GuestBook, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Guests(args) => guests::handle(book, args, global).await,
        Command::Stats => stats::handle(book, global).await,
        Command::Scan(args) => scan::handle(book, &args, global).await,
        Command::Wedding(args) => wedding::handle(book, args, global).await,
        Command::Invitation(args) => invitation::handle(book, args, global).await,
        Command::Auth(args) => auth::handle(book, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
