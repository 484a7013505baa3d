mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wedly_core::GuestBook;

use crate::cli::{Cli, Command, GuestsArgs, GuestsCommand};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let mut cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    let cfg = config::load_config_or_default();
    config::apply_display_defaults(&mut cli.global, &cfg.defaults);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a backend
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "wedly", &mut std::io::stdout());
            Ok(())
        }

        // Decoding scanned text is pure
        Command::Guests(GuestsArgs {
            command: GuestsCommand::Decode { text },
        }) => commands::guests::decode(&text, &cli.global),

        // All other commands go through the guest book
        cmd => {
            let book_config = config::build_book_config(&cli.global)?;
            let book = GuestBook::new(book_config)?;

            tracing::debug!(command = ?cmd, backend = %book.backend_kind(), "dispatching command");
            commands::dispatch(cmd, &book, &cli.global).await
        }
    }
}
