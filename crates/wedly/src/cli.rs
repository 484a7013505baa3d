//! Clap derive structures for the `wedly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wedly -- guest list and door check-in for weddings
#[derive(Debug, Parser)]
#[command(
    name = "wedly",
    version,
    about = "Manage a wedding guest list and check guests in at the door",
    long_about = "Keep a wedding guest list, hand out QR codes, and check guests in\n\
        at the venue with a QR scanner.\n\n\
        Works against the wedding REST API or a local JSON data file.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "WEDLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// REST API base URL, including /api (overrides profile)
    #[arg(long, env = "WEDLY_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Keep guests in a local JSON file instead of the REST API
    #[arg(long, env = "WEDLY_DATA_FILE", global = true)]
    pub data_file: Option<PathBuf>,

    /// Use the local backend with the profile's (or default) data file
    #[arg(long, global = true)]
    pub local: bool,

    /// Bearer token for the REST API
    #[arg(long, env = "WEDLY_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Public site serving invitation pages
    #[arg(long, env = "WEDLY_INVITATION_BASE", global = true)]
    pub invitation_base: Option<String>,

    /// Output format [default: config `defaults.output`, else table]
    #[arg(
        long = "output",
        short = 'o',
        env = "WEDLY_OUTPUT",
        value_name = "FORMAT",
        global = true
    )]
    pub output_flag: Option<OutputFormat>,

    /// When to use color output [default: config `defaults.color`, else auto]
    #[arg(long = "color", value_name = "WHEN", global = true)]
    pub color_flag: Option<ColorMode>,

    /// Output format in effect, resolved from the flag and config.
    #[arg(skip)]
    pub output: OutputFormat,

    /// Color mode in effect, resolved from the flag and config.
    #[arg(skip)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "WEDLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "WEDLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Default, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    #[default]
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the guest list
    #[command(alias = "g")]
    Guests(GuestsArgs),

    /// Show attendance counters
    Stats,

    /// Check guests in by reading QR codes from a scanner
    Scan(ScanArgs),

    /// View and edit the wedding details
    #[command(alias = "w")]
    Wedding(WeddingArgs),

    /// Show a guest's personalized invitation, or the wishes guests left
    Invitation(InvitationArgs),

    /// Log in to the REST API
    Auth(AuthArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Invitation ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct InvitationArgs {
    #[command(subcommand)]
    pub command: Option<InvitationCommand>,

    /// Guest ID or exact name
    #[arg(required = true)]
    pub guest: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum InvitationCommand {
    /// List the wishes guests left on the invitation page
    Wishes,

    /// Leave a wish for the couple
    Wish {
        /// Who the wish is from (2-100 characters)
        #[arg(long)]
        name: String,

        /// The wish itself (5-500 characters)
        message: String,
    },
}

// ── Guests ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GuestsArgs {
    #[command(subcommand)]
    pub command: GuestsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GuestsCommand {
    /// List guests
    #[command(alias = "ls")]
    List(GuestListArgs),

    /// Show one guest
    Get {
        /// Guest ID or exact name
        guest: String,
    },

    /// Add a guest
    Add {
        /// Full name
        name: String,

        /// Mark as VIP
        #[arg(long)]
        vip: bool,

        /// Seating or family group
        #[arg(long)]
        group: Option<String>,

        /// Expected party size
        #[arg(long, short = 'n', default_value = "1")]
        party_size: u32,
    },

    /// Change a guest's details
    Update {
        /// Guest ID or exact name
        guest: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// VIP flag
        #[arg(long)]
        vip: Option<bool>,

        /// New group (empty string clears it)
        #[arg(long)]
        group: Option<String>,

        /// New party size
        #[arg(long, short = 'n')]
        party_size: Option<u32>,
    },

    /// Remove a guest
    #[command(alias = "rm")]
    Delete {
        /// Guest ID or exact name
        guest: String,
    },

    /// Check a guest in by hand
    CheckIn {
        /// Guest ID or exact name
        guest: String,

        /// Party size actually arriving (defaults to the expected size)
        #[arg(long, short = 'n')]
        party_size: Option<u32>,
    },

    /// Print the QR payload and invitation link for a guest
    Qr {
        /// Guest ID or exact name
        guest: String,
    },

    /// Decode scanned QR text without touching the guest list
    Decode {
        /// Text read from the QR code
        text: String,
    },

    /// Show recorded check-ins, newest last
    History,
}

#[derive(Debug, Args)]
pub struct GuestListArgs {
    /// Case-insensitive name search
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only VIP guests
    #[arg(long)]
    pub vip: bool,

    /// Only guests who have arrived
    #[arg(long, conflicts_with = "pending")]
    pub arrived: bool,

    /// Only guests still expected
    #[arg(long)]
    pub pending: bool,
}

// ── Scan ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Check guests in as soon as they are found, without asking
    #[arg(long)]
    pub auto_confirm: bool,
}

// ── Wedding ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WeddingArgs {
    #[command(subcommand)]
    pub command: WeddingCommand,
}

#[derive(Debug, Subcommand)]
pub enum WeddingCommand {
    /// Show the wedding details
    Show,

    /// Set one field of the wedding details
    Set {
        /// Field name (bride, groom, date, time, venue, message, ...)
        key: String,

        /// New value (empty string clears optional fields)
        value: String,
    },

    /// Replace the wedding details with the contents of a JSON file
    Import {
        /// Path to a JSON file
        path: PathBuf,
    },
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Log in and store the issued token in the system keyring
    Login {
        /// Account email
        email: String,

        /// Print the token instead of storing it
        #[arg(long)]
        print_token: bool,
    },

    /// Check that the stored token is still accepted
    Verify,

    /// Forget the stored token
    Logout,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Display current configuration (tokens redacted)
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (backend, api_url, data_file, invitation_base, ...)
        key: String,

        /// New value
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
