//! Command tree and global flags of `unet`.
//!
//! Only depends on clap: `build.rs` compiles this file for man pages and
//! completions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// unet -- command-line client for the centralized feeding cockpit
#[derive(Debug, Parser)]
#[command(
    name = "unet",
    version,
    about = "Monitor the UNET centralized feeding cockpit from the command line",
    long_about = "Sign in to a UNET feeding cockpit server, inspect devices, tasks,\n\
        alerts and the interface4 event archive, queue manual feeding tasks,\n\
        and follow the live dashboard.",
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
    /// Profile from config.toml
    #[arg(long, short = 'p', env = "UNET_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Cockpit server, e.g. http://10.0.4.20:8000 (overrides the profile)
    #[arg(long, short = 's', env = "UNET_SERVER", global = true)]
    pub server: Option<String>,

    /// How results are printed
    #[arg(
        long,
        short = 'o',
        env = "UNET_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Colorize tables and status labels
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Log to stderr: -v info, -vv debug, -vvv trace
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip TLS certificate checks (self-signed plant gateways)
    #[arg(long, short = 'k', env = "UNET_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "UNET_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Directory holding the stored session
    #[arg(long, env = "UNET_SESSION_DIR", global = true)]
    pub session_dir: Option<PathBuf>,
}

// ── Output ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table
    Table,
    /// Indented JSON
    Json,
    /// One JSON document per line
    JsonCompact,
    /// YAML
    Yaml,
    /// Bare identifiers, one per line
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal
    Auto,
    /// Always
    Always,
    /// Never
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session
    Login(LoginArgs),

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Headline metrics and material flow
    #[command(alias = "ov")]
    Overview,

    /// Device monitoring list
    #[command(alias = "dev", alias = "d")]
    Devices,

    /// List or create feeding tasks
    #[command(alias = "t")]
    Tasks(TasksArgs),

    /// Alert list
    Alerts,

    /// Audit log
    Audit,

    /// Upstream integration status
    Integrations,

    /// Browse and export the interface4 event archive
    #[command(alias = "ev")]
    Events(EventsArgs),

    /// Follow the dashboard, refreshing on an interval
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOGIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Login name (defaults to the profile's username)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Password (prefer the keyring or the prompt)
    #[arg(long, env = "UNET_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Store the password in the system keyring after a successful login
    #[arg(long)]
    pub save_password: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TASKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// List queued, running and completed tasks
    #[command(alias = "ls")]
    List,

    /// Queue a manual feeding task
    Create {
        /// Material code (e.g. PP-01)
        #[arg(long, short = 'm')]
        material: String,

        /// Target device ID (e.g. HOP-01)
        #[arg(long, short = 'd')]
        device: String,

        /// Quantity in kg
        #[arg(long, short = 'n')]
        quantity: u32,

        /// Task priority
        #[arg(long, default_value = "medium")]
        priority: PriorityArg,

        /// Start time (RFC 3339, e.g. 2024-06-15T08:00:00+08:00)
        #[arg(long)]
        scheduled_at: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    High,
    Medium,
    Low,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EVENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

/// Archive filters shared by `list` and `export`.
#[derive(Debug, Clone, Default, Args)]
pub struct EventFilterArgs {
    /// Match event ID, batch, material or point code
    #[arg(long)]
    pub keyword: Option<String>,

    /// Event status (captured, processing, completed, failed)
    #[arg(long)]
    pub status: Option<String>,

    /// Earliest trigger time (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub start: Option<String>,

    /// Latest trigger time (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// Show one page of the archive
    #[command(alias = "ls")]
    List {
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Rows per page (defaults to the profile's page size)
        #[arg(long, short = 'l')]
        page_size: Option<u32>,

        #[command(flatten)]
        filters: EventFilterArgs,
    },

    /// Download every matching event as CSV
    Export {
        #[command(flatten)]
        filters: EventFilterArgs,

        /// Directory for the timestamped file (defaults to the current one)
        #[arg(long, conflicts_with = "file")]
        dir: Option<PathBuf>,

        /// Write to this exact path instead
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Refresh period in seconds (defaults to the profile's interval)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Stop after this many updates
    #[arg(long, short = 'n')]
    pub count: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key (server, username, insecure, timeout, ca_cert,
        /// refresh_interval_secs, page_size, refresh_policy)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
