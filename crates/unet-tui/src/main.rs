//! `unet-tui`: the feeding cockpit in a terminal.
//!
//! Built on [ratatui](https://ratatui.rs). All state lives in
//! `unet-core`'s [`Controller`]; a data bridge forwards every published
//! [`ViewState`](unet_core::ViewState) into the TUI action loop, and the
//! screens turn key presses back into controller commands.
//!
//! Logs go to `unet-tui.log` in the data directory so they never corrupt
//! the terminal. Focus loss pauses the 5 s refresh loop, focus gain
//! refreshes immediately and resumes it.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use unet_core::{Controller, FileSessionStore, SessionStore};

use crate::app::App;

/// Terminal cockpit for the central material-feeding system.
#[derive(Parser, Debug)]
#[command(name = "unet-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short, long, env = "UNET_PROFILE")]
    profile: Option<String>,

    /// Cockpit server URL (overrides the profile)
    #[arg(short, long, env = "UNET_SERVER")]
    server: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(short = 'k', long, env = "UNET_INSECURE")]
    insecure: bool,

    /// Directory holding the stored session
    #[arg(long, env = "UNET_SESSION_DIR")]
    session_dir: Option<PathBuf>,

    /// Where exported CSV files are written
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,

    /// Log level for the log file (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log file path (defaults to unet-tui.log in the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Set up file-based tracing. Stdout belongs to the terminal UI, so
/// nothing may be logged there. The returned guard flushes on drop.
fn setup_tracing(cli: &Cli) -> Result<WorkerGuard> {
    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| unet_config::data_dir().join("unet-tui.log"));

    let log_dir = log_file
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    std::fs::create_dir_all(&log_dir)
        .wrap_err_with(|| format!("cannot create log directory {}", log_dir.display()))?;
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("unet-tui.log"));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "unet_tui={level},unet_core={level},unet_api={level}",
            level = cli.log_level
        ))
    });

    let file_appender = tracing_appender::rolling::never(&log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}

/// Build the [`Controller`] from the config file plus CLI overrides.
fn build_controller(cli: &Cli) -> Result<(Controller, Option<String>)> {
    let cfg = unet_config::load_config_or_default();
    let name = cfg.active_profile_name(cli.profile.as_deref());

    let mut profile = match cfg.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if cli.profile.is_some() => {
            let path = unet_config::config_path();
            color_eyre::eyre::bail!("profile '{name}' not found in {}", path.display());
        }
        None => unet_config::Profile::default(),
    };
    if let Some(ref server) = cli.server {
        profile.server.clone_from(server);
    }
    if cli.insecure {
        profile.insecure = true;
    }

    let client = unet_config::profile_to_client_config(&profile, &cfg.defaults)?;
    let sessions: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(
        unet_config::session_dir(cli.session_dir.as_deref()),
    ));
    let controller = Controller::new(client, sessions)?;

    info!(profile = %name, server = %profile.server, "controller ready");
    Ok((controller, profile.username))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first so a panic during init still restores the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting unet-tui");

    let (controller, username) = build_controller(&cli)?;
    let mut app = App::new(controller.clone(), username, cli.export_dir);
    let result = app.run().await;

    controller.shutdown().await;
    result
}
