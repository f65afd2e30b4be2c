mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use unet_core::{Controller, SessionStore};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.global);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

/// Logs go to stderr so `-o json` output stays parseable. `RUST_LOG` wins
/// over `-v`/`-q`.
fn init_tracing(global: &GlobalOpts) {
    let level = match (global.quiet, global.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "unet=info,unet_core=info,unet_api=info",
        (false, 2) => "unet=debug,unet_core=debug,unet_api=debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .with_target(global.verbose > 1)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { global, command } = cli;

    match command {
        // Local only, no controller
        Command::Config(args) => commands::config_cmd::handle(args, &global),
        Command::Completions(args) => {
            clap_complete::generate(args.shell, &mut Cli::command(), "unet", &mut io::stdout());
            Ok(())
        }

        cmd => {
            let profile = config::resolve(&global)?;
            let client = match &cmd {
                Command::Watch(args) => {
                    commands::watch::client_config(profile.client.clone(), args)
                }
                _ => config::one_shot(profile.client.clone()),
            };
            let sessions: Arc<dyn SessionStore> = Arc::new(config::session_store(&global));
            let controller = Controller::new(client, sessions)?;

            tracing::debug!(command = ?cmd, profile = %profile.name, "dispatching");
            let result = commands::dispatch(cmd, &controller, &profile, &global).await;
            controller.shutdown().await;
            result
        }
    }
}
