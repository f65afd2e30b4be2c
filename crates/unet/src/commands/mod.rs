//! Command dispatch: bridges CLI args -> controller calls -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod dashboard;
pub mod events;
pub mod tasks;
pub mod util;
pub mod watch;

use unet_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(controller, args, resolved, global).await,
        Command::Logout => auth::logout(controller, global).await,
        Command::Whoami => auth::whoami(controller, global),
        Command::Overview => dashboard::overview(controller, global).await,
        Command::Devices => dashboard::devices(controller, global).await,
        Command::Alerts => dashboard::alerts(controller, global).await,
        Command::Audit => dashboard::audit(controller, global).await,
        Command::Integrations => dashboard::integrations(controller, global).await,
        Command::Tasks(args) => tasks::handle(controller, args, global).await,
        Command::Events(args) => events::handle(controller, args, resolved, global).await,
        Command::Watch(args) => watch::handle(controller, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
