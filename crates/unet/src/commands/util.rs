//! Shared helpers for command handlers.

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

use unet_core::{Controller, EventFilters, UserProfile};

use crate::cli::{EventFilterArgs, GlobalOpts};
use crate::error::CliError;

/// Adopt the stored session or fail with "not signed in".
pub fn require_session(controller: &Controller) -> Result<UserProfile, CliError> {
    controller.resume()?.ok_or(CliError::NotLoggedIn)
}

/// Whether we may prompt the user.
pub fn interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::validation("interactive", format!("prompt failed: {e}"))
}

/// Archive filters from flags. Unset flags become empty strings.
pub fn filters_from(args: EventFilterArgs) -> EventFilters {
    EventFilters {
        keyword: args.keyword.unwrap_or_default(),
        status: args.status.unwrap_or_default(),
        start: args.start.unwrap_or_default(),
        end: args.end.unwrap_or_default(),
    }
}

/// A stderr spinner, hidden when quiet or not on a terminal.
pub fn spinner(global: &GlobalOpts, message: &str) -> ProgressBar {
    if global.quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(std::time::Duration::from_millis(80));
    bar
}
