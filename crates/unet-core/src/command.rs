// ── Command API ──
//
// Every user action the cockpit supports, as data. Front ends build a
// `Command` and hand it to `Controller::execute`, which applies the
// state transition and publishes the resulting view.

use secrecy::SecretString;

use unet_api::{CreateTaskRequest, EventFilters, Task};

use crate::archive::ExportFile;
use crate::session::UserProfile;
use crate::view::Page;

/// Whether the cockpit is currently being looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The user signed out.
    Manual,
    /// The server rejected the token.
    Expired,
}

#[derive(Debug)]
pub enum Command {
    Login {
        username: String,
        password: SecretString,
    },
    Logout,
    Refresh,
    CreateTask(CreateTaskRequest),
    SetVisibility(Visibility),
    ActivatePage(Page),
    /// Submit the archive filter form; always reloads page one.
    ApplyEventFilters(EventFilters),
    ResetEventFilters,
    ReloadEvents,
    NextEventPage,
    PrevEventPage,
    ExportEvents,
}

impl Command {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Refresh => "refresh",
            Self::CreateTask(_) => "create_task",
            Self::SetVisibility(_) => "set_visibility",
            Self::ActivatePage(_) => "activate_page",
            Self::ApplyEventFilters(_) => "apply_event_filters",
            Self::ResetEventFilters => "reset_event_filters",
            Self::ReloadEvents => "reload_events",
            Self::NextEventPage => "next_event_page",
            Self::PrevEventPage => "prev_event_page",
            Self::ExportEvents => "export_events",
        }
    }
}

/// Result of a command execution.
#[derive(Debug)]
pub enum CommandResult {
    Ok,
    /// The command had nothing to do (e.g. "next" on the last page).
    Ignored,
    LoggedIn(UserProfile),
    TaskCreated(Box<Task>),
    Exported(ExportFile),
}
