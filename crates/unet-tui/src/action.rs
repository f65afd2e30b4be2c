//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;

use unet_core::{CreateTaskRequest, EventFilters, Page, ViewState, Visibility};

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

#[derive(Debug)]
pub enum Action {
    // ── Lifecycle ─────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Data (from the bridge) ────────────────────────────────────
    ViewUpdated(Arc<ViewState>),

    // ── Navigation ────────────────────────────────────────────────
    SwitchPage(Page),
    ToggleHelp,
    OpenTaskForm,
    CloseTaskForm,

    // ── Controller commands ───────────────────────────────────────
    Login {
        username: String,
        password: SecretString,
    },
    Logout,
    Refresh,
    Visibility(Visibility),
    SubmitTask(CreateTaskRequest),
    ApplyEventFilters(EventFilters),
    ResetEventFilters,
    ReloadEvents,
    NextEventPage,
    PrevEventPage,
    ExportEvents,

    // ── Results ───────────────────────────────────────────────────
    TaskCreated,
    Exported(PathBuf),
    Notify(Notification),
}
