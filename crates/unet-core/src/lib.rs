//! State layer between `unet-api` and the cockpit front ends (CLI / TUI).
//!
//! - **[`Controller`]**: owns the session, the 5 second dashboard refresh
//!   loop, and the interface4 archive cursor. Every transition publishes a
//!   fresh [`ViewState`] on a `tokio::sync::watch` channel.
//!
//! - **[`Command`]**: every user action as data, routed through
//!   [`Controller::execute`].
//!
//! - **[`SessionStore`]**: durable token + user storage. [`FileSessionStore`]
//!   for real runs, [`MemorySessionStore`] for tests.
//!
//! - **[`display`]**: pure formatting helpers shared by both front ends
//!   (status labels, number grouping, metric cards, pager text).

pub mod archive;
pub mod command;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod session;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use archive::{EventArchive, ExportFile, Pager, normalize_filters};
pub use command::{Command, CommandResult, LogoutReason, Visibility};
pub use config::{
    ClientConfig, DEFAULT_PAGE_SIZE, DEFAULT_REFRESH_INTERVAL, RefreshPolicy, TlsVerification,
};
pub use controller::Controller;
pub use error::CoreError;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore, UserProfile};
pub use view::{DashboardData, Feedback, FeedbackLevel, Page, Screen, ViewState};

// ── Wire types ──────────────────────────────────────────────────────
pub use unet_api::{
    Alert, AlertSeverity, AuditLogEntry, CreateTaskRequest, DashboardOverview, Device,
    DeviceStatus, EventFilters, EventPage, EventQuery, EventStatus, Integration,
    IntegrationStatus, Interface4Event, MaterialSummary, Task, TaskPriority, TaskStatus,
    TriggerSource,
};
