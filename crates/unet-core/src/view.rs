// ── View state ──
//
// Everything a front end needs to draw the cockpit, owned by the
// controller and published through a `watch` channel after every
// state transition.

use serde::Serialize;
use strum::{Display, EnumIter};

use unet_api::{Alert, AuditLogEntry, DashboardOverview, Device, Integration, Task};

use crate::archive::EventArchive;
use crate::session::UserProfile;

/// Top-level view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Screen {
    #[default]
    Login,
    Dashboard,
}

/// Pages inside the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
pub enum Page {
    #[default]
    Overview,
    Events,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "集中供料驾驶舱",
            Self::Events => "接口4 数据归档",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Overview => "Modbus · OPC UA · 任务调度一体化",
            Self::Events => "实时采集事件全链路追踪",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeedbackLevel {
    Info,
    Success,
    Error,
}

/// An inline status line under a form or table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub message: String,
    pub level: FeedbackLevel,
}

impl Feedback {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: FeedbackLevel::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: FeedbackLevel::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: FeedbackLevel::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == FeedbackLevel::Error
    }
}

/// The six collections of one refresh pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardData {
    pub overview: Option<DashboardOverview>,
    pub devices: Vec<Device>,
    pub tasks: Vec<Task>,
    pub alerts: Vec<Alert>,
    pub audit_logs: Vec<AuditLogEntry>,
    pub integrations: Vec<Integration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub screen: Screen,
    pub page: Page,
    pub user: Option<UserProfile>,
    /// Under the login form.
    pub login_feedback: Option<Feedback>,
    /// Under the new-task form; refresh failures land here too.
    pub task_feedback: Option<Feedback>,
    /// Above the interface4 table.
    pub events_feedback: Option<Feedback>,
    pub dashboard: DashboardData,
    pub events: EventArchive,
    /// `lastUpdated` of the last applied overview.
    pub last_updated: Option<String>,
    pub auto_refresh: bool,
    pub visible: bool,
}

impl ViewState {
    pub fn new(page_size: u32) -> Self {
        Self {
            screen: Screen::Login,
            page: Page::Overview,
            user: None,
            login_feedback: None,
            task_feedback: None,
            events_feedback: None,
            dashboard: DashboardData::default(),
            events: EventArchive::new(page_size),
            last_updated: None,
            auto_refresh: false,
            visible: true,
        }
    }
}
