// unet-api: Async Rust client for the UNET feeding cockpit REST API

pub mod auth;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod interface4;
pub mod models;
pub mod tasks;
pub mod transport;

pub use auth::LoginResponse;
pub use client::ApiClient;
pub use error::Error;
pub use models::{
    Alert, AlertSeverity, AuditLogEntry, CreateTaskRequest, DashboardOverview, Device,
    DeviceStatus, EventFilters, EventPage, EventQuery, EventStatus, Integration,
    IntegrationStatus, Interface4Event, MaterialSummary, Task, TaskPriority, TaskStatus,
    TriggerSource,
};
pub use transport::{TlsMode, TransportConfig};
