// Wire types for the cockpit REST API.
//
// Every field except an entity's identifying key tolerates `null` or
// absence: a partially populated backend row should still render, with
// the gaps shown as placeholders. Enum-valued fields are open enums that
// keep unknown server values verbatim.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! open_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// A value this client does not know, kept as sent.
            Other(String),
        }

        impl $name {
            /// The wire representation.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(raw) => raw,
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($wire => Self::$variant,)+
                    _ => Self::Other(raw),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::from(raw.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_owned(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_enum! {
    /// Operating state of a feeding device.
    DeviceStatus {
        Online => "online",
        Offline => "offline",
        Maintenance => "maintenance",
        Degraded => "degraded",
    }
}

open_enum! {
    /// Lifecycle state of a dispatch task.
    TaskStatus {
        Queued => "queued",
        InProgress => "in_progress",
        Completed => "completed",
    }
}

open_enum! {
    TaskPriority {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

open_enum! {
    AlertSeverity {
        Critical => "critical",
        Warning => "warning",
        Info => "info",
    }
}

open_enum! {
    /// Health of an upstream integration (ERP, MES, PLC gateways).
    IntegrationStatus {
        Online => "online",
        Offline => "offline",
        Degraded => "degraded",
    }
}

open_enum! {
    /// Processing state of an interface4 capture event.
    EventStatus {
        Captured => "captured",
        Processing => "processing",
        Completed => "completed",
        Failed => "failed",
    }
}

open_enum! {
    /// Protocol that produced an interface4 event.
    TriggerSource {
        OpcUa => "OPC_UA",
        Modbus => "Modbus",
        Http => "HTTP",
    }
}

// ── Dashboard ───────────────────────────────────────────────────────

/// `GET /dashboard/overview`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    #[serde(default)]
    pub active_tasks: Option<i64>,
    #[serde(default)]
    pub completed_today: Option<i64>,
    #[serde(default)]
    pub equipment_online: Option<i64>,
    #[serde(default)]
    pub alarm_count: Option<i64>,
    /// kg/h across online devices.
    #[serde(default)]
    pub throughput: Option<f64>,
    /// kWh estimate.
    #[serde(default)]
    pub energy_usage: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub material_summary: Vec<MaterialSummary>,
}

/// Per-hopper material flow line on the overview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSummary {
    #[serde(default)]
    pub material_code: Option<String>,
    #[serde(default)]
    pub hopper: Option<String>,
    #[serde(default)]
    pub throughput: Option<f64>,
    /// Percent change, signed.
    #[serde(default)]
    pub trend: Option<f64>,
}

/// `GET /monitoring/devices`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<DeviceStatus>,
    #[serde(default)]
    pub material: Option<String>,
    /// Degrees Celsius.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Hopper fill level in percent.
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub last_heartbeat: Option<String>,
    #[serde(default)]
    pub throughput: Option<f64>,
    #[serde(default)]
    pub alarms: Vec<String>,
}

/// `GET /tasks`, also the body of a `POST /tasks` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_id: String,
    #[serde(default)]
    pub material_code: Option<String>,
    #[serde(default)]
    pub target_device: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Completion in percent.
    #[serde(default)]
    pub progress: Option<i64>,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// `GET /alerts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(default)]
    pub alert_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub severity: Option<AlertSeverity>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub raised_at: Option<String>,
    #[serde(default)]
    pub acknowledged: bool,
}

/// `GET /audit/logs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    #[serde(default)]
    pub log_id: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `GET /integrations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub name: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub status: Option<IntegrationStatus>,
    #[serde(default)]
    pub latency_ms: Option<i64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

// ── Tasks ───────────────────────────────────────────────────────────

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub material_code: String,
    pub target_device: String,
    pub quantity: u32,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default = "manual_source")]
    pub source: String,
}

fn manual_source() -> String {
    "Manual".into()
}

impl CreateTaskRequest {
    /// A manual, medium-priority, unscheduled task.
    pub fn new(
        material_code: impl Into<String>,
        target_device: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            material_code: material_code.into(),
            target_device: target_device.into(),
            quantity,
            priority: TaskPriority::default(),
            scheduled_at: None,
            source: manual_source(),
        }
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn scheduled_at(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_at = Some(at);
        self
    }
}

// ── Interface4 archive ──────────────────────────────────────────────

/// One captured device event from the interface4 archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interface4Event {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub point_code: Option<String>,
    #[serde(default)]
    pub material_code: Option<String>,
    #[serde(default)]
    pub batch_no: Option<String>,
    #[serde(default)]
    pub produced_qty: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub trigger_value: Option<f64>,
    #[serde(default)]
    pub status: Option<EventStatus>,
    #[serde(default)]
    pub handler: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub trigger_source: Option<TriggerSource>,
    #[serde(default)]
    pub triggered_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `GET /interface4/events` response page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    #[serde(default)]
    pub items: Vec<Interface4Event>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Archive filters. Empty strings mean "not set" and are never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilters {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl EventFilters {
    /// Query pairs for the filters that are set, in wire order.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        [
            ("keyword", &self.keyword),
            ("status", &self.status),
            ("start", &self.start),
            ("end", &self.end),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key, value.clone()))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.to_query().is_empty()
    }
}

/// A paged archive query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub page: u32,
    pub page_size: u32,
    pub filters: EventFilters,
}

impl EventQuery {
    /// `page` and `pageSize` first, then any set filters.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        pairs.extend(self.filters.to_query());
        pairs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_enum_values_survive_a_round_trip() {
        let status: DeviceStatus = serde_json::from_value(json!("calibrating")).unwrap();
        assert_eq!(status, DeviceStatus::Other("calibrating".into()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("calibrating"));
    }

    #[test]
    fn trigger_source_uses_protocol_spelling() {
        let source: TriggerSource = serde_json::from_value(json!("OPC_UA")).unwrap();
        assert_eq!(source, TriggerSource::OpcUa);
        assert_eq!(source.to_string(), "OPC_UA");
    }

    #[test]
    fn device_tolerates_nulls_and_missing_fields() {
        let device: Device = serde_json::from_value(json!({
            "deviceId": "DRY-01",
            "name": "干燥机 1#",
            "status": null,
            "temperature": 78.25
        }))
        .unwrap();
        assert_eq!(device.status, None);
        assert_eq!(device.material, None);
        assert!(device.alarms.is_empty());
        assert_eq!(device.temperature, Some(78.25));
    }

    #[test]
    fn create_task_serializes_camel_case_with_defaults() {
        let request = CreateTaskRequest::new("PA66-GF30", "DRY-01", 120);
        let body = serde_json::to_value(request).unwrap();
        assert_eq!(
            body,
            json!({
                "materialCode": "PA66-GF30",
                "targetDevice": "DRY-01",
                "quantity": 120,
                "priority": "medium",
                "source": "Manual"
            })
        );
    }

    #[test]
    fn filters_skip_empty_values() {
        let filters = EventFilters {
            keyword: "EVT".into(),
            end: "2024-06-30".into(),
            ..EventFilters::default()
        };
        assert_eq!(
            filters.to_query(),
            vec![("keyword", "EVT".to_owned()), ("end", "2024-06-30".to_owned())]
        );
    }

    #[test]
    fn event_query_leads_with_paging() {
        let query = EventQuery {
            page: 2,
            page_size: 10,
            filters: EventFilters {
                status: "failed".into(),
                ..EventFilters::default()
            },
        };
        assert_eq!(
            query.to_query(),
            vec![
                ("page", "2".to_owned()),
                ("pageSize", "10".to_owned()),
                ("status", "failed".to_owned()),
            ]
        );
    }
}
