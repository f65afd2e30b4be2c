// Enum-to-label translation.
//
// Known wire values map to the cockpit's display labels; anything else
// is shown as sent, and an absent or empty value shows `--`.

use std::borrow::Cow;

use unet_api::{
    AlertSeverity, DeviceStatus, EventStatus, IntegrationStatus, TaskPriority, TaskStatus,
    TriggerSource,
};

use super::format::MISSING;

fn lookup<'a>(raw: &'a str, table: &[(&str, &'static str)]) -> Cow<'a, str> {
    if raw.is_empty() {
        return Cow::Borrowed(MISSING);
    }
    table
        .iter()
        .find(|(wire, _)| *wire == raw)
        .map_or(Cow::Borrowed(raw), |(_, label)| Cow::Borrowed(*label))
}

/// Device, task, and integration states share one vocabulary.
pub fn status_label(raw: &str) -> Cow<'_, str> {
    lookup(
        raw,
        &[
            ("online", "在线"),
            ("offline", "离线"),
            ("maintenance", "维护"),
            ("queued", "排队中"),
            ("in_progress", "执行中"),
            ("completed", "已完成"),
            ("degraded", "性能下降"),
            ("processing", "处理中"),
        ],
    )
}

pub fn priority_label(raw: &str) -> Cow<'_, str> {
    lookup(raw, &[("high", "高"), ("medium", "中"), ("low", "低")])
}

pub fn severity_label(raw: &str) -> Cow<'_, str> {
    lookup(
        raw,
        &[("critical", "紧急"), ("warning", "警告"), ("info", "信息")],
    )
}

pub fn event_status_label(raw: &str) -> Cow<'_, str> {
    lookup(
        raw,
        &[
            ("captured", "已捕获"),
            ("processing", "处理中"),
            ("completed", "已完成"),
            ("failed", "异常"),
        ],
    )
}

pub fn source_label(raw: &str) -> Cow<'_, str> {
    lookup(
        raw,
        &[("OPC_UA", "OPC UA"), ("Modbus", "Modbus"), ("HTTP", "HTTP 回调")],
    )
}

pub fn ack_label(acknowledged: bool) -> &'static str {
    if acknowledged { "已确认" } else { "待处理" }
}

/// Display label of an API enum value.
pub trait Label {
    fn label(&self) -> Cow<'_, str>;
}

macro_rules! impl_label {
    ($($ty:ty => $func:ident),+ $(,)?) => {
        $(impl Label for $ty {
            fn label(&self) -> Cow<'_, str> {
                $func(self.as_str())
            }
        })+
    };
}

impl_label! {
    DeviceStatus => status_label,
    TaskStatus => status_label,
    IntegrationStatus => status_label,
    TaskPriority => priority_label,
    AlertSeverity => severity_label,
    EventStatus => event_status_label,
    TriggerSource => source_label,
}

/// Label of an optional value, `--` when absent.
pub fn label_or_dash<L: Label>(value: Option<&L>) -> String {
    value.map_or_else(|| MISSING.to_owned(), |v| v.label().into_owned())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn known_values_are_translated() {
        assert_eq!(status_label("in_progress"), "执行中");
        assert_eq!(status_label("degraded"), "性能下降");
        assert_eq!(priority_label("high"), "高");
        assert_eq!(severity_label("critical"), "紧急");
        assert_eq!(event_status_label("failed"), "异常");
        assert_eq!(source_label("HTTP"), "HTTP 回调");
    }

    #[test]
    fn unknown_values_render_as_themselves() {
        assert_eq!(status_label("calibrating"), "calibrating");
        assert_eq!(priority_label("urgent"), "urgent");
        assert_eq!(source_label("MQTT"), "MQTT");
    }

    #[test]
    fn empty_values_render_as_dash() {
        assert_eq!(status_label(""), "--");
        assert_eq!(event_status_label(""), "--");
    }

    #[test]
    fn typed_values_use_the_same_tables() {
        assert_eq!(TriggerSource::OpcUa.label(), "OPC UA");
        assert_eq!(DeviceStatus::Other("standby".into()).label(), "standby");
        assert_eq!(label_or_dash::<EventStatus>(None), "--");
        assert_eq!(label_or_dash(Some(&TaskStatus::Queued)), "排队中");
    }

    #[test]
    fn acknowledgement_labels() {
        assert_eq!(ack_label(true), "已确认");
        assert_eq!(ack_label(false), "待处理");
    }
}
