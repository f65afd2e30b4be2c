//! Read-only dashboard listings: overview, devices, alerts, audit, integrations.

use std::fmt::Write as _;

use tabled::Tabled;

use unet_core::display::{
    self, MATERIAL_TREND_TITLE, NO_DATA, ack_label, dash, device_alarms, integration_detail,
    label_or_dash, last_updated_line, material_lines, metric_cards, opt_fixed1, percent,
};
use unet_core::{Alert, AuditLogEntry, Controller, DashboardOverview, Device, Integration};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct DeviceRow {
    #[tabled(rename = "设备")]
    id: String,
    #[tabled(rename = "名称")]
    name: String,
    #[tabled(rename = "状态")]
    status: String,
    #[tabled(rename = "物料")]
    material: String,
    #[tabled(rename = "温度 (℃)")]
    temperature: String,
    #[tabled(rename = "料位")]
    level: String,
    #[tabled(rename = "产量 (kg/h)")]
    throughput: String,
    #[tabled(rename = "心跳")]
    heartbeat: String,
    #[tabled(rename = "报警")]
    alarms: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.device_id.clone(),
            name: dash(d.name.as_deref()).to_owned(),
            status: label_or_dash(d.status.as_ref()),
            material: dash(d.material.as_deref()).to_owned(),
            temperature: opt_fixed1(d.temperature),
            level: percent(d.level),
            throughput: opt_fixed1(d.throughput),
            heartbeat: display::timestamp(d.last_heartbeat.as_deref()),
            alarms: device_alarms(d),
        }
    }
}

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "时间")]
    raised_at: String,
    #[tabled(rename = "设备")]
    device: String,
    #[tabled(rename = "级别")]
    severity: String,
    #[tabled(rename = "内容")]
    message: String,
    #[tabled(rename = "状态")]
    state: String,
}

impl From<&Alert> for AlertRow {
    fn from(a: &Alert) -> Self {
        Self {
            raised_at: display::timestamp(a.raised_at.as_deref()),
            device: dash(a.device_id.as_deref()).to_owned(),
            severity: label_or_dash(a.severity.as_ref()),
            message: dash(a.message.as_deref()).to_owned(),
            state: ack_label(a.acknowledged).to_owned(),
        }
    }
}

#[derive(Tabled)]
struct AuditRow {
    #[tabled(rename = "时间")]
    timestamp: String,
    #[tabled(rename = "类别")]
    category: String,
    #[tabled(rename = "描述")]
    description: String,
    #[tabled(rename = "操作人")]
    actor: String,
}

impl From<&AuditLogEntry> for AuditRow {
    fn from(e: &AuditLogEntry) -> Self {
        Self {
            timestamp: display::timestamp(e.timestamp.as_deref()),
            category: dash(e.category.as_deref()).to_owned(),
            description: dash(e.description.as_deref()).to_owned(),
            actor: dash(e.actor.as_deref()).to_owned(),
        }
    }
}

#[derive(Tabled)]
struct IntegrationRow {
    #[tabled(rename = "名称")]
    name: String,
    #[tabled(rename = "目标")]
    target: String,
    #[tabled(rename = "状态")]
    status: String,
    #[tabled(rename = "详情")]
    detail: String,
}

impl From<&Integration> for IntegrationRow {
    fn from(i: &Integration) -> Self {
        Self {
            name: i.name.clone(),
            target: dash(i.target.as_deref()).to_owned(),
            status: label_or_dash(i.status.as_ref()),
            detail: integration_detail(i),
        }
    }
}

// ── Overview detail ─────────────────────────────────────────────────

/// Metric cards, material flow and the last-updated line as text.
pub(crate) fn overview_detail(overview: &DashboardOverview) -> String {
    let mut out = String::new();
    for card in metric_cards(overview) {
        let _ = writeln!(out, "{:<8} {:>12} {}", card.label, card.value, card.suffix);
    }

    let _ = writeln!(out, "\n{MATERIAL_TREND_TITLE}");
    let lines = material_lines(&overview.material_summary);
    if lines.is_empty() {
        let _ = writeln!(out, "  {NO_DATA}");
    }
    for line in lines {
        let _ = writeln!(
            out,
            "  {:<20} {:>14} {:>8}",
            line.title, line.throughput, line.trend
        );
    }

    out.push('\n');
    out.push_str(&last_updated_line(overview.last_updated.as_deref()));
    out
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn overview(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_session(controller)?;
    let overview = controller.overview().await?;
    let out = output::render_single(global.output, &overview, overview_detail, |o| {
        o.last_updated.clone().unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn devices(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_session(controller)?;
    let devices = controller.devices().await?;
    let out = output::render_list(global.output, &devices, |x| DeviceRow::from(x), |d| {
        d.device_id.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn alerts(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_session(controller)?;
    let alerts = controller.alerts().await?;
    let out = output::render_list(global.output, &alerts, |x| AlertRow::from(x), |a| {
        a.alert_id.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn audit(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_session(controller)?;
    let entries = controller.audit_logs().await?;
    let out = output::render_list(global.output, &entries, |x| AuditRow::from(x), |e| {
        e.log_id.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn integrations(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_session(controller)?;
    let integrations = controller.integrations().await?;
    let out = output::render_list(global.output, &integrations, |x| IntegrationRow::from(x), |i| {
        i.name.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use unet_core::{DeviceStatus, MaterialSummary};

    use super::*;

    #[test]
    fn device_row_formats_missing_fields() {
        let device = Device {
            device_id: "HOP-01".into(),
            name: None,
            status: Some(DeviceStatus::Maintenance),
            material: None,
            temperature: Some(42.26),
            level: Some(73),
            last_heartbeat: None,
            throughput: None,
            alarms: vec!["料位低".into(), "温度高".into()],
        };
        let row = DeviceRow::from(&device);
        assert_eq!(row.name, "--");
        assert_eq!(row.status, "维护");
        assert_eq!(row.temperature, "42.3");
        assert_eq!(row.level, "73%");
        assert_eq!(row.throughput, "--");
        assert_eq!(row.alarms, "料位低、温度高");
    }

    #[test]
    fn overview_detail_without_materials() {
        let overview = DashboardOverview {
            active_tasks: Some(1_234_567),
            ..DashboardOverview::default()
        };
        let text = overview_detail(&overview);
        assert!(text.contains("1,234,567"));
        assert!(text.contains(NO_DATA));
        assert!(text.contains("最后更新时间：--"));
    }

    #[test]
    fn overview_detail_lists_materials() {
        let overview = DashboardOverview {
            material_summary: vec![MaterialSummary {
                material_code: Some("PP-01".into()),
                hopper: Some("A1".into()),
                throughput: Some(120.0),
                trend: Some(-0.8),
            }],
            ..DashboardOverview::default()
        };
        let text = overview_detail(&overview);
        assert!(text.contains("PP-01 · A1"));
        assert!(text.contains("120.0 kg/h"));
        assert!(text.contains("-0.8%"));
    }
}
