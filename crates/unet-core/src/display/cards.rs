// Composite display pieces: overview metric cards, material flow lines,
// and the small derived strings used in tables and footers.

use unet_api::{DashboardOverview, Device, Integration, Interface4Event, MaterialSummary};

use super::format::{MISSING, fixed1, grouped, grouped_int, timestamp};
use crate::archive::Pager;

/// Shown in place of an empty material summary.
pub const NO_DATA: &str = "暂无数据";

/// Title of the material flow card.
pub const MATERIAL_TREND_TITLE: &str = "物料吞吐趋势";

/// One headline counter on the overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
    pub suffix: &'static str,
}

fn int_value(value: Option<i64>) -> String {
    value.map_or_else(|| MISSING.to_owned(), grouped_int)
}

fn float_value(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_owned(), grouped)
}

/// The six headline counters, in display order.
pub fn metric_cards(overview: &DashboardOverview) -> Vec<MetricCard> {
    vec![
        MetricCard {
            label: "活跃任务",
            value: int_value(overview.active_tasks),
            suffix: "项",
        },
        MetricCard {
            label: "今日完成",
            value: int_value(overview.completed_today),
            suffix: "项",
        },
        MetricCard {
            label: "在线设备",
            value: int_value(overview.equipment_online),
            suffix: "台",
        },
        MetricCard {
            label: "未处理报警",
            value: int_value(overview.alarm_count),
            suffix: "条",
        },
        MetricCard {
            label: "瞬时产量",
            value: float_value(overview.throughput),
            suffix: "kg/h",
        },
        MetricCard {
            label: "能耗估算",
            value: float_value(overview.energy_usage),
            suffix: "kWh",
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

/// One hopper's material flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialLine {
    /// `{material} · {hopper}`
    pub title: String,
    /// `{throughput:.1} kg/h`
    pub throughput: String,
    /// Signed percent, `+1.5%` or `-0.8%`.
    pub trend: String,
    pub direction: Trend,
}

pub fn material_lines(summary: &[MaterialSummary]) -> Vec<MaterialLine> {
    summary
        .iter()
        .map(|item| {
            let trend = item.trend.unwrap_or(0.0);
            let direction = if trend >= 0.0 { Trend::Up } else { Trend::Down };
            let sign = if direction == Trend::Up { "+" } else { "" };
            MaterialLine {
                title: format!(
                    "{} · {}",
                    item.material_code.as_deref().unwrap_or(MISSING),
                    item.hopper.as_deref().unwrap_or(MISSING)
                ),
                throughput: format!(
                    "{} kg/h",
                    item.throughput.map_or_else(|| MISSING.to_owned(), fixed1)
                ),
                trend: item
                    .trend
                    .map_or_else(|| MISSING.to_owned(), |t| format!("{sign}{t:.1}%")),
                direction,
            }
        })
        .collect()
}

/// `最后更新时间：{timestamp}`
pub fn last_updated_line(last_updated: Option<&str>) -> String {
    format!("最后更新时间：{}", timestamp(last_updated))
}

/// Alarms joined with `、`, or `--`.
pub fn device_alarms(device: &Device) -> String {
    if device.alarms.is_empty() {
        MISSING.to_owned()
    } else {
        device.alarms.join("、")
    }
}

/// `{latency} ms · 更新于 {timestamp}`
pub fn integration_detail(integration: &Integration) -> String {
    let latency = integration
        .latency_ms
        .map_or_else(|| MISSING.to_owned(), |ms| ms.to_string());
    format!(
        "{latency} ms · 更新于 {}",
        timestamp(integration.last_updated.as_deref())
    )
}

/// `{qty:.1} {unit}`, or `--` without a quantity.
pub fn event_quantity(event: &Interface4Event) -> String {
    event.produced_qty.map_or_else(
        || MISSING.to_owned(),
        |qty| {
            format!("{} {}", fixed1(qty), event.unit.as_deref().unwrap_or(""))
                .trim()
                .to_owned()
        },
    )
}

/// `共 {total} 条记录`
pub fn total_info(pager: &Pager) -> String {
    format!("共 {} 条记录", pager.total)
}

/// `第 {page} / {pages} 页`
pub fn page_info(pager: &Pager) -> String {
    format!("第 {} / {} 页", pager.page, pager.total_pages())
}
