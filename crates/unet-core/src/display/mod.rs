//! Display formatting shared by the CLI tables and the TUI widgets.
//!
//! Everything here is a pure function from API entities to strings:
//! label translation, number formatting, and "--" for missing values.

pub mod cards;
pub mod format;
pub mod labels;

pub use cards::{
    MATERIAL_TREND_TITLE, MaterialLine, MetricCard, NO_DATA, Trend, device_alarms, event_quantity,
    integration_detail, last_updated_line, material_lines, metric_cards, page_info, total_info,
};
pub use format::{MISSING, dash, fixed1, grouped, grouped_int, opt_fixed1, percent, timestamp};
pub use labels::{
    Label, ack_label, event_status_label, label_or_dash, priority_label, severity_label,
    source_label, status_label,
};
