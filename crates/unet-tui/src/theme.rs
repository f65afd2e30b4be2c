//! Cockpit palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

use unet_core::display::Trend;
use unet_core::{AlertSeverity, DeviceStatus, EventStatus, FeedbackLevel, IntegrationStatus};

use crate::action::NotificationLevel;

// ── Core Palette ──────────────────────────────────────────────────────

pub const STEEL_BLUE: Color = Color::Rgb(96, 165, 250); // #60a5fa
pub const TEAL: Color = Color::Rgb(45, 212, 191); // #2dd4bf
pub const AMBER: Color = Color::Rgb(251, 191, 36); // #fbbf24
pub const SUCCESS_GREEN: Color = Color::Rgb(74, 222, 128); // #4ade80
pub const ERROR_RED: Color = Color::Rgb(248, 113, 113); // #f87171
pub const ORANGE: Color = Color::Rgb(251, 146, 60); // #fb923c

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(203, 213, 225); // #cbd5e1
pub const BORDER_GRAY: Color = Color::Rgb(71, 85, 105); // #475569
pub const BG_HIGHLIGHT: Color = Color::Rgb(30, 41, 59); // #1e293b
pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0f172a

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(STEEL_BLUE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(TEAL)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(STEEL_BLUE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default().fg(STEEL_BLUE).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

/// Big number on a metric card.
pub fn metric_value() -> Style {
    Style::default().fg(STEEL_BLUE).add_modifier(Modifier::BOLD)
}

// ── State colors ──────────────────────────────────────────────────────

pub fn feedback(level: FeedbackLevel) -> Style {
    match level {
        FeedbackLevel::Info => Style::default().fg(DIM_WHITE),
        FeedbackLevel::Success => Style::default().fg(SUCCESS_GREEN),
        FeedbackLevel::Error => Style::default().fg(ERROR_RED),
    }
}

pub fn notification(level: NotificationLevel) -> Style {
    let color = match level {
        NotificationLevel::Info => TEAL,
        NotificationLevel::Success => SUCCESS_GREEN,
        NotificationLevel::Error => ERROR_RED,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn device_status(status: Option<&DeviceStatus>) -> Style {
    let color = match status {
        Some(DeviceStatus::Online) => SUCCESS_GREEN,
        Some(DeviceStatus::Offline) => ERROR_RED,
        Some(DeviceStatus::Maintenance) => AMBER,
        Some(DeviceStatus::Degraded) => ORANGE,
        _ => DIM_WHITE,
    };
    Style::default().fg(color)
}

pub fn integration_status(status: Option<&IntegrationStatus>) -> Style {
    let color = match status {
        Some(IntegrationStatus::Online) => SUCCESS_GREEN,
        Some(IntegrationStatus::Offline) => ERROR_RED,
        Some(IntegrationStatus::Degraded) => ORANGE,
        _ => DIM_WHITE,
    };
    Style::default().fg(color)
}

pub fn severity(severity: Option<&AlertSeverity>) -> Style {
    match severity {
        Some(AlertSeverity::Critical) => {
            Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD)
        }
        Some(AlertSeverity::Warning) => Style::default().fg(AMBER),
        _ => Style::default().fg(DIM_WHITE),
    }
}

pub fn event_status(status: Option<&EventStatus>) -> Style {
    let color = match status {
        Some(EventStatus::Completed) => SUCCESS_GREEN,
        Some(EventStatus::Failed) => ERROR_RED,
        Some(EventStatus::Processing) => AMBER,
        _ => DIM_WHITE,
    };
    Style::default().fg(color)
}

pub fn trend(direction: Trend) -> Style {
    match direction {
        Trend::Up => Style::default().fg(SUCCESS_GREEN),
        Trend::Down => Style::default().fg(ERROR_RED),
    }
}
