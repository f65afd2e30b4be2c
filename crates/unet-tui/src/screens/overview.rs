//! Cockpit overview with metric cards and the live tables.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row};

use unet_core::display::{
    self, MATERIAL_TREND_TITLE, NO_DATA, ack_label, dash, device_alarms, integration_detail,
    label_or_dash, material_lines, metric_cards, opt_fixed1, percent,
};
use unet_core::{UserProfile, ViewState};

use crate::action::Action;
use crate::component::Component;
use crate::screens::task_form::TaskForm;
use crate::theme;
use crate::widgets::table::{panel, render_table};

/// Tables that can take the selection cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Devices,
    Tasks,
    Alerts,
    Audit,
}

impl Panel {
    const ORDER: [Panel; 4] = [Self::Devices, Self::Tasks, Self::Alerts, Self::Audit];

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|&p| p == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|&p| p == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

pub struct OverviewScreen {
    view: Arc<ViewState>,
    panel: Panel,
    selected: usize,
    task_form: Option<TaskForm>,
}

impl OverviewScreen {
    pub fn new(view: Arc<ViewState>) -> Self {
        Self {
            view,
            panel: Panel::Devices,
            selected: 0,
            task_form: None,
        }
    }

    fn panel_len(&self) -> usize {
        let data = &self.view.dashboard;
        match self.panel {
            Panel::Devices => data.devices.len(),
            Panel::Tasks => data.tasks.len(),
            Panel::Alerts => data.alerts.len(),
            Panel::Audit => data.audit_logs.len(),
        }
    }

    fn selection(&self, panel: Panel) -> Option<usize> {
        (self.panel == panel && self.panel_len() > 0).then_some(self.selected)
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.panel_len().saturating_sub(1));
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let user = user_label(self.view.user.as_ref());
        let (refresh, refresh_style) = if self.view.auto_refresh {
            ("\u{25CF} 自动刷新", Style::default().fg(theme::SUCCESS_GREEN))
        } else {
            ("\u{25CB} 已暂停", Style::default().fg(theme::AMBER))
        };

        let line = Line::from(vec![
            Span::styled(
                display::last_updated_line(self.view.last_updated.as_deref()),
                Style::default().fg(theme::DIM_WHITE),
            ),
            Span::raw("   "),
            Span::styled(refresh, refresh_style),
            Span::raw("   "),
            Span::styled(user, theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let overview = self.view.dashboard.overview.clone().unwrap_or_default();
        let cards = metric_cards(&overview);
        let areas = Layout::horizontal(vec![Constraint::Ratio(1, 6); cards.len()]).split(area);

        for (card, area) in cards.iter().zip(areas.iter()) {
            let block = panel(card.label, false);
            let inner = block.inner(*area);
            frame.render_widget(block, *area);
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(card.value.clone(), theme::metric_value()),
                    Span::raw(" "),
                    Span::styled(card.suffix, theme::key_hint()),
                ])),
                inner,
            );
        }
    }

    fn render_materials(&self, frame: &mut Frame, area: Rect) {
        let block = panel(MATERIAL_TREND_TITLE, false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let summary = self
            .view
            .dashboard
            .overview
            .as_ref()
            .map(|o| o.material_summary.as_slice())
            .unwrap_or_default();
        let lines = material_lines(summary);
        if lines.is_empty() {
            frame.render_widget(Paragraph::new(Span::styled(NO_DATA, theme::key_hint())), inner);
            return;
        }

        let text: Vec<Line> = lines
            .into_iter()
            .map(|line| {
                let arrow = match line.direction {
                    display::Trend::Up => "\u{25B2}",
                    display::Trend::Down => "\u{25BC}",
                };
                Line::from(vec![
                    Span::styled(format!("{:<18}", line.title), theme::table_row()),
                    Span::styled(format!("{:>14}  ", line.throughput), theme::metric_value()),
                    Span::styled(format!("{arrow} {}", line.trend), theme::trend(line.direction)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(text), inner);
    }

    fn render_integrations(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .view
            .dashboard
            .integrations
            .iter()
            .map(|i| {
                Row::new(vec![
                    Cell::from(i.name.clone()),
                    Cell::from(dash(i.target.as_deref()).to_owned()),
                    Cell::from(label_or_dash(i.status.as_ref()))
                        .style(theme::integration_status(i.status.as_ref())),
                    Cell::from(integration_detail(i)),
                ])
            })
            .collect();
        render_table(
            frame,
            area,
            panel("系统集成", false),
            &["名称", "目标", "状态", "详情"],
            &[
                Constraint::Length(10),
                Constraint::Min(10),
                Constraint::Length(8),
                Constraint::Min(20),
            ],
            rows,
            None,
        );
    }

    fn render_devices(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .view
            .dashboard
            .devices
            .iter()
            .map(|d| {
                Row::new(vec![
                    Cell::from(d.device_id.clone()),
                    Cell::from(dash(d.name.as_deref()).to_owned()),
                    Cell::from(label_or_dash(d.status.as_ref()))
                        .style(theme::device_status(d.status.as_ref())),
                    Cell::from(dash(d.material.as_deref()).to_owned()),
                    Cell::from(opt_fixed1(d.temperature)),
                    Cell::from(percent(d.level)),
                    Cell::from(opt_fixed1(d.throughput)),
                    Cell::from(display::timestamp(d.last_heartbeat.as_deref())),
                    Cell::from(device_alarms(d)),
                ])
            })
            .collect();
        render_table(
            frame,
            area,
            panel(
                &format!("设备监控 ({})", self.view.dashboard.devices.len()),
                self.panel == Panel::Devices,
            ),
            &["设备", "名称", "状态", "物料", "温度", "料位", "产量", "心跳", "报警"],
            &[
                Constraint::Length(10),
                Constraint::Min(10),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(7),
                Constraint::Length(6),
                Constraint::Length(8),
                Constraint::Length(19),
                Constraint::Min(10),
            ],
            rows,
            self.selection(Panel::Devices),
        );
    }

    fn render_tasks(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .view
            .dashboard
            .tasks
            .iter()
            .map(|t| {
                Row::new(vec![
                    Cell::from(t.task_id.clone()),
                    Cell::from(dash(t.material_code.as_deref()).to_owned()),
                    Cell::from(dash(t.target_device.as_deref()).to_owned()),
                    Cell::from(t.quantity.map_or_else(|| "--".to_owned(), |q| q.to_string())),
                    Cell::from(label_or_dash(t.priority.as_ref())),
                    Cell::from(percent(t.progress)),
                    Cell::from(label_or_dash(t.status.as_ref())),
                ])
            })
            .collect();

        let mut title = format!("任务调度 ({})", self.view.dashboard.tasks.len());
        if let Some(ref feedback) = self.view.task_feedback {
            title = format!("{title} · {}", feedback.message);
        }
        render_table(
            frame,
            area,
            panel(&title, self.panel == Panel::Tasks),
            &["任务", "物料", "设备", "数量", "优先级", "进度", "状态"],
            &[
                Constraint::Length(10),
                Constraint::Min(8),
                Constraint::Min(8),
                Constraint::Length(6),
                Constraint::Length(6),
                Constraint::Length(6),
                Constraint::Length(8),
            ],
            rows,
            self.selection(Panel::Tasks),
        );
    }

    fn render_alerts(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .view
            .dashboard
            .alerts
            .iter()
            .map(|a| {
                Row::new(vec![
                    Cell::from(display::timestamp(a.raised_at.as_deref())),
                    Cell::from(dash(a.device_id.as_deref()).to_owned()),
                    Cell::from(label_or_dash(a.severity.as_ref()))
                        .style(theme::severity(a.severity.as_ref())),
                    Cell::from(dash(a.message.as_deref()).to_owned()),
                    Cell::from(ack_label(a.acknowledged)),
                ])
            })
            .collect();
        render_table(
            frame,
            area,
            panel(
                &format!("报警 ({})", self.view.dashboard.alerts.len()),
                self.panel == Panel::Alerts,
            ),
            &["时间", "设备", "级别", "内容", "状态"],
            &[
                Constraint::Length(19),
                Constraint::Length(8),
                Constraint::Length(4),
                Constraint::Min(12),
                Constraint::Length(6),
            ],
            rows,
            self.selection(Panel::Alerts),
        );
    }

    fn render_audit(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .view
            .dashboard
            .audit_logs
            .iter()
            .map(|e| {
                Row::new(vec![
                    Cell::from(display::timestamp(e.timestamp.as_deref())),
                    Cell::from(dash(e.category.as_deref()).to_owned()),
                    Cell::from(dash(e.description.as_deref()).to_owned()),
                    Cell::from(dash(e.actor.as_deref()).to_owned()),
                ])
            })
            .collect();
        render_table(
            frame,
            area,
            panel("审计日志", self.panel == Panel::Audit),
            &["时间", "类别", "描述", "操作人"],
            &[
                Constraint::Length(19),
                Constraint::Length(10),
                Constraint::Min(20),
                Constraint::Length(10),
            ],
            rows,
            self.selection(Panel::Audit),
        );
    }
}

impl Component for OverviewScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(ref mut form) = self.task_form {
            return Ok(form.handle_key_event(key));
        }

        match key.code {
            KeyCode::Char('n') => return Ok(Some(Action::OpenTaskForm)),
            KeyCode::Char('r') => return Ok(Some(Action::Refresh)),
            KeyCode::Right | KeyCode::Char('l') => {
                self.panel = self.panel.next();
                self.selected = 0;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.panel = self.panel.prev();
                self.selected = 0;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = self.selected.saturating_add(1);
                self.clamp_selection();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Char('g') => self.selected = 0,
            KeyCode::Char('G') => self.selected = self.panel_len().saturating_sub(1),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ViewUpdated(view) => {
                self.view = Arc::clone(view);
                self.clamp_selection();
                if let Some(ref mut form) = self.task_form {
                    form.set_feedback(view.task_feedback.clone());
                }
            }
            Action::OpenTaskForm => {
                let mut form = TaskForm::new();
                form.set_feedback(self.view.task_feedback.clone());
                self.task_form = Some(form);
            }
            Action::CloseTaskForm => self.task_form = None,
            Action::TaskCreated => {
                if let Some(ref mut form) = self.task_form {
                    form.reset();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(1),      // header
            Constraint::Length(3),      // cards
            Constraint::Length(8),      // materials + integrations
            Constraint::Percentage(40), // devices
            Constraint::Min(6),         // tasks + alerts
            Constraint::Length(8),      // audit
        ])
        .split(area);

        self.render_header(frame, layout[0]);
        self.render_cards(frame, layout[1]);

        let middle = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(layout[2]);
        self.render_materials(frame, middle[0]);
        self.render_integrations(frame, middle[1]);

        self.render_devices(frame, layout[3]);

        let lower = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(layout[4]);
        self.render_tasks(frame, lower[0]);
        self.render_alerts(frame, lower[1]);

        self.render_audit(frame, layout[5]);

        if let Some(ref form) = self.task_form {
            form.render(frame, area);
        }
    }

    fn capturing_input(&self) -> bool {
        self.task_form.is_some()
    }
}

/// `[A] admin · 管理员`, blank when signed out.
fn user_label(user: Option<&UserProfile>) -> String {
    user.map_or_else(String::new, |u| {
        format!("[{}] {} · {}", u.initial(), u.name, u.role)
    })
}
