//! New-task popup shown over the overview.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

use unet_core::display::priority_label;
use unet_core::{CreateTaskRequest, Feedback, TaskPriority};

use crate::action::Action;
use crate::theme;
use crate::widgets::field::{TextField, render_field};
use crate::widgets::table::panel;

const PRIORITIES: [TaskPriority; 3] = [TaskPriority::High, TaskPriority::Medium, TaskPriority::Low];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Material,
    Device,
    Quantity,
    Priority,
    Scheduled,
}

impl Field {
    const ORDER: [Field; 5] = [
        Self::Material,
        Self::Device,
        Self::Quantity,
        Self::Priority,
        Self::Scheduled,
    ];

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Local wall-clock time as typed, `YYYY-MM-DD HH:MM`.
fn parse_local(raw: &str) -> Option<DateTime<Utc>> {
    ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
}

pub struct TaskForm {
    material: TextField,
    device: TextField,
    quantity: TextField,
    priority: usize,
    scheduled: TextField,
    field: Field,
    error: Option<String>,
    feedback: Option<Feedback>,
}

impl TaskForm {
    pub fn new() -> Self {
        Self {
            material: TextField::default(),
            device: TextField::default(),
            quantity: TextField::default(),
            priority: 1,
            scheduled: TextField::default(),
            field: Field::Material,
            error: None,
            feedback: None,
        }
    }

    /// Back to an empty form after a successful create.
    pub fn reset(&mut self) {
        let feedback = self.feedback.take();
        *self = Self::new();
        self.feedback = feedback;
    }

    pub fn set_feedback(&mut self, feedback: Option<Feedback>) {
        self.feedback = feedback;
    }

    fn active_text(&mut self) -> Option<&mut TextField> {
        match self.field {
            Field::Material => Some(&mut self.material),
            Field::Device => Some(&mut self.device),
            Field::Quantity => Some(&mut self.quantity),
            Field::Scheduled => Some(&mut self.scheduled),
            Field::Priority => None,
        }
    }

    /// Build the request. Quantity falls back to 0 when it is not a
    /// number; required fields are checked by the controller.
    pub fn to_request(&self) -> Result<CreateTaskRequest, String> {
        let quantity = self.quantity.value().trim().parse::<u32>().unwrap_or(0);
        let mut request = CreateTaskRequest::new(
            self.material.value().trim(),
            self.device.value().trim(),
            quantity,
        );
        request.priority = PRIORITIES[self.priority].clone();

        let scheduled = self.scheduled.value().trim();
        if !scheduled.is_empty() {
            let at = parse_local(scheduled)
                .ok_or_else(|| "计划时间格式应为 YYYY-MM-DD HH:MM".to_owned())?;
            request.scheduled_at = Some(at);
        }
        Ok(request)
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        if key.code != KeyCode::Enter {
            self.error = None;
        }
        match key.code {
            KeyCode::Esc => return Some(Action::CloseTaskForm),
            KeyCode::Tab | KeyCode::Down => self.field = self.field.next(),
            KeyCode::BackTab | KeyCode::Up => self.field = self.field.prev(),
            KeyCode::Left if self.field == Field::Priority => {
                self.priority = self.priority.saturating_sub(1);
            }
            KeyCode::Right if self.field == Field::Priority => {
                self.priority = (self.priority + 1).min(PRIORITIES.len() - 1);
            }
            KeyCode::Enter => match self.to_request() {
                Ok(request) => return Some(Action::SubmitTask(request)),
                Err(msg) => self.error = Some(msg),
            },
            KeyCode::Backspace => {
                if let Some(field) = self.active_text() {
                    field.pop();
                }
            }
            KeyCode::Char(c) => {
                if self.field == Field::Quantity && !c.is_ascii_digit() {
                    return None;
                }
                if let Some(field) = self.active_text() {
                    field.push(c);
                }
            }
            _ => {}
        }
        None
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = 56.min(area.width);
        let height = 23.min(area.height);
        let popup = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, popup);

        let block = panel("新建任务", true);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let layout = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

        render_field(frame, layout[0], "物料编码", &self.material, self.field == Field::Material);
        render_field(frame, layout[1], "目标设备", &self.device, self.field == Field::Device);
        render_field(frame, layout[2], "数量 (kg)", &self.quantity, self.field == Field::Quantity);

        let priority = PRIORITIES[self.priority].as_str();
        let priority_text =
            TextField::new(format!("\u{25C2} {} \u{25B8}", priority_label(priority)));
        render_field(frame, layout[3], "优先级", &priority_text, self.field == Field::Priority);

        render_field(
            frame,
            layout[4],
            "计划时间 (可选, YYYY-MM-DD HH:MM)",
            &self.scheduled,
            self.field == Field::Scheduled,
        );

        let message = if let Some(ref err) = self.error {
            Some(Span::styled(err.as_str(), theme::feedback(unet_core::FeedbackLevel::Error)))
        } else {
            self.feedback
                .as_ref()
                .map(|f| Span::styled(f.message.as_str(), theme::feedback(f.level)))
        };
        if let Some(message) = message {
            frame.render_widget(Paragraph::new(Line::from(message)), layout[5]);
        }

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Tab ", theme::key_hint_key()),
                Span::styled("下一项  ", theme::key_hint()),
                Span::styled("\u{2190}\u{2192} ", theme::key_hint_key()),
                Span::styled("优先级  ", theme::key_hint()),
                Span::styled("Enter ", theme::key_hint_key()),
                Span::styled("提交  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("关闭", theme::key_hint()),
            ])),
            layout[7],
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut TaskForm, text: &str) {
        for c in text.chars() {
            form.handle_key_event(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn filled_form_builds_a_manual_request() {
        let mut form = TaskForm::new();
        type_text(&mut form, " PP-01 ");
        form.handle_key_event(key(KeyCode::Tab));
        type_text(&mut form, "HOP-02");
        form.handle_key_event(key(KeyCode::Tab));
        type_text(&mut form, "2x50");
        form.handle_key_event(key(KeyCode::Tab));
        form.handle_key_event(key(KeyCode::Left));

        let Some(Action::SubmitTask(request)) = form.handle_key_event(key(KeyCode::Enter)) else {
            panic!("expected a submit");
        };
        assert_eq!(request.material_code, "PP-01");
        assert_eq!(request.target_device, "HOP-02");
        assert_eq!(request.quantity, 250);
        assert_eq!(request.priority, TaskPriority::High);
        assert_eq!(request.scheduled_at, None);
        assert_eq!(request.source, "Manual");
    }

    #[test]
    fn empty_quantity_is_zero() {
        let form = TaskForm::new();
        let request = form.to_request().unwrap();
        assert_eq!(request.quantity, 0);
        assert_eq!(request.priority, TaskPriority::Medium);
    }

    #[test]
    fn bad_schedule_stays_in_the_form() {
        let mut form = TaskForm::new();
        form.field = Field::Scheduled;
        type_text(&mut form, "tomorrow");
        assert!(form.handle_key_event(key(KeyCode::Enter)).is_none());
        assert!(form.error.is_some());
    }

    #[test]
    fn schedule_accepts_local_minutes() {
        let parsed = parse_local("2024-06-15 08:30").unwrap();
        let expected = Local
            .with_ymd_and_hms(2024, 6, 15, 8, 30, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn reset_keeps_the_feedback() {
        let mut form = TaskForm::new();
        type_text(&mut form, "PP-01");
        form.set_feedback(Some(Feedback::success("任务创建成功，已进入队列")));
        form.reset();
        assert_eq!(form.material.value(), "");
        assert!(form.feedback.is_some());
    }
}
