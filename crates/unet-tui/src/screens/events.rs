//! The interface4 archive: paged table, filter form, CSV export.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row};

use unet_core::display::{
    self, dash, event_quantity, event_status_label, label_or_dash, page_info, total_info,
};
use unet_core::{EventFilters, Page, ViewState};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::field::{TextField, render_field};
use crate::widgets::table::{panel, render_table};

/// Status filter choices; empty means "all".
const STATUSES: [&str; 5] = ["", "captured", "processing", "completed", "failed"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Keyword,
    Status,
    Start,
    End,
}

impl Field {
    const ORDER: [Field; 4] = [Self::Keyword, Self::Status, Self::Start, Self::End];

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// The filter form. Edits stay local until submitted.
#[derive(Debug, Clone, Default)]
struct FilterForm {
    keyword: TextField,
    status: usize,
    start: TextField,
    end: TextField,
}

impl FilterForm {
    fn load(&mut self, filters: &EventFilters) {
        self.keyword.set(filters.keyword.as_str());
        self.status = STATUSES
            .iter()
            .position(|s| *s == filters.status)
            .unwrap_or(0);
        self.start.set(filters.start.as_str());
        self.end.set(filters.end.as_str());
    }

    fn filters(&self) -> EventFilters {
        EventFilters {
            keyword: self.keyword.value().to_owned(),
            status: STATUSES[self.status].to_owned(),
            start: self.start.value().to_owned(),
            end: self.end.value().to_owned(),
        }
    }

    fn clear(&mut self) {
        self.keyword.clear();
        self.status = 0;
        self.start.clear();
        self.end.clear();
    }

    fn status_text(&self) -> TextField {
        let status = STATUSES[self.status];
        let label = if status.is_empty() {
            "全部".to_owned()
        } else {
            event_status_label(status).into_owned()
        };
        TextField::new(format!("\u{25C2} {label} \u{25B8}"))
    }
}

pub struct EventsScreen {
    view: Arc<ViewState>,
    form: FilterForm,
    /// `Some` while the filter form has the keyboard.
    editing: Option<Field>,
    selected: usize,
}

impl EventsScreen {
    pub fn new(view: Arc<ViewState>) -> Self {
        Self {
            view,
            form: FilterForm::default(),
            editing: None,
            selected: 0,
        }
    }

    fn handle_form_key(&mut self, field: Field, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.form.load(&self.view.events.filters);
                self.editing = None;
            }
            KeyCode::Enter => {
                self.editing = None;
                return Some(Action::ApplyEventFilters(self.form.filters()));
            }
            KeyCode::Tab | KeyCode::Down => self.editing = Some(field.next()),
            KeyCode::BackTab | KeyCode::Up => self.editing = Some(field.prev()),
            KeyCode::Left if field == Field::Status => {
                self.form.status = (self.form.status + STATUSES.len() - 1) % STATUSES.len();
            }
            KeyCode::Right if field == Field::Status => {
                self.form.status = (self.form.status + 1) % STATUSES.len();
            }
            KeyCode::Backspace => match field {
                Field::Keyword => self.form.keyword.pop(),
                Field::Start => self.form.start.pop(),
                Field::End => self.form.end.pop(),
                Field::Status => self.form.status = 0,
            },
            KeyCode::Char(c) => match field {
                Field::Keyword => self.form.keyword.push(c),
                Field::Start => self.form.start.push(c),
                Field::End => self.form.end.push(c),
                Field::Status => {}
            },
            _ => {}
        }
        None
    }

    fn render_filters(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([
            Constraint::Percentage(34),
            Constraint::Percentage(22),
            Constraint::Percentage(22),
            Constraint::Percentage(22),
        ])
        .split(area);

        let active = |f: Field| self.editing == Some(f);
        render_field(frame, cols[0], "关键字", &self.form.keyword, active(Field::Keyword));
        render_field(frame, cols[1], "状态", &self.form.status_text(), active(Field::Status));
        render_field(frame, cols[2], "开始日期", &self.form.start, active(Field::Start));
        render_field(frame, cols[3], "结束日期", &self.form.end, active(Field::End));
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .view
            .events
            .items
            .iter()
            .map(|e| {
                Row::new(vec![
                    Cell::from(display::timestamp(e.triggered_at.as_deref())),
                    Cell::from(e.event_id.clone()),
                    Cell::from(dash(e.device_id.as_deref()).to_owned()),
                    Cell::from(dash(e.point_code.as_deref()).to_owned()),
                    Cell::from(dash(e.material_code.as_deref()).to_owned()),
                    Cell::from(dash(e.batch_no.as_deref()).to_owned()),
                    Cell::from(event_quantity(e)),
                    Cell::from(label_or_dash(e.status.as_ref()))
                        .style(theme::event_status(e.status.as_ref())),
                    Cell::from(label_or_dash(e.trigger_source.as_ref())),
                    Cell::from(dash(e.handler.as_deref()).to_owned()),
                ])
            })
            .collect();

        let selected = (!self.view.events.items.is_empty()).then_some(self.selected);
        render_table(
            frame,
            area,
            panel(Page::Events.title(), self.editing.is_none()),
            &["触发时间", "事件", "设备", "点位", "物料", "批次", "产量", "状态", "来源", "处理人"],
            &[
                Constraint::Length(19),
                Constraint::Length(12),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Length(6),
                Constraint::Length(9),
                Constraint::Min(6),
            ],
            rows,
            selected,
        );
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let pager = &self.view.events.pager;
        let mut spans = vec![
            Span::styled(total_info(pager), theme::table_row()),
            Span::raw("  "),
            Span::styled(page_info(pager), theme::table_row()),
        ];
        if let Some(ref feedback) = self.view.events_feedback {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(feedback.message.as_str(), theme::feedback(feedback.level)));
        }
        let nav = |enabled: bool| {
            if enabled {
                theme::key_hint_key()
            } else {
                Style::default().fg(theme::BORDER_GRAY)
            }
        };
        spans.extend([
            Span::raw("   "),
            Span::styled("p \u{2190}上一页 ", nav(pager.has_prev())),
            Span::styled("n \u{2192}下一页", nav(pager.has_next())),
        ]);
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for EventsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(field) = self.editing {
            return Ok(self.handle_form_key(field, key));
        }

        let action = match key.code {
            KeyCode::Char('/' | 'f') => {
                self.editing = Some(Field::Keyword);
                None
            }
            KeyCode::Char('n') | KeyCode::Right => Some(Action::NextEventPage),
            KeyCode::Char('p') | KeyCode::Left => Some(Action::PrevEventPage),
            KeyCode::Char('r') => Some(Action::ReloadEvents),
            KeyCode::Char('x') => {
                self.form.clear();
                Some(Action::ResetEventFilters)
            }
            KeyCode::Char('e') => Some(Action::ExportEvents),
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.view.events.items.len().saturating_sub(1);
                self.selected = (self.selected + 1).min(last);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::ViewUpdated(view) = action {
            let page_changed = view.events.pager.page != self.view.events.pager.page
                || view.events.items.len() != self.view.events.items.len();
            if self.editing.is_none() {
                self.form.load(&view.events.filters);
            }
            self.view = Arc::clone(view);
            if page_changed {
                self.selected = 0;
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(1), // description
            Constraint::Length(3), // filters
            Constraint::Min(5),    // table
            Constraint::Length(1), // pager + feedback
        ])
        .split(area);

        frame.render_widget(
            Paragraph::new(Span::styled(
                Page::Events.description(),
                Style::default().fg(theme::DIM_WHITE),
            )),
            layout[0],
        );
        self.render_filters(frame, layout[1]);
        self.render_table(frame, layout[2]);
        self.render_footer(frame, layout[3]);
    }

    fn capturing_input(&self) -> bool {
        self.editing.is_some()
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

    fn screen() -> EventsScreen {
        EventsScreen::new(Arc::new(ViewState::new(10)))
    }

    #[test]
    fn filter_form_submits_every_field() {
        let mut screen = screen();
        screen.handle_key_event(key(KeyCode::Char('/'))).unwrap();
        for c in "BATCH".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        screen.handle_key_event(key(KeyCode::Tab)).unwrap();
        for _ in 0..4 {
            screen.handle_key_event(key(KeyCode::Right)).unwrap();
        }
        screen.handle_key_event(key(KeyCode::Tab)).unwrap();
        for c in "2024-06-01".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }

        let Some(Action::ApplyEventFilters(filters)) =
            screen.handle_key_event(key(KeyCode::Enter)).unwrap()
        else {
            panic!("expected filters");
        };
        assert_eq!(
            filters,
            EventFilters {
                keyword: "BATCH".into(),
                status: "failed".into(),
                start: "2024-06-01".into(),
                end: String::new(),
            }
        );
        assert!(!screen.capturing_input());
    }

    #[test]
    fn escape_restores_the_applied_filters() {
        let mut view = ViewState::new(10);
        view.events.filters.keyword = "PP".into();
        let mut screen = EventsScreen::new(Arc::new(view.clone()));
        screen.update(&Action::ViewUpdated(Arc::new(view))).unwrap();

        screen.handle_key_event(key(KeyCode::Char('f'))).unwrap();
        screen.handle_key_event(key(KeyCode::Backspace)).unwrap();
        screen.handle_key_event(key(KeyCode::Esc)).unwrap();

        assert_eq!(screen.form.filters().keyword, "PP");
    }

    #[test]
    fn page_keys_map_to_commands() {
        let mut screen = screen();
        assert!(matches!(
            screen.handle_key_event(key(KeyCode::Char('n'))).unwrap(),
            Some(Action::NextEventPage)
        ));
        assert!(matches!(
            screen.handle_key_event(key(KeyCode::Left)).unwrap(),
            Some(Action::PrevEventPage)
        ));
        assert!(matches!(
            screen.handle_key_event(key(KeyCode::Char('x'))).unwrap(),
            Some(Action::ResetEventFilters)
        ));
    }

    #[test]
    fn status_wraps_from_all_to_failed() {
        let mut screen = screen();
        screen.handle_key_event(key(KeyCode::Char('f'))).unwrap();
        screen.handle_key_event(key(KeyCode::Tab)).unwrap();
        screen.handle_key_event(key(KeyCode::Left)).unwrap();
        assert_eq!(screen.form.filters().status, "failed");
        screen.handle_key_event(key(KeyCode::Right)).unwrap();
        assert_eq!(screen.form.filters().status, "");
    }
}
