//! Sign-in form.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use secrecy::SecretString;

use unet_core::{Feedback, Page};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::field::{TextField, render_field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Username,
    Password,
}

pub struct LoginScreen {
    username: TextField,
    password: TextField,
    field: Field,
    submitting: bool,
    feedback: Option<Feedback>,
    throbber_state: throbber_widgets_tui::ThrobberState,
}

impl LoginScreen {
    /// `username` pre-fills the form from the active profile.
    pub fn new(username: Option<String>) -> Self {
        let field = if username.is_some() {
            Field::Password
        } else {
            Field::Username
        };
        Self {
            username: TextField::new(username.unwrap_or_default()),
            password: TextField::masked(),
            field,
            submitting: false,
            feedback: None,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    fn active_mut(&mut self) -> &mut TextField {
        match self.field {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
        }
    }

    fn toggle_field(&mut self) {
        self.field = match self.field {
            Field::Username => Field::Password,
            Field::Password => Field::Username,
        };
    }

    /// The password is dropped from the form once handed over.
    fn submit(&mut self) -> Action {
        self.submitting = true;
        Action::Login {
            username: self.username.value().to_owned(),
            password: SecretString::from(self.password.take()),
        }
    }
}

impl Component for LoginScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.submitting {
            return Ok(None);
        }
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.toggle_field(),
            KeyCode::Enter => match self.field {
                Field::Username => self.field = Field::Password,
                Field::Password => return Ok(Some(self.submit())),
            },
            KeyCode::Backspace => self.active_mut().pop(),
            KeyCode::Char(c) => self.active_mut().push(c),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ViewUpdated(view) => {
                if view.login_feedback.is_some() {
                    self.submitting = false;
                }
                self.feedback.clone_from(&view.login_feedback);
            }
            Action::Tick if self.submitting => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            area,
        );

        let width = 52.min(area.width);
        let height = 16.min(area.height);
        let panel = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let layout = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(2), // subtitle
            Constraint::Length(3), // username
            Constraint::Length(3), // password
            Constraint::Length(2), // feedback
            Constraint::Min(0),
            Constraint::Length(1), // hints
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(
                Page::Overview.title(),
                Style::default().fg(theme::TEAL).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            layout[0],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                Page::Overview.description(),
                Style::default().fg(theme::DIM_WHITE),
            ))
            .alignment(Alignment::Center),
            layout[1],
        );

        render_field(frame, layout[2], "用户名", &self.username, self.field == Field::Username);
        render_field(frame, layout[3], "密码", &self.password, self.field == Field::Password);

        if self.submitting {
            let throbber = throbber_widgets_tui::Throbber::default()
                .label(" 正在登录...")
                .style(Style::default().fg(theme::TEAL))
                .throbber_style(Style::default().fg(theme::STEEL_BLUE));
            frame.render_stateful_widget(throbber, layout[4], &mut self.throbber_state.clone());
        } else if let Some(ref feedback) = self.feedback {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    feedback.message.as_str(),
                    theme::feedback(feedback.level),
                ))
                .alignment(Alignment::Center),
                layout[4],
            );
        }

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Tab ", theme::key_hint_key()),
                Span::styled("切换  ", theme::key_hint()),
                Span::styled("Enter ", theme::key_hint_key()),
                Span::styled("登录  ", theme::key_hint()),
                Span::styled("Ctrl+C ", theme::key_hint_key()),
                Span::styled("退出", theme::key_hint()),
            ]))
            .alignment(Alignment::Center),
            layout[6],
        );
    }

    fn capturing_input(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(screen: &mut LoginScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn profile_username_focuses_the_password() {
        let mut screen = LoginScreen::new(Some("admin".into()));
        type_text(&mut screen, "admin123");
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();

        let Some(Action::Login { username, password }) = action else {
            panic!("expected a login action");
        };
        assert_eq!(username, "admin");
        assert_eq!(password.expose_secret(), "admin123");
        assert_eq!(screen.password.value(), "");
    }

    #[test]
    fn enter_on_username_moves_to_password() {
        let mut screen = LoginScreen::new(None);
        type_text(&mut screen, "op");
        assert!(screen.handle_key_event(key(KeyCode::Enter)).unwrap().is_none());
        assert_eq!(screen.field, Field::Password);
    }

    #[test]
    fn keys_are_ignored_while_submitting() {
        let mut screen = LoginScreen::new(Some("op".into()));
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        type_text(&mut screen, "x");
        assert_eq!(screen.password.value(), "");
    }
}
