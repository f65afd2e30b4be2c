//! Single-line text input used by the login, filter, and task forms.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::theme;

/// An editable line of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    masked: bool,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            masked: false,
        }
    }

    /// A field that renders its content as dots.
    pub fn masked() -> Self {
        Self {
            value: String::new(),
            masked: true,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn push(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.value)
    }

    /// What the user sees.
    pub fn display(&self) -> String {
        if self.masked {
            "\u{25CF}".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// Labelled bordered input. Needs three rows; the label goes in the border.
pub fn render_field(frame: &mut Frame, area: Rect, label: &str, field: &TextField, active: bool) {
    if area.height < 3 {
        return;
    }

    let border = if active {
        theme::border_focused()
    } else {
        theme::border_default()
    };
    let label_style = if active {
        Style::default().fg(theme::TEAL)
    } else {
        Style::default().fg(theme::DIM_WHITE)
    };

    let block = Block::default()
        .title(Span::styled(format!(" {label} "), label_style))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);

    let area = Rect::new(area.x, area.y, area.width, 3);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut text = field.display();
    if active {
        text.push('\u{2588}');
    }
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, Style::default().fg(theme::DIM_WHITE)))),
        inner,
    );
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn masked_field_hides_every_character() {
        let mut field = TextField::masked();
        for c in "密码ab".chars() {
            field.push(c);
        }
        assert_eq!(field.display(), "\u{25CF}\u{25CF}\u{25CF}\u{25CF}");
        assert_eq!(field.value(), "密码ab");
    }

    #[test]
    fn pop_removes_whole_characters() {
        let mut field = TextField::new("料斗");
        field.pop();
        assert_eq!(field.value(), "料");
        assert_eq!(field.take(), "料");
        assert_eq!(field.value(), "");
    }
}
