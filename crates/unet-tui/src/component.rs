//! The trait every screen implements.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;

pub trait Component: Send {
    /// A key the app did not consume globally.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Dispatched actions, `ViewUpdated` above all. May answer with a follow-up.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect);

    /// True while a form has the keyboard; `q`, digits and `?` are then text.
    fn capturing_input(&self) -> bool {
        false
    }
}
