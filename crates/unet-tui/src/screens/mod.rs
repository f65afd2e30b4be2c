//! Screen implementations. Each screen is a top-level Component.

pub mod events;
pub mod login;
pub mod overview;
pub mod task_form;

use std::sync::Arc;

use unet_core::{Page, Screen, ViewState};

use crate::component::Component;

/// Which component owns the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Login,
    Overview,
    Events,
}

impl ScreenId {
    /// Tabs in order; the login screen has none.
    pub const TABS: [ScreenId; 2] = [Self::Overview, Self::Events];

    /// The screen a view state asks for.
    pub fn for_view(view: &ViewState) -> Self {
        match (view.screen, view.page) {
            (Screen::Login, _) => Self::Login,
            (Screen::Dashboard, Page::Overview) => Self::Overview,
            (Screen::Dashboard, Page::Events) => Self::Events,
        }
    }

    pub fn page(self) -> Option<Page> {
        match self {
            Self::Login => None,
            Self::Overview => Some(Page::Overview),
            Self::Events => Some(Page::Events),
        }
    }

    /// Tab label with its number key.
    pub fn tab_label(self) -> String {
        let n = Self::TABS.iter().position(|&s| s == self).map_or(0, |i| i + 1);
        let title = self.page().map_or("", Page::title);
        format!("{n} {title}")
    }
}

/// Create every screen component.
pub fn create_screens(
    view: &Arc<ViewState>,
    username: Option<String>,
) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Login,
            Box::new(login::LoginScreen::new(username)),
        ),
        (
            ScreenId::Overview,
            Box::new(overview::OverviewScreen::new(Arc::clone(view))),
        ),
        (
            ScreenId::Events,
            Box::new(events::EventsScreen::new(Arc::clone(view))),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn login_screen_wins_over_any_page() {
        let mut view = ViewState::new(10);
        view.page = Page::Events;
        assert_eq!(ScreenId::for_view(&view), ScreenId::Login);

        view.screen = Screen::Dashboard;
        assert_eq!(ScreenId::for_view(&view), ScreenId::Events);
    }

    #[test]
    fn tabs_are_numbered_from_one() {
        assert_eq!(ScreenId::Overview.tab_label(), "1 集中供料驾驶舱");
        assert_eq!(ScreenId::Events.tab_label(), "2 接口4 数据归档");
    }
}
