//! The event loop: keys in, actions dispatched, controller commands spawned.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use unet_core::{Command, CommandResult, Controller, ViewState, Visibility};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::{ScreenId, create_screens};
use crate::theme;
use crate::tui::Tui;

/// How long a toast stays up.
const TOAST_TTL: Duration = Duration::from_secs(4);

/// Top-level application state and event loop.
pub struct App {
    /// Screen chosen by the latest view state.
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    /// Latest snapshot from the controller.
    view: Arc<ViewState>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    controller: Controller,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
    /// Active toast with display timestamp.
    notification: Option<(Notification, Instant)>,
    /// Directory exported CSV files are written to.
    export_dir: PathBuf,
}

impl App {
    pub fn new(controller: Controller, username: Option<String>, export_dir: PathBuf) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let view = Arc::new(controller.view());
        let screens = create_screens(&view, username).into_iter().collect();

        Self {
            active_screen: ScreenId::for_view(&view),
            screens,
            running: true,
            help_visible: false,
            view,
            action_tx,
            action_rx,
            controller,
            data_cancel: CancellationToken::new(),
            notification: None,
            export_dir,
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let controller = self.controller.clone();
        let cancel = self.data_cancel.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            crate::data_bridge::spawn_data_bridge(controller, tx, cancel).await;
        });

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::FocusGained => self
                    .action_tx
                    .send(Action::Visibility(Visibility::Visible))?,
                Event::FocusLost => self
                    .action_tx
                    .send(Action::Visibility(Visibility::Hidden))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        let capturing = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.capturing_input());

        if !capturing {
            if let Some(action) = self.global_key(key) {
                return Ok(Some(action));
            }
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    fn global_key(&self, key: KeyEvent) -> Option<Action> {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Action::Quit),
            (KeyModifiers::NONE, KeyCode::Char('?')) => Some(Action::ToggleHelp),
            _ if self.active_screen == ScreenId::Login => None,

            (KeyModifiers::NONE, KeyCode::Char('1')) => {
                ScreenId::Overview.page().map(Action::SwitchPage)
            }
            (KeyModifiers::NONE, KeyCode::Char('2')) => {
                ScreenId::Events.page().map(Action::SwitchPage)
            }
            (KeyModifiers::NONE, KeyCode::Tab) | (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                let target = match self.active_screen {
                    ScreenId::Overview => ScreenId::Events,
                    _ => ScreenId::Overview,
                };
                target.page().map(Action::SwitchPage)
            }
            (KeyModifiers::SHIFT | KeyModifiers::NONE, KeyCode::Char('L')) => Some(Action::Logout),
            _ => None,
        }
    }

    /// Run a controller command off the UI loop. Failures already land in
    /// the view as inline feedback, so they are only logged here.
    fn spawn_command(&self, cmd: Command) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        let export_dir = self.export_dir.clone();
        tokio::spawn(async move {
            let name = cmd.name();
            match controller.execute(cmd).await {
                Ok(CommandResult::TaskCreated(_)) => {
                    let _ = tx.send(Action::TaskCreated);
                }
                Ok(CommandResult::Exported(file)) => match file.save_in(&export_dir) {
                    Ok(path) => {
                        let _ = tx.send(Action::Exported(path));
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to write export");
                        let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                    }
                },
                Ok(_) => {}
                Err(e) => debug!(command = name, error = %e, "command failed"),
            }
        });
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::ViewUpdated(view) => {
                self.view = Arc::clone(view);
                let target = ScreenId::for_view(view);
                if target != self.active_screen {
                    debug!(from = ?self.active_screen, to = ?target, "switching screen");
                    self.active_screen = target;
                }
                for screen in self.screens.values_mut() {
                    screen.update(action)?;
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, at)| at.elapsed() > TOAST_TTL)
                {
                    self.notification = None;
                }
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    screen.update(action)?;
                }
            }

            Action::OpenTaskForm | Action::CloseTaskForm | Action::TaskCreated => {
                if let Some(screen) = self.screens.get_mut(&ScreenId::Overview) {
                    if let Some(follow) = screen.update(action)? {
                        self.action_tx.send(follow)?;
                    }
                }
            }

            Action::Login { username, password } => self.spawn_command(Command::Login {
                username: username.clone(),
                password: password.clone(),
            }),
            Action::Logout => self.spawn_command(Command::Logout),
            Action::Refresh => self.spawn_command(Command::Refresh),
            Action::Visibility(visibility) => {
                self.spawn_command(Command::SetVisibility(*visibility));
            }
            Action::SwitchPage(page) => self.spawn_command(Command::ActivatePage(*page)),
            Action::SubmitTask(request) => {
                self.spawn_command(Command::CreateTask(request.clone()));
            }
            Action::ApplyEventFilters(filters) => {
                self.spawn_command(Command::ApplyEventFilters(filters.clone()));
            }
            Action::ResetEventFilters => self.spawn_command(Command::ResetEventFilters),
            Action::ReloadEvents => self.spawn_command(Command::ReloadEvents),
            Action::NextEventPage => self.spawn_command(Command::NextEventPage),
            Action::PrevEventPage => self.spawn_command(Command::PrevEventPage),
            Action::ExportEvents => self.spawn_command(Command::ExportEvents),

            Action::Exported(path) => {
                self.notification = Some((
                    Notification::success(format!("已导出 {}", path.display())),
                    Instant::now(),
                ));
            }
            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }

            Action::Render | Action::Resize(..) => {}
        }
        Ok(())
    }

    // ── Rendering ─────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(theme::BG_DARK)), area);

        if self.active_screen == ScreenId::Login {
            if let Some(screen) = self.screens.get(&ScreenId::Login) {
                screen.render(frame, area);
            }
        } else {
            let layout = Layout::vertical([
                Constraint::Length(1), // tabs
                Constraint::Min(1),    // screen
                Constraint::Length(1), // hints
            ])
            .split(area);

            self.render_tabs(frame, layout[0]);
            if let Some(screen) = self.screens.get(&self.active_screen) {
                screen.render(frame, layout[1]);
            }
            self.render_hints(frame, layout[2]);
        }

        if let Some((ref notification, _)) = self.notification {
            render_toast(frame, area, notification);
        }
        if self.help_visible {
            render_help(frame, area);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::TABS.iter().map(|s| Line::from(s.tab_label())).collect();
        let selected = ScreenId::TABS
            .iter()
            .position(|&s| s == self.active_screen)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(selected)
            .style(theme::tab_inactive())
            .highlight_style(theme::tab_active())
            .divider(Span::styled("\u{2502}", theme::key_hint()));
        frame.render_widget(tabs, area);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let pairs: &[(&str, &str)] = match self.active_screen {
            ScreenId::Overview => &[
                ("1-2", "页面"),
                ("\u{2190}\u{2192}", "面板"),
                ("j/k", "选择"),
                ("n", "新建任务"),
                ("r", "刷新"),
                ("L", "退出登录"),
                ("?", "帮助"),
                ("q", "退出"),
            ],
            ScreenId::Events => &[
                ("1-2", "页面"),
                ("/", "筛选"),
                ("n/p", "翻页"),
                ("r", "重新加载"),
                ("x", "重置"),
                ("e", "导出"),
                ("?", "帮助"),
                ("q", "退出"),
            ],
            ScreenId::Login => &[],
        };
        let spans: Vec<Span> = pairs
            .iter()
            .flat_map(|(k, label)| {
                [
                    Span::styled(format!("{k} "), theme::key_hint_key()),
                    Span::styled(format!("{label}  "), theme::key_hint()),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn render_toast(frame: &mut Frame, area: Rect, notification: &Notification) {
    let width = u16::try_from(notification.message.chars().count() * 2 + 4)
        .unwrap_or(u16::MAX)
        .min(area.width);
    let toast = Rect::new(area.x + area.width - width, area.y, width, 3.min(area.height));
    frame.render_widget(Clear, toast);
    frame.render_widget(
        Paragraph::new(Span::styled(
            notification.message.as_str(),
            theme::notification(notification.level),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::notification(notification.level)),
        ),
        toast,
    );
}

fn render_help(frame: &mut Frame, area: Rect) {
    let lines = [
        ("Ctrl+C / q", "退出程序"),
        ("1 / 2 / Tab", "切换驾驶舱与接口4归档"),
        ("L", "退出登录"),
        ("r", "立即刷新"),
        ("n", "新建任务 (驾驶舱)"),
        ("/ 或 f", "编辑筛选条件 (归档)"),
        ("n / p", "下一页 / 上一页 (归档)"),
        ("x", "重置筛选 (归档)"),
        ("e", "导出 CSV (归档)"),
        ("?", "关闭帮助"),
    ];
    let width = 50.min(area.width);
    let height = (u16::try_from(lines.len()).unwrap_or(0) + 4).min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let text: Vec<Line> = lines
        .iter()
        .map(|(k, v)| {
            Line::from(vec![
                Span::styled(format!("{k:<14}"), theme::key_hint_key()),
                Span::styled(*v, theme::table_row()),
            ])
        })
        .collect();

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Left).block(
            Block::default()
                .title(" 快捷键 ")
                .title_style(theme::title_style())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border_focused()),
        ),
        popup,
    );
}
