// ── Controller ──
//
// The single owner of cockpit state. Handles the session lifecycle,
// the periodic dashboard refresh, the interface4 archive, and command
// routing. Front ends observe the published `ViewState`.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use unet_api::transport::{TlsMode, TransportConfig};
use unet_api::{
    Alert, ApiClient, AuditLogEntry, CreateTaskRequest, DashboardOverview, Device, EventFilters,
    EventPage, EventQuery, Integration, Task,
};

use crate::archive::{ExportFile, normalize_filters};
use crate::command::{Command, CommandResult, LogoutReason, Visibility};
use crate::config::{ClientConfig, RefreshPolicy, TlsVerification};
use crate::error::{CoreError, SESSION_EXPIRED};
use crate::session::{Session, SessionStore, UserProfile};
use crate::view::{DashboardData, Feedback, Page, Screen, ViewState};

const LOGIN_SUCCESS: &str = "登录成功，正在跳转...";
const LOGGED_OUT: &str = "已退出，请重新登录";
const LOADING: &str = "正在加载...";
const LOAD_FAILED: &str = "加载失败";
const EXPORTING: &str = "正在导出...";
const EXPORT_FAILED: &str = "导出失败";
const CREATING_TASK: &str = "正在创建任务...";
const TASK_CREATED: &str = "任务创建成功，已进入队列";
const TASK_FAILED: &str = "任务创建失败";

/// Error text for inline display, with a fallback for empty messages.
fn failure_message(err: &CoreError, fallback: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        fallback.to_owned()
    } else {
        message
    }
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for front ends.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Every state transition
/// goes through a method here (or [`Controller::execute`]) and ends with
/// a new [`ViewState`] on the watch channel.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ClientConfig,
    api: ApiClient,
    sessions: Arc<dyn SessionStore>,
    view: watch::Sender<ViewState>,
    cancel: CancellationToken,
    refresh_loop: Mutex<Option<RefreshLoop>>,
    /// Bumped on every login and logout. Responses that started under an
    /// older generation are dropped instead of rendered.
    generation: AtomicU64,
}

struct RefreshLoop {
    cancel: CancellationToken,
    _handle: JoinHandle<()>,
}

/// Collects the outcome of a multi-endpoint pass.
#[derive(Default)]
struct Failures {
    first: Option<CoreError>,
    expired: bool,
}

impl Failures {
    fn take<T>(&mut self, result: Result<T, unet_api::Error>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                if matches!(e, unet_api::Error::SessionExpired) {
                    self.expired = true;
                }
                if self.first.is_none() {
                    self.first = Some(e.into());
                }
                None
            }
        }
    }
}

impl Controller {
    /// Create a controller for the configured server. Does NOT sign in --
    /// call [`restore()`](Self::restore) or [`login()`](Self::login).
    pub fn new(config: ClientConfig, sessions: Arc<dyn SessionStore>) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: match &config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: config.timeout,
        };
        let api = ApiClient::new(config.url.clone(), &transport)?;
        Ok(Self::with_api(config, api, sessions))
    }

    /// Create a controller around an existing API client.
    pub fn with_api(config: ClientConfig, api: ApiClient, sessions: Arc<dyn SessionStore>) -> Self {
        let (view, _) = watch::channel(ViewState::new(config.page_size));
        Self {
            inner: Arc::new(ControllerInner {
                config,
                api,
                sessions,
                view,
                cancel: CancellationToken::new(),
                refresh_loop: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to view changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.view.subscribe()
    }

    /// A copy of the current view.
    pub fn view(&self) -> ViewState {
        self.inner.view.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.api.has_token()
    }

    fn update(&self, f: impl FnOnce(&mut ViewState)) {
        self.inner.view.send_modify(f);
    }

    fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Apply `f` only if no login/logout happened since `generation`.
    fn update_if_current(&self, generation: u64, f: impl FnOnce(&mut ViewState)) {
        if self.is_current(generation) {
            self.update(f);
        } else {
            debug!("dropping result from a previous session");
        }
    }

    /// Map an API result, signing out if the server rejected the token.
    async fn call<T>(
        &self,
        generation: u64,
        result: Result<T, unet_api::Error>,
    ) -> Result<T, CoreError> {
        match result {
            Err(unet_api::Error::SessionExpired) => {
                self.expire(generation).await;
                Err(CoreError::SessionExpired)
            }
            other => other.map_err(CoreError::from),
        }
    }

    /// Run an authorized API future with session-expiry handling.
    async fn authorized<T, F>(&self, request: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, unet_api::Error>>,
    {
        let generation = self.generation();
        let result = request.await;
        self.call(generation, result).await
    }

    // ── Session lifecycle ────────────────────────────────────────

    /// Adopt the stored session, if any, without touching the network.
    pub fn resume(&self) -> Result<Option<UserProfile>, CoreError> {
        let Some(Session { token, user }) = self.inner.sessions.load()? else {
            return Ok(None);
        };
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.api.set_token(token);
        let profile = user.clone();
        self.update(|v| v.user = Some(profile));
        debug!(user = %user.username, "resumed stored session");
        Ok(Some(user))
    }

    /// Startup: resume a stored session and bring the dashboard up, or
    /// show the login screen. Returns whether a session was restored.
    pub async fn restore(&self) -> Result<bool, CoreError> {
        let Some(user) = self.resume()? else {
            self.show_login();
            return Ok(false);
        };
        info!(user = %user.username, "session restored");
        self.show_dashboard(&user);
        if let Err(e) = self.refresh().await {
            debug!(error = %e, "initial refresh failed");
        }
        self.start_auto_refresh().await;
        Ok(true)
    }

    /// Sign in, persist the session, and bring the dashboard up.
    ///
    /// Username and password are trimmed. On failure the login screen
    /// stays up with the server's message.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<UserProfile, CoreError> {
        let username = username.trim();
        let password = SecretString::from(password.expose_secret().trim().to_owned());
        if username.is_empty() {
            let err = CoreError::validation("请输入用户名");
            self.update(|v| v.login_feedback = Some(Feedback::error(err.to_string())));
            return Err(err);
        }

        self.update(|v| v.login_feedback = None);

        let login = match self.inner.api.login(username, &password).await {
            Ok(login) => login,
            Err(e) => {
                let err = CoreError::from(e);
                warn!(username, error = %err, "login failed");
                let message = failure_message(&err, unet_api::auth::LOGIN_FAILED);
                self.update(|v| v.login_feedback = Some(Feedback::error(message)));
                return Err(err);
            }
        };

        let user = UserProfile::from_login(&login, username);
        let session = Session {
            token: SecretString::from(login.token),
            user: user.clone(),
        };
        if let Err(e) = self.inner.sessions.save(&session) {
            warn!(error = %e, "failed to persist session");
        }

        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.api.set_token(session.token);
        self.show_dashboard(&user);
        self.update(|v| v.login_feedback = Some(Feedback::success(LOGIN_SUCCESS)));
        info!(user = %user.username, role = %user.role, "signed in");

        if let Err(e) = self.refresh().await {
            debug!(error = %e, "initial refresh failed");
        }
        self.start_auto_refresh().await;
        Ok(user)
    }

    /// Sign out: forget the token everywhere, stop polling, show login.
    pub async fn logout(&self, reason: LogoutReason) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.api.clear_token();
        if let Err(e) = self.inner.sessions.clear() {
            warn!(error = %e, "failed to clear stored session");
        }

        let message = match reason {
            LogoutReason::Manual => Feedback::info(LOGGED_OUT),
            LogoutReason::Expired => Feedback::error(SESSION_EXPIRED),
        };
        self.update(|v| {
            v.user = None;
            v.dashboard = DashboardData::default();
            v.events.reset();
            v.task_feedback = None;
            v.events_feedback = None;
            v.last_updated = None;
            v.login_feedback = Some(message);
        });
        self.show_login();
        self.stop_auto_refresh().await;
        info!(?reason, "signed out");
    }

    /// Forced logout after a 401, once per session.
    async fn expire(&self, generation: u64) {
        if self.is_current(generation) && self.is_authenticated() {
            warn!("server rejected the session token");
            self.logout(LogoutReason::Expired).await;
        }
    }

    fn show_login(&self) {
        self.update(|v| {
            v.screen = Screen::Login;
            v.page = Page::Overview;
        });
    }

    fn show_dashboard(&self, user: &UserProfile) {
        let user = user.clone();
        self.update(|v| {
            v.screen = Screen::Dashboard;
            v.user = Some(user);
            v.events.reset();
            v.page = Page::Overview;
        });
    }

    // ── One-shot reads ───────────────────────────────────────────

    pub async fn overview(&self) -> Result<DashboardOverview, CoreError> {
        self.authorized(self.inner.api.dashboard_overview()).await
    }

    pub async fn devices(&self) -> Result<Vec<Device>, CoreError> {
        self.authorized(self.inner.api.list_devices()).await
    }

    pub async fn tasks(&self) -> Result<Vec<Task>, CoreError> {
        self.authorized(self.inner.api.list_tasks()).await
    }

    pub async fn alerts(&self) -> Result<Vec<Alert>, CoreError> {
        self.authorized(self.inner.api.list_alerts()).await
    }

    pub async fn audit_logs(&self) -> Result<Vec<AuditLogEntry>, CoreError> {
        self.authorized(self.inner.api.list_audit_logs()).await
    }

    pub async fn integrations(&self) -> Result<Vec<Integration>, CoreError> {
        self.authorized(self.inner.api.list_integrations()).await
    }

    /// One archive page for an explicit query. Does not touch archive state.
    pub async fn query_events(&self, query: &EventQuery) -> Result<EventPage, CoreError> {
        let filters = normalize_filters(query.filters.clone())?;
        let query = EventQuery {
            filters,
            ..query.clone()
        };
        self.authorized(self.inner.api.list_events(&query)).await
    }

    /// Export for explicit filters. Does not touch archive state.
    pub async fn export_with(&self, filters: EventFilters) -> Result<ExportFile, CoreError> {
        let filters = normalize_filters(filters)?;
        let bytes = self
            .authorized(self.inner.api.export_events(&filters))
            .await?;
        Ok(ExportFile::timestamped(bytes, Utc::now()))
    }

    // ── Dashboard refresh ────────────────────────────────────────

    /// Fetch the six dashboard endpoints concurrently and publish them.
    ///
    /// Failures are shown in the task feedback line and returned. How a
    /// partial failure is applied depends on [`RefreshPolicy`]. Without a
    /// session this is a no-op.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.refresh_inner(true).await
    }

    async fn refresh_inner(&self, clear_feedback: bool) -> Result<(), CoreError> {
        if !self.is_authenticated() {
            return Ok(());
        }
        let generation = self.generation();
        let api = &self.inner.api;

        let (overview, devices, tasks, alerts, audit_logs, integrations) = tokio::join!(
            api.dashboard_overview(),
            api.list_devices(),
            api.list_tasks(),
            api.list_alerts(),
            api.list_audit_logs(),
            api.list_integrations(),
        );

        if !self.is_current(generation) {
            debug!("dropping refresh from a previous session");
            return Ok(());
        }

        let mut failures = Failures::default();
        let overview = failures.take(overview);
        let devices = failures.take(devices);
        let tasks = failures.take(tasks);
        let alerts = failures.take(alerts);
        let audit_logs = failures.take(audit_logs);
        let integrations = failures.take(integrations);

        if failures.expired {
            self.expire(generation).await;
            return Err(CoreError::SessionExpired);
        }

        if self.inner.config.refresh_policy == RefreshPolicy::FailFast {
            if let Some(err) = failures.first.take() {
                let message = err.to_string();
                self.update(|v| v.task_feedback = Some(Feedback::error(message)));
                return Err(err);
            }
        }

        let failure_text = failures.first.as_ref().map(ToString::to_string);
        self.update(|v| {
            if let Some(overview) = overview {
                v.last_updated.clone_from(&overview.last_updated);
                v.dashboard.overview = Some(overview);
            }
            if let Some(devices) = devices {
                v.dashboard.devices = devices;
            }
            if let Some(tasks) = tasks {
                v.dashboard.tasks = tasks;
            }
            if let Some(alerts) = alerts {
                v.dashboard.alerts = alerts;
            }
            if let Some(audit_logs) = audit_logs {
                v.dashboard.audit_logs = audit_logs;
            }
            if let Some(integrations) = integrations {
                v.dashboard.integrations = integrations;
            }
            match failure_text {
                Some(message) => v.task_feedback = Some(Feedback::error(message)),
                None if clear_feedback => v.task_feedback = None,
                None => {}
            }
        });

        match failures.first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Start the periodic refresh. Any running loop is stopped first, so
    /// there is never more than one. No-op while the cockpit is hidden.
    pub async fn start_auto_refresh(&self) {
        let mut slot = self.inner.refresh_loop.lock().await;
        if let Some(previous) = slot.take() {
            previous.cancel.cancel();
        }

        // Checked under the loop lock: a concurrent hide either lands
        // before this read or stops the loop after it is stored.
        let visible = self.inner.view.borrow().visible;
        let period = self.inner.config.refresh_interval;
        if !visible || !self.is_authenticated() || period.is_zero() {
            self.update(|v| v.auto_refresh = false);
            return;
        }

        let cancel = self.inner.cancel.child_token();
        let handle = tokio::spawn(refresh_task(self.clone(), period, cancel.clone()));
        *slot = Some(RefreshLoop {
            cancel,
            _handle: handle,
        });
        self.update(|v| v.auto_refresh = true);
        debug!(period_ms = period.as_millis(), "auto refresh started");
    }

    /// Stop the periodic refresh.
    ///
    /// The loop is cancelled but not joined: a 401 inside the loop signs
    /// out, which lands here from the loop's own task.
    pub async fn stop_auto_refresh(&self) {
        if let Some(running) = self.inner.refresh_loop.lock().await.take() {
            running.cancel.cancel();
            debug!("auto refresh stopped");
        }
        self.update(|v| v.auto_refresh = false);
    }

    pub async fn is_auto_refreshing(&self) -> bool {
        self.inner
            .refresh_loop
            .lock()
            .await
            .as_ref()
            .is_some_and(|running| !running.cancel.is_cancelled())
    }

    /// React to the cockpit being hidden or shown again.
    ///
    /// Hidden stops polling. Visible (with a session) refreshes at once,
    /// restarts polling, and reloads the archive if its page is open.
    pub async fn set_visibility(&self, visibility: Visibility) {
        self.update(|v| v.visible = visibility == Visibility::Visible);
        if !self.is_authenticated() {
            return;
        }
        match visibility {
            Visibility::Hidden => self.stop_auto_refresh().await,
            Visibility::Visible => {
                if let Err(e) = self.refresh().await {
                    debug!(error = %e, "refresh on visibility failed");
                }
                self.start_auto_refresh().await;
                let (visible, on_events) = {
                    let view = self.inner.view.borrow();
                    (view.visible, view.page == Page::Events)
                };
                if visible && on_events {
                    if let Err(e) = self.load_events(false).await {
                        debug!(error = %e, "archive reload on visibility failed");
                    }
                }
            }
        }
    }

    // ── Navigation ───────────────────────────────────────────────

    /// Switch dashboard page. Opening the archive for the first time in
    /// a session starts at page one.
    pub async fn activate_page(&self, page: Page) -> Result<(), CoreError> {
        if !self.is_authenticated() {
            return Err(CoreError::NotAuthenticated);
        }
        let mut reset = false;
        self.update(|v| {
            v.page = page;
            if page == Page::Events {
                reset = !v.events.initialized;
                v.events.initialized = true;
            }
        });
        if page == Page::Events {
            self.load_events(reset).await?;
        }
        Ok(())
    }

    // ── Interface4 archive ───────────────────────────────────────

    /// Load the archive page for the current cursor and filters.
    ///
    /// On failure the table is emptied and the error shown above it.
    pub async fn load_events(&self, reset_page: bool) -> Result<(), CoreError> {
        if !self.is_authenticated() {
            return Ok(());
        }
        let generation = self.generation();
        self.update(|v| {
            if reset_page {
                v.events.pager.page = 1;
            }
            v.events_feedback = Some(Feedback::info(LOADING));
        });
        let query = self.inner.view.borrow().events.query();

        let result = self.inner.api.list_events(&query).await;
        let result = self.call(generation, result).await;

        match result {
            Ok(page) => {
                self.update_if_current(generation, |v| {
                    v.events.apply_page(page);
                    v.events_feedback = None;
                });
                Ok(())
            }
            Err(err) => {
                let message = failure_message(&err, LOAD_FAILED);
                self.update_if_current(generation, |v| {
                    v.events.apply_failure();
                    v.events_feedback = Some(Feedback::error(message));
                });
                Err(err)
            }
        }
    }

    /// Submit the filter form: trim, validate, and load page one.
    pub async fn apply_event_filters(&self, filters: EventFilters) -> Result<(), CoreError> {
        let filters = match normalize_filters(filters) {
            Ok(filters) => filters,
            Err(err) => {
                let message = err.to_string();
                self.update(|v| v.events_feedback = Some(Feedback::error(message)));
                return Err(err);
            }
        };
        self.update(|v| v.events.filters = filters);
        self.load_events(true).await
    }

    /// Clear every filter and load page one.
    pub async fn reset_event_filters(&self) -> Result<(), CoreError> {
        self.update(|v| v.events.filters = EventFilters::default());
        self.load_events(true).await
    }

    /// Returns `false` (and loads nothing) on the last page.
    pub async fn next_event_page(&self) -> Result<bool, CoreError> {
        let mut moved = false;
        self.update(|v| moved = v.events.go_next());
        if moved {
            self.load_events(false).await?;
        }
        Ok(moved)
    }

    /// Returns `false` (and loads nothing) on the first page.
    pub async fn prev_event_page(&self) -> Result<bool, CoreError> {
        let mut moved = false;
        self.update(|v| moved = v.events.go_prev());
        if moved {
            self.load_events(false).await?;
        }
        Ok(moved)
    }

    /// Download every event matching the active filters as CSV.
    pub async fn export_events(&self) -> Result<ExportFile, CoreError> {
        if !self.is_authenticated() {
            return Err(CoreError::NotAuthenticated);
        }
        let generation = self.generation();
        let filters = self.inner.view.borrow().events.filters.clone();
        self.update(|v| v.events_feedback = Some(Feedback::info(EXPORTING)));

        let result = self.inner.api.export_events(&filters).await;
        match self.call(generation, result).await {
            Ok(bytes) => {
                self.update_if_current(generation, |v| v.events_feedback = None);
                let file = ExportFile::timestamped(bytes, Utc::now());
                info!(file = %file.filename, bytes = file.bytes.len(), "archive exported");
                Ok(file)
            }
            Err(err) => {
                let message = failure_message(&err, EXPORT_FAILED);
                self.update_if_current(generation, |v| {
                    v.events_feedback = Some(Feedback::error(message));
                });
                Err(err)
            }
        }
    }

    // ── Tasks ────────────────────────────────────────────────────

    /// Queue a manual task, then refresh so it shows up in the list.
    pub async fn create_task(&self, request: CreateTaskRequest) -> Result<Task, CoreError> {
        let request = CreateTaskRequest {
            material_code: request.material_code.trim().to_owned(),
            target_device: request.target_device.trim().to_owned(),
            ..request
        };
        let invalid = if request.material_code.is_empty() {
            Some("请输入物料编码")
        } else if request.target_device.is_empty() {
            Some("请输入目标设备")
        } else {
            None
        };
        if let Some(reason) = invalid {
            let err = CoreError::validation(reason);
            let message = err.to_string();
            self.update(|v| v.task_feedback = Some(Feedback::error(message)));
            return Err(err);
        }
        if !self.is_authenticated() {
            return Err(CoreError::NotAuthenticated);
        }

        let generation = self.generation();
        self.update(|v| v.task_feedback = Some(Feedback::info(CREATING_TASK)));

        let result = self.inner.api.create_task(&request).await;
        match self.call(generation, result).await {
            Ok(task) => {
                info!(task = %task.task_id, "task created");
                self.update_if_current(generation, |v| {
                    v.task_feedback = Some(Feedback::success(TASK_CREATED));
                });
                if let Err(e) = self.refresh_inner(false).await {
                    debug!(error = %e, "refresh after task creation failed");
                }
                Ok(task)
            }
            Err(err) => {
                let message = failure_message(&err, TASK_FAILED);
                self.update_if_current(generation, |v| {
                    v.task_feedback = Some(Feedback::error(message));
                });
                Err(err)
            }
        }
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command: apply its state transition and publish the
    /// resulting view.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        debug!(command = cmd.name(), "executing command");
        route_command(self, cmd).await
    }

    /// Stop every background task for good.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.stop_auto_refresh().await;
        debug!("controller shut down");
    }
}

// ── Command routing ──────────────────────────────────────────────

async fn route_command(controller: &Controller, cmd: Command) -> Result<CommandResult, CoreError> {
    match cmd {
        Command::Login { username, password } => controller
            .login(&username, &password)
            .await
            .map(CommandResult::LoggedIn),
        Command::Logout => {
            controller.logout(LogoutReason::Manual).await;
            Ok(CommandResult::Ok)
        }
        Command::Refresh => controller.refresh().await.map(|()| CommandResult::Ok),
        Command::CreateTask(request) => controller
            .create_task(request)
            .await
            .map(|task| CommandResult::TaskCreated(Box::new(task))),
        Command::SetVisibility(visibility) => {
            controller.set_visibility(visibility).await;
            Ok(CommandResult::Ok)
        }
        Command::ActivatePage(page) => controller
            .activate_page(page)
            .await
            .map(|()| CommandResult::Ok),
        Command::ApplyEventFilters(filters) => controller
            .apply_event_filters(filters)
            .await
            .map(|()| CommandResult::Ok),
        Command::ResetEventFilters => controller
            .reset_event_filters()
            .await
            .map(|()| CommandResult::Ok),
        Command::ReloadEvents => controller
            .load_events(false)
            .await
            .map(|()| CommandResult::Ok),
        Command::NextEventPage => controller.next_event_page().await.map(moved_result),
        Command::PrevEventPage => controller.prev_event_page().await.map(moved_result),
        Command::ExportEvents => controller
            .export_events()
            .await
            .map(CommandResult::Exported),
    }
}

fn moved_result(moved: bool) -> CommandResult {
    if moved {
        CommandResult::Ok
    } else {
        CommandResult::Ignored
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically refresh the dashboard until cancelled.
async fn refresh_task(controller: Controller, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = controller.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
    debug!("refresh task exited");
}
