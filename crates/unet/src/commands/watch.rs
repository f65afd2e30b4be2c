//! `unet watch`: follow the dashboard as the refresh loop updates it.

use std::time::Duration;

use unet_core::{
    ClientConfig, Controller, DEFAULT_REFRESH_INTERVAL, DashboardData, Screen, ViewState,
};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::dashboard::{DeviceRow, overview_detail};

/// Polling configuration for a watch run. The loop is never disabled here.
pub fn client_config(mut client: ClientConfig, args: &WatchArgs) -> ClientConfig {
    if let Some(secs) = args.interval {
        client.refresh_interval = Duration::from_secs(secs.max(1));
    }
    if client.refresh_interval.is_zero() {
        client.refresh_interval = DEFAULT_REFRESH_INTERVAL;
    }
    client
}

fn render(view: &ViewState, global: &GlobalOpts) -> Result<String, CliError> {
    match global.output {
        OutputFormat::Table => {
            let mut out = match view.dashboard.overview {
                Some(ref overview) => overview_detail(overview),
                None => String::new(),
            };
            let rows: Vec<DeviceRow> = view.dashboard.devices.iter().map(DeviceRow::from).collect();
            out.push('\n');
            out.push_str(&output::render_table(&rows));
            Ok(out)
        }
        // One document per update so the stream stays line-oriented.
        format => output::render_single(
            if format == OutputFormat::Json {
                OutputFormat::JsonCompact
            } else {
                format
            },
            &view.dashboard,
            |_| String::new(),
            |d| d.overview.as_ref().and_then(|o| o.last_updated.clone()).unwrap_or_default(),
        ),
    }
}

pub async fn handle(
    controller: &Controller,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut rx = controller.subscribe();
    if !controller.restore().await? {
        return Err(CliError::NotLoggedIn);
    }

    let mut shown = DashboardData::default();
    let mut last_error: Option<String> = None;
    let mut updates = 0_u32;

    loop {
        let view = rx.borrow_and_update().clone();
        if view.screen == Screen::Login {
            return Err(CliError::SessionExpired);
        }

        let error = view
            .task_feedback
            .as_ref()
            .filter(|f| f.is_error())
            .map(|f| f.message.clone());
        if error != last_error {
            if let Some(ref message) = error {
                output::note(global, &format!("刷新失败：{message}"));
            }
            last_error = error;
        }

        if view.dashboard.overview.is_some() && view.dashboard != shown {
            output::print_output(&render(&view, global)?, global.quiet);
            shown = view.dashboard;
            updates += 1;
            if args.count.is_some_and(|limit| updates >= limit) {
                break;
            }
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ClientConfig {
        let server = unet_config::parse_server("http://127.0.0.1:8000").unwrap();
        let mut client = ClientConfig::new(server);
        client.refresh_interval = Duration::ZERO;
        client
    }

    #[test]
    fn watch_never_disables_polling() {
        let args = WatchArgs {
            interval: None,
            count: None,
        };
        assert_eq!(client_config(client(), &args).refresh_interval, DEFAULT_REFRESH_INTERVAL);
    }

    #[test]
    fn interval_flag_wins() {
        let args = WatchArgs {
            interval: Some(0),
            count: None,
        };
        assert_eq!(client_config(client(), &args).refresh_interval, Duration::from_secs(1));
    }
}
