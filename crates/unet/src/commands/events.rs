//! Interface4 event archive: paged listing and CSV export.

use std::path::PathBuf;

use tabled::Tabled;

use unet_core::display::{dash, event_quantity, label_or_dash, page_info, timestamp, total_info};
use unet_core::{Controller, EventPage, EventQuery, Interface4Event, Pager};

use crate::cli::{EventsArgs, EventsCommand, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "事件")]
    id: String,
    #[tabled(rename = "触发时间")]
    triggered_at: String,
    #[tabled(rename = "设备")]
    device: String,
    #[tabled(rename = "点位")]
    point: String,
    #[tabled(rename = "物料")]
    material: String,
    #[tabled(rename = "批次")]
    batch: String,
    #[tabled(rename = "产量")]
    quantity: String,
    #[tabled(rename = "状态")]
    status: String,
    #[tabled(rename = "来源")]
    source: String,
    #[tabled(rename = "处理人")]
    handler: String,
}

impl From<&Interface4Event> for EventRow {
    fn from(e: &Interface4Event) -> Self {
        Self {
            id: e.event_id.clone(),
            triggered_at: timestamp(e.triggered_at.as_deref()),
            device: dash(e.device_id.as_deref()).to_owned(),
            point: dash(e.point_code.as_deref()).to_owned(),
            material: dash(e.material_code.as_deref()).to_owned(),
            batch: dash(e.batch_no.as_deref()).to_owned(),
            quantity: event_quantity(e),
            status: label_or_dash(e.status.as_ref()),
            source: label_or_dash(e.trigger_source.as_ref()),
            handler: dash(e.handler.as_deref()).to_owned(),
        }
    }
}

/// The pager a response implies, falling back to what was asked for.
fn pager_for(page: &EventPage, query: &EventQuery) -> Pager {
    Pager {
        page: page.page.filter(|p| *p > 0).unwrap_or(query.page),
        page_size: page.page_size.filter(|s| *s > 0).unwrap_or(query.page_size),
        total: page.total.unwrap_or(0),
    }
}

fn page_detail(page: &EventPage, pager: &Pager) -> String {
    let rows: Vec<EventRow> = page.items.iter().map(EventRow::from).collect();
    format!(
        "{}\n{}  {}",
        output::render_table(&rows),
        total_info(pager),
        page_info(pager)
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: EventsArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(controller)?;

    match args.command {
        EventsCommand::List {
            page,
            page_size,
            filters,
        } => {
            if page == 0 {
                return Err(CliError::validation("page", "pages start at 1"));
            }
            let query = EventQuery {
                page,
                page_size: page_size.unwrap_or(resolved.client.page_size).max(1),
                filters: util::filters_from(filters),
            };

            let result = controller.query_events(&query).await?;
            let pager = pager_for(&result, &query);
            let out = output::render_single(
                global.output,
                &result,
                |p| page_detail(p, &pager),
                |p| {
                    p.items
                        .iter()
                        .map(|e| e.event_id.clone())
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EventsCommand::Export { filters, dir, file } => {
            let spinner = util::spinner(global, "正在导出...");
            let result = controller.export_with(util::filters_from(filters)).await;
            spinner.finish_and_clear();
            let export = result?;

            let path = if let Some(path) = file {
                export.save_as(&path)?;
                path
            } else {
                export.save_in(&dir.unwrap_or_else(|| PathBuf::from(".")))?
            };
            output::success(
                global,
                &format!("Exported {} bytes to {}", export.bytes.len(), path.display()),
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use unet_core::EventFilters;

    use super::*;

    fn query() -> EventQuery {
        EventQuery {
            page: 2,
            page_size: 10,
            filters: EventFilters::default(),
        }
    }

    #[test]
    fn pager_prefers_response_values() {
        let page = EventPage {
            items: Vec::new(),
            total: Some(25),
            page: Some(3),
            page_size: Some(10),
        };
        let pager = pager_for(&page, &query());
        assert_eq!(pager.page, 3);
        assert_eq!(pager.total_pages(), 3);
        assert!(!pager.has_next());
    }

    #[test]
    fn pager_falls_back_to_query() {
        let pager = pager_for(&EventPage::default(), &query());
        assert_eq!(pager.page, 2);
        assert_eq!(pager.page_size, 10);
        assert_eq!(pager.total, 0);
    }

    #[test]
    fn detail_has_footer() {
        let page = EventPage {
            total: Some(25),
            ..EventPage::default()
        };
        let pager = pager_for(&page, &query());
        let text = page_detail(&page, &pager);
        assert!(text.contains("共 25 条记录"));
        assert!(text.contains("第 2 / 3 页"));
    }
}
