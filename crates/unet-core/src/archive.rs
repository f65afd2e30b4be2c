// ── Interface4 event archive state ──
//
// Paging cursor, active filters, and the rows of the current page.
// All mutation goes through the controller; the types here only hold
// the state and the rules for moving it.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::debug;

use unet_api::{EventFilters, EventPage, EventQuery, Interface4Event};

use crate::error::CoreError;

// ── Pager ────────────────────────────────────────────────────────────

/// 1-based page cursor over `total` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pager {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Pager {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    /// `ceil(total / page_size)`, never less than one.
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page_size.max(1))).max(1)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }
}

// ── Archive ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventArchive {
    pub pager: Pager,
    pub filters: EventFilters,
    /// Set once the events page has been opened in this session.
    pub initialized: bool,
    pub items: Vec<Interface4Event>,
}

impl EventArchive {
    pub fn new(page_size: u32) -> Self {
        Self {
            pager: Pager::new(page_size),
            filters: EventFilters::default(),
            initialized: false,
            items: Vec::new(),
        }
    }

    /// Back to page one with nothing loaded. Filters are kept.
    pub fn reset(&mut self) {
        self.pager.page = 1;
        self.pager.total = 0;
        self.initialized = false;
        self.items.clear();
    }

    /// The request for the current cursor and filters.
    pub fn query(&self) -> EventQuery {
        EventQuery {
            page: self.pager.page,
            page_size: self.pager.page_size,
            filters: self.filters.clone(),
        }
    }

    /// Adopt a fetched page. Paging fields missing from the response keep
    /// their current values; a missing total counts as zero.
    pub fn apply_page(&mut self, page: EventPage) {
        self.pager.total = page.total.unwrap_or(0);
        if let Some(p) = page.page.filter(|p| *p > 0) {
            self.pager.page = p;
        }
        if let Some(size) = page.page_size.filter(|s| *s > 0) {
            self.pager.page_size = size;
        }
        self.items = page.items;
        debug!(
            page = self.pager.page,
            total = self.pager.total,
            rows = self.items.len(),
            "archive page applied"
        );
    }

    /// Show an empty result after a failed load.
    pub fn apply_failure(&mut self) {
        self.items.clear();
        self.pager.total = 0;
    }

    /// Step forward. Returns `false` on the last page.
    pub fn go_next(&mut self) -> bool {
        if !self.pager.has_next() {
            return false;
        }
        self.pager.page += 1;
        true
    }

    /// Step back. Returns `false` on the first page.
    pub fn go_prev(&mut self) -> bool {
        if !self.pager.has_prev() {
            return false;
        }
        self.pager.page -= 1;
        true
    }
}

// ── Filter validation ────────────────────────────────────────────────

/// Parse a `start`/`end` bound.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM`, `YYYY-MM-DDTHH:MM:SS`, and
/// RFC 3339. Returns the calendar date for range checks.
fn parse_bound(field: &str, value: &str) -> Result<NaiveDate, CoreError> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.date_naive());
    }
    Err(CoreError::validation(format!(
        "{field}格式应为 YYYY-MM-DD 或 YYYY-MM-DDTHH:MM，当前为 '{value}'"
    )))
}

/// Trim every filter and check the date range.
///
/// Invalid dates and a `start` after `end` are rejected before any
/// request is made; valid strings are passed on unchanged.
pub fn normalize_filters(filters: EventFilters) -> Result<EventFilters, CoreError> {
    let normalized = EventFilters {
        keyword: filters.keyword.trim().to_owned(),
        status: filters.status.trim().to_owned(),
        start: filters.start.trim().to_owned(),
        end: filters.end.trim().to_owned(),
    };

    let start = (!normalized.start.is_empty())
        .then(|| parse_bound("开始时间", &normalized.start))
        .transpose()?;
    let end = (!normalized.end.is_empty())
        .then(|| parse_bound("结束时间", &normalized.end))
        .transpose()?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(CoreError::validation(format!(
                "开始时间 ({start}) 晚于结束时间 ({end})"
            )));
        }
    }
    Ok(normalized)
}

// ── Export ───────────────────────────────────────────────────────────

/// A downloaded CSV export, ready to be written somewhere.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub bytes: Bytes,
}

impl ExportFile {
    /// Name the export after the moment it was taken:
    /// `interface4-events-{unix_millis}.csv`.
    pub fn timestamped(bytes: Bytes, at: DateTime<Utc>) -> Self {
        Self {
            filename: format!("interface4-events-{}.csv", at.timestamp_millis()),
            bytes,
        }
    }

    /// Write into `dir` under the generated name.
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf, CoreError> {
        let path = dir.join(&self.filename);
        self.save_as(&path)?;
        Ok(path)
    }

    pub fn save_as(&self, path: &Path) -> Result<(), CoreError> {
        std::fs::write(path, &self.bytes).map_err(|e| CoreError::Storage {
            message: format!("{}: {e}", path.display()),
        })?;
        debug!(path = %path.display(), bytes = self.bytes.len(), "export written");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn pager(page: u32, total: u64) -> Pager {
        Pager {
            page,
            page_size: 10,
            total,
        }
    }

    #[test]
    fn twenty_five_rows_make_three_pages() {
        assert_eq!(pager(1, 25).total_pages(), 3);
        assert!(!pager(1, 25).has_prev());
        assert!(pager(1, 25).has_next());
        assert!(pager(3, 25).has_prev());
        assert!(!pager(3, 25).has_next());
    }

    #[test]
    fn empty_archive_still_has_one_page() {
        let p = pager(1, 0);
        assert_eq!(p.total_pages(), 1);
        assert!(!p.has_prev());
        assert!(!p.has_next());
    }

    #[test]
    fn exact_multiple_does_not_add_a_page() {
        assert_eq!(pager(1, 30).total_pages(), 3);
    }

    #[test]
    fn navigation_stops_at_bounds() {
        let mut archive = EventArchive::new(10);
        archive.pager.total = 25;

        assert!(!archive.go_prev());
        assert!(archive.go_next());
        assert!(archive.go_next());
        assert!(!archive.go_next());
        assert_eq!(archive.pager.page, 3);
        assert!(archive.go_prev());
        assert_eq!(archive.pager.page, 2);
    }

    #[test]
    fn apply_page_adopts_server_paging() {
        let mut archive = EventArchive::new(10);
        archive.apply_page(EventPage {
            items: Vec::new(),
            total: Some(42),
            page: Some(3),
            page_size: Some(20),
        });
        assert_eq!(archive.pager, Pager { page: 3, page_size: 20, total: 42 });
    }

    #[test]
    fn apply_page_keeps_cursor_when_server_omits_it() {
        let mut archive = EventArchive::new(10);
        archive.pager.page = 2;
        archive.apply_page(EventPage::default());
        assert_eq!(archive.pager, Pager { page: 2, page_size: 10, total: 0 });
    }

    #[test]
    fn reset_keeps_filters() {
        let mut archive = EventArchive::new(10);
        archive.filters.keyword = "PA66".into();
        archive.pager.page = 4;
        archive.pager.total = 80;
        archive.initialized = true;

        archive.reset();

        assert_eq!(archive.pager.page, 1);
        assert_eq!(archive.pager.total, 0);
        assert!(!archive.initialized);
        assert_eq!(archive.filters.keyword, "PA66");
    }

    #[test]
    fn filters_are_trimmed() {
        let filters = normalize_filters(EventFilters {
            keyword: "  EVT-2024 ".into(),
            status: " failed".into(),
            start: "2024-06-01 ".into(),
            end: String::new(),
        })
        .unwrap();
        assert_eq!(filters.keyword, "EVT-2024");
        assert_eq!(filters.status, "failed");
        assert_eq!(filters.start, "2024-06-01");
    }

    #[test]
    fn accepted_date_shapes() {
        for value in [
            "2024-06-01",
            "2024-06-01T08:30",
            "2024-06-01T08:30:15",
            "2024-06-01T08:30:15Z",
            "2024-06-01T08:30:15+08:00",
        ] {
            let filters = EventFilters {
                start: value.into(),
                ..EventFilters::default()
            };
            assert!(normalize_filters(filters).is_ok(), "{value} should be accepted");
        }
    }

    #[test]
    fn garbage_dates_are_rejected() {
        let filters = EventFilters {
            end: "next tuesday".into(),
            ..EventFilters::default()
        };
        let err = normalize_filters(filters).unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }));
        assert!(err.to_string().starts_with("结束时间格式应为"));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let filters = EventFilters {
            start: "2024-06-30".into(),
            end: "2024-06-01".into(),
            ..EventFilters::default()
        };
        let err = normalize_filters(filters).unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }));
        assert_eq!(
            err.to_string(),
            "开始时间 (2024-06-30) 晚于结束时间 (2024-06-01)"
        );
    }

    #[test]
    fn same_day_range_is_fine() {
        let filters = EventFilters {
            start: "2024-06-01T08:00".into(),
            end: "2024-06-01".into(),
            ..EventFilters::default()
        };
        assert!(normalize_filters(filters).is_ok());
    }

    #[test]
    fn export_name_uses_unix_millis() {
        let at = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        let file = ExportFile::timestamped(Bytes::from_static(b"a,b\n"), at);
        assert_eq!(file.filename, "interface4-events-1718447400000.csv");
    }

    #[test]
    fn export_is_written_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = ExportFile {
            filename: "interface4-events-1.csv".into(),
            bytes: Bytes::from_static(b"eventId\nEVT-1\n"),
        };
        let path = file.save_in(dir.path()).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"eventId\nEVT-1\n");
    }
}
