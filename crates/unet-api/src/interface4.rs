// Interface4 event archive endpoints
//
// Paged listing plus a CSV export that shares the same filters but
// carries no paging parameters.

use bytes::Bytes;
use reqwest::Method;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{EventFilters, EventPage, EventQuery};

impl ApiClient {
    /// One page of archived capture events.
    ///
    /// `GET /api/interface4/events?page&pageSize[&keyword&status&start&end]`
    pub async fn list_events(&self, query: &EventQuery) -> Result<EventPage, Error> {
        debug!(page = query.page, page_size = query.page_size, "listing interface4 events");
        self.get_json("interface4/events", &query.to_query()).await
    }

    /// Every event matching `filters`, as CSV bytes.
    ///
    /// `GET /api/interface4/events/export[?keyword&status&start&end]`
    pub async fn export_events(&self, filters: &EventFilters) -> Result<Bytes, Error> {
        let pairs = filters.to_query();
        debug!(filters = pairs.len(), "exporting interface4 events");
        let resp = self
            .authorized_request(Method::GET, "interface4/events/export", |b| {
                if pairs.is_empty() { b } else { b.query(&pairs) }
            })
            .await?;
        Ok(resp.bytes().await?)
    }
}
