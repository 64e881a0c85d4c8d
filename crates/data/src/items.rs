//! Lazy cursor over quick-search result pages.

use std::sync::Arc;

use futures::stream::{self, Stream};
use tracing::debug;

use crate::error::Result;
use crate::models::{Item, Page};
use crate::transport::{Request, Transport};
use crate::translate;

/// Items of a quick search, fetched one page at a time.
///
/// Nothing is requested until the first [`Items::next`]. Each page is fetched
/// only once its predecessor is used up, and never after `limit` items have
/// been yielded. `next` takes `&mut self`, so at most one page request per
/// cursor is ever in flight.
///
/// The cursor cannot be restarted; run the search again for a fresh one.
/// Dropping it at any point is safe and issues no further requests.
pub struct Items {
    transport: Arc<dyn Transport>,
    /// Request for the next page; `None` once the server sent no `_next` link.
    pending: Option<Request>,
    page: std::vec::IntoIter<Item>,
    yielded: usize,
    limit: Option<usize>,
}

impl Items {
    pub(crate) fn new(transport: Arc<dyn Transport>, first: Request, limit: Option<usize>) -> Self {
        Self {
            transport,
            pending: Some(first),
            page: Vec::new().into_iter(),
            yielded: 0,
            limit,
        }
    }

    /// Next item, or `None` at the end of the results.
    ///
    /// After the end, or after an error, every call returns `Ok(None)` without
    /// touching the network. If a pull is cancelled while its page is being
    /// fetched, the next pull requests that page again.
    pub async fn next(&mut self) -> Result<Option<Item>> {
        loop {
            if self.limit_reached() {
                self.finish();
                return Ok(None);
            }

            if let Some(item) = self.page.next() {
                self.yielded += 1;
                return Ok(Some(item));
            }

            // Stays pending until the fetch completes, so a cancelled pull
            // retries the same page.
            let Some(request) = self.pending.clone() else {
                return Ok(None);
            };
            match self.fetch(request).await {
                Ok(page) => {
                    self.pending = page.next_link().map(Request::get);
                    self.page = page.features.into_iter();
                }
                Err(e) => {
                    self.pending = None;
                    return Err(e);
                }
            }
        }
    }

    /// Number of items yielded so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Whether the cursor has ended.
    pub fn is_exhausted(&self) -> bool {
        self.limit_reached() || (self.pending.is_none() && self.page.len() == 0)
    }

    /// Drain the cursor into a vector.
    pub async fn collect_all(mut self) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// The cursor as a stream. The stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Item>> + Send {
        stream::try_unfold(self, |mut items| async move {
            Ok(items.next().await?.map(|item| (item, items)))
        })
    }

    fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.yielded >= limit)
    }

    fn finish(&mut self) {
        self.pending = None;
        self.page = Vec::new().into_iter();
    }

    async fn fetch(&self, request: Request) -> Result<Page> {
        debug!(method = request.method().as_str(), url = request.url(), "fetching result page");
        let resp = self
            .transport
            .send(request)
            .await
            .map_err(translate::narrow_bad_query)?;
        let page: Page = resp.json()?;
        debug!(items = page.len(), has_next = page.next_link().is_some(), "received result page");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use crate::transport::mock::MockTransport;
    use crate::transport::Method;
    use futures::StreamExt;
    use serde_json::{json, Value};

    fn item(id: &str) -> Value {
        json!({"id": id, "properties": {"item_type": "PSScene"}})
    }

    /// A page of `n` items named `<tag>-<i>`, linking to `next` if given.
    fn page(tag: &str, n: usize, next: Option<&str>) -> Value {
        let features: Vec<Value> = (0..n).map(|i| item(&format!("{tag}-{i}"))).collect();
        let mut links = json!({"_self": format!("https://api.example.com/{tag}")});
        if let Some(next) = next {
            links["_next"] = json!(next);
        }
        json!({"_links": links, "features": features, "type": "FeatureCollection"})
    }

    /// Three pages of sizes 3, 3 and 2.
    fn three_pages() -> MockTransport {
        MockTransport::new()
            .reply_json(page("p1", 3, Some("https://api.example.com/p2")))
            .reply_json(page("p2", 3, Some("https://api.example.com/p3")))
            .reply_json(page("p3", 2, None))
    }

    fn first_request() -> Request {
        Request::post("https://api.example.com/data/v1/quick-search", json!({}))
    }

    #[tokio::test]
    async fn limit_stops_before_the_next_page() {
        let transport = Arc::new(three_pages());
        let mut items = Items::new(transport.clone(), first_request(), Some(5));

        let mut ids = Vec::new();
        while let Some(item) = items.next().await.unwrap() {
            ids.push(item.id().to_string());
        }

        assert_eq!(ids, ["p1-0", "p1-1", "p1-2", "p2-0", "p2-1"]);
        assert_eq!(items.yielded(), 5);
        assert!(items.is_exhausted());
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn unlimited_walks_every_page_then_stays_ended() {
        let transport = Arc::new(three_pages());
        let mut items = Items::new(transport.clone(), first_request(), None);

        let mut count = 0;
        while items.next().await.unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 8);

        for _ in 0..3 {
            assert!(items.next().await.unwrap().is_none());
        }
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn follows_next_links_with_get() {
        let transport = Arc::new(three_pages());
        Items::new(transport.clone(), first_request(), None)
            .collect_all()
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method(), Method::Post);
        assert_eq!(requests[1].method(), Method::Get);
        assert_eq!(requests[1].url(), "https://api.example.com/p2");
        assert_eq!(requests[2].url(), "https://api.example.com/p3");
        assert!(requests[1].body().is_none());
    }

    #[tokio::test]
    async fn nothing_is_fetched_before_the_first_pull() {
        let transport = Arc::new(three_pages());
        let items = Items::new(transport.clone(), first_request(), None);
        assert!(!items.is_exhausted());
        drop(items);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn abandoning_iteration_makes_no_further_requests() {
        let transport = Arc::new(three_pages());
        let mut items = Items::new(transport.clone(), first_request(), None);

        for _ in 0..2 {
            items.next().await.unwrap().unwrap();
        }
        drop(items);

        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn cancelled_fetch_is_retried_on_the_next_pull() {
        let transport = Arc::new(three_pages().stall_once());
        let mut items = Items::new(transport.clone(), first_request(), None);

        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(50), items.next()).await;
        assert!(timed_out.is_err());
        assert!(!items.is_exhausted());

        let all = items.collect_all().await.unwrap();
        assert_eq!(all.len(), 8);

        let requests = transport.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0], requests[1]);
        assert_eq!(requests[1].method(), Method::Post);
    }

    #[tokio::test]
    async fn zero_limit_makes_no_request() {
        let transport = Arc::new(three_pages());
        let mut items = Items::new(transport.clone(), first_request(), Some(0));
        assert!(items.next().await.unwrap().is_none());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn limit_larger_than_results() {
        let transport = Arc::new(three_pages());
        let all = Items::new(transport.clone(), first_request(), Some(100))
            .collect_all()
            .await
            .unwrap();
        assert_eq!(all.len(), 8);
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn empty_page_with_next_link_is_skipped() {
        let transport = Arc::new(
            MockTransport::new()
                .reply_json(page("p1", 0, Some("https://api.example.com/p2")))
                .reply_json(page("p2", 1, None)),
        );
        let all = Items::new(transport.clone(), first_request(), None)
            .collect_all()
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id(), "p2-0");
    }

    #[tokio::test]
    async fn bad_query_on_a_later_page_is_narrowed() {
        let body = r#"{"field": {"_page": [{"message": "page expired"}]}}"#;
        let transport = Arc::new(
            MockTransport::new()
                .reply_json(page("p1", 1, Some("https://api.example.com/p2")))
                .reply_err(DataError::BadQuery(body.into())),
        );
        let mut items = Items::new(transport.clone(), first_request(), None);

        assert!(items.next().await.unwrap().is_some());
        match items.next().await {
            Err(DataError::BadQuery(msg)) => assert_eq!(msg, "page expired"),
            other => panic!("unexpected {other:?}"),
        }
        // The cursor ends after an error.
        assert!(items.next().await.unwrap().is_none());
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn other_errors_pass_through() {
        let transport = Arc::new(
            MockTransport::new().reply_err(DataError::ServerError("upstream timeout".into())),
        );
        let mut items = Items::new(transport, first_request(), None);
        assert!(matches!(
            items.next().await,
            Err(DataError::ServerError(msg)) if msg == "upstream timeout"
        ));
    }

    #[tokio::test]
    async fn stream_yields_same_items_and_respects_limit() {
        let transport = Arc::new(three_pages());
        let ids: Vec<String> = Items::new(transport.clone(), first_request(), Some(4))
            .into_stream()
            .map(|r| r.unwrap().id().to_string())
            .collect()
            .await;
        assert_eq!(ids, ["p1-0", "p1-1", "p1-2", "p2-0"]);
        assert_eq!(transport.request_count(), 2);
    }
}
