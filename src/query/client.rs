//! Query Client
//!
//! Paginated list fetching with caching, in-flight de-duplication, one
//! automatic retry, next-page prefetch and per-resource invalidation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use serde::de::DeserializeOwned;

use super::cache::{Clock, QueryCache};
use super::key::ListQuery;
use super::page::{ListPage, ListResult};
use crate::api::{ApiClient, ApiRequest, ApiResponse, CancelToken, ResourceKind};
use crate::error::{ApiError, ApiResult};
use crate::models::Resource;

/// Automatic retries for a foreground list fetch
pub const MAX_RETRIES: u8 = 1;

type PageFuture = Shared<LocalBoxFuture<'static, ApiResult<Rc<ListPage>>>>;

struct InFlight {
    id: u64,
    future: PageFuture,
}

struct QueryState {
    cache: QueryCache,
    in_flight: HashMap<ListQuery, InFlight>,
    next_id: u64,
}

#[derive(Clone)]
pub struct QueryClient {
    api: ApiClient,
    clock: Rc<dyn Clock>,
    state: Rc<RefCell<QueryState>>,
}

/// Prefetch key after loading `query`, if there is a next page
pub fn next_page_query(query: &ListQuery, total_pages: u32) -> Option<ListQuery> {
    (query.page < total_pages).then(|| query.next_page())
}

impl QueryClient {
    pub fn new(api: ApiClient, clock: Rc<dyn Clock>, stale_time_ms: f64) -> Self {
        Self {
            api,
            clock,
            state: Rc::new(RefCell::new(QueryState {
                cache: QueryCache::new(stale_time_ms),
                in_flight: HashMap::new(),
                next_id: 0,
            })),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn fresh(&self, query: &ListQuery) -> Option<Rc<ListPage>> {
        self.state.borrow().cache.get_fresh(query, self.clock.now_ms())
    }

    /// Cached page regardless of age
    pub fn peek(&self, query: &ListQuery) -> Option<Rc<ListPage>> {
        self.state.borrow().cache.get_any(query)
    }

    pub fn is_fresh(&self, query: &ListQuery) -> bool {
        self.fresh(query).is_some()
    }

    // ========================
    // Reads
    // ========================

    /// Fetch one page, served from cache while fresh.
    ///
    /// Concurrent callers with the same key share one request. When `cancel`
    /// fires, this caller gets [`ApiError::Cancelled`].
    pub async fn fetch_list(&self, query: &ListQuery, cancel: Option<CancelToken>) -> ApiResult<Rc<ListPage>> {
        let own_cancelled = |cancel: &Option<CancelToken>| cancel.as_ref().is_some_and(|c| c.is_cancelled());
        if own_cancelled(&cancel) {
            return Err(ApiError::Cancelled);
        }
        if let Some(page) = self.fresh(query) {
            log::debug!("[QUERY] cache hit {:?} page {}", query.resource, query.page);
            return Ok(page);
        }

        let joined = self
            .state
            .borrow()
            .in_flight
            .get(query)
            .map(|f| f.future.clone());

        let result = match joined {
            Some(shared) => {
                let result = shared.await;
                // the request we joined was cancelled by the view that issued it
                if matches!(result, Err(ApiError::Cancelled)) && !own_cancelled(&cancel) {
                    self.start(query, cancel.clone(), MAX_RETRIES).await
                } else {
                    result
                }
            }
            None => self.start(query, cancel.clone(), MAX_RETRIES).await,
        };

        if own_cancelled(&cancel) {
            return Err(ApiError::Cancelled);
        }
        result
    }

    /// Typed variant of [`fetch_list`](Self::fetch_list)
    pub async fn fetch_rows<T: Resource>(&self, query: &ListQuery, cancel: Option<CancelToken>) -> ApiResult<ListResult<T>> {
        self.fetch_list(query, cancel).await?.decode::<T>()
    }

    /// Warm the cache for `query`. Best effort: no retry, failures only logged.
    pub async fn prefetch(&self, query: ListQuery) {
        if self.is_fresh(&query) || self.state.borrow().in_flight.contains_key(&query) {
            return;
        }
        log::debug!("[QUERY] prefetch {:?} page {}", query.resource, query.page);
        if let Err(e) = self.start(&query, None, 0).await {
            log::debug!("[QUERY] prefetch {:?} page {} failed: {}", query.resource, query.page, e);
        }
    }

    /// One row by id; not cached
    pub async fn fetch_item<T: DeserializeOwned>(
        &self,
        resource: ResourceKind,
        id: i64,
        cancel: Option<CancelToken>,
    ) -> ApiResult<T> {
        let request = ApiRequest::get(resource.item_path(id)).with_cancel(cancel);
        self.api.send_json(request).await
    }

    fn start(&self, query: &ListQuery, cancel: Option<CancelToken>, retries: u8) -> PageFuture {
        let (id, epoch) = {
            let mut state = self.state.borrow_mut();
            state.next_id += 1;
            (state.next_id, state.cache.epoch(query.resource))
        };
        let this = self.clone();
        let key = query.clone();

        let future = async move {
            let result = this.request_page(&key, cancel, retries).await;
            let mut state = this.state.borrow_mut();
            if state.in_flight.get(&key).is_some_and(|f| f.id == id) {
                state.in_flight.remove(&key);
            }
            let page = Rc::new(result?);
            if !state.cache.insert(key.clone(), page.clone(), this.clock.now_ms(), epoch) {
                log::debug!("[QUERY] {:?} invalidated while loading, not caching", key.resource);
            }
            Ok(page)
        }
        .boxed_local()
        .shared();

        self.state.borrow_mut().in_flight.insert(
            query.clone(),
            InFlight {
                id,
                future: future.clone(),
            },
        );
        future
    }

    async fn request_page(&self, query: &ListQuery, cancel: Option<CancelToken>, retries: u8) -> ApiResult<ListPage> {
        let mut attempt = 0;
        loop {
            let request = ApiRequest::get(query.resource.list_path())
                .with_query(query.to_params())
                .with_cancel(cancel.clone());
            let result = self
                .api
                .send(request)
                .await
                .and_then(|response| ListPage::from_body(&response.body, query.resource));
            match result {
                Err(e) if attempt < retries && e.is_retryable() => {
                    attempt += 1;
                    log::warn!("[QUERY] {:?} page {} failed ({}), retrying", query.resource, query.page, e);
                }
                other => return other,
            }
        }
    }

    // ========================
    // Writes
    // ========================

    /// Drop cached pages of `resource` and detach in-flight reads of it
    pub fn invalidate(&self, resource: ResourceKind) {
        let mut state = self.state.borrow_mut();
        let removed = state.cache.invalidate(resource);
        state.in_flight.retain(|key, _| key.resource != resource);
        log::info!("[QUERY] invalidated {:?} ({} cached pages)", resource, removed);
    }

    pub async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        self.api.send(request).await
    }

    /// Replace one row and drop the resource's cached pages
    pub async fn update_item(&self, resource: ResourceKind, id: i64, body: serde_json::Value) -> ApiResult<()> {
        self.api.send(ApiRequest::put(resource.item_path(id), body)).await?;
        self.invalidate(resource);
        Ok(())
    }

    /// PUT the status flag of one row
    pub async fn update_status(&self, resource: ResourceKind, id: i64, value: bool) -> ApiResult<()> {
        let (path, field) = resource
            .status_path(id)
            .zip(resource.status_field())
            .ok_or_else(|| ApiError::Decode(format!("{} has no status field", resource.controller())))?;
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), serde_json::Value::Bool(value));
        self.api.send(ApiRequest::put(path, body.into())).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::*;
    use crate::api::LatestOnly;
    use crate::credentials::MemoryCredentials;
    use crate::models::Course;
    use crate::query::cache::testing::ManualClock;
    use serde_json::{json, Value};
    use std::cell::Cell;

    fn courses(n: i64) -> Vec<Value> {
        (1..=n)
            .map(|id| json!({ "courseID": id, "title": format!("Course {}", id), "status": true }))
            .collect()
    }

    fn setup(transport: Rc<MockTransport>) -> (QueryClient, Rc<ManualClock>) {
        let h = harness(transport, MemoryCredentials::with_token("tok"));
        let clock = Rc::new(ManualClock::default());
        (QueryClient::new(h.client, clock.clone(), 30_000.0), clock)
    }

    fn course_backend(rows: Vec<Value>) -> Rc<MockTransport> {
        MockTransport::new(move |request| respond(200, page_of(&rows, request)))
    }

    #[tokio::test]
    async fn test_identical_query_within_window_hits_network_once() {
        let transport = course_backend(courses(3));
        let (client, clock) = setup(transport.clone());
        let q = ListQuery::new(ResourceKind::Course);

        client.fetch_list(&q, None).await.unwrap();
        clock.advance(29_999.0);
        client.fetch_list(&q.clone(), None).await.unwrap();
        assert_eq!(transport.call_count(), 1);

        clock.advance(1.0);
        client.fetch_list(&q, None).await.unwrap();
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_identical_fetches_share_request() {
        let transport = course_backend(courses(3));
        let (client, _) = setup(transport.clone());
        let q = ListQuery::new(ResourceKind::Course);

        let (a, b) = futures::join!(client.fetch_list(&q, None), client.fetch_list(&q, None));
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_prefetched_next_page_is_cache_satisfied() {
        let transport = course_backend(courses(25));
        let (client, _) = setup(transport.clone());
        let q = ListQuery::new(ResourceKind::Course).sort_by("title", true);

        let first = client.fetch_rows::<Course>(&q, None).await.unwrap();
        assert_eq!(first.total_pages, 3);
        let next = next_page_query(&q, first.total_pages).unwrap();
        client.prefetch(next).await;
        assert_eq!(transport.call_count(), 2);

        let second = client.fetch_rows::<Course>(&q.next_page(), None).await.unwrap();
        assert_eq!(second.data[0].course_id, 11);
        assert_eq!(transport.call_count(), 2);
    }

    #[test]
    fn test_no_prefetch_past_last_page() {
        let q = ListQuery::new(ResourceKind::Course).page(3);
        assert_eq!(next_page_query(&q, 3), None);
        assert_eq!(next_page_query(&q, 0), None);
        assert_eq!(next_page_query(&q.clone().page(2), 3), Some(q));
    }

    #[tokio::test]
    async fn test_prefetch_failure_is_silent() {
        let transport = MockTransport::new(|_| respond(500, json!({ "message": "boom" })));
        let (client, _) = setup(transport.clone());
        client.prefetch(ListQuery::new(ResourceKind::Course).page(2)).await;
        // no retry for prefetch
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_retries_once_on_server_error() {
        let attempts = Rc::new(Cell::new(0));
        let seen = attempts.clone();
        let rows = courses(2);
        let transport = MockTransport::new(move |request| {
            seen.set(seen.get() + 1);
            if seen.get() == 1 {
                respond(503, json!({}))
            } else {
                respond(200, page_of(&rows, request))
            }
        });
        let (client, _) = setup(transport.clone());

        let page = client.fetch_list(&ListQuery::new(ResourceKind::Course), None).await.unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(attempts.get(), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_one_retry() {
        let transport = MockTransport::new(|_| Err(ApiError::Network("offline".into())));
        let (client, _) = setup(transport.clone());

        let err = client.fetch_list(&ListQuery::new(ResourceKind::Course), None).await.unwrap_err();
        assert_eq!(err, ApiError::Network("offline".into()));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let transport = MockTransport::new(|_| respond(404, json!({ "message": "no such controller" })));
        let (client, _) = setup(transport.clone());

        let err = client.fetch_list(&ListQuery::new(ResourceKind::Course), None).await.unwrap_err();
        assert_eq!(err.server_message(), Some("no such controller"));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let transport = course_backend(courses(3));
        let (client, _) = setup(transport.clone());
        let q = ListQuery::new(ResourceKind::Course);

        client.fetch_list(&q, None).await.unwrap();
        client.invalidate(ResourceKind::Course);
        assert!(client.peek(&q).is_none());
        client.fetch_list(&q, None).await.unwrap();
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_started_before_invalidation_is_not_cached() {
        let transport = course_backend(courses(3));
        let (client, _) = setup(transport.clone());
        let q = ListQuery::new(ResourceKind::Course);

        let pending = client.fetch_list(&q, None);
        let invalidate = async {
            client.invalidate(ResourceKind::Course);
        };
        let (result, _) = futures::join!(pending, invalidate);
        assert!(result.is_ok());
        assert!(client.peek(&q).is_none());
    }

    #[tokio::test]
    async fn test_superseded_request_is_cancelled() {
        let transport = course_backend(courses(25));
        let (client, _) = setup(transport.clone());
        let guard = LatestOnly::default();

        let page1 = ListQuery::new(ResourceKind::Course);
        let page2 = page1.next_page();
        let first = guard.begin();
        let second = guard.begin();

        let (a, b) = futures::join!(
            client.fetch_list(&page1, Some(first.token.clone())),
            client.fetch_list(&page2, Some(second.token.clone()))
        );
        assert_eq!(a.unwrap_err(), ApiError::Cancelled);
        assert!(b.is_ok());
        assert!(!guard.is_current(&first));
        assert!(guard.is_current(&second));
        assert!(client.peek(&page1).is_none());
    }

    #[tokio::test]
    async fn test_joiner_survives_owner_cancellation() {
        let token = CancelToken::new();
        let cancel = token.clone();
        let rows = courses(3);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let transport = MockTransport::new(move |request| {
            counter.set(counter.get() + 1);
            if counter.get() == 1 {
                cancel.cancel();
            }
            respond(200, page_of(&rows, request))
        });
        let (client, _) = setup(transport.clone());
        let q = ListQuery::new(ResourceKind::Course);

        let (owner, joiner) = futures::join!(client.fetch_list(&q, Some(token)), client.fetch_list(&q, None));
        assert_eq!(owner.unwrap_err(), ApiError::Cancelled);
        assert_eq!(joiner.unwrap().total_count, 3);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_fetch_item_by_id() {
        let transport = MockTransport::new(|_| respond(200, json!({ "courseID": 12, "title": "Intro to Python" })));
        let (client, _) = setup(transport.clone());

        let course: Course = client.fetch_item(ResourceKind::Course, 12, None).await.unwrap();
        assert_eq!(course.title, "Intro to Python");
        assert_eq!(transport.calls(), vec!["GET http://api.test/api/Course/12"]);
    }

    #[tokio::test]
    async fn test_update_item_invalidates_resource() {
        let rows = courses(3);
        let transport = MockTransport::new(move |request| match request.method {
            crate::api::Method::Put => respond(204, Value::Null),
            _ => respond(200, page_of(&rows, request)),
        });
        let (client, _) = setup(transport.clone());
        let q = ListQuery::new(ResourceKind::Course);
        client.fetch_list(&q, None).await.unwrap();

        client
            .update_item(ResourceKind::Course, 2, json!({ "courseID": 2, "title": "Renamed" }))
            .await
            .unwrap();
        assert!(client.peek(&q).is_none());
        assert_eq!(transport.calls()[1], "PUT http://api.test/api/Course/2");
    }

    #[tokio::test]
    async fn test_update_status_puts_resource_field() {
        let transport = MockTransport::new(|request| {
            assert_eq!(request.body, Some(json!({ "isActive": false })));
            respond(204, Value::Null)
        });
        let (client, _) = setup(transport.clone());

        client.update_status(ResourceKind::Coder, 8, false).await.unwrap();
        assert_eq!(transport.calls(), vec!["PUT http://api.test/api/Coder/8/status"]);
        assert!(client.update_status(ResourceKind::Lesson, 1, true).await.is_err());
    }
}
