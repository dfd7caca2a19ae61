//! Query Hooks
//!
//! Reactive wrappers over [`QueryClient`](super::QueryClient): re-fetch when
//! the query or the refresh counter changes, keep showing the previous rows
//! while loading, and let only the newest request write back.

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;

use super::client::next_page_query;
use super::key::ListQuery;
use super::page::ListResult;
use crate::api::{LatestOnly, ResourceKind};
use crate::context::use_app_context;
use crate::error::ApiError;
use crate::models::Resource;
use crate::notify::Notifier;

const LOAD_FAILED: &str = "Could not load data";

/// Reactive view of one paginated list
pub struct ListQueryHandle<T: Send + Sync + 'static> {
    pub data: ReadSignal<ListResult<T>>,
    pub is_loading: ReadSignal<bool>,
    pub error: ReadSignal<Option<ApiError>>,
}

impl<T: Send + Sync + 'static> Clone for ListQueryHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for ListQueryHandle<T> {}

/// Subscribe a view to a paginated list.
///
/// Failures raise an error toast and leave the last loaded rows in place.
/// After page N of P loads, page N+1 is prefetched in the background.
pub fn use_list_query<T: Resource>(query: Signal<ListQuery>, refresh: Signal<u32>) -> ListQueryHandle<T> {
    let ctx = use_app_context();
    let (data, set_data) = signal(ListResult::<T>::default());
    let (is_loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<ApiError>);
    let guard = StoredValue::new_local(LatestOnly::default());

    Effect::new(move |_| {
        let query = query.get();
        refresh.track();
        let client = ctx.query();
        let notifier = ctx.notifier();
        let Some(ticket) = guard.try_with_value(|g| g.begin()) else {
            return;
        };

        // stale page while revalidating
        if let Some(page) = client.peek(&query) {
            if let Ok(rows) = page.decode::<T>() {
                set_data.set(rows);
            }
        }
        set_loading.set(true);

        spawn_local(async move {
            let result = client
                .fetch_list(&query, Some(ticket.token.clone()))
                .await
                .and_then(|page| Ok((page.decode::<T>()?, page.total_pages)));
            if !guard.try_with_value(|g| g.is_current(&ticket)).unwrap_or(false) {
                return;
            }
            match result {
                Ok((rows, total_pages)) => {
                    set_data.set(rows);
                    set_error.set(None);
                    set_loading.set(false);
                    if let Some(next) = next_page_query(&query, total_pages) {
                        spawn_local(async move { client.prefetch(next).await });
                    }
                }
                Err(ApiError::Cancelled) => {}
                Err(e) => {
                    log::warn!("[QUERY] {:?} page {} failed: {}", query.resource, query.page, e);
                    if e != ApiError::Unauthorized {
                        notifier.error(&e.user_message(LOAD_FAILED));
                    }
                    set_error.set(Some(e));
                    set_loading.set(false);
                }
            }
        });
    });

    on_cleanup(move || {
        guard.try_with_value(|g| g.cancel_all());
    });

    ListQueryHandle { data, is_loading, error }
}

/// Reactive view of one row
pub struct ItemHandle<T: Send + Sync + 'static> {
    pub data: ReadSignal<Option<T>>,
    pub is_loading: ReadSignal<bool>,
    pub error: ReadSignal<Option<ApiError>>,
}

impl<T: Send + Sync + 'static> Clone for ItemHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for ItemHandle<T> {}

/// Load `resource` row `id` whenever the id changes; `None` clears it
pub fn use_item_query<T>(resource: ResourceKind, id: Signal<Option<i64>>) -> ItemHandle<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let ctx = use_app_context();
    let (data, set_data) = signal(None::<T>);
    let (is_loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<ApiError>);
    let guard = StoredValue::new_local(LatestOnly::default());

    Effect::new(move |_| {
        let Some(ticket) = guard.try_with_value(|g| g.begin()) else {
            return;
        };
        let Some(id) = id.get() else {
            set_data.set(None);
            set_loading.set(false);
            return;
        };
        let client = ctx.query();
        let notifier = ctx.notifier();
        set_loading.set(true);

        spawn_local(async move {
            let result = client
                .fetch_item::<T>(resource, id, Some(ticket.token.clone()))
                .await;
            if !guard.try_with_value(|g| g.is_current(&ticket)).unwrap_or(false) {
                return;
            }
            match result {
                Ok(item) => {
                    set_data.set(Some(item));
                    set_error.set(None);
                }
                Err(ApiError::Cancelled) => return,
                Err(e) => {
                    log::warn!("[QUERY] {:?} #{} failed: {}", resource, id, e);
                    if e != ApiError::Unauthorized {
                        notifier.error(&e.user_message(LOAD_FAILED));
                    }
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    });

    on_cleanup(move || {
        guard.try_with_value(|g| g.cancel_all());
    });

    ItemHandle { data, is_loading, error }
}
