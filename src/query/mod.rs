//! Remote List Queries
//!
//! Cached, de-duplicated paginated reads of backend resources, the row
//! actions that mutate them, and the reactive hooks views subscribe with.

mod action;
mod cache;
mod client;
mod hook;
mod key;
mod page;
mod toggle;

pub use action::{execute_action, ActionDescriptor, ActionKind, ActionOutcome, ActionTarget, ConfirmPolicy};
pub use cache::{BrowserClock, Clock, QueryCache};
pub use client::{next_page_query, QueryClient, MAX_RETRIES};
pub use hook::{use_item_query, use_list_query, ItemHandle, ListQueryHandle};
pub use key::{ListQuery, DEFAULT_PAGE_SIZE};
pub use page::{EnvelopeShape, ListPage, ListResult};
pub use toggle::{OptimisticToggle, PendingToggle};
