//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Holds only what
//! views render app-wide; list data lives in the query cache.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::notify::{ToastKind, ToastQueue, ToastTicket};
use crate::session::{AuthSession, SessionState};
use crate::validation::Language;

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Mirror of the session store
    pub session: AuthSession,
    /// Visible notifications
    pub toasts: ToastQueue,
    /// Backend requests currently in flight (progress bar)
    pub requests_in_flight: u32,
    pub language: Language,
}

impl AppState {
    pub fn new(session: AuthSession, language: Language) -> Self {
        Self {
            session,
            language,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_set_session(store: &AppStore, state: &SessionState) {
    store.session().set(AuthSession::from(state));
}

/// Add a toast; the ticket is for its timed expiry
pub fn store_push_toast(store: &AppStore, kind: ToastKind, message: String) -> ToastTicket {
    store.toasts().write().push(kind, message)
}

pub fn store_expire_toast(store: &AppStore, ticket: ToastTicket) {
    store.toasts().write().expire(ticket);
}

pub fn store_dismiss_toast(store: &AppStore, id: u64) {
    store.toasts().write().dismiss(id);
}
