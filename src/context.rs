//! Application Context
//!
//! Services shared with every component via the Leptos Context API. The
//! clients are `Rc`-based, so they sit in local storage behind a `Copy`
//! handle.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::config::AppConfig;
use crate::notify::{Notifier, ToastKind};
use crate::query::QueryClient;
use crate::session::SessionStore;
use crate::store::{store_expire_toast, store_push_toast, AppStore};

pub struct AppServices {
    pub query: QueryClient,
    pub session: SessionStore,
}

#[derive(Clone, Copy)]
pub struct AppContext {
    services: StoredValue<AppServices, LocalStorage>,
    config: StoredValue<AppConfig>,
    pub store: AppStore,
}

impl AppContext {
    pub fn new(services: AppServices, config: AppConfig, store: AppStore) -> Self {
        Self {
            services: StoredValue::new_local(services),
            config: StoredValue::new(config),
            store,
        }
    }

    pub fn query(&self) -> QueryClient {
        self.services.with_value(|s| s.query.clone())
    }

    pub fn session(&self) -> SessionStore {
        self.services.with_value(|s| s.session.clone())
    }

    pub fn config(&self) -> AppConfig {
        self.config.get_value()
    }

    pub fn page_size(&self) -> u32 {
        self.config.with_value(|c| c.page_size)
    }

    pub fn notifier(&self) -> StoreNotifier {
        StoreNotifier {
            store: self.store,
            timeout_ms: self.config.with_value(|c| c.toast_timeout_ms),
        }
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}

/// Pushes toasts into the store and dismisses them after a timeout
#[derive(Clone, Copy)]
pub struct StoreNotifier {
    store: AppStore,
    timeout_ms: u32,
}

impl Notifier for StoreNotifier {
    fn notify(&self, kind: ToastKind, message: String) {
        match kind {
            ToastKind::Error => log::warn!("[TOAST] {}", message),
            _ => log::info!("[TOAST] {}", message),
        }
        let ticket = store_push_toast(&self.store, kind, message);
        if self.timeout_ms == 0 {
            return;
        }
        let store = self.store;
        let timeout = self.timeout_ms;
        spawn_local(async move {
            TimeoutFuture::new(timeout).await;
            store_expire_toast(&store, ticket);
        });
    }
}
