//! NTU-CODER Frontend App
//!
//! Builds the service graph, provides it through context and lays out the
//! routes.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::{ParentRoute, Route, Router, Routes, A};
use leptos_router::hooks::use_location;
use leptos_router::path;
use reactive_stores::Store;

use crate::api::{ApiClient, GlooTransport};
use crate::components::{ProgressBar, ToastViewport};
use crate::config::AppConfig;
use crate::context::{use_app_context, AppContext, AppServices};
use crate::credentials::{local_storage_available, CredentialStore, LocalStorageCredentials, MemoryCredentials};
use crate::pages::{
    AdminDashboard, AdminDetailPage, AdminEditPage, AdminLayout, AdminResourcePage, CourseCatalog, CourseDetail,
    Home, LessonView, LoginPage, NotFound, ProblemDetail, ProblemList, RegisterPage,
};
use crate::progress::RequestTracker;
use crate::query::{BrowserClock, QueryClient};
use crate::routes::{derive_title, document_title, menu, Layout, ROUTES, SITE_NAME};
use crate::session::{BrowserNavigator, SessionStore};
use crate::store::{store_set_session, AppState, AppStateStoreFields};
use crate::validation::Language;

fn credential_store() -> Rc<dyn CredentialStore> {
    if local_storage_available() {
        Rc::new(LocalStorageCredentials)
    } else {
        log::warn!("[APP] localStorage unavailable, sign-in lasts for this tab only");
        Rc::new(MemoryCredentials::default())
    }
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let tracker = Rc::new(RequestTracker::new());
    let api = ApiClient::new(&config.api_base_url, Rc::new(GlooTransport), credential_store(), tracker.clone());
    let query = QueryClient::new(api.clone(), Rc::new(BrowserClock), f64::from(config.stale_time_ms));
    let session = SessionStore::new(api, Rc::new(BrowserNavigator), config.google_client_id.clone());

    let store = Store::new(AppState::new(session.snapshot(), Language::default()));
    tracker.on_change(move |in_flight| store.requests_in_flight().set(in_flight));
    session.subscribe(move |state| store_set_session(&store, state));

    let services = AppServices {
        query,
        session: session.clone(),
    };
    provide_context(store);
    provide_context(AppContext::new(services, config, store));

    spawn_local(async move { session.init().await });

    view! {
        <Router>
            <TitleSync />
            <ProgressBar />
            <SiteHeader />
            <main class="app-main">
                <Routes fallback=|| view! { <NotFound /> }>
                    <Route path=path!("/") view=Home />
                    <Route path=path!("/courses") view=CourseCatalog />
                    <Route path=path!("/courses/:slug") view=CourseDetail />
                    <Route path=path!("/courses/:slug/lessons/:id") view=LessonView />
                    <Route path=path!("/problems") view=ProblemList />
                    <Route path=path!("/problems/:id") view=ProblemDetail />
                    <Route path=path!("/login") view=LoginPage />
                    <Route path=path!("/register") view=RegisterPage />
                    <ParentRoute path=path!("/admin") view=AdminLayout>
                        <Route path=path!("") view=AdminDashboard />
                        <Route path=path!(":resource") view=AdminResourcePage />
                        <Route path=path!(":resource/:id") view=AdminDetailPage />
                        <Route path=path!(":resource/:id/edit") view=AdminEditPage />
                    </ParentRoute>
                </Routes>
            </main>
            <ToastViewport />
        </Router>
    }
}

/// Keeps `document.title` in step with the current path
#[component]
fn TitleSync() -> impl IntoView {
    let location = use_location();

    Effect::new(move |_| {
        let path = location.pathname.get();
        let title = document_title(derive_title(ROUTES, &path).as_deref());
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            document.set_title(&title);
        }
    });
}

#[component]
fn SiteHeader() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let on_logout = move |_| {
        let session = ctx.session();
        spawn_local(async move { session.logout().await });
    };

    view! {
        <header class="site-header">
            <a class="brand" href="/">{SITE_NAME}</a>
            <nav class="site-nav">
                {menu(ROUTES, Layout::Public)
                    .filter(|entry| entry.path != "/")
                    .map(|entry| view! { <A href=entry.path>{entry.name}</A> })
                    .collect_view()}
            </nav>
            <div class="site-account">
                {move || {
                    let session = store.session().get();
                    let is_admin = session.is_admin();
                    match session.coder {
                        Some(coder) => {
                            view! {
                                <span class="account-name">{coder.coder_name}</span>
                                {is_admin.then(|| view! { <a href="/admin">"Admin"</a> })}
                                <button class="action-btn ghost" on:click=on_logout>"Sign out"</button>
                            }
                                .into_any()
                        }
                        None if session.is_loading => view! { <span class="account-pending"></span> }.into_any(),
                        None => {
                            view! {
                                <a href="/login">"Sign in"</a>
                                <a class="action-btn primary" href="/register">"Sign up"</a>
                            }
                                .into_any()
                        }
                    }
                }}
            </div>
        </header>
    }
}
