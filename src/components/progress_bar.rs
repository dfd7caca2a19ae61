//! Progress Bar Component
//!
//! Thin bar across the top of the page while backend requests are in flight.

use leptos::prelude::*;

use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn ProgressBar() -> impl IntoView {
    let store = use_app_store();
    let active = move || store.requests_in_flight().get() > 0;

    view! {
        <div
            class=move || if active() { "progress-bar active" } else { "progress-bar" }
            role="progressbar"
            aria-hidden=move || (!active()).to_string()
        >
            <div class="progress-bar-fill"></div>
        </div>
    }
}
