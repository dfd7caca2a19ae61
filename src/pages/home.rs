use leptos::prelude::*;

use crate::routes::SITE_NAME;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn Home() -> impl IntoView {
    let store = use_app_store();
    let session = move || store.session().get();

    view! {
        <section class="home-hero">
            <h1>{SITE_NAME}</h1>
            <p class="home-tagline">"Learn to code, then prove it against the judge."</p>
            {move || {
                session()
                    .coder
                    .map(|coder| view! { <p class="home-greeting">{format!("Welcome back, {}!", coder.coder_name)}</p> })
            }}
            <div class="home-links">
                <a class="action-btn primary" href="/courses">"Browse courses"</a>
                <a class="action-btn" href="/problems">"Practice problems"</a>
                <Show when=move || session().is_admin()>
                    <a class="action-btn ghost" href="/admin">"Admin"</a>
                </Show>
            </div>
        </section>
    }
}
