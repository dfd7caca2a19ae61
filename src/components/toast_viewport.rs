//! Toast Viewport Component
//!
//! Renders the notification queue; each toast has a close button.

use leptos::prelude::*;

use crate::store::{store_dismiss_toast, use_app_store, AppStateStoreFields};

#[component]
pub fn ToastViewport() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="toast-viewport" aria-live="polite">
            <For
                each=move || store.toasts().with(|q| q.items().to_vec())
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.css_class() role="status">
                            <span class="toast-message">{toast.message.clone()}</span>
                            <button
                                class="toast-close"
                                aria-label="Dismiss"
                                on:click=move |_| store_dismiss_toast(&store, id)
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
