//! Status Toggle Component
//!
//! Inline on/off switch for a row's status column. Flips immediately,
//! reconciles with the server, rolls back on failure.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ResourceKind;
use crate::context::use_app_context;
use crate::notify::Notifier;
use crate::query::OptimisticToggle;

#[component]
pub fn StatusToggle(
    resource: ResourceKind,
    id: i64,
    /// Value from the last list fetch
    #[prop(into)]
    value: Signal<bool>,
    #[prop(into, default = "Active".to_string())] on_label: String,
    #[prop(into, default = "Inactive".to_string())] off_label: String,
) -> impl IntoView {
    let ctx = use_app_context();
    let toggle = RwSignal::new(OptimisticToggle::new(value.get_untracked()));

    // refetched rows carry the server's value
    Effect::new(move |_| {
        let server = value.get();
        toggle.update(|t| t.reset(server));
    });

    let on_click = move |_| {
        let Some(pending) = toggle.try_update(|t| t.begin()) else {
            return;
        };
        let client = ctx.query();
        let notifier = ctx.notifier();

        spawn_local(async move {
            let result = client.update_status(resource, id, pending.value).await;
            toggle.try_update(|t| t.settle(pending, result.is_ok()));
            match result {
                Ok(()) => {
                    notifier.success("Status updated");
                    client.invalidate(resource);
                }
                Err(e) => {
                    log::warn!("[TOGGLE] {:?} #{} -> {} failed: {}", resource, id, pending.value, e);
                    notifier.error(&e.user_message("Could not update status"));
                }
            }
        });
    };

    view! {
        <button
            class=move || {
                let t = toggle.get();
                match (t.displayed(), t.is_pending()) {
                    (true, false) => "status-toggle on",
                    (true, true) => "status-toggle on pending",
                    (false, false) => "status-toggle off",
                    (false, true) => "status-toggle off pending",
                }
            }
            role="switch"
            aria-checked=move || toggle.get().displayed().to_string()
            on:click=on_click
        >
            <span class="status-knob"></span>
            <span class="status-label">
                {move || if toggle.get().displayed() { on_label.clone() } else { off_label.clone() }}
            </span>
        </button>
    }
}
