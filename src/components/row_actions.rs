//! Row Actions Component
//!
//! Buttons for a table row's actions. Actions that need confirmation go
//! through [`ConfirmButton`](super::ConfirmButton) first.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use super::ConfirmButton;
use crate::context::use_app_context;
use crate::models::Resource;
use crate::query::{execute_action, ActionDescriptor, ActionKind, ActionOutcome, ConfirmPolicy};

fn button_class(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::Delete => "action-btn danger",
        ActionKind::Detail => "action-btn ghost",
        ActionKind::Edit | ActionKind::Custom => "action-btn",
    }
}

#[component]
pub fn RowActions<T: Resource>(
    row: T,
    actions: Vec<ActionDescriptor<T>>,
    /// Runs after a successful request so the list refetches
    on_refresh: Callback<()>,
) -> impl IntoView {
    let ctx = use_app_context();
    let navigate = StoredValue::new_local(use_navigate());
    let row = StoredValue::new(row);
    let (busy, set_busy) = signal(false);

    let run = move |action: ActionDescriptor<T>, confirmed: bool| {
        let client = ctx.query();
        let notifier = ctx.notifier();
        let row = row.get_value();
        set_busy.set(true);
        spawn_local(async move {
            let outcome = execute_action(&client, &notifier, &action, &row, confirmed).await;
            set_busy.try_set(false);
            match outcome {
                ActionOutcome::Navigate(path) => {
                    navigate.try_with_value(|nav| nav(&path, Default::default()));
                }
                ActionOutcome::Completed => on_refresh.run(()),
                ActionOutcome::NeedsConfirmation | ActionOutcome::Failed(_) => {}
            }
        });
    };

    view! {
        <div class="row-actions">
            {actions
                .into_iter()
                .map(|action| {
                    let class = button_class(action.kind);
                    let label = action.label.clone();
                    let prompt = format!("{}?", action.label);
                    match action.confirm {
                        ConfirmPolicy::Required => {
                            view! {
                                <ConfirmButton
                                    button_class=class
                                    label=label
                                    prompt=prompt
                                    disabled=busy
                                    on_confirm=Callback::new(move |_: ()| run(action.clone(), true))
                                />
                            }
                                .into_any()
                        }
                        ConfirmPolicy::Immediate => {
                            view! {
                                <button
                                    class=class
                                    disabled=move || busy.get()
                                    on:click=move |ev| {
                                        ev.stop_propagation();
                                        run(action.clone(), false);
                                    }
                                >
                                    {label}
                                </button>
                            }
                                .into_any()
                        }
                    }
                })
                .collect_view()}
        </div>
    }
}
