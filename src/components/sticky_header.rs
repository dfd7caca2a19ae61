//! Sticky Header Component
//!
//! Wraps its children in a container that pins to the top of the viewport
//! once scrolled past, leaving a placeholder of the same height behind.

use leptos::prelude::*;
use leptos_sticky::use_sticky;

#[component]
pub fn StickyHeader(
    /// Distance from the viewport top at which the container pins
    #[prop(default = 0.0)]
    trigger_offset: f64,
    children: Children,
) -> impl IntoView {
    let node = NodeRef::<leptos::html::Div>::new();
    let sticky = use_sticky(node, trigger_offset);

    view! {
        {move || {
            sticky
                .placeholder_height()
                .map(|height| view! { <div class="sticky-placeholder" style=format!("height: {}px", height)></div> })
        }}
        <div
            node_ref=node
            class=move || if sticky.fixed_read.get() { "sticky-container fixed" } else { "sticky-container" }
            style=move || {
                if sticky.fixed_read.get() { format!("top: {}px", trigger_offset) } else { String::new() }
            }
        >
            {children()}
        </div>
    }
}
