//! Markdown View Component
//!
//! Renders sanitized markdown and typesets any math in it.

use leptos::prelude::*;

use crate::markdown::{render_markdown, trigger_math_render};

#[component]
pub fn MarkdownView(
    #[prop(into)] content: Signal<String>,
    /// DOM id of the container, used to scope math rendering
    #[prop(into)]
    id: String,
) -> impl IntoView {
    let selector = format!("#{}", id);
    let html = Memo::new(move |_| render_markdown(&content.get()));

    Effect::new(move |_| {
        let rendered = html.get();
        if rendered.contains('$') {
            trigger_math_render(&selector);
        }
    });

    view! { <div id=id class="markdown-body" inner_html=move || html.get()></div> }
}
