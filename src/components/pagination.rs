//! Pagination Component
//!
//! Page buttons under a list: first, last, a window around the current page
//! and ellipses for the gaps.

use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Gap,
}

/// Buttons to show for `current` of `total`, with `radius` pages either side
pub fn page_window(current: u32, total: u32, radius: u32) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let start = current.saturating_sub(radius).max(1);
    let end = (current + radius).min(total);

    let mut items = Vec::new();
    if start > 1 {
        items.push(PageItem::Page(1));
        if start > 2 {
            items.push(PageItem::Gap);
        }
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total {
        if end + 1 < total {
            items.push(PageItem::Gap);
        }
        items.push(PageItem::Page(total));
    }
    items
}

#[component]
pub fn Pagination(
    #[prop(into)] page: Signal<u32>,
    #[prop(into)] total_pages: Signal<u32>,
    #[prop(into)] total_count: Signal<u64>,
    #[prop(into)] on_change: Callback<u32>,
) -> impl IntoView {
    let go = move |target: u32| {
        if target != page.get_untracked() && target >= 1 && target <= total_pages.get_untracked() {
            on_change.run(target);
        }
    };

    view! {
        <Show when=move || { total_pages.get() > 1 }>
            <nav class="pagination">
                <span class="pagination-total">{move || format!("{} results", total_count.get())}</span>
                <button
                    class="page-btn"
                    disabled=move || page.get() <= 1
                    on:click=move |_| go(page.get_untracked().saturating_sub(1))
                >
                    "‹"
                </button>
                {move || {
                    page_window(page.get(), total_pages.get(), 2)
                        .into_iter()
                        .map(|item| match item {
                            PageItem::Page(n) => {
                                view! {
                                    <button
                                        class=move || if page.get() == n { "page-btn active" } else { "page-btn" }
                                        on:click=move |_| go(n)
                                    >
                                        {n}
                                    </button>
                                }
                                    .into_any()
                            }
                            PageItem::Gap => view! { <span class="page-gap">"…"</span> }.into_any(),
                        })
                        .collect_view()
                }}
                <button
                    class="page-btn"
                    disabled=move || page.get() >= total_pages.get()
                    on:click=move |_| go(page.get_untracked() + 1)
                >
                    "›"
                </button>
            </nav>
        </Show>
    }
}
