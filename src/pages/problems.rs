//! Problem Pages

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use super::NotFound;
use crate::api::ResourceKind;
use crate::components::{MarkdownView, Pagination};
use crate::context::use_app_context;
use crate::models::Problem;
use crate::query::{use_item_query, use_list_query, ListQuery};

fn limits(problem: &Problem) -> String {
    let time = problem.time_limit.map(|t| format!("{} s", t));
    let memory = problem.memory_limit.map(|m| format!("{} MB", m));
    match (time, memory) {
        (Some(t), Some(m)) => format!("{} · {}", t, m),
        (Some(one), None) | (None, Some(one)) => one,
        (None, None) => String::new(),
    }
}

#[component]
pub fn ProblemList() -> impl IntoView {
    let ctx = use_app_context();
    let page_size = ctx.page_size();
    let (page, set_page) = signal(1u32);

    let query = Memo::new(move |_| {
        ListQuery::new(ResourceKind::Problem)
            .page(page.get())
            .page_size(page_size)
            .sort_by("problemID", true)
            .filter("status", "true")
    });
    let list = use_list_query::<Problem>(query.into(), Signal::stored(0));

    view! {
        <section class="problem-list">
            <h1>"Problems"</h1>
            <ul class="problem-rows">
                <For
                    each=move || list.data.with(|d| d.data.clone())
                    key=|p: &Problem| p.problem_id
                    children=|problem: Problem| {
                        let meta = limits(&problem);
                        view! {
                            <li class="problem-row">
                                <a href=format!("/problems/{}", problem.problem_id)>
                                    {problem.problem_code.clone().map(|code| view! { <span class="problem-code">{code}</span> })}
                                    <span class="problem-name">{problem.problem_name.clone()}</span>
                                </a>
                                <span class="problem-limits">{meta}</span>
                            </li>
                        }
                    }
                />
            </ul>
            <Show when=move || !list.is_loading.get() && list.data.with(|d| d.data.is_empty())>
                <p class="empty-state">"No problems published yet."</p>
            </Show>
            <Pagination
                page=page
                total_pages=Signal::derive(move || list.data.with(|d| d.total_pages))
                total_count=Signal::derive(move || list.data.with(|d| d.total_count))
                on_change=Callback::new(move |target: u32| set_page.set(target))
            />
        </section>
    }
}

/// `/problems/:id`
#[component]
pub fn ProblemDetail() -> impl IntoView {
    let params = use_params_map();
    let id = Memo::new(move |_| params.with(|p| p.get("id")).and_then(|id| id.parse::<i64>().ok()));
    let problem = use_item_query::<Problem>(ResourceKind::Problem, id.into());
    let statement = Signal::derive(move || {
        problem.data.with(|p| p.as_ref().and_then(|p| p.problem_content.clone()).unwrap_or_default())
    });

    view! {
        <article class="problem">
            <a class="back-link" href="/problems">"← Problems"</a>
            {move || match problem.data.get() {
                Some(p) => {
                    view! {
                        <header class="problem-header">
                            <h1>{p.problem_name.clone()}</h1>
                            <span class="problem-limits">{limits(&p)}</span>
                        </header>
                    }
                        .into_any()
                }
                None if problem.is_loading.get() => view! { <p class="page-loading">"Loading…"</p> }.into_any(),
                None => view! { <NotFound /> }.into_any(),
            }}
            <MarkdownView id="problem-statement" content=statement />
        </article>
    }
}
