//! Admin Pages
//!
//! Everything under `/admin`: the guarded layout, one list page per
//! resource built from the same generic table, and JSON-driven detail and
//! edit views.

mod columns;
mod editor;

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::{Outlet, A};
use leptos_router::hooks::{use_navigate, use_params_map};
use serde_json::Value;

use self::columns::{
    badge_columns, category_columns, coder_columns, course_columns, lesson_columns, problem_columns,
    test_case_columns,
};
use self::editor::{build_body, display_value, editable_fields, EditField, FieldKind};
use super::NotFound;
use crate::api::ResourceKind;
use crate::components::{Column, DataTable, Pagination, StickyHeader};
use crate::context::use_app_context;
use crate::models::Resource;
use crate::notify::Notifier;
use crate::query::{use_item_query, use_list_query, ActionDescriptor, ListQuery};
use crate::routes::{menu, Layout, ROUTES, SITE_NAME};
use crate::store::{use_app_store, AppStateStoreFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Pending,
    Granted,
    Denied,
}

fn resource_param() -> Memo<Option<ResourceKind>> {
    let params = use_params_map();
    Memo::new(move |_| {
        params
            .with(|p| p.get("resource"))
            .and_then(|slug| ResourceKind::from_slug(&slug))
    })
}

fn id_param() -> Memo<Option<i64>> {
    let params = use_params_map();
    Memo::new(move |_| params.with(|p| p.get("id")).and_then(|id| id.parse().ok()))
}

#[component]
pub fn AdminLayout() -> impl IntoView {
    let store = use_app_store();
    let access = Memo::new(move |_| {
        let session = store.session().get();
        if session.is_loading {
            Access::Pending
        } else if session.is_admin() {
            Access::Granted
        } else {
            Access::Denied
        }
    });

    view! {
        <div class="admin-layout">
            <aside class="admin-sidebar">
                <a class="admin-brand" href="/">{SITE_NAME}</a>
                <nav class="admin-nav">
                    {menu(ROUTES, Layout::Admin)
                        .map(|entry| view! { <A href=entry.path>{entry.name}</A> })
                        .collect_view()}
                </nav>
            </aside>
            <main class="admin-main">
                {move || match access.get() {
                    Access::Pending => view! { <p class="page-loading">"Loading…"</p> }.into_any(),
                    Access::Denied => {
                        view! {
                            <div class="access-denied">
                                <h2>"Administrators only"</h2>
                                <a href="/login">"Sign in with an admin account"</a>
                            </div>
                        }
                            .into_any()
                    }
                    Access::Granted => view! { <Outlet /> }.into_any(),
                }}
            </main>
        </div>
    }
}

#[component]
pub fn AdminDashboard() -> impl IntoView {
    view! {
        <section class="admin-dashboard">
            <h1>"Dashboard"</h1>
            <div class="dashboard-grid">
                {ResourceKind::ALL
                    .into_iter()
                    .map(|kind| {
                        view! {
                            <a class="dashboard-card" href=format!("/admin/{}", kind.slug())>
                                {kind.label()}
                            </a>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

/// Paginated, sortable table of one resource with view/edit/delete actions
#[component]
pub fn AdminListPage<T: Resource>(columns: Vec<Column<T>>) -> impl IntoView {
    let ctx = use_app_context();
    let page_size = ctx.page_size();
    let (page, set_page) = signal(1u32);
    let (sort, set_sort) = signal((T::KIND.default_sort().to_string(), false));
    let (refresh, set_refresh) = signal(0u32);

    let query = Memo::new(move |_| {
        let (field, ascending) = sort.get();
        ListQuery::new(T::KIND).page(page.get()).page_size(page_size).sort_by(field, ascending)
    });
    let list = use_list_query::<T>(query.into(), refresh.into());

    let rows = Signal::derive(move || list.data.with(|d| d.data.clone()));
    let total_pages = Signal::derive(move || list.data.with(|d| d.total_pages));
    let total_count = Signal::derive(move || list.data.with(|d| d.total_count));

    // deleting the last row of the last page
    Effect::new(move |_| {
        let total = total_pages.get();
        if total > 0 && page.get_untracked() > total {
            set_page.set(total);
        }
    });

    let on_sort = Callback::new(move |field: String| {
        set_sort.update(|(current, ascending)| {
            if *current == field {
                *ascending = !*ascending;
            } else {
                *current = field;
                *ascending = true;
            }
        });
        set_page.set(1);
    });
    let on_refresh = Callback::new(move |_: ()| set_refresh.update(|n| *n += 1));
    let on_page = Callback::new(move |target: u32| set_page.set(target));

    let actions = vec![ActionDescriptor::detail(), ActionDescriptor::edit(), ActionDescriptor::delete()];

    view! {
        <section class="admin-list">
            <StickyHeader>
                <div class="admin-list-header">
                    <h1>{T::KIND.label()}</h1>
                    <Pagination page=page total_pages=total_pages total_count=total_count on_change=on_page />
                </div>
            </StickyHeader>
            <DataTable
                rows=rows
                columns=columns
                actions=actions
                sort=sort
                on_sort=on_sort
                on_refresh=on_refresh
                is_loading=list.is_loading
            />
            <Show when=move || list.error.with(Option::is_some) && rows.with(Vec::is_empty)>
                <p class="list-error">"Could not load data."</p>
            </Show>
        </section>
    }
}

/// `/admin/:resource`
#[component]
pub fn AdminResourcePage() -> impl IntoView {
    let kind = resource_param();

    move || match kind.get() {
        Some(ResourceKind::Course) => view! { <AdminListPage columns=course_columns() /> }.into_any(),
        Some(ResourceKind::Lesson) => view! { <AdminListPage columns=lesson_columns() /> }.into_any(),
        Some(ResourceKind::Problem) => view! { <AdminListPage columns=problem_columns() /> }.into_any(),
        Some(ResourceKind::TestCase) => view! { <AdminListPage columns=test_case_columns() /> }.into_any(),
        Some(ResourceKind::Coder) => view! { <AdminListPage columns=coder_columns() /> }.into_any(),
        Some(ResourceKind::Category) => view! { <AdminListPage columns=category_columns() /> }.into_any(),
        Some(ResourceKind::Badge) => view! { <AdminListPage columns=badge_columns() /> }.into_any(),
        None => view! { <NotFound /> }.into_any(),
    }
}

/// `/admin/:resource/:id`
#[component]
pub fn AdminDetailPage() -> impl IntoView {
    let kind = resource_param();
    let id = id_param();

    move || match kind.get() {
        Some(resource) => view! { <RowDetail resource=resource id=id /> }.into_any(),
        None => view! { <NotFound /> }.into_any(),
    }
}

/// `/admin/:resource/:id/edit`
#[component]
pub fn AdminEditPage() -> impl IntoView {
    let kind = resource_param();
    let id = id_param();

    move || match kind.get() {
        Some(resource) => view! { <RowEditor resource=resource id=id /> }.into_any(),
        None => view! { <NotFound /> }.into_any(),
    }
}

#[component]
fn RowDetail(resource: ResourceKind, #[prop(into)] id: Signal<Option<i64>>) -> impl IntoView {
    let item = use_item_query::<Value>(resource, id);

    view! {
        <section class="admin-detail">
            <header class="admin-detail-header">
                <a href=format!("/admin/{}", resource.slug())>"← Back"</a>
                {move || {
                    id.get()
                        .map(|id| {
                            view! {
                                <a class="action-btn" href=format!("/admin/{}/{}/edit", resource.slug(), id)>
                                    "Edit"
                                </a>
                            }
                        })
                }}
            </header>
            {move || match item.data.get() {
                Some(Value::Object(fields)) => {
                    view! {
                        <dl class="detail-fields">
                            {fields
                                .into_iter()
                                .map(|(name, value)| view! { <dt>{name}</dt><dd>{display_value(&value)}</dd> })
                                .collect_view()}
                        </dl>
                    }
                        .into_any()
                }
                Some(other) => view! { <pre>{display_value(&other)}</pre> }.into_any(),
                None if item.is_loading.get() => view! { <p class="page-loading">"Loading…"</p> }.into_any(),
                None => view! { <NotFound /> }.into_any(),
            }}
        </section>
    }
}

fn field_input(fields: RwSignal<Vec<EditField>>, name: String, kind: FieldKind) -> impl IntoView {
    let label = name.clone();
    let lookup = name.clone();
    let value = move || {
        fields.with(|all| all.iter().find(|f| f.name == lookup).map(|f| f.value.clone()).unwrap_or_default())
    };
    let write = move |next: String| {
        fields.update(|all| {
            if let Some(field) = all.iter_mut().find(|f| f.name == name) {
                field.value = next;
            }
        })
    };
    let multiline = fields.with_untracked(|all| {
        all.iter().any(|f| f.name == label && (f.value.len() > 80 || f.value.contains('\n')))
    });

    let input = match kind {
        FieldKind::Flag => {
            view! {
                <input
                    type="checkbox"
                    prop:checked=move || value() == "true"
                    on:change=move |ev| write(event_target_checked(&ev).to_string())
                />
            }
                .into_any()
        }
        FieldKind::Number => {
            view! {
                <input
                    type="number"
                    step="any"
                    prop:value=value
                    on:input=move |ev| write(event_target_value(&ev))
                />
            }
                .into_any()
        }
        FieldKind::Text if multiline => {
            view! { <textarea rows="10" prop:value=value on:input=move |ev| write(event_target_value(&ev))></textarea> }
                .into_any()
        }
        FieldKind::Text => {
            view! { <input type="text" prop:value=value on:input=move |ev| write(event_target_value(&ev)) /> }
                .into_any()
        }
    };

    view! {
        <label class="form-field">
            <span class="form-label">{label}</span>
            {input}
        </label>
    }
}

#[component]
fn RowEditor(resource: ResourceKind, #[prop(into)] id: Signal<Option<i64>>) -> impl IntoView {
    let ctx = use_app_context();
    let navigate = StoredValue::new_local(use_navigate());
    let item = use_item_query::<Value>(resource, id);
    let fields = RwSignal::new(Vec::<EditField>::new());
    let (saving, set_saving) = signal(false);
    let (form_error, set_form_error) = signal(None::<String>);

    Effect::new(move |_| {
        if let Some(row) = item.data.get() {
            fields.set(editable_fields(&row, resource.id_field()));
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let (Some(id), Some(row)) = (id.get_untracked(), item.data.get_untracked()) else {
            return;
        };
        let body = match fields.with_untracked(|f| build_body(&row, f)) {
            Ok(body) => body,
            Err(message) => {
                set_form_error.set(Some(message));
                return;
            }
        };
        set_form_error.set(None);
        set_saving.set(true);
        let client = ctx.query();
        let notifier = ctx.notifier();

        spawn_local(async move {
            let result = client.update_item(resource, id, body).await;
            set_saving.try_set(false);
            match result {
                Ok(()) => {
                    notifier.success("Saved");
                    let path = format!("/admin/{}/{}", resource.slug(), id);
                    navigate.try_with_value(|nav| nav(&path, Default::default()));
                }
                Err(e) => {
                    log::warn!("[ADMIN] saving {:?} #{} failed: {}", resource, id, e);
                    notifier.error(&e.user_message("Save failed"));
                }
            }
        });
    };

    view! {
        <section class="admin-edit">
            <header class="admin-detail-header">
                <a href=format!("/admin/{}", resource.slug())>"← Back"</a>
            </header>
            <Show
                when=move || item.data.with(Option::is_some)
                fallback=move || {
                    if item.is_loading.get() {
                        view! { <p class="page-loading">"Loading…"</p> }.into_any()
                    } else {
                        view! { <NotFound /> }.into_any()
                    }
                }
            >
                <form class="edit-form" on:submit=on_submit>
                    <For
                        each=move || fields.with(|all| all.iter().map(|f| (f.name.clone(), f.kind)).collect::<Vec<_>>())
                        key=|(name, _)| name.clone()
                        children=move |(name, kind)| field_input(fields, name, kind)
                    />
                    {move || form_error.get().map(|message| view! { <p class="form-error">{message}</p> })}
                    <button type="submit" class="action-btn primary" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving…" } else { "Save" }}
                    </button>
                </form>
            </Show>
        </section>
    }
}
