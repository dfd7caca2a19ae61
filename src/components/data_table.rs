//! Data Table Component
//!
//! Generic admin table: column definitions per resource, sortable headers,
//! a status toggle column and per-row actions.

use std::sync::Arc;

use leptos::prelude::*;

use super::{RowActions, StatusToggle};
use crate::models::Resource;
use crate::query::ActionDescriptor;

type Render<T> = Arc<dyn Fn(&T) -> AnyView + Send + Sync>;

/// One table column
pub struct Column<T> {
    pub header: &'static str,
    /// Backend field to sort by when the header is clicked
    pub sort_field: Option<&'static str>,
    pub render: Render<T>,
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            header: self.header,
            sort_field: self.sort_field,
            render: self.render.clone(),
        }
    }
}

impl<T: Resource> Column<T> {
    pub fn text(header: &'static str, value: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self {
            header,
            sort_field: None,
            render: Arc::new(move |row: &T| value(row).into_any()),
        }
    }

    pub fn custom(header: &'static str, render: impl Fn(&T) -> AnyView + Send + Sync + 'static) -> Self {
        Self {
            header,
            sort_field: None,
            render: Arc::new(render),
        }
    }

    /// Inline toggle bound to the resource's status field
    pub fn status(header: &'static str) -> Self {
        Self {
            header,
            sort_field: T::KIND.status_field(),
            render: Arc::new(|row: &T| match row.status() {
                Some(value) => view! {
                    <StatusToggle resource=T::KIND id=row.id() value=Signal::stored(value) />
                }
                .into_any(),
                None => "—".into_any(),
            }),
        }
    }

    pub fn sortable(mut self, field: &'static str) -> Self {
        self.sort_field = Some(field);
        self
    }
}

fn sort_indicator(active: bool, ascending: bool) -> &'static str {
    match (active, ascending) {
        (false, _) => "",
        (true, true) => " ▲",
        (true, false) => " ▼",
    }
}

#[component]
pub fn DataTable<T: Resource>(
    #[prop(into)] rows: Signal<Vec<T>>,
    columns: Vec<Column<T>>,
    #[prop(optional)] actions: Vec<ActionDescriptor<T>>,
    /// Current `(sort_field, ascending)`
    #[prop(into)]
    sort: Signal<(String, bool)>,
    #[prop(into)] on_sort: Callback<String>,
    #[prop(into)] on_refresh: Callback<()>,
    #[prop(into)] is_loading: Signal<bool>,
) -> impl IntoView {
    let has_actions = !actions.is_empty();
    let columns = StoredValue::new(columns);
    let actions = StoredValue::new(actions);
    let column_count = columns.with_value(|c| c.len()) + usize::from(has_actions);

    let headers = columns.with_value(|cols| {
        cols.iter()
            .map(|col| {
                let header = col.header;
                match col.sort_field {
                    Some(field) => view! {
                        <th
                            class="sortable"
                            on:click=move |_| on_sort.run(field.to_string())
                        >
                            {header}
                            {move || {
                                let (current, ascending) = sort.get();
                                sort_indicator(current == field, ascending)
                            }}
                        </th>
                    }
                    .into_any(),
                    None => view! { <th>{header}</th> }.into_any(),
                }
            })
            .collect_view()
    });

    view! {
        <div class=move || if is_loading.get() { "data-table-wrapper loading" } else { "data-table-wrapper" }>
            <table class="data-table">
                <thead>
                    <tr>
                        {headers}
                        <Show when=move || has_actions>
                            <th class="actions-col">"Actions"</th>
                        </Show>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || rows.get()
                        key=|row: &T| (row.id(), serde_json::to_string(row).unwrap_or_default())
                        children=move |row: T| {
                            let cells = columns.with_value(|cols| {
                                cols.iter()
                                    .map(|col| view! { <td>{(col.render)(&row)}</td> })
                                    .collect_view()
                            });
                            let row_actions = has_actions.then(|| {
                                view! {
                                    <td class="actions-col">
                                        <RowActions row=row.clone() actions=actions.get_value() on_refresh=on_refresh />
                                    </td>
                                }
                            });
                            view! { <tr>{cells}{row_actions}</tr> }
                        }
                    />
                    <Show when=move || !is_loading.get() && rows.with(|r| r.is_empty())>
                        <tr class="empty-row">
                            <td colspan=column_count.to_string()>"No data"</td>
                        </tr>
                    </Show>
                </tbody>
            </table>
        </div>
    }
}
