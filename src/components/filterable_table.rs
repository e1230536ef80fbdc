//! Filterable Table
//!
//! The schema-driven grid: renders any server-defined entity list from its
//! column/filter configs without per-entity code. Sort/filter/page state
//! lives in the URL query string; last-applied filters are remembered in
//! localStorage and rehydrated once on mount.

use std::collections::HashMap;

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

use crate::api::resources;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::filter_bar::FilterBar;
use crate::components::modal::Modal;
use crate::components::pagination_bar::PaginationBar;
use crate::components::toast::use_toasts;
use crate::components::xform::XForm;
use crate::context::{use_app_context, Resource};
use crate::form_schema::FormConfig;
use crate::models::{row_id, Pagination, RowId, TableRow};
use crate::table_schema::{self, ColumnConfig, ColumnKind, ConfigMap, FilterConfig};
use crate::url_state::{self, use_url_query};
use crate::view_state::{page_bounds, SortDirection, ViewState};

/// URL templates; each one present enables the matching row action
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowActionUrls {
    pub get_item_url: Option<String>,
    pub update_item_url: Option<String>,
    pub delete_url: Option<String>,
    pub toggle_active_url: Option<String>,
    /// Client-side redirect target with a `#...#` row-id placeholder
    pub dashboard_url: Option<String>,
}

#[component]
pub fn FilterableTable(
    #[prop(into)] data: Signal<Vec<TableRow>>,
    #[prop(into)] pagination: Signal<Option<Pagination>>,
    #[prop(into)] columns_config: Signal<ConfigMap<ColumnConfig>>,
    #[prop(into)] filters_config: Signal<ConfigMap<FilterConfig>>,
    #[prop(optional, into)] form_config: Signal<Option<FormConfig>>,
    storage_key: &'static str,
    resource: Resource,
    #[prop(optional)] actions: RowActionUrls,
    #[prop(optional)] tri_state_sort: bool,
    #[prop(optional, into)] on_row_click: Option<Callback<TableRow>>,
) -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let url = use_url_query();

    // Rehydrate remembered filters into an URL that lacks them; runs once
    // and pushes at most one rewritten URL
    {
        let mut state = ViewState::from_query_str(&url.get_untracked());
        let stored = url_state::load_filters(storage_key);
        if state.adopt_stored_filters(&stored) {
            url.push(&state.to_query_string());
        }
    }

    let view_state = Memo::new(move |_| ViewState::from_query_str(&url.get()));

    let panel_open = RwSignal::new(url_state::load_panel_open(storage_key));
    Effect::new(move |_| {
        url_state::store_panel_open(storage_key, panel_open.get());
    });

    // User visibility toggles layered over the config defaults
    let visibility_overrides: RwSignal<HashMap<String, bool>> = RwSignal::new(HashMap::new());
    let visible_columns = Memo::new(move |_| {
        let overrides = visibility_overrides.get();
        columns_config
            .get()
            .0
            .into_iter()
            .filter(|(key, col)| *overrides.get(key).unwrap_or(&col.visible))
            .collect::<Vec<_>>()
    });

    let column_menu_open = RwSignal::new(false);

    // ========================
    // URL-backed state changes
    // ========================

    let on_sort = Callback::new(move |column: String| {
        let mut state = ViewState::from_query_str(&url.get_untracked());
        state.toggle_sort(&column, tri_state_sort);
        url.push(&state.to_query_string());
    });

    let on_filter_change = Callback::new(move |(key, value): (String, String)| {
        let mut state = ViewState::from_query_str(&url.get_untracked());
        state.set_filter(&key, &value);
        url_state::store_filters(storage_key, &state.filters);
        url.push(&state.to_query_string());
    });

    let on_page = Callback::new(move |page: u32| {
        let mut state = ViewState::from_query_str(&url.get_untracked());
        state.set_page(page);
        url.push(&state.to_query_string());
    });

    let on_per_page = Callback::new(move |per_page: u32| {
        let mut state = ViewState::from_query_str(&url.get_untracked());
        state.set_per_page(per_page);
        url.push(&state.to_query_string());
    });

    // ========================
    // Row actions
    // ========================

    let editing: RwSignal<Option<RowId>> = RwSignal::new(None);
    let creating = RwSignal::new(false);
    let deleting: RwSignal<Option<RowId>> = RwSignal::new(None);

    let has_toggle = actions.toggle_active_url.is_some();
    let has_delete = actions.delete_url.is_some();
    let has_dashboard = actions.dashboard_url.is_some();
    let has_edit = actions.update_item_url.is_some();

    let toggle_url = actions.toggle_active_url.clone();
    let on_toggle = Callback::new(move |id: RowId| {
        let Some(toggle_url) = toggle_url.clone() else { return };
        ctx.set_busy(true);
        spawn_local(async move {
            let envelope = resources::toggle_active(&toggle_url, &id).await;
            ctx.set_busy(false);
            ctx.note_response(&envelope);
            if envelope.success {
                toasts.success(
                    envelope
                        .message
                        .clone()
                        .unwrap_or_else(|| "Status updated".to_string()),
                );
                ctx.invalidate(resource);
            } else {
                toasts.error(envelope.error_message());
            }
        });
    });

    let delete_url = actions.delete_url.clone();
    let on_delete_confirmed = Callback::new(move |id: RowId| {
        deleting.set(None);
        let Some(delete_url) = delete_url.clone() else { return };
        spawn_local(async move {
            let envelope = resources::delete_item(&delete_url, &id).await;
            ctx.note_response(&envelope);
            if envelope.success {
                toasts.success(
                    envelope
                        .message
                        .clone()
                        .unwrap_or_else(|| "Deleted".to_string()),
                );
                ctx.invalidate(resource);
            } else {
                toasts.error(envelope.error_message());
            }
        });
    });

    let dashboard_url = actions.dashboard_url.clone();
    let on_dashboard = Callback::new(move |id: RowId| {
        if let Some(template) = &dashboard_url {
            url_state::navigate_to(&table_schema::substitute_row_id(template, &id));
        }
    });

    let modal_actions = actions.clone();

    view! {
        <div class="filterable-table">
            <div class="table-toolbar">
                <FilterBar
                    filters_config=filters_config
                    current=Signal::derive(move || view_state.get().filters)
                    open=panel_open
                    on_change=on_filter_change
                />

                <div class="toolbar-right">
                    {move || (has_edit && form_config.get().is_some()).then(|| view! {
                        <button class="new-btn" on:click=move |_| creating.set(true)>
                            "+ New"
                        </button>
                    })}

                    <div class="column-menu">
                        <button
                            class="column-menu-btn"
                            on:click=move |_| column_menu_open.update(|o| *o = !*o)
                        >
                            "Columns"
                        </button>
                        <Show when=move || column_menu_open.get()>
                            <div class="column-menu-list">
                                <For
                                    each=move || columns_config.get().0
                                    key=|(key, _)| key.clone()
                                    children=move |(key, col)| {
                                        let check_key = key.clone();
                                        let is_on = move || {
                                            *visibility_overrides
                                                .get()
                                                .get(&check_key)
                                                .unwrap_or(&col.visible)
                                        };
                                        let toggle_key = key.clone();
                                        let default_visible = col.visible;
                                        view! {
                                            <label class="column-menu-item">
                                                <input
                                                    type="checkbox"
                                                    prop:checked=is_on
                                                    on:change=move |_| {
                                                        visibility_overrides.update(|overrides| {
                                                            let current = *overrides
                                                                .get(&toggle_key)
                                                                .unwrap_or(&default_visible);
                                                            overrides.insert(toggle_key.clone(), !current);
                                                        });
                                                    }
                                                />
                                                {col.label.clone()}
                                            </label>
                                        }
                                    }
                                />
                            </div>
                        </Show>
                    </div>
                </div>
            </div>

            <table class="data-table">
                <thead>
                    <tr>
                        <th class="row-number-col">"#"</th>
                        <For
                            each=move || visible_columns.get()
                            key=|(key, _)| key.clone()
                            children=move |(key, col)| {
                                let sort_key = key.clone();
                                let indicator_key = key.clone();
                                let indicator = move || {
                                    let state = view_state.get();
                                    if state.order_by.as_deref() == Some(indicator_key.as_str()) {
                                        match state.order_direction {
                                            Some(SortDirection::Asc) => " ▲",
                                            Some(SortDirection::Desc) => " ▼",
                                            None => "",
                                        }
                                    } else {
                                        ""
                                    }
                                };
                                let sortable = col.sortable;
                                let th_class = if sortable { "sortable" } else { "" };
                                view! {
                                    <th
                                        class=th_class
                                        on:click=move |_| {
                                            if sortable {
                                                on_sort.run(sort_key.clone());
                                            }
                                        }
                                    >
                                        {col.label.clone()}
                                        {indicator}
                                    </th>
                                }
                            }
                        />
                        <th class="actions-col">"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || {
                            let rows: Vec<_> = data.get().into_iter().enumerate().collect();
                            rows
                        }
                        key=|(idx, row)| {
                            row_id(row)
                                .map(|id| id.to_string())
                                .unwrap_or_else(|| format!("row-{}", idx))
                        }
                        children=move |(idx, row)| {
                            let id = row_id(&row);
                            let click_row = row.clone();
                            let row_number = move || {
                                let first = pagination
                                    .get()
                                    .map(|p| page_bounds(p.current_page, p.per_page, p.total).0)
                                    .unwrap_or(1);
                                first + idx as u64
                            };
                            let cells_row = row.clone();
                            let toggle_id = id.clone();
                            let edit_id = id.clone();
                            let delete_id = id.clone();
                            let dash_id = id.clone();

                            view! {
                                <tr
                                    class="data-row"
                                    on:click=move |_| {
                                        if let Some(cb) = on_row_click {
                                            cb.run(click_row.clone());
                                        }
                                    }
                                >
                                    <td class="row-number-col">{row_number}</td>
                                    {move || {
                                        visible_columns
                                            .get()
                                            .into_iter()
                                            .map(|(key, col)| {
                                                let value = cells_row
                                                    .get(&key)
                                                    .cloned()
                                                    .unwrap_or(Value::Null);
                                                view! { <td>{render_cell(col.kind, &value)}</td> }
                                            })
                                            .collect_view()
                                    }}
                                    <td class="actions-col">
                                        {(has_toggle && toggle_id.is_some()).then(|| {
                                            let id = toggle_id.clone().unwrap();
                                            view! {
                                                <button
                                                    class="action-btn"
                                                    on:click=move |ev| {
                                                        ev.stop_propagation();
                                                        on_toggle.run(id.clone());
                                                    }
                                                >
                                                    "Toggle"
                                                </button>
                                            }
                                        })}
                                        {(has_edit && edit_id.is_some()).then(|| {
                                            let id = edit_id.clone().unwrap();
                                            view! {
                                                <button
                                                    class="action-btn"
                                                    on:click=move |ev| {
                                                        ev.stop_propagation();
                                                        editing.set(Some(id.clone()));
                                                    }
                                                >
                                                    "Edit"
                                                </button>
                                            }
                                        })}
                                        {(has_delete && delete_id.is_some()).then(|| {
                                            let id = delete_id.clone().unwrap();
                                            view! {
                                                <button
                                                    class="action-btn danger"
                                                    on:click=move |ev| {
                                                        ev.stop_propagation();
                                                        deleting.set(Some(id.clone()));
                                                    }
                                                >
                                                    "Delete"
                                                </button>
                                            }
                                        })}
                                        {(has_dashboard && dash_id.is_some()).then(|| {
                                            let id = dash_id.clone().unwrap();
                                            view! {
                                                <button
                                                    class="action-btn"
                                                    on:click=move |ev| {
                                                        ev.stop_propagation();
                                                        on_dashboard.run(id.clone());
                                                    }
                                                >
                                                    "Dashboard"
                                                </button>
                                            }
                                        })}
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <PaginationBar pagination=pagination on_page=on_page on_per_page=on_per_page/>

            // Edit / create modal hosting the schema-driven form
            {
                let actions = modal_actions.clone();
                move || {
                    let config = form_config.get()?;
                    let update_url = actions.update_item_url.clone()?;
                    let create_url = update_url.clone();
                    // Record fetch falls back to the resource base URL when
                    // no dedicated get-item template is configured
                    let item_url = actions
                        .get_item_url
                        .clone()
                        .unwrap_or_else(|| update_url.clone());
                    if let Some(id) = editing.get() {
                        Some(view! {
                            <Modal title="Edit" on_close=move |_| editing.set(None)>
                                <XForm
                                    config=config
                                    resource=resource
                                    create_url=create_url
                                    update_url=update_url
                                    get_item_url=item_url
                                    record_id=id
                                    on_done=move |_| editing.set(None)
                                />
                            </Modal>
                        }.into_any())
                    } else if creating.get() {
                        Some(view! {
                            <Modal title="New" on_close=move |_| creating.set(false)>
                                <XForm
                                    config=config
                                    resource=resource
                                    create_url=create_url
                                    update_url=update_url
                                    on_done=move |_| creating.set(false)
                                />
                            </Modal>
                        }.into_any())
                    } else {
                        None
                    }
                }
            }

            {move || {
                deleting.get().map(|id| {
                    let confirm_id = id.clone();
                    view! {
                        <ConfirmDialog
                            message=format!("Delete record {}? This cannot be undone.", id)
                            on_confirm=move |_| on_delete_confirmed.run(confirm_id.clone())
                            on_cancel=move |_| deleting.set(None)
                        />
                    }
                })
            }}
        </div>
    }
}

/// Cell body per column kind: boolean pill, guarded image, stringified
/// JSON, raw text otherwise
fn render_cell(kind: ColumnKind, value: &Value) -> AnyView {
    match kind {
        ColumnKind::Boolean => {
            if table_schema::is_truthy(value) {
                view! { <span class="pill pill-yes">"Yes"</span> }.into_any()
            } else {
                view! { <span class="pill pill-no">"No"</span> }.into_any()
            }
        }
        ColumnKind::Image => {
            if table_schema::is_absolute_http_url(value) {
                let src = value.as_str().unwrap_or_default().to_string();
                view! { <img class="cell-image" src=src/> }.into_any()
            } else {
                view! { <span class="image-placeholder">"—"</span> }.into_any()
            }
        }
        _ => view! { <span>{table_schema::format_cell(kind, value)}</span> }.into_any(),
    }
}
