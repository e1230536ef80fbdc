//! Brokers Page
//!
//! The primary dashboard table. Brokers use a fixed column/filter setup
//! (the list endpoint does not ship configs), tri-state sorting, and the
//! toggle/dashboard row actions. Clicking a row selects the broker the
//! challenge-matrix and rebate editors operate on.

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

use crate::api;
use crate::components::filterable_table::{FilterableTable, RowActionUrls};
use crate::components::toast::use_toasts;
use crate::context::{use_app_context, Resource};
use crate::fence::Fence;
use crate::form_schema::FormConfig;
use crate::models::{Broker, Pagination, TableRow};
use crate::store::{store_select_broker, use_app_store};
use crate::table_schema::{
    is_truthy, ColumnConfig, ColumnKind, ConfigMap, FilterConfig, FilterKind, FilterOption,
};
use crate::url_state::use_url_query;

const BROKERS_FILTER_KEY: &str = "brokers-table-filters";

#[component]
pub fn BrokersPage() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let store = use_app_store();
    let url = use_url_query();

    let data = RwSignal::new(Vec::<TableRow>::new());
    let pagination = RwSignal::new(None::<Pagination>);
    let form_config = RwSignal::new(None::<FormConfig>);
    let columns = RwSignal::new(broker_columns());
    let filters = RwSignal::new(broker_filters());

    let fetch_fence = Fence::new();
    Effect::new(move |_| {
        let query = url.get();
        let _ = ctx.version(Resource::Brokers);
        let ticket = fetch_fence.issue();
        let fence = fetch_fence.clone();
        web_sys::console::log_1(&format!("[Brokers] Loading list, query={}", query).into());
        spawn_local(async move {
            let envelope = api::brokers::list(&query).await;
            if !fence.admits(ticket) {
                return;
            }
            ctx.note_response(&envelope);
            if !envelope.success {
                toasts.error(envelope.error_message());
                return;
            }
            match envelope.data_as::<Vec<TableRow>>() {
                Ok(rows) => {
                    web_sys::console::log_1(&format!("[Brokers] Loaded {} rows", rows.len()).into());
                    data.set(rows);
                }
                Err(e) => toasts.error(format!("Could not decode broker list: {}", e)),
            }
            pagination.set(envelope.pagination);
            if envelope.form_config.is_some() {
                form_config.set(envelope.form_config);
            }
        });
    });

    let on_row_click = Callback::new(move |row: TableRow| {
        if let Some(broker) = broker_from_row(&row) {
            store_select_broker(&store, Some(broker));
        }
    });

    let actions = RowActionUrls {
        get_item_url: Some("/brokers".to_string()),
        update_item_url: Some("/brokers".to_string()),
        delete_url: None,
        toggle_active_url: Some("/brokers/toggle-active-status".to_string()),
        dashboard_url: Some("/dashboard/#broker_id#/overview".to_string()),
    };

    view! {
        <div class="page brokers-page">
            <h2>"Brokers"</h2>
            <FilterableTable
                data=data
                pagination=pagination
                columns_config=columns
                filters_config=filters
                form_config=form_config
                storage_key=BROKERS_FILTER_KEY
                resource=Resource::Brokers
                actions=actions
                tri_state_sort=true
                on_row_click=on_row_click
            />
        </div>
    }
}

/// Broker summary out of a raw row, tolerating loose server booleans
fn broker_from_row(row: &TableRow) -> Option<Broker> {
    let id = row.get("id").and_then(Value::as_i64)?;
    Some(Broker {
        id,
        name: row
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        slug: row
            .get("slug")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        active: row.get("active").map(is_truthy).unwrap_or(false),
    })
}

fn broker_columns() -> ConfigMap<ColumnConfig> {
    let col = |label: &str, kind, visible, sortable, filterable| ColumnConfig {
        label: label.to_string(),
        kind,
        visible,
        sortable,
        filterable,
    };
    ConfigMap(vec![
        ("name".to_string(), col("Name", ColumnKind::Text, true, true, true)),
        ("slug".to_string(), col("Slug", ColumnKind::Text, true, true, false)),
        ("logo".to_string(), col("Logo", ColumnKind::Image, true, false, false)),
        ("active".to_string(), col("Active", ColumnKind::Boolean, true, true, true)),
        ("settings".to_string(), col("Settings", ColumnKind::Json, false, false, false)),
        ("created_at".to_string(), col("Created", ColumnKind::Text, true, true, false)),
    ])
}

fn broker_filters() -> ConfigMap<FilterConfig> {
    ConfigMap(vec![
        (
            "name".to_string(),
            FilterConfig {
                kind: FilterKind::Text,
                label: "Name".to_string(),
                tooltip: Some("Matches anywhere in the broker name".to_string()),
                options: None,
                placeholder: Some("Search brokers...".to_string()),
            },
        ),
        (
            "active".to_string(),
            FilterConfig {
                kind: FilterKind::Select,
                label: "Active".to_string(),
                tooltip: None,
                options: Some(vec![
                    FilterOption { value: "1".to_string(), label: "Yes".to_string() },
                    FilterOption { value: "0".to_string(), label: "No".to_string() },
                ]),
                placeholder: None,
            },
        ),
    ])
}
