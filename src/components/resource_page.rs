//! Resource Page
//!
//! Generic page for schema-driven resources: the list endpoint supplies
//! the column, filter and form configs, so one component serves broker
//! options, accounts, companies, promotions and contests.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::resources;
use crate::components::filterable_table::{FilterableTable, RowActionUrls};
use crate::components::toast::use_toasts;
use crate::context::{use_app_context, Resource};
use crate::fence::Fence;
use crate::form_schema::FormConfig;
use crate::models::{Pagination, TableRow};
use crate::table_schema::{ColumnConfig, ConfigMap, FilterConfig};
use crate::url_state::use_url_query;

/// Everything that distinguishes one schema-driven resource from another
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceDef {
    pub title: &'static str,
    pub storage_key: &'static str,
    pub resource: Resource,
    pub list_url: &'static str,
    pub actions: RowActionUrls,
}

fn crud_actions(base: &str) -> RowActionUrls {
    RowActionUrls {
        get_item_url: Some(base.to_string()),
        update_item_url: Some(base.to_string()),
        delete_url: Some(base.to_string()),
        toggle_active_url: Some(format!("{}/toggle-active-status", base)),
        dashboard_url: None,
    }
}

pub fn broker_options_def() -> ResourceDef {
    ResourceDef {
        title: "Broker options",
        storage_key: "broker-options-filters",
        resource: Resource::BrokerOptions,
        list_url: "/broker-options/get-list",
        actions: RowActionUrls {
            get_item_url: Some("/broker-options".to_string()),
            update_item_url: Some("/broker-options".to_string()),
            delete_url: Some("/broker-options".to_string()),
            toggle_active_url: None,
            dashboard_url: None,
        },
    }
}

pub fn accounts_def() -> ResourceDef {
    ResourceDef {
        title: "Accounts",
        storage_key: "accounts-filters",
        resource: Resource::Accounts,
        list_url: "/accounts/get-list",
        actions: crud_actions("/accounts"),
    }
}

pub fn companies_def() -> ResourceDef {
    ResourceDef {
        title: "Companies",
        storage_key: "companies-filters",
        resource: Resource::Companies,
        list_url: "/companies/get-list",
        actions: crud_actions("/companies"),
    }
}

pub fn promotions_def() -> ResourceDef {
    ResourceDef {
        title: "Promotions",
        storage_key: "promotions-filters",
        resource: Resource::Promotions,
        list_url: "/promotions/get-list",
        actions: crud_actions("/promotions"),
    }
}

pub fn contests_def() -> ResourceDef {
    ResourceDef {
        title: "Contests",
        storage_key: "contests-filters",
        resource: Resource::Contests,
        list_url: "/contests/get-list",
        actions: crud_actions("/contests"),
    }
}

#[component]
pub fn ResourcePage(def: ResourceDef) -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let url = use_url_query();

    let data = RwSignal::new(Vec::<TableRow>::new());
    let pagination = RwSignal::new(None::<Pagination>);
    let columns = RwSignal::new(ConfigMap::<ColumnConfig>::default());
    let filters = RwSignal::new(ConfigMap::<FilterConfig>::default());
    let form_config = RwSignal::new(None::<FormConfig>);

    let list_url = def.list_url;
    let resource = def.resource;

    let fetch_fence = Fence::new();
    Effect::new(move |_| {
        let query = url.get();
        let _ = ctx.version(resource);
        let ticket = fetch_fence.issue();
        let fence = fetch_fence.clone();
        spawn_local(async move {
            let envelope = resources::list(list_url, &query).await;
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
                    web_sys::console::log_1(
                        &format!("[Resource] Loaded {} rows from {}", rows.len(), list_url).into(),
                    );
                    data.set(rows);
                }
                Err(e) => toasts.error(format!("Could not decode list: {}", e)),
            }
            pagination.set(envelope.pagination);
            if let Some(config) = envelope.table_columns_config {
                columns.set(config);
            }
            if let Some(config) = envelope.filters_config {
                filters.set(config);
            }
            if envelope.form_config.is_some() {
                form_config.set(envelope.form_config);
            }
        });
    });

    view! {
        <div class="page resource-page">
            <h2>{def.title}</h2>
            <FilterableTable
                data=data
                pagination=pagination
                columns_config=columns
                filters_config=filters
                form_config=form_config
                storage_key=def.storage_key
                resource=def.resource
                actions=def.actions.clone()
                tri_state_sort=false
            />
        </div>
    }
}
