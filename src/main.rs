//! Broker Admin Frontend Entry Point

mod api;
mod app;
mod components;
mod context;
mod fence;
mod form_schema;
mod models;
mod reorder;
mod store;
mod table_schema;
mod url_state;
mod view_state;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    api::configure(bootstrap_config());
    mount_to_body(App);
}

/// Connection settings injected by the hosting page as meta tags. Token
/// acquisition itself happens server-side.
fn bootstrap_config() -> api::ApiConfig {
    let document = web_sys::window().and_then(|w| w.document());
    let meta = |name: &str| {
        document
            .as_ref()
            .and_then(|d| d.query_selector(&format!("meta[name=\"{}\"]", name)).ok())
            .flatten()
            .and_then(|el| el.get_attribute("content"))
            .filter(|v| !v.is_empty())
    };

    let mut config = api::ApiConfig::default();
    if let Some(base) = meta("admin-api-base") {
        config.base_url = base;
    }
    config.bearer_token = meta("admin-api-token");
    config
}
