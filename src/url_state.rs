//! URL & Storage Glue
//!
//! The URL query string is the shared observable state for sort/filter/page
//! (bookmarkable, shareable); localStorage remembers each table's
//! last-applied filters across navigation.

use std::collections::BTreeMap;

use leptos::prelude::*;

/// Context-provided mirror of `location.search`.
///
/// Pushing through here updates browser history and the signal in one
/// step, so every data-fetching effect keyed on the query re-runs.
#[derive(Clone, Copy)]
pub struct UrlQuery {
    query: RwSignal<String>,
}

impl Default for UrlQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlQuery {
    pub fn new() -> Self {
        Self {
            query: RwSignal::new(current_search()),
        }
    }

    /// Tracked read of the current query string (no leading `?`)
    pub fn get(&self) -> String {
        self.query.get()
    }

    pub fn get_untracked(&self) -> String {
        self.query.get_untracked()
    }

    /// Push a new query into browser history and notify subscribers.
    /// Pushing the query already in place is a no-op.
    pub fn push(&self, query: &str) {
        if self.query.get_untracked() == query {
            return;
        }
        if let Some(win) = web_sys::window() {
            let path = win.location().pathname().unwrap_or_default();
            let url = if query.is_empty() {
                path
            } else {
                format!("{}?{}", path, query)
            };
            if let Ok(history) = win.history() {
                let _ = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url));
            }
        }
        self.query.set(query.to_string());
    }
}

pub fn use_url_query() -> UrlQuery {
    expect_context::<UrlQuery>()
}

fn current_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
        .trim_start_matches('?')
        .to_string()
}

/// Client-side redirect (dashboard navigate action)
pub fn navigate_to(url: &str) {
    if let Some(win) = web_sys::window() {
        let _ = win.location().assign(url);
    }
}

// ========================
// localStorage filter cache
// ========================

/// Last-applied filters for the table persisted under `key`
pub fn load_filters(key: &str) -> BTreeMap<String, String> {
    let Some(storage) = local_storage() else {
        return BTreeMap::new();
    };
    match storage.get_item(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_default(),
        _ => BTreeMap::new(),
    }
}

/// Persist filters as a side effect of every filter change
pub fn store_filters(key: &str, filters: &BTreeMap<String, String>) {
    if let Some(storage) = local_storage() {
        if let Ok(raw) = serde_json::to_string(filters) {
            let _ = storage.set_item(key, &raw);
        }
    }
}

/// Whether the filter panel was left open last time
pub fn load_panel_open(key: &str) -> bool {
    local_storage()
        .and_then(|s| s.get_item(&panel_key(key)).ok().flatten())
        .map(|v| v == "1")
        .unwrap_or(false)
}

pub fn store_panel_open(key: &str, open: bool) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(&panel_key(key), if open { "1" } else { "0" });
    }
}

fn panel_key(key: &str) -> String {
    format!("{}__panel", key)
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
}
