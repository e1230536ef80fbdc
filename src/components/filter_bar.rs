//! Filter Bar
//!
//! Renders the server-declared filter controls above the table. The panel
//! open/closed state and the applied values both survive navigation.

use std::collections::BTreeMap;

use leptos::prelude::*;

use crate::table_schema::{ConfigMap, FilterConfig, FilterKind};

#[component]
pub fn FilterBar(
    filters_config: Signal<ConfigMap<FilterConfig>>,
    current: Signal<BTreeMap<String, String>>,
    open: RwSignal<bool>,
    #[prop(into)] on_change: Callback<(String, String)>,
) -> impl IntoView {
    let has_filters = move || !filters_config.get().is_empty();

    view! {
        <Show when=has_filters>
            <div class="filter-bar">
                <button
                    class="filter-toggle-btn"
                    on:click=move |_| open.update(|o| *o = !*o)
                >
                    {move || if open.get() { "Hide filters" } else { "Filters" }}
                </button>

                <Show when=move || open.get()>
                    <div class="filter-panel">
                        <For
                            each=move || filters_config.get().0
                            key=|(key, _)| key.clone()
                            children=move |(key, filter)| {
                                let value_key = key.clone();
                                let value = move || {
                                    current.get().get(&value_key).cloned().unwrap_or_default()
                                };
                                let tooltip = filter.tooltip.clone().unwrap_or_default();

                                view! {
                                    <div class="filter-control" title=tooltip>
                                        <label class="filter-label">{filter.label.clone()}</label>
                                        {match filter.kind {
                                            FilterKind::Text => {
                                                let input_key = key.clone();
                                                let placeholder =
                                                    filter.placeholder.clone().unwrap_or_default();
                                                view! {
                                                    <input
                                                        type="text"
                                                        placeholder=placeholder
                                                        prop:value=value
                                                        on:change=move |ev| on_change
                                                            .run((input_key.clone(), event_target_value(&ev)))
                                                    />
                                                }
                                                .into_any()
                                            }
                                            FilterKind::Select => {
                                                let select_key = key.clone();
                                                let options = filter.options_or_empty().to_vec();
                                                view! {
                                                    <select
                                                        prop:value=value
                                                        on:change=move |ev| on_change
                                                            .run((select_key.clone(), event_target_value(&ev)))
                                                    >
                                                        <option value="">"All"</option>
                                                        {options
                                                            .into_iter()
                                                            .map(|opt| {
                                                                view! {
                                                                    <option value=opt.value.clone()>
                                                                        {opt.label.clone()}
                                                                    </option>
                                                                }
                                                            })
                                                            .collect_view()}
                                                    </select>
                                                }
                                                .into_any()
                                            }
                                        }}
                                    </div>
                                }
                            }
                        />
                    </div>
                </Show>
            </div>
        </Show>
    }
}
