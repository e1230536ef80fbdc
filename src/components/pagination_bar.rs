//! Pagination Bar
//!
//! First/prev/next/last controls with boundary disabling, a per-page
//! select, and the "Showing X to Y of Z" range text.

use leptos::prelude::*;

use crate::models::Pagination;
use crate::view_state::page_bounds;

const PER_PAGE_CHOICES: &[u32] = &[10, 25, 50, 100];

#[component]
pub fn PaginationBar(
    pagination: Signal<Option<Pagination>>,
    #[prop(into)] on_page: Callback<u32>,
    #[prop(into)] on_per_page: Callback<u32>,
) -> impl IntoView {
    view! {
        {move || {
            pagination
                .get()
                .map(|p| {
                    let (from, to) = page_bounds(p.current_page, p.per_page, p.total);
                    let at_start = p.current_page <= 1;
                    let at_end = p.current_page >= p.last_page;
                    let last_page = p.last_page;
                    let prev_page = p.current_page.saturating_sub(1);
                    let next_page = p.current_page + 1;

                    view! {
                        <div class="pagination-bar">
                            <span class="pagination-range">
                                {format!("Showing {} to {} of {}", from, to, p.total)}
                            </span>

                            <div class="pagination-controls">
                                <button disabled=at_start on:click=move |_| on_page.run(1)>
                                    "«"
                                </button>
                                <button disabled=at_start on:click=move |_| on_page.run(prev_page)>
                                    "‹"
                                </button>
                                <span class="pagination-current">
                                    {format!("{} / {}", p.current_page, p.last_page)}
                                </span>
                                <button disabled=at_end on:click=move |_| on_page.run(next_page)>
                                    "›"
                                </button>
                                <button disabled=at_end on:click=move |_| on_page.run(last_page)>
                                    "»"
                                </button>
                            </div>

                            <select
                                class="per-page-select"
                                prop:value=p.per_page.to_string()
                                on:change=move |ev| {
                                    if let Ok(per_page) = event_target_value(&ev).parse() {
                                        on_per_page.run(per_page);
                                    }
                                }
                            >
                                {PER_PAGE_CHOICES
                                    .iter()
                                    .map(|n| {
                                        view! {
                                            <option value=n.to_string()>{format!("{} / page", n)}</option>
                                        }
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                    }
                })
        }}
    }
}
