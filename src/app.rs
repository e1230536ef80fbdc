//! Broker Admin Dashboard App
//!
//! Shell component: section nav, page switching, and the global
//! toast/overlay/unauthorized chrome.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::{
    accounts_def, broker_options_def, companies_def, contests_def, promotions_def, BrokersPage,
    ChallengeMatrix, RebateMatrixEditor, ResourcePage, ToastStack, Toasts,
};
use crate::context::AppContext;
use crate::store::{store_set_section, AppState, AppStateStoreFields, Section};
use crate::url_state::UrlQuery;

const SECTIONS: &[Section] = &[
    Section::Brokers,
    Section::BrokerOptions,
    Section::Accounts,
    Section::Companies,
    Section::Promotions,
    Section::Contests,
    Section::ChallengeMatrix,
    Section::Rebates,
];

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    let toasts = Toasts::new();
    let store = Store::new(AppState::default());
    let url = UrlQuery::new();

    // Provide context to all children
    provide_context(ctx);
    provide_context(toasts);
    provide_context(store);
    provide_context(url);

    let current_section = move || store.section().get();
    let selected_broker = move || store.selected_broker().get();

    view! {
        <div class="app-layout">
            <nav class="section-nav">
                {SECTIONS
                    .iter()
                    .map(|section| {
                        let section = *section;
                        let is_active = move || current_section() == section;
                        let tab_class = move || {
                            if is_active() { "section-tab active" } else { "section-tab" }
                        };
                        view! {
                            <button
                                class=tab_class
                                on:click=move |_| store_set_section(&store, section)
                            >
                                {section.title()}
                            </button>
                        }
                    })
                    .collect_view()}

                {move || selected_broker().map(|broker| view! {
                    <span class="selected-broker-chip">{broker.name}</span>
                })}
            </nav>

            <Show when=move || ctx.is_unauthorized()>
                <div class="auth-banner">
                    "Your session is not authenticated. Log in again to continue."
                </div>
            </Show>

            <main class="main-content">
                {move || match current_section() {
                    Section::Brokers => view! { <BrokersPage/> }.into_any(),
                    Section::BrokerOptions => {
                        view! { <ResourcePage def=broker_options_def()/> }.into_any()
                    }
                    Section::Accounts => view! { <ResourcePage def=accounts_def()/> }.into_any(),
                    Section::Companies => view! { <ResourcePage def=companies_def()/> }.into_any(),
                    Section::Promotions => {
                        view! { <ResourcePage def=promotions_def()/> }.into_any()
                    }
                    Section::Contests => view! { <ResourcePage def=contests_def()/> }.into_any(),
                    Section::ChallengeMatrix => view! { <ChallengeMatrix/> }.into_any(),
                    Section::Rebates => view! { <RebateMatrixEditor/> }.into_any(),
                }}
            </main>

            // Blocking overlay while a status toggle is in flight
            <Show when=move || ctx.is_busy()>
                <div class="busy-overlay">
                    <div class="busy-spinner">"Working..."</div>
                </div>
            </Show>

            <ToastStack/>
        </div>
    }
}
