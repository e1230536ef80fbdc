//! Challenge Matrix
//!
//! Three-level tabbed editor (category → step → amount). Each level is a
//! drag-reorderable strip; steps and amounts are scoped to the selected
//! category.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::challenges;
use crate::components::tab_strip::ReorderableTabStrip;
use crate::components::toast::use_toasts;
use crate::context::{use_app_context, Resource};
use crate::fence::Fence;
use crate::models::{ChallengeTab, ChallengeTabKind};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn ChallengeMatrix() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let store = use_app_store();

    let broker_id = Memo::new(move |_| store.selected_broker().get().map(|b| b.id));
    let broker_name = Memo::new(move |_| store.selected_broker().get().map(|b| b.name));

    let categories = RwSignal::new(Vec::<ChallengeTab>::new());
    let steps = RwSignal::new(Vec::<ChallengeTab>::new());
    let amounts = RwSignal::new(Vec::<ChallengeTab>::new());

    let selected_category = RwSignal::new(None::<i64>);
    let selected_step = RwSignal::new(None::<i64>);
    let selected_amount = RwSignal::new(None::<i64>);

    let default_categories = RwSignal::new(Vec::<ChallengeTab>::new());
    let default_steps = RwSignal::new(Vec::<ChallengeTab>::new());
    let default_amounts = RwSignal::new(Vec::<ChallengeTab>::new());

    // Default tab templates, one fetch per level
    for (kind, target) in [
        (ChallengeTabKind::Category, default_categories),
        (ChallengeTabKind::Step, default_steps),
        (ChallengeTabKind::Amount, default_amounts),
    ] {
        spawn_local(async move {
            let envelope = challenges::list_default_tabs(kind).await;
            ctx.note_response(&envelope);
            if envelope.success {
                if let Ok(tabs) = envelope.data_as::<Vec<ChallengeTab>>() {
                    target.set(tabs);
                }
            }
        });
    }

    // Categories follow the selected broker
    let category_fence = Fence::new();
    Effect::new(move |_| {
        let _ = ctx.version(Resource::ChallengeTabs);
        let Some(broker) = broker_id.get() else {
            categories.set(Vec::new());
            return;
        };
        web_sys::console::log_1(&format!("[Matrix] Loading categories for broker {}", broker).into());
        let ticket = category_fence.issue();
        let fence = category_fence.clone();
        spawn_local(async move {
            let envelope = challenges::list_tabs(broker, ChallengeTabKind::Category, None).await;
            if !fence.admits(ticket) {
                return;
            }
            ctx.note_response(&envelope);
            if !envelope.success {
                toasts.error(envelope.error_message());
                return;
            }
            match envelope.data_as::<Vec<ChallengeTab>>() {
                Ok(tabs) => {
                    let still_there = tabs
                        .iter()
                        .any(|t| Some(t.id) == selected_category.get_untracked());
                    if !still_there {
                        selected_category.set(tabs.first().map(|t| t.id));
                    }
                    categories.set(tabs);
                }
                Err(e) => toasts.error(format!("Could not decode categories: {}", e)),
            }
        });
    });

    // Steps and amounts follow the selected category
    let step_fence = Fence::new();
    Effect::new(move |_| {
        let _ = ctx.version(Resource::ChallengeTabs);
        let Some(broker) = broker_id.get() else {
            steps.set(Vec::new());
            amounts.set(Vec::new());
            return;
        };
        let Some(category) = selected_category.get() else {
            steps.set(Vec::new());
            amounts.set(Vec::new());
            return;
        };
        let ticket = step_fence.issue();
        let fence = step_fence.clone();
        spawn_local(async move {
            let step_env =
                challenges::list_tabs(broker, ChallengeTabKind::Step, Some(category)).await;
            let amount_env =
                challenges::list_tabs(broker, ChallengeTabKind::Amount, Some(category)).await;
            if !fence.admits(ticket) {
                return;
            }
            ctx.note_response(&step_env);
            ctx.note_response(&amount_env);

            match (step_env.success, amount_env.success) {
                (true, true) => {
                    if let Ok(tabs) = step_env.data_as::<Vec<ChallengeTab>>() {
                        if !tabs.iter().any(|t| Some(t.id) == selected_step.get_untracked()) {
                            selected_step.set(tabs.first().map(|t| t.id));
                        }
                        steps.set(tabs);
                    }
                    if let Ok(tabs) = amount_env.data_as::<Vec<ChallengeTab>>() {
                        if !tabs.iter().any(|t| Some(t.id) == selected_amount.get_untracked()) {
                            selected_amount.set(tabs.first().map(|t| t.id));
                        }
                        amounts.set(tabs);
                    }
                }
                _ => {
                    let failed = if step_env.success { amount_env } else { step_env };
                    toasts.error(failed.error_message());
                }
            }
        });
    });

    let selection_summary = move || {
        let label_of = |tabs: &[ChallengeTab], id: Option<i64>| {
            id.and_then(|id| tabs.iter().find(|t| t.id == id).map(|t| t.label.clone()))
        };
        let category = label_of(&categories.get(), selected_category.get());
        let step = label_of(&steps.get(), selected_step.get());
        let amount = label_of(&amounts.get(), selected_amount.get());
        match (category, step, amount) {
            (Some(c), Some(s), Some(a)) => format!("{} / {} / {}", c, s, a),
            (Some(c), Some(s), None) => format!("{} / {}", c, s),
            (Some(c), None, _) => c,
            _ => String::new(),
        }
    };

    view! {
        <div class="challenge-matrix">
            {move || match broker_name.get() {
                None => view! {
                    <p class="matrix-hint">"Select a broker in the Brokers table first."</p>
                }.into_any(),
                Some(name) => view! {
                    <div class="matrix-editor">
                        <h2>{format!("Challenge matrix — {}", name)}</h2>

                        <div class="matrix-level">
                            <span class="matrix-level-label">"Categories"</span>
                            <ReorderableTabStrip
                                tabs=categories
                                selected=selected_category
                                kind=ChallengeTabKind::Category
                                broker_id=broker_id
                                default_tabs=default_categories
                                category_id=Signal::derive(move || None::<i64>)
                            />
                        </div>

                        <div class="matrix-level">
                            <span class="matrix-level-label">"Steps"</span>
                            <ReorderableTabStrip
                                tabs=steps
                                selected=selected_step
                                kind=ChallengeTabKind::Step
                                broker_id=broker_id
                                default_tabs=default_steps
                                category_id=selected_category
                            />
                        </div>

                        <div class="matrix-level">
                            <span class="matrix-level-label">"Amounts"</span>
                            <ReorderableTabStrip
                                tabs=amounts
                                selected=selected_amount
                                kind=ChallengeTabKind::Amount
                                broker_id=broker_id
                                default_tabs=default_amounts
                                category_id=selected_category
                            />
                        </div>

                        <p class="matrix-selection">{selection_summary}</p>
                    </div>
                }.into_any(),
            }}
        </div>
    }
}
