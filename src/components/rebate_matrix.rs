//! Rebate Matrix Editor
//!
//! Editable grid of rebate rates per (row, challenge amount) for the
//! selected broker, saved in one PUT.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::rebates;
use crate::components::toast::use_toasts;
use crate::context::{use_app_context, Resource};
use crate::fence::Fence;
use crate::models::RebateMatrix;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn RebateMatrixEditor() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let store = use_app_store();

    let broker_id = Memo::new(move |_| store.selected_broker().get().map(|b| b.id));

    let matrix = RwSignal::new(RebateMatrix::default());
    let (saving, set_saving) = signal(false);

    let fetch_fence = Fence::new();
    Effect::new(move |_| {
        let _ = ctx.version(Resource::Rebates);
        let Some(broker) = broker_id.get() else {
            matrix.set(RebateMatrix::default());
            return;
        };
        let ticket = fetch_fence.issue();
        let fence = fetch_fence.clone();
        spawn_local(async move {
            let envelope = rebates::get_matrix(broker).await;
            if !fence.admits(ticket) {
                return;
            }
            ctx.note_response(&envelope);
            if !envelope.success {
                toasts.error(envelope.error_message());
                return;
            }
            match envelope.data_as::<RebateMatrix>() {
                Ok(loaded) => matrix.set(loaded),
                Err(e) => toasts.error(format!("Could not decode rebate matrix: {}", e)),
            }
        });
    });

    let edit_rate = move |row_idx: usize, cell_idx: usize, value: String| {
        matrix.update(|m| {
            if let Some(cell) = m.rows.get_mut(row_idx).and_then(|r| r.rates.get_mut(cell_idx)) {
                cell.rate = value;
            }
        });
    };

    let save = move |_| {
        let Some(broker) = broker_id.get_untracked() else { return };
        if saving.get_untracked() {
            return;
        }
        let snapshot = matrix.get_untracked();
        set_saving.set(true);
        spawn_local(async move {
            let envelope = rebates::save_matrix(broker, &snapshot).await;
            set_saving.set(false);
            ctx.note_response(&envelope);
            if envelope.success {
                toasts.success(
                    envelope
                        .message
                        .clone()
                        .unwrap_or_else(|| "Rebate rates saved".to_string()),
                );
                ctx.invalidate(Resource::Rebates);
            } else {
                toasts.error(envelope.error_message());
            }
        });
    };

    view! {
        <div class="rebate-matrix">
            {move || {
                if broker_id.get().is_none() {
                    return view! {
                        <p class="matrix-hint">"Select a broker in the Brokers table first."</p>
                    }
                    .into_any();
                }
                view! {
                    <div class="rebate-editor">
                        <h2>"Rebate rates"</h2>
                        <table class="rebate-table">
                            <thead>
                                <tr>
                                    <th></th>
                                    {matrix
                                        .get()
                                        .amount_labels
                                        .into_iter()
                                        .map(|label| view! { <th>{label}</th> })
                                        .collect_view()}
                                </tr>
                            </thead>
                            <tbody>
                                {matrix
                                    .get()
                                    .rows
                                    .into_iter()
                                    .enumerate()
                                    .map(|(row_idx, row)| {
                                        view! {
                                            <tr>
                                                <td class="rebate-row-label">{row.label.clone()}</td>
                                                {row
                                                    .rates
                                                    .iter()
                                                    .enumerate()
                                                    .map(|(cell_idx, cell)| {
                                                        let current = cell.rate.clone();
                                                        view! {
                                                            <td>
                                                                <input
                                                                    type="text"
                                                                    class="rebate-rate-input"
                                                                    prop:value=current
                                                                    on:change=move |ev| edit_rate(
                                                                        row_idx,
                                                                        cell_idx,
                                                                        event_target_value(&ev),
                                                                    )
                                                                />
                                                            </td>
                                                        }
                                                    })
                                                    .collect_view()}
                                            </tr>
                                        }
                                    })
                                    .collect_view()}
                            </tbody>
                        </table>
                        <button class="save-btn" disabled=move || saving.get() on:click=save>
                            {move || if saving.get() { "Saving..." } else { "Save rates" }}
                        </button>
                    </div>
                }
                .into_any()
            }}
        </div>
    }
}
