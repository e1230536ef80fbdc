//! Delete Confirmation Dialog
//!
//! Destructive actions go through an explicit confirm/cancel step.

use leptos::prelude::*;

#[component]
pub fn ConfirmDialog(
    #[prop(into)] message: String,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="modal-overlay" on:click=move |_| on_cancel.run(())>
            <div class="confirm-dialog" on:click=move |ev| ev.stop_propagation()>
                <p class="confirm-message">{message}</p>
                <div class="confirm-actions">
                    <button
                        class="confirm-btn danger"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            on_confirm.run(());
                        }
                    >
                        "Delete"
                    </button>
                    <button
                        class="cancel-btn"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            on_cancel.run(());
                        }
                    >
                        "Cancel"
                    </button>
                </div>
            </div>
        </div>
    }
}
