//! Modal Host
//!
//! Overlay dialog wrapper for the edit/create forms.

use leptos::prelude::*;

#[component]
pub fn Modal(
    #[prop(into)] title: String,
    #[prop(into)] on_close: Callback<()>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal-dialog" on:click=move |ev| ev.stop_propagation()>
                <div class="modal-header">
                    <span class="modal-title">{title}</span>
                    <button class="close-btn" on:click=move |_| on_close.run(())>"×"</button>
                </div>
                <div class="modal-body">{children()}</div>
            </div>
        </div>
    }
}
