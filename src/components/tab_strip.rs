//! Reorderable Tab Strip
//!
//! One drag-reorderable row of challenge tabs with drop slots between
//! tabs. Drops reorder the list in place immediately, then persist the
//! full id order; a failed persist reverts by refetching server truth.

use leptos::prelude::*;
use leptos::task::spawn_local;

use leptos_dragdrop::{
    bind_global_mouseup, create_dnd_signals, make_on_mousedown, make_on_mouseleave,
    make_on_slot_mouseenter, DndSignals, DropSlot,
};

use crate::api::challenges;
use crate::components::toast::use_toasts;
use crate::context::{use_app_context, Resource};
use crate::fence::Fence;
use crate::models::{ChallengeTab, ChallengeTabKind};
use crate::reorder;

#[component]
pub fn ReorderableTabStrip(
    tabs: RwSignal<Vec<ChallengeTab>>,
    selected: RwSignal<Option<i64>>,
    kind: ChallengeTabKind,
    #[prop(into)] broker_id: Signal<Option<i64>>,
    #[prop(into)] default_tabs: Signal<Vec<ChallengeTab>>,
    #[prop(into)] category_id: Signal<Option<i64>>,
) -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();

    let dnd = create_dnd_signals();
    // Concurrent drags are allowed while a persist is in flight; only the
    // newest persist response is ever applied
    let persist_fence = Fence::new();

    let drop_fence = persist_fence.clone();
    bind_global_mouseup(dnd, move |dragged_id, slot: DropSlot| {
        web_sys::console::log_1(
            &format!("[DND] Drop: dragged={}, slot={}", dragged_id, slot.0).into(),
        );
        let mut changed = false;
        tabs.update(|list| {
            if let Some(from) = reorder::index_of(list, dragged_id) {
                changed = reorder::shift_tab(list, from, slot.0);
            }
        });
        // Drops that change nothing skip the request entirely
        if !changed {
            return;
        }

        let Some(broker) = broker_id.get_untracked() else { return };
        let tab_ids = reorder::ordered_ids(&tabs.get_untracked());
        let ticket = drop_fence.issue();
        let fence = drop_fence.clone();
        spawn_local(async move {
            let envelope = challenges::persist_order(broker, kind, &tab_ids).await;
            if !fence.admits(ticket) {
                return;
            }
            ctx.note_response(&envelope);
            if !envelope.success {
                web_sys::console::log_1(&"[DND] Persist failed, reloading...".into());
                toasts.error(envelope.error_message());
                // Revert by refetch, not inverse splice: server truth
                // replaces the optimistic order
                ctx.invalidate(Resource::ChallengeTabs);
            }
        });
    });

    let add_open = RwSignal::new(false);

    let clone_default = move |default_tab_id: i64| {
        add_open.set(false);
        let Some(broker) = broker_id.get_untracked() else { return };
        let category = category_id.get_untracked();
        spawn_local(async move {
            let envelope =
                challenges::clone_default_tab(kind, broker, default_tab_id, category).await;
            ctx.note_response(&envelope);
            if envelope.success {
                toasts.success(
                    envelope
                        .message
                        .clone()
                        .unwrap_or_else(|| "Tab added".to_string()),
                );
                ctx.invalidate(Resource::ChallengeTabs);
            } else {
                toasts.error(envelope.error_message());
            }
        });
    };

    view! {
        <div class="tab-strip">
            <TabDropZone dnd=dnd index=0/>
            <For
                each=move || {
                    let rows: Vec<_> = tabs.get().into_iter().enumerate().collect();
                    rows
                }
                key=|(_, tab)| tab.id
                children=move |(index, tab)| {
                    let id = tab.id;
                    let on_mousedown = make_on_mousedown(dnd, id);
                    let is_active = move || selected.get() == Some(id);
                    let is_dragging = move || dnd.dragging_id.get() == Some(id);
                    let tab_class = move || {
                        let mut c = String::from("strip-tab");
                        if is_active() {
                            c.push_str(" active");
                        }
                        if is_dragging() {
                            c.push_str(" dragging");
                        }
                        c
                    };

                    view! {
                        <div
                            class=tab_class
                            on:mousedown=on_mousedown
                            on:click=move |_| {
                                // Ignore the click that ends a drag
                                if !dnd.drag_just_ended.get_untracked() {
                                    selected.set(Some(id));
                                }
                            }
                        >
                            {tab.label.clone()}
                        </div>
                        <TabDropZone dnd=dnd index={index + 1}/>
                    }
                }
            />

            <div class="tab-add">
                <button class="tab-add-btn" on:click=move |_| add_open.update(|o| *o = !*o)>
                    "+"
                </button>
                <Show when=move || add_open.get()>
                    <div class="tab-add-menu">
                        <For
                            each=move || default_tabs.get()
                            key=|tab| tab.id
                            children=move |tab| {
                                let default_id = tab.id;
                                view! {
                                    <button
                                        class="tab-add-item"
                                        on:click=move |_| clone_default(default_id)
                                    >
                                        {tab.label.clone()}
                                    </button>
                                }
                            }
                        />
                    </div>
                </Show>
            </div>
        </div>
    }
}

/// Vertical separator between tabs that lights up as the drop target
#[component]
pub fn TabDropZone(dnd: DndSignals, index: usize) -> impl IntoView {
    let on_mouseenter = make_on_slot_mouseenter(dnd, DropSlot(index));
    let on_mouseleave = make_on_mouseleave(dnd);

    let is_active = move || dnd.drop_slot.get() == Some(DropSlot(index));
    let is_dragging = move || dnd.dragging_id.get().is_some();

    let zone_class = move || {
        let mut c = String::from("tab-drop-zone");
        if !is_dragging() {
            c.push_str(" hidden");
        }
        if is_active() {
            c.push_str(" active");
        }
        c
    };

    view! {
        <div
            class=zone_class
            on:mouseenter=on_mouseenter
            on:mouseleave=on_mouseleave
        />
    }
}
