//! Leptos DragDrop Utilities
//!
//! Mouse-event drag-and-drop for flat, horizontally ordered tab strips.
//! Uses a movement threshold to distinguish click from drag.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Slot between two tabs where a dragged tab can land.
///
/// `DropSlot(i)` means "insert before the tab currently at index `i`";
/// `DropSlot(len)` appends after the last tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropSlot(pub usize);

/// DnD state signals shared by one strip instance
#[derive(Clone, Copy)]
pub struct DndSignals {
    pub dragging_id: RwSignal<Option<i64>>,
    pub drop_slot: RwSignal<Option<DropSlot>>,
    pub drag_just_ended: RwSignal<bool>,
    /// Tab pressed but not yet moved past the threshold
    pub pending_id: RwSignal<Option<i64>>,
    /// Press position for movement detection
    pub start_x: RwSignal<i32>,
    pub start_y: RwSignal<i32>,
}

/// Movement threshold in pixels to start dragging
const DRAG_THRESHOLD_PX: i32 = 5;

pub fn create_dnd_signals() -> DndSignals {
    DndSignals {
        dragging_id: RwSignal::new(None),
        drop_slot: RwSignal::new(None),
        drag_just_ended: RwSignal::new(false),
        pending_id: RwSignal::new(None),
        start_x: RwSignal::new(0),
        start_y: RwSignal::new(0),
    }
}

/// End drag operation
///
/// `drag_just_ended` stays set for a short window so the click that
/// follows mouseup does not also activate the tab underneath.
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging_id.set(None);
    dnd.drop_slot.set(None);
    dnd.pending_id.set(None);
    dnd.drag_just_ended.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Create mousedown handler for a draggable tab
///
/// Records a pending drag with the press position. Presses on inputs or
/// buttons inside the tab (close, clone) never start a drag.
pub fn make_on_mousedown(dnd: DndSignals, tab_id: i64) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() == 0 {
            if let Some(target) = ev.target() {
                if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
                if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
            }
            dnd.pending_id.set(Some(tab_id));
            dnd.start_x.set(ev.client_x());
            dnd.start_y.set(ev.client_y());
        }
    }
}

/// Create mousemove handler for the document - promotes a pending press to
/// a drag once the pointer moves far enough
pub fn bind_global_mousemove(dnd: DndSignals) {
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let pending = dnd.pending_id.get_untracked();

        if pending.is_some() && dnd.dragging_id.get_untracked().is_none() {
            let dx = (ev.client_x() - dnd.start_x.get_untracked()).abs();
            let dy = (ev.client_y() - dnd.start_y.get_untracked()).abs();

            if dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX {
                dnd.dragging_id.set(pending);
            }
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
        }
    }
    on_mousemove.forget();
}

/// Create mouseenter handler for a drop slot
pub fn make_on_slot_mouseenter(dnd: DndSignals, slot: DropSlot) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id.get_untracked().is_some() {
            dnd.drop_slot.set(Some(slot));
        }
    }
}

/// Create mouseleave handler
pub fn make_on_mouseleave(dnd: DndSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id.get_untracked().is_some() {
            dnd.drop_slot.set(None);
        }
    }
}

/// Bind global mouseup handler for drop detection
///
/// `on_drop(tab_id, slot)` fires only when an actual drag (not a plain
/// click) ends over a slot. Also binds the global mousemove promoter.
pub fn bind_global_mouseup<F>(dnd: DndSignals, on_drop: F)
where
    F: Fn(i64, DropSlot) + Clone + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragging_id = dnd.dragging_id.get_untracked();
        let drop_slot = dnd.drop_slot.get_untracked();

        dnd.pending_id.set(None);

        if let (Some(dragged), Some(slot)) = (dragging_id, drop_slot) {
            end_drag(&dnd);
            on_drop(dragged, slot);
        } else {
            end_drag(&dnd);
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
        }
    }
    on_mouseup.forget();

    bind_global_mousemove(dnd);
}
