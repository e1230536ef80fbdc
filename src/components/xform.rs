//! XForm
//!
//! Schema-driven form renderer for create and edit flows. One input per
//! field kind, inline validation errors, POST/PUT submission.

use std::collections::BTreeMap;

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

use crate::api::resources;
use crate::components::toast::use_toasts;
use crate::context::{use_app_context, Resource};
use crate::form_schema::{
    self, default_value, field_path, FieldConfig, FieldKind, FormConfig, FormValues,
};
use crate::models::RowId;

type FieldErrors = BTreeMap<String, Vec<String>>;

/// Schema-driven form.
///
/// Create mode posts to `create_url`; edit mode fetches the record from
/// `get_item_url/<id>`, seeds the fields, and puts to `update_url/<id>`.
#[component]
pub fn XForm(
    config: FormConfig,
    resource: Resource,
    #[prop(into)] create_url: String,
    #[prop(into)] update_url: String,
    #[prop(optional, into)] get_item_url: Option<String>,
    #[prop(optional, into)] record_id: Option<RowId>,
    #[prop(into)] on_done: Callback<()>,
) -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();

    let values = RwSignal::new(form_schema::seed_values(&config, None));
    let errors = RwSignal::new(FieldErrors::new());
    let (submitting, set_submitting) = signal(false);

    let edit_id = record_id.clone();
    let is_edit = edit_id.is_some();

    // Edit mode: fetch the record and flatten it into the schema's paths
    if let (Some(id), Some(item_url)) = (record_id.clone(), get_item_url.clone()) {
        let seed_config = config.clone();
        spawn_local(async move {
            let envelope = resources::fetch_item(&item_url, &id).await;
            ctx.note_response(&envelope);
            if !envelope.success {
                toasts.error(envelope.error_message());
                return;
            }
            match envelope.data_as::<serde_json::Map<String, Value>>() {
                Ok(record) => values.set(form_schema::seed_values(&seed_config, Some(&record))),
                Err(e) => toasts.error(format!("Could not load record: {}", e)),
            }
        });
    }

    let submit_config = config.clone();
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get() {
            return;
        }

        let client_errors = form_schema::validate(&submit_config, &values.get());
        if !client_errors.is_empty() {
            errors.set(client_errors);
            return;
        }
        errors.set(FieldErrors::new());

        let payload = Value::Object(form_schema::flatten_payload(&values.get()));
        let create_url = create_url.clone();
        let update_url = update_url.clone();
        let edit_id = edit_id.clone();
        let error_config = submit_config.clone();
        set_submitting.set(true);

        spawn_local(async move {
            let envelope = match &edit_id {
                Some(id) => resources::update(&update_url, id, payload).await,
                None => resources::create(&create_url, payload).await,
            };
            set_submitting.set(false);
            ctx.note_response(&envelope);

            if envelope.success {
                toasts.success(
                    envelope
                        .message
                        .clone()
                        .unwrap_or_else(|| "Saved".to_string()),
                );
                ctx.invalidate(resource);
                on_done.run(());
            } else {
                // Server validation errors land inline, keyed back onto
                // the schema's section.field paths
                let mut inline = FieldErrors::new();
                for (field, messages) in envelope.field_errors() {
                    let path = form_schema::path_for_field(&error_config, &field)
                        .unwrap_or_else(|| field.clone());
                    inline.insert(path, messages);
                }
                if inline.is_empty() {
                    toasts.error(envelope.error_message());
                } else {
                    errors.set(inline);
                }
            }
        });
    };

    let sections = config.0 .0.clone();

    view! {
        <form class="xform" on:submit=on_submit>
            {sections
                .into_iter()
                .map(|(section_name, section)| {
                    view! {
                        <fieldset class="xform-section">
                            <legend>{section.label.clone()}</legend>
                            {section
                                .fields
                                .0
                                .iter()
                                .map(|(field_name, field)| {
                                    let path = field_path(&section_name, field_name);
                                    view! {
                                        <FormField
                                            path=path
                                            field=field.clone()
                                            values=values
                                            errors=errors
                                        />
                                    }
                                })
                                .collect_view()}
                        </fieldset>
                    }
                })
                .collect_view()}
            <div class="xform-actions">
                <button type="submit" disabled=move || submitting.get()>
                    {if is_edit { "Update" } else { "Create" }}
                </button>
            </div>
        </form>
    }
}

/// One labeled input dispatched on the field kind
#[component]
fn FormField(
    path: String,
    field: FieldConfig,
    values: RwSignal<FormValues>,
    errors: RwSignal<FieldErrors>,
) -> impl IntoView {
    let error_path = path.clone();
    let field_errors = move || {
        errors
            .get()
            .get(&error_path)
            .cloned()
            .unwrap_or_default()
    };

    let input = render_input(path, &field, values);

    view! {
        <div class="xform-field">
            <label class="xform-label">
                {field.label.clone()}
                {field.required.then(|| view! { <span class="required-mark">"*"</span> })}
            </label>
            {input}
            <For
                each=field_errors
                key=|msg| msg.clone()
                children=move |msg| view! { <span class="field-error">{msg}</span> }
            />
        </div>
    }
}

fn value_at(values: RwSignal<FormValues>, path: &str) -> Value {
    values.with(|v| v.get(path).cloned().unwrap_or(Value::Null))
}

fn set_value(values: RwSignal<FormValues>, path: &str, value: Value) {
    let path = path.to_string();
    values.update(|v| {
        v.insert(path, value);
    });
}

fn render_input(path: String, field: &FieldConfig, values: RwSignal<FormValues>) -> AnyView {
    let placeholder = field.placeholder.clone().unwrap_or_default();
    match field.kind {
        FieldKind::Text | FieldKind::Number => {
            let input_type = if field.kind == FieldKind::Number { "number" } else { "text" };
            let read_path = path.clone();
            view! {
                <input
                    type=input_type
                    placeholder=placeholder
                    prop:value=move || text_of(&value_at(values, &read_path))
                    on:input=move |ev| set_value(values, &path, Value::String(event_target_value(&ev)))
                />
            }
            .into_any()
        }
        FieldKind::Textarea => {
            let read_path = path.clone();
            view! {
                <textarea
                    placeholder=placeholder
                    prop:value=move || text_of(&value_at(values, &read_path))
                    on:input=move |ev| set_value(values, &path, Value::String(event_target_value(&ev)))
                />
            }
            .into_any()
        }
        FieldKind::Checkbox => {
            let read_path = path.clone();
            view! {
                <input
                    type="checkbox"
                    prop:checked=move || value_at(values, &read_path) == Value::Bool(true)
                    on:change=move |ev| set_value(values, &path, Value::Bool(event_target_checked(&ev)))
                />
            }
            .into_any()
        }
        FieldKind::Select => {
            let options = field.options.clone().unwrap_or_default();
            let read_path = path.clone();
            view! {
                <select
                    prop:value=move || text_of(&value_at(values, &read_path))
                    on:change=move |ev| set_value(values, &path, Value::String(event_target_value(&ev)))
                >
                    <option value="">{placeholder}</option>
                    {options
                        .into_iter()
                        .map(|opt| view! { <option value=opt.value.clone()>{opt.label.clone()}</option> })
                        .collect_view()}
                </select>
            }
            .into_any()
        }
        FieldKind::Multiselect => {
            let options = field.options.clone().unwrap_or_default();
            view! {
                <div class="multiselect">
                    {options
                        .into_iter()
                        .map(|opt| {
                            let value = opt.value.clone();
                            let read_path = path.clone();
                            let toggle_path = path.clone();
                            let toggle_value = opt.value.clone();
                            let checked = move || {
                                matches!(
                                    value_at(values, &read_path),
                                    Value::Array(ref items) if items.iter().any(|i| i == &Value::String(value.clone()))
                                )
                            };
                            view! {
                                <label class="multiselect-option">
                                    <input
                                        type="checkbox"
                                        prop:checked=checked
                                        on:change=move |_| toggle_multi(values, &toggle_path, &toggle_value)
                                    />
                                    {opt.label.clone()}
                                </label>
                            }
                        })
                        .collect_view()}
                </div>
            }
            .into_any()
        }
        FieldKind::ArrayFields => render_array_field(path, field, values).into_any(),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn toggle_multi(values: RwSignal<FormValues>, path: &str, option: &str) {
    let current = value_at(values, path);
    let mut items = match current {
        Value::Array(items) => items,
        _ => Vec::new(),
    };
    let wanted = Value::String(option.to_string());
    if let Some(pos) = items.iter().position(|i| i == &wanted) {
        items.remove(pos);
    } else {
        items.push(wanted);
    }
    set_value(values, path, Value::Array(items));
}

/// Repeating rows of sub-fields with add/remove controls
fn render_array_field(path: String, field: &FieldConfig, values: RwSignal<FormValues>) -> impl IntoView {
    let sub_schema = field.fields.clone().unwrap_or_default();
    let rows_path = path.clone();
    let rows = move || match value_at(values, &rows_path) {
        Value::Array(items) => items,
        _ => Vec::new(),
    };

    let add_schema = sub_schema.clone();
    let add_path = path.clone();
    let add_row = move |_| {
        let mut row = serde_json::Map::new();
        for (name, sub) in add_schema.iter() {
            row.insert(name.clone(), default_value(sub.kind));
        }
        let mut items = match value_at(values, &add_path) {
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        items.push(Value::Object(row));
        set_value(values, &add_path, Value::Array(items));
    };

    let remove_path = path.clone();
    let remove_row = move |idx: usize| {
        let mut items = match value_at(values, &remove_path) {
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        if idx < items.len() {
            items.remove(idx);
            set_value(values, &remove_path, Value::Array(items));
        }
    };

    let edit_path = path.clone();
    let edit_cell = move |idx: usize, name: &str, new_value: String| {
        let mut items = match value_at(values, &edit_path) {
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        if let Some(Value::Object(row)) = items.get_mut(idx) {
            row.insert(name.to_string(), Value::String(new_value));
            set_value(values, &edit_path, Value::Array(items));
        }
    };

    view! {
        <div class="array-field">
            {move || {
                let schema = sub_schema.clone();
                let edit_cell = edit_cell.clone();
                let remove_row = remove_row.clone();
                rows()
                    .into_iter()
                    .enumerate()
                    .map(|(idx, row)| {
                        let remove_row = remove_row.clone();
                        view! {
                            <div class="array-field-row">
                                {schema
                                    .iter()
                                    .map(|(name, sub)| {
                                        let current = row
                                            .get(name)
                                            .map(text_of)
                                            .unwrap_or_default();
                                        let name = name.clone();
                                        let edit_cell = edit_cell.clone();
                                        view! {
                                            <input
                                                type="text"
                                                placeholder=sub.label.clone()
                                                prop:value=current
                                                on:change=move |ev| edit_cell(idx, &name, event_target_value(&ev))
                                            />
                                        }
                                    })
                                    .collect_view()}
                                <button type="button" class="remove-row-btn" on:click=move |_| remove_row(idx)>
                                    "×"
                                </button>
                            </div>
                        }
                    })
                    .collect_view()
            }}
            <button type="button" class="add-row-btn" on:click=add_row>
                "+ Add row"
            </button>
        </div>
    }
}
