//! Dynamic Form Schema
//!
//! Server-supplied section/field metadata driving the XForm renderer, plus
//! the pure value plumbing: default synthesis, record seeding, payload
//! flattening and schema-derived validation.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::table_schema::ConfigMap;

/// Closed set of field kinds. Adding a kind forces every match below to
/// handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    Number,
    Checkbox,
    Select,
    Multiselect,
    ArrayFields,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldConfig {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Row schema when `kind` is `ArrayFields`
    #[serde(default)]
    pub fields: Option<ConfigMap<FieldConfig>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SectionConfig {
    pub label: String,
    pub fields: ConfigMap<FieldConfig>,
}

/// Ordered sections keyed by section name
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FormConfig(pub ConfigMap<SectionConfig>);

/// Form state keyed by `section.field` path
pub type FormValues = BTreeMap<String, Value>;

pub fn field_path(section: &str, field: &str) -> String {
    format!("{}.{}", section, field)
}

/// Empty value for a field with no existing record
pub fn default_value(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Checkbox => Value::Bool(false),
        FieldKind::Multiselect | FieldKind::ArrayFields => Value::Array(Vec::new()),
        FieldKind::Text | FieldKind::Textarea | FieldKind::Number | FieldKind::Select => {
            Value::String(String::new())
        }
    }
}

/// Build the initial form state: a fetched record flattened into the
/// `section.field` paths the schema expects, defaults where the record is
/// silent (or absent, for create mode).
pub fn seed_values(config: &FormConfig, record: Option<&serde_json::Map<String, Value>>) -> FormValues {
    let mut values = FormValues::new();
    for (section_name, section) in config.0.iter() {
        for (field_name, field) in section.fields.iter() {
            let value = record
                .and_then(|r| r.get(field_name))
                .cloned()
                .unwrap_or_else(|| default_value(field.kind));
            values.insert(field_path(section_name, field_name), value);
        }
    }
    values
}

/// Collapse the nested form state back into the single-level body the
/// resource endpoints accept
pub fn flatten_payload(values: &FormValues) -> serde_json::Map<String, Value> {
    let mut payload = serde_json::Map::new();
    for (path, value) in values {
        let field = path.rsplit_once('.').map(|(_, f)| f).unwrap_or(path);
        payload.insert(field.to_string(), value.clone());
    }
    payload
}

/// Path for a server-reported field name, for mapping validation errors
/// back onto inputs
pub fn path_for_field(config: &FormConfig, field_name: &str) -> Option<String> {
    for (section_name, section) in config.0.iter() {
        if section.fields.get(field_name).is_some() {
            return Some(field_path(section_name, field_name));
        }
    }
    None
}

/// Schema-derived validation; errors keyed by `section.field` path
pub fn validate(config: &FormConfig, values: &FormValues) -> BTreeMap<String, Vec<String>> {
    let mut errors = BTreeMap::new();
    for (section_name, section) in config.0.iter() {
        for (field_name, field) in section.fields.iter() {
            let path = field_path(section_name, field_name);
            let value = values.get(&path).cloned().unwrap_or(Value::Null);
            let mut messages = Vec::new();

            if field.required && is_blank(&value) {
                messages.push(format!("{} is required", field.label));
            }
            if field.kind == FieldKind::Number {
                if let Value::String(s) = &value {
                    if !s.trim().is_empty() && s.trim().parse::<f64>().is_err() {
                        messages.push(format!("{} must be a number", field.label));
                    }
                }
            }
            if !messages.is_empty() {
                errors.insert(path, messages);
            }
        }
    }
    errors
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        // An unchecked checkbox is a valid false, not a missing value
        Value::Bool(_) => false,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_config() -> FormConfig {
        serde_json::from_value(json!({
            "general": {
                "label": "General",
                "fields": {
                    "name": {"label": "Name", "type": "text", "required": true},
                    "max_accounts": {"label": "Max accounts", "type": "number"},
                    "active": {"label": "Active", "type": "checkbox"}
                }
            },
            "payout": {
                "label": "Payout",
                "fields": {
                    "methods": {"label": "Methods", "type": "multiselect", "options": [
                        {"value": "wire", "label": "Wire"},
                        {"value": "crypto", "label": "Crypto"}
                    ]}
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_defaults_per_kind() {
        assert_eq!(default_value(FieldKind::Checkbox), json!(false));
        assert_eq!(default_value(FieldKind::Text), json!(""));
        assert_eq!(default_value(FieldKind::Number), json!(""));
        assert_eq!(default_value(FieldKind::Multiselect), json!([]));
        assert_eq!(default_value(FieldKind::ArrayFields), json!([]));
    }

    #[test]
    fn test_seed_values_create_mode() {
        let values = seed_values(&sample_config(), None);
        assert_eq!(values.get("general.name"), Some(&json!("")));
        assert_eq!(values.get("general.active"), Some(&json!(false)));
        assert_eq!(values.get("payout.methods"), Some(&json!([])));
    }

    #[test]
    fn test_seed_values_edit_mode_flattens_record() {
        let record = json!({"name": "FTMO", "active": true, "methods": ["wire"], "unrelated": 1});
        let record = record.as_object().unwrap();
        let values = seed_values(&sample_config(), Some(record));
        assert_eq!(values.get("general.name"), Some(&json!("FTMO")));
        assert_eq!(values.get("general.active"), Some(&json!(true)));
        assert_eq!(values.get("payout.methods"), Some(&json!(["wire"])));
        // Fields not in the schema never enter the form state
        assert!(!values.contains_key("general.unrelated"));
    }

    #[test]
    fn test_flatten_payload_strips_section_prefix() {
        let mut values = FormValues::new();
        values.insert("general.name".into(), json!("FTMO"));
        values.insert("payout.methods".into(), json!(["wire"]));
        let payload = flatten_payload(&values);
        assert_eq!(payload.get("name"), Some(&json!("FTMO")));
        assert_eq!(payload.get("methods"), Some(&json!(["wire"])));
        assert!(!payload.contains_key("general.name"));
    }

    #[test]
    fn test_validate_required_and_number() {
        let config = sample_config();
        let mut values = seed_values(&config, None);
        values.insert("general.max_accounts".into(), json!("abc"));

        let errors = validate(&config, &values);
        assert_eq!(
            errors.get("general.name"),
            Some(&vec!["Name is required".to_string()])
        );
        assert_eq!(
            errors.get("general.max_accounts"),
            Some(&vec!["Max accounts must be a number".to_string()])
        );

        values.insert("general.name".into(), json!("FTMO"));
        values.insert("general.max_accounts".into(), json!("10"));
        assert!(validate(&config, &values).is_empty());
    }

    #[test]
    fn test_path_for_field() {
        let config = sample_config();
        assert_eq!(
            path_for_field(&config, "methods").as_deref(),
            Some("payout.methods")
        );
        assert_eq!(path_for_field(&config, "missing"), None);
    }
}
