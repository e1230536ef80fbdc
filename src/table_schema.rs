//! Table Schema
//!
//! Server-supplied column/filter configuration and cell formatting rules
//! for the schema-driven table.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Insertion-ordered string-keyed map.
///
/// Column order on screen is the server's JSON object-key order, which a
/// plain `BTreeMap`/`HashMap` would destroy.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigMap<T>(pub Vec<(String, T)>);

impl<T> Default for ConfigMap<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> ConfigMap<T> {
    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, T)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ConfigMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor<T>(std::marker::PhantomData<T>);

        impl<'de, T: Deserialize<'de>> serde::de::Visitor<'de> for MapVisitor<T> {
            type Value = ConfigMap<T>;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, T>()? {
                    entries.push((key, value));
                }
                Ok(ConfigMap(entries))
            }
        }

        deserializer.deserialize_map(MapVisitor(std::marker::PhantomData))
    }
}

/// Column rendering kinds.
///
/// Unknown server strings fall through to `Other`, which renders the raw
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    #[default]
    Text,
    Boolean,
    Image,
    Json,
    #[serde(other)]
    Other,
}

/// One displayable column
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnConfig {
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: ColumnKind,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
}

fn default_true() -> bool {
    true
}

/// Filter widget kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    #[default]
    Text,
    Select,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

/// One filterable field
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilterConfig {
    #[serde(rename = "type", default)]
    pub kind: FilterKind,
    pub label: String,
    #[serde(default)]
    pub tooltip: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<FilterOption>>,
    #[serde(default)]
    pub placeholder: Option<String>,
}

impl FilterConfig {
    /// A select filter must supply options; a broken config degrades to an
    /// empty dropdown rather than a crash.
    pub fn options_or_empty(&self) -> &[FilterOption] {
        self.options.as_deref().unwrap_or(&[])
    }
}

/// True when a boolean-typed cell should show the "Yes" pill.
///
/// The server is loose about boolean encoding: `1`, `true`, `"1"` and
/// `"true"` all count as set.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s == "1" || s == "true",
        _ => false,
    }
}

/// Image cells only render values that are absolute http(s) URLs
pub fn is_absolute_http_url(value: &Value) -> bool {
    match value {
        Value::String(s) => s.starts_with("http://") || s.starts_with("https://"),
        _ => false,
    }
}

/// Plain-text rendering for non-boolean, non-image cells
pub fn format_cell(kind: ColumnKind, value: &Value) -> String {
    if value.is_null() {
        return String::new();
    }
    if kind == ColumnKind::Json {
        return serde_json::to_string(value).unwrap_or_default();
    }
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Substitute the `#...#` placeholder in a dashboard URL template with the
/// row id
pub fn substitute_row_id(template: &str, id: &crate::models::RowId) -> String {
    if let (Some(start), Some(rest)) = (template.find('#'), template.rfind('#')) {
        if rest > start {
            let mut out = String::with_capacity(template.len());
            out.push_str(&template[..start]);
            out.push_str(&id.to_string());
            out.push_str(&template[rest + 1..]);
            return out;
        }
    }
    template.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RowId;
    use serde_json::json;

    #[test]
    fn test_config_map_preserves_key_order() {
        let raw = r#"{"zeta":{"label":"Z"},"alpha":{"label":"A"},"mid":{"label":"M"}}"#;
        let map: ConfigMap<ColumnConfig> = serde_json::from_str(raw).unwrap();
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_column_config_defaults() {
        let col: ColumnConfig = serde_json::from_str(r#"{"label":"Name"}"#).unwrap();
        assert_eq!(col.kind, ColumnKind::Text);
        assert!(col.visible);
        assert!(!col.sortable);
        assert!(!col.filterable);
    }

    #[test]
    fn test_unknown_column_kind_falls_back() {
        let col: ColumnConfig =
            serde_json::from_str(r#"{"label":"X","type":"sparkline"}"#).unwrap();
        assert_eq!(col.kind, ColumnKind::Other);
    }

    #[test]
    fn test_truthy_values() {
        for v in [json!(1), json!(true), json!("1"), json!("true")] {
            assert!(is_truthy(&v), "{:?} should be truthy", v);
        }
        for v in [json!(0), json!(false), json!("0"), json!("yes"), json!(2), json!(null), json!([1])] {
            assert!(!is_truthy(&v), "{:?} should be falsy", v);
        }
    }

    #[test]
    fn test_image_url_guard() {
        assert!(is_absolute_http_url(&json!("https://cdn.example.com/a.png")));
        assert!(is_absolute_http_url(&json!("http://cdn.example.com/a.png")));
        assert!(!is_absolute_http_url(&json!("/uploads/a.png")));
        assert!(!is_absolute_http_url(&json!("ftp://x/a.png")));
        assert!(!is_absolute_http_url(&json!(42)));
    }

    #[test]
    fn test_format_json_cell_stringifies() {
        let v = json!({"a": 1});
        assert_eq!(format_cell(ColumnKind::Json, &v), r#"{"a":1}"#);
        assert_eq!(format_cell(ColumnKind::Text, &json!(null)), "");
        assert_eq!(format_cell(ColumnKind::Text, &json!(3)), "3");
    }

    #[test]
    fn test_substitute_row_id() {
        assert_eq!(
            substitute_row_id("/dashboard/#broker_id#/overview", &RowId::Num(9)),
            "/dashboard/9/overview"
        );
        assert_eq!(
            substitute_row_id("/plain/url", &RowId::Num(9)),
            "/plain/url"
        );
        assert_eq!(
            substitute_row_id("/x/#id#", &RowId::Str("b-2".into())),
            "/x/b-2"
        );
    }

    #[test]
    fn test_select_filter_options() {
        let f: FilterConfig = serde_json::from_str(
            r#"{"type":"select","label":"Status","options":[{"value":"1","label":"Active"}]}"#,
        )
        .unwrap();
        assert_eq!(f.kind, FilterKind::Select);
        assert_eq!(f.options_or_empty().len(), 1);

        let broken: FilterConfig =
            serde_json::from_str(r#"{"type":"select","label":"Status"}"#).unwrap();
        assert!(broken.options_or_empty().is_empty());
    }
}
