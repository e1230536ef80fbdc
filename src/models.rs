//! Wire Models
//!
//! Data structures matching the admin API's JSON shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Row identifier as the server sends it (numeric or string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Num(i64),
    Str(String),
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowId::Num(n) => write!(f, "{}", n),
            RowId::Str(s) => write!(f, "{}", s),
        }
    }
}

/// A server-shaped table row: an `id` plus whatever fields the column
/// configuration names
pub type TableRow = serde_json::Map<String, Value>;

/// Extract the `id` field from a row
pub fn row_id(row: &TableRow) -> Option<RowId> {
    match row.get("id") {
        Some(Value::Number(n)) => n.as_i64().map(RowId::Num),
        Some(Value::String(s)) => Some(RowId::Str(s.clone())),
        _ => None,
    }
}

/// Pagination metadata attached to every list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub from: u64,
    pub to: u64,
}

/// Broker summary as listed on the dashboard page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Broker {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub active: bool,
}

/// Challenge matrix tab levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChallengeTabKind {
    Category,
    Step,
    Amount,
}

impl ChallengeTabKind {
    /// URL path segment for this tab level
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeTabKind::Category => "category",
            ChallengeTabKind::Step => "step",
            ChallengeTabKind::Amount => "amount",
        }
    }
}

/// One drag-reorderable tab (category, step or amount).
///
/// Amount tabs come labeled `"<amount> <currency>"` by the server;
/// position is implicit in array order within the parent scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeTab {
    pub id: i64,
    pub label: String,
    pub slug: String,
}

/// Rebate-rate matrix for one broker
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RebateMatrix {
    /// Column headers, one per challenge amount
    pub amount_labels: Vec<String>,
    pub rows: Vec<RebateRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebateRow {
    pub id: i64,
    pub label: String,
    pub rates: Vec<RebateCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebateCell {
    pub amount_id: i64,
    pub rate: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_id_numeric_and_string() {
        let row: TableRow = serde_json::from_value(json!({"id": 7, "name": "x"})).unwrap();
        assert_eq!(row_id(&row), Some(RowId::Num(7)));

        let row: TableRow = serde_json::from_value(json!({"id": "abc-1"})).unwrap();
        assert_eq!(row_id(&row), Some(RowId::Str("abc-1".to_string())));

        let row: TableRow = serde_json::from_value(json!({"name": "no id"})).unwrap();
        assert_eq!(row_id(&row), None);
    }

    #[test]
    fn test_row_id_display() {
        assert_eq!(RowId::Num(42).to_string(), "42");
        assert_eq!(RowId::Str("b-9".into()).to_string(), "b-9");
    }

    #[test]
    fn test_challenge_tab_kind_path_segment() {
        assert_eq!(ChallengeTabKind::Category.as_str(), "category");
        assert_eq!(ChallengeTabKind::Step.as_str(), "step");
        assert_eq!(ChallengeTabKind::Amount.as_str(), "amount");
    }
}
