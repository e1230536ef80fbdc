//! Table View State
//!
//! The serializable sort/filter/page state of a list view. The URL query
//! string is the source of truth; localStorage only seeds filters into an
//! URL that lacks them.

use std::collections::BTreeMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};

pub const DEFAULT_PER_PAGE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// Sort/filter/page state of one list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub page: u32,
    pub per_page: u32,
    pub order_by: Option<String>,
    pub order_direction: Option<SortDirection>,
    /// Filter key → value; empty values are never stored
    pub filters: BTreeMap<String, String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            order_by: None,
            order_direction: None,
            filters: BTreeMap::new(),
        }
    }
}

impl ViewState {
    /// Parse from a URL query string (with or without the leading `?`)
    pub fn from_query_str(query: &str) -> Self {
        let mut state = Self::default();
        for (key, value) in parse_query_pairs(query) {
            match key.as_str() {
                "page" => {
                    if let Ok(p) = value.parse() {
                        state.page = p;
                    }
                }
                "per_page" => {
                    if let Ok(p) = value.parse() {
                        state.per_page = p;
                    }
                }
                "order_by" => state.order_by = Some(value),
                "order_direction" => state.order_direction = SortDirection::parse(&value),
                _ => {
                    if !value.is_empty() {
                        state.filters.insert(key, value);
                    }
                }
            }
        }
        if state.page == 0 {
            state.page = 1;
        }
        state
    }

    /// Serialize back to a query string (no leading `?`).
    ///
    /// Key order is stable: page, per_page, sort keys, then filters
    /// alphabetically, so equal states always produce equal strings.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(String, String)> = vec![
            ("page".into(), self.page.to_string()),
            ("per_page".into(), self.per_page.to_string()),
        ];
        if let Some(col) = &self.order_by {
            pairs.push(("order_by".into(), col.clone()));
            if let Some(dir) = self.order_direction {
                pairs.push(("order_direction".into(), dir.as_str().to_string()));
            }
        }
        for (k, v) in &self.filters {
            pairs.push((k.clone(), v.clone()));
        }
        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Header click. New column starts ascending, a second click flips to
    /// descending; tri-state tables clear the sort on the third click.
    pub fn toggle_sort(&mut self, column: &str, tri_state: bool) {
        if self.order_by.as_deref() != Some(column) {
            self.order_by = Some(column.to_string());
            self.order_direction = Some(SortDirection::Asc);
            return;
        }
        match self.order_direction {
            Some(SortDirection::Asc) => self.order_direction = Some(SortDirection::Desc),
            Some(SortDirection::Desc) if tri_state => {
                self.order_by = None;
                self.order_direction = None;
            }
            _ => self.order_direction = Some(SortDirection::Asc),
        }
    }

    /// Change one filter value. Empty clears the key; any change snaps the
    /// view back to page 1.
    pub fn set_filter(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            self.filters.remove(key);
        } else {
            self.filters.insert(key.to_string(), value.to_string());
        }
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn set_per_page(&mut self, per_page: u32) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    /// Seed filters remembered in localStorage into a state whose URL did
    /// not carry them. URL keys win. Returns whether anything changed, so
    /// the caller pushes the rewritten URL exactly once and never loops.
    pub fn adopt_stored_filters(&mut self, stored: &BTreeMap<String, String>) -> bool {
        let mut changed = false;
        for (key, value) in stored {
            if value.is_empty() || self.filters.contains_key(key) {
                continue;
            }
            self.filters.insert(key.clone(), value.clone());
            changed = true;
        }
        changed
    }
}

/// Row range shown by "Showing X to Y of Z"
pub fn page_bounds(page: u32, per_page: u32, total: u64) -> (u64, u64) {
    if total == 0 {
        return (0, 0);
    }
    let from = (page as u64 - 1) * per_page as u64 + 1;
    let to = (page as u64 * per_page as u64).min(total);
    (from, to)
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, NON_ALPHANUMERIC).to_string()
}

fn parse_query_pairs(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (k, v) = part.split_once('=').unwrap_or((part, ""));
            (decode(k), decode(v))
        })
        .collect()
}

fn decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_decode_str(&s).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_query_round_trip() {
        let mut state = ViewState::default();
        state.page = 3;
        state.per_page = 25;
        state.order_by = Some("name".into());
        state.order_direction = Some(SortDirection::Desc);
        state.set_filter("country", "DE");
        state.set_page(3);

        let query = state.to_query_string();
        let parsed = ViewState::from_query_str(&query);
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_parse_defaults_and_percent_decoding() {
        let state = ViewState::from_query_str("?name=a%20broker&page=0");
        assert_eq!(state.page, 1);
        assert_eq!(state.per_page, DEFAULT_PER_PAGE);
        assert_eq!(state.filters.get("name").map(String::as_str), Some("a broker"));
    }

    #[test]
    fn test_toggle_sort_two_state() {
        let mut state = ViewState::default();
        state.toggle_sort("name", false);
        assert_eq!(state.order_by.as_deref(), Some("name"));
        assert_eq!(state.order_direction, Some(SortDirection::Asc));

        state.toggle_sort("name", false);
        assert_eq!(state.order_direction, Some(SortDirection::Desc));

        // Two-state tables cycle back to ascending
        state.toggle_sort("name", false);
        assert_eq!(state.order_direction, Some(SortDirection::Asc));

        // Switching column restarts ascending
        state.toggle_sort("country", false);
        assert_eq!(state.order_by.as_deref(), Some("country"));
        assert_eq!(state.order_direction, Some(SortDirection::Asc));
    }

    #[test]
    fn test_toggle_sort_tri_state_clears() {
        let mut state = ViewState::default();
        state.toggle_sort("name", true);
        state.toggle_sort("name", true);
        assert_eq!(state.order_direction, Some(SortDirection::Desc));

        state.toggle_sort("name", true);
        assert_eq!(state.order_by, None);
        assert_eq!(state.order_direction, None);
        assert!(!state.to_query_string().contains("order_by"));
    }

    #[test]
    fn test_set_filter_resets_page() {
        let mut state = ViewState::default();
        state.set_page(4);
        state.set_filter("status", "1");
        assert_eq!(state.page, 1);
        state.set_page(2);
        state.set_filter("status", "");
        assert_eq!(state.page, 1);
        assert!(state.filters.is_empty());
    }

    #[test]
    fn test_adopt_stored_filters_once() {
        let mut state = ViewState::from_query_str("");
        let remembered = stored(&[("country", "DE"), ("status", "1")]);

        assert!(state.adopt_stored_filters(&remembered));
        assert_eq!(state.filters.get("country").map(String::as_str), Some("DE"));

        // Second adoption is a no-op: nothing left to push
        assert!(!state.adopt_stored_filters(&remembered));
    }

    #[test]
    fn test_adopt_stored_filters_url_wins() {
        let mut state = ViewState::from_query_str("?country=FR");
        let remembered = stored(&[("country", "DE")]);
        assert!(!state.adopt_stored_filters(&remembered));
        assert_eq!(state.filters.get("country").map(String::as_str), Some("FR"));
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(1, 10, 35), (1, 10));
        assert_eq!(page_bounds(2, 10, 35), (11, 20));
        assert_eq!(page_bounds(4, 10, 35), (31, 35));
        assert_eq!(page_bounds(1, 10, 0), (0, 0));
        assert_eq!(page_bounds(1, 10, 3), (1, 3));
    }
}
