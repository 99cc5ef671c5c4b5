//! Table state consumed by the remote-data table widget.
//!
//! These types mirror the widget's controlled state: `pagination`,
//! `columnFilters` and `sorting`. They are always derived from the URL;
//! nothing here is persisted on its own.

use miniserde::json::{Array, Number, Object, Value};

/// Page position. `page_index` is 0-based; the URL's `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct Pagination {
    /// 0-based page index.
    pub page_index: u64,
    /// Rows per page (positive).
    pub page_size: u64,
}

impl Pagination {
    /// Create a pagination state.
    #[must_use]
    pub const fn new(page_index: u64, page_size: u64) -> Self {
        Self {
            page_index,
            page_size,
        }
    }

    /// 1-based page number as written to the URL (`pageIndex + 1`).
    #[must_use]
    pub const fn url_page(&self) -> u64 {
        self.page_index.saturating_add(1)
    }
}

/// Value of one column filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FilterValue {
    /// Free text, or `"true"`/`"false"` for boolean columns.
    Text(String),
    /// "Any of these" tokens for multi-value columns.
    List(Vec<String>),
}

impl FilterValue {
    /// Text filter.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// List filter.
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// True for empty text, or a list without non-empty tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::List(v) => v.iter().all(String::is_empty),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::List(v) => {
                let mut arr = Array::new();
                arr.extend(v.iter().cloned().map(Value::String));
                Value::Array(arr)
            },
        }
    }
}

/// One active column filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct ColumnFilter {
    /// Column id.
    pub column_id: String,
    /// Filter value.
    pub value: FilterValue,
}

impl ColumnFilter {
    /// Create a column filter.
    pub fn new(column_id: impl Into<String>, value: FilterValue) -> Self {
        Self {
            column_id: column_id.into(),
            value,
        }
    }
}

/// One sort key. Listing screens use at most one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct SortEntry {
    /// Column id.
    pub column_id: String,
    /// Descending order.
    pub descending: bool,
}

impl SortEntry {
    /// Create a sort entry.
    pub fn new(column_id: impl Into<String>, descending: bool) -> Self {
        Self {
            column_id: column_id.into(),
            descending,
        }
    }

    /// Ascending sort on `column_id`.
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, false)
    }

    /// Descending sort on `column_id`.
    pub fn desc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, true)
    }
}

/// Pagination, filters and sort of one listing table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct TableState {
    /// Page position.
    pub pagination: Pagination,
    /// Active filters, column ids unique.
    pub filters: Vec<ColumnFilter>,
    /// Sort keys, zero or one in practice.
    pub sort: Vec<SortEntry>,
}

impl TableState {
    /// Create a table state.
    #[must_use]
    pub const fn new(
        pagination: Pagination,
        filters: Vec<ColumnFilter>,
        sort: Vec<SortEntry>,
    ) -> Self {
        Self {
            pagination,
            filters,
            sort,
        }
    }

    /// Filter value for `column_id`.
    pub fn filter(&self, column_id: &str) -> Option<&FilterValue> {
        self.filters
            .iter()
            .find(|f| f.column_id == column_id)
            .map(|f| &f.value)
    }

    /// Controlled state for the widget as JSON:
    /// `{"columnFilters":[{"id","value"}],"pagination":{"pageIndex","pageSize"},"sorting":[{"desc","id"}]}`.
    ///
    /// Object keys are emitted in sorted order.
    #[must_use]
    pub fn to_widget_json(&self) -> String {
        let mut pagination = Object::new();
        pagination.insert(
            "pageIndex".to_string(),
            Value::Number(Number::U64(self.pagination.page_index)),
        );
        pagination.insert(
            "pageSize".to_string(),
            Value::Number(Number::U64(self.pagination.page_size)),
        );

        let mut filters = Array::new();
        for f in &self.filters {
            let mut entry = Object::new();
            entry.insert("id".to_string(), Value::String(f.column_id.clone()));
            entry.insert("value".to_string(), f.value.to_json());
            filters.push(Value::Object(entry));
        }

        let mut sorting = Array::new();
        for s in &self.sort {
            let mut entry = Object::new();
            entry.insert("id".to_string(), Value::String(s.column_id.clone()));
            entry.insert("desc".to_string(), Value::Bool(s.descending));
            sorting.push(Value::Object(entry));
        }

        let mut root = Object::new();
        root.insert("pagination".to_string(), Value::Object(pagination));
        root.insert("columnFilters".to_string(), Value::Array(filters));
        root.insert("sorting".to_string(), Value::Array(sorting));
        miniserde::json::to_string(&Value::Object(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_page_offset() {
        assert_eq!(Pagination::new(0, 10).url_page(), 1);
        assert_eq!(Pagination::new(4, 10).url_page(), 5);
        assert_eq!(Pagination::new(u64::MAX, 10).url_page(), u64::MAX);
    }

    #[test]
    fn test_filter_value_emptiness() {
        assert!(FilterValue::text("").is_empty());
        assert!(!FilterValue::text("abc").is_empty());
        assert!(FilterValue::list(Vec::<String>::new()).is_empty());
        assert!(FilterValue::list([""]).is_empty());
        assert!(!FilterValue::list(["ABIERTO"]).is_empty());
    }

    #[test]
    fn test_filter_lookup() {
        let state = TableState::new(
            Pagination::new(0, 10),
            vec![ColumnFilter::new("estado", FilterValue::list(["ABIERTO"]))],
            vec![],
        );
        assert_eq!(state.filter("estado"), Some(&FilterValue::list(["ABIERTO"])));
        assert_eq!(state.filter("prioridad"), None);
    }

    #[test]
    fn test_widget_json() {
        let state = TableState::new(
            Pagination::new(2, 25),
            vec![
                ColumnFilter::new("q", FilterValue::text("nota \"urgente\"")),
                ColumnFilter::new("estado", FilterValue::list(["ABIERTO", "ARCHIVADO"])),
            ],
            vec![SortEntry::desc("fechaIngreso")],
        );
        insta::assert_snapshot!(state.to_widget_json(), @r#"{"columnFilters":[{"id":"q","value":"nota \"urgente\""},{"id":"estado","value":["ABIERTO","ARCHIVADO"]}],"pagination":{"pageIndex":2,"pageSize":25},"sorting":[{"desc":true,"id":"fechaIngreso"}]}"#);
    }

    #[test]
    fn test_widget_json_empty_state() {
        let state = TableState::new(Pagination::new(0, 10), vec![], vec![]);
        assert_eq!(
            state.to_widget_json(),
            r#"{"columnFilters":[],"pagination":{"pageIndex":0,"pageSize":10},"sorting":[]}"#
        );
    }
}
