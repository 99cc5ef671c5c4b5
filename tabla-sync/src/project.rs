//! Typed parameters → table state.
//!
//! The projector maps a [`TypedParams`] bag onto the three facets of
//! [`TableState`]:
//!
//! - pagination: `pageIndex = max(page - 1, 0)`, `pageSize = limit`
//! - filters: one entry per declared [`FilterColumn`] whose parameter is set
//! - sort: `sortBy=<columnId>:<asc|desc>`, anything malformed means no sort

use crate::constants::{
    BOOL_FALSE, BOOL_TRUE, DEFAULT_LIMIT, DEFAULT_PAGE, LIMIT_KEY, LIST_SEPARATOR, PAGE_KEY,
    SORT_ASC, SORT_DESC, SORT_KEY, SORT_SEPARATOR,
};
use crate::schema::ParamKind;
use crate::table::{ColumnFilter, FilterValue, Pagination, SortEntry, TableState};
use crate::typed::{TypedParams, TypedValue};

/// How a filter column is written to the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FilterEncoding {
    /// Raw text (`q=expediente`).
    Text,
    /// Comma-joined tokens (`estado=ABIERTO,ARCHIVADO`).
    List,
    /// `true` / `false` (`activo=true`).
    Bool,
}

impl FilterEncoding {
    /// Schema kind the column's parameter must be declared with.
    #[must_use]
    pub const fn param_kind(self) -> ParamKind {
        match self {
            Self::Text => ParamKind::String,
            Self::List => ParamKind::StringArray,
            Self::Bool => ParamKind::Boolean,
        }
    }
}

/// A filterable table column bound to a URL parameter.
///
/// By default the parameter key equals the column id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterColumn {
    column_id: String,
    key: String,
    encoding: FilterEncoding,
}

impl FilterColumn {
    /// Column bound to `key` with the given encoding.
    pub fn new(column_id: &str, key: &str, encoding: FilterEncoding) -> Self {
        Self {
            column_id: column_id.to_string(),
            key: key.to_string(),
            encoding,
        }
    }

    /// Free-text column.
    pub fn text(column_id: &str) -> Self {
        Self::new(column_id, column_id, FilterEncoding::Text)
    }

    /// Multi-value column.
    pub fn list(column_id: &str) -> Self {
        Self::new(column_id, column_id, FilterEncoding::List)
    }

    /// Boolean column.
    pub fn boolean(column_id: &str) -> Self {
        Self::new(column_id, column_id, FilterEncoding::Bool)
    }

    /// Bind to a parameter key other than the column id.
    #[must_use]
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    /// Column id as known to the widget.
    #[inline]
    pub fn column_id(&self) -> &str {
        &self.column_id
    }

    /// URL parameter key.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Wire encoding.
    #[inline]
    pub const fn encoding(&self) -> FilterEncoding {
        self.encoding
    }

    /// Widget filter value for a typed parameter, `None` when it does not apply.
    pub fn decode(&self, value: &TypedValue) -> Option<FilterValue> {
        match (self.encoding, value) {
            (FilterEncoding::Text, TypedValue::String(s)) => Some(FilterValue::Text(s.clone())),
            (FilterEncoding::List, TypedValue::StringArray(v)) => {
                Some(FilterValue::List(v.clone()))
            },
            (FilterEncoding::Bool, TypedValue::Boolean(b)) => {
                Some(FilterValue::text(if *b { BOOL_TRUE } else { BOOL_FALSE }))
            },
            _ => None,
        }
    }

    /// Wire string for a widget filter value, `None` when the value is empty
    /// (the key must then be removed).
    ///
    /// List tokens are joined with `,`. A token that itself contains `,`
    /// could not be told apart on the way back, so it is dropped (and
    /// logged at debug level) along with empty tokens.
    pub fn encode(&self, value: &FilterValue) -> Option<String> {
        let joined = match value {
            FilterValue::Text(s) => s.clone(),
            FilterValue::List(tokens) => self.join_tokens(tokens),
        };
        if joined.is_empty() {
            return None;
        }
        match self.encoding {
            FilterEncoding::Text | FilterEncoding::List => Some(joined),
            FilterEncoding::Bool => match joined.as_str() {
                BOOL_TRUE | BOOL_FALSE => Some(joined),
                other => {
                    crate::log!(debug, "boolean filter cleared", column: self.column_id, value: other);
                    None
                },
            },
        }
    }

    fn join_tokens(&self, tokens: &[String]) -> String {
        let mut out = String::new();
        for t in tokens.iter().filter(|t| !t.is_empty()) {
            if t.contains(LIST_SEPARATOR) {
                crate::log!(debug, "list token dropped", column: self.column_id, token: t);
                continue;
            }
            if !out.is_empty() {
                out.push(LIST_SEPARATOR);
            }
            out.push_str(t);
        }
        out
    }
}

/// Parse a `sortBy` value (`<columnId>:<asc|desc>`).
///
/// Returns `None` for a missing separator, an empty column, an unknown
/// direction, or a column outside `sortable` (when `sortable` is non-empty).
///
/// ```
/// use tabla_sync::{SortEntry, parse_sort};
///
/// assert_eq!(parse_sort("fechaIngreso:desc", &[]), Some(SortEntry::desc("fechaIngreso")));
/// assert_eq!(parse_sort("bogus", &[]), None);
/// assert_eq!(parse_sort("nombre:up", &[]), None);
/// ```
pub fn parse_sort(raw: &str, sortable: &[String]) -> Option<SortEntry> {
    let Some((column, direction)) = raw.rsplit_once(SORT_SEPARATOR) else {
        crate::log!(debug, "sort ignored", value: raw, reason: "missing separator");
        return None;
    };
    let descending = match direction {
        SORT_ASC => false,
        SORT_DESC => true,
        _ => {
            crate::log!(debug, "sort ignored", value: raw, reason: "unknown direction");
            return None;
        },
    };
    if column.is_empty() {
        crate::log!(debug, "sort ignored", value: raw, reason: "empty column");
        return None;
    }
    if !sortable.is_empty() && !sortable.iter().any(|c| c == column) {
        crate::log!(debug, "sort ignored", value: raw, reason: "column not sortable");
        return None;
    }
    Some(SortEntry::new(column, descending))
}

/// Wire form of a sort entry.
///
/// ```
/// use tabla_sync::{SortEntry, format_sort};
///
/// assert_eq!(format_sort(&SortEntry::desc("fechaIngreso")), "fechaIngreso:desc");
/// ```
pub fn format_sort(entry: &SortEntry) -> String {
    let direction = if entry.descending { SORT_DESC } else { SORT_ASC };
    format!("{}{SORT_SEPARATOR}{direction}", entry.column_id)
}

/// Project typed parameters onto table state.
pub fn project(typed: &TypedParams, columns: &[FilterColumn], sortable: &[String]) -> TableState {
    let page = typed.int(PAGE_KEY).unwrap_or(DEFAULT_PAGE);
    let page_index = u64::try_from(page.saturating_sub(1)).unwrap_or(0);
    let page_size = typed
        .int(LIMIT_KEY)
        .and_then(|n| u64::try_from(n).ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_LIMIT.unsigned_abs());

    let filters = columns
        .iter()
        .filter_map(|col| {
            let value = col.decode(typed.get(col.key())?)?;
            (!value.is_empty()).then(|| ColumnFilter::new(col.column_id(), value))
        })
        .collect();

    let sort = typed
        .text(SORT_KEY)
        .and_then(|raw| parse_sort(raw, sortable))
        .into_iter()
        .collect();

    TableState::new(Pagination::new(page_index, page_size), filters, sort)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::UrlParams;
    use crate::schema::QueryParamSchema;

    fn columns() -> Vec<FilterColumn> {
        vec![
            FilterColumn::text("q"),
            FilterColumn::list("estado"),
            FilterColumn::list("prioridad"),
            FilterColumn::boolean("activo"),
        ]
    }

    fn project_query(query: &str) -> TableState {
        let schema = QueryParamSchema::builder()
            .pagination()
            .string("q")
            .string_array("estado")
            .string_array("prioridad")
            .boolean("activo")
            .sort()
            .build()
            .unwrap();
        let sortable = vec!["fechaIngreso".to_string(), "asunto".to_string()];
        project(&schema.read(&UrlParams::parse(query)), &columns(), &sortable)
    }

    #[test]
    fn test_defaults() {
        let state = project_query("");
        assert_eq!(state.pagination, Pagination::new(0, 10));
        assert!(state.filters.is_empty());
        assert!(state.sort.is_empty());
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(project_query("page=1").pagination.page_index, 0);
        assert_eq!(project_query("page=2").pagination.page_index, 1);
        assert_eq!(project_query("page=40&limit=50").pagination, Pagination::new(39, 50));
    }

    #[test]
    fn test_page_zero_and_negative_clamp() {
        assert_eq!(project_query("page=0").pagination.page_index, 0);
        assert_eq!(project_query("page=-7").pagination.page_index, 0);
        assert_eq!(
            project_query(&format!("page={}", i64::MIN)).pagination.page_index,
            0
        );
    }

    #[test]
    fn test_filters_in_column_order() {
        let state = project_query("activo=false&estado=ABIERTO,ARCHIVADO&q=nota");
        assert_eq!(
            state.filters,
            vec![
                ColumnFilter::new("q", FilterValue::text("nota")),
                ColumnFilter::new("estado", FilterValue::list(["ABIERTO", "ARCHIVADO"])),
                ColumnFilter::new("activo", FilterValue::text("false")),
            ]
        );
    }

    #[test]
    fn test_absent_and_empty_filters_skipped() {
        let state = project_query("q=&estado=&prioridad=ALTA");
        assert_eq!(
            state.filters,
            vec![ColumnFilter::new("prioridad", FilterValue::list(["ALTA"]))]
        );
    }

    #[test]
    fn test_sort_parsed() {
        assert_eq!(
            project_query("sortBy=fechaIngreso:desc").sort,
            vec![SortEntry::desc("fechaIngreso")]
        );
        assert_eq!(
            project_query("sortBy=asunto:asc").sort,
            vec![SortEntry::asc("asunto")]
        );
    }

    #[test]
    fn test_malformed_sort_is_empty() {
        for raw in ["bogus", "fechaIngreso:", ":desc", "fechaIngreso:DESC", "estado:asc"] {
            assert!(
                project_query(&format!("sortBy={raw}")).sort.is_empty(),
                "sortBy={raw} should not sort"
            );
        }
    }

    #[test]
    fn test_parse_sort_open_set() {
        assert_eq!(parse_sort("cualquiera:asc", &[]), Some(SortEntry::asc("cualquiera")));
        assert_eq!(parse_sort("a:b:desc", &[]), Some(SortEntry::desc("a:b")));
    }

    #[test]
    fn test_encode_list_drops_empty_tokens() {
        let col = FilterColumn::list("estado");
        assert_eq!(
            col.encode(&FilterValue::list(["ABIERTO", "", "ARCHIVADO"])),
            Some("ABIERTO,ARCHIVADO".to_string())
        );
        assert_eq!(col.encode(&FilterValue::list([""])), None);
        assert_eq!(col.encode(&FilterValue::text("ALTA")), Some("ALTA".to_string()));
    }

    #[test]
    fn test_encode_list_drops_tokens_with_separator() {
        let col = FilterColumn::list("estado");
        assert_eq!(
            col.encode(&FilterValue::list(["A,B", "C"])),
            Some("C".to_string())
        );
        assert_eq!(col.encode(&FilterValue::list(["A,B"])), None);
    }

    #[test]
    fn test_large_limit_kept() {
        assert_eq!(project_query("limit=500").pagination, Pagination::new(0, 500));
        assert_eq!(
            project_query(&format!("limit={}", i64::MAX)).pagination.page_size,
            i64::MAX.unsigned_abs()
        );
    }

    #[test]
    fn test_encode_boolean() {
        let col = FilterColumn::boolean("activo");
        assert_eq!(col.encode(&FilterValue::text("true")), Some("true".to_string()));
        assert_eq!(col.encode(&FilterValue::text("si")), None);
        assert_eq!(col.encode(&FilterValue::text("")), None);
    }

    #[test]
    fn test_with_key() {
        let col = FilterColumn::list("tipoDocumento").with_key("tipoDocumentoId");
        assert_eq!(col.column_id(), "tipoDocumento");
        assert_eq!(col.key(), "tipoDocumentoId");
        assert_eq!(col.encoding().param_kind(), ParamKind::StringArray);
    }
}
