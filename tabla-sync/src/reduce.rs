//! Table changes → next URL parameters.
//!
//! The reducer merges a widget change into the current parameters. Keys
//! the change does not touch are carried over unchanged, including keys
//! no schema declares.

use crate::constants::{DEFAULT_PAGE, LIMIT_KEY, MAX_WIRE_INT, PAGE_KEY, SORT_KEY};
use crate::params::{RawValue, UrlParams};
use crate::project::{FilterColumn, format_sort};
use crate::table::{ColumnFilter, Pagination, SortEntry};

/// A controlled-state change reported by the table widget.
///
/// Each variant carries the complete new value of one facet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TableChange {
    /// New page position.
    Pagination(Pagination),
    /// The full set of active filters. Declared columns missing here are cleared.
    Filters(Vec<ColumnFilter>),
    /// New sort keys. Only the first one is kept.
    Sorting(Vec<SortEntry>),
}

/// Compute the next URL parameters for `change`.
///
/// - `Pagination` writes `page` (1-based) and `limit`, clamped to `1..=i64::MAX`.
/// - `Filters` writes or removes each declared column's key. When any column
///   receives a new non-empty value, `page` is reset to `1`; clearing
///   filters alone keeps the current page.
/// - `Sorting` writes `sortBy`, or removes it for an empty sort.
///
/// ```
/// use tabla_sync::{FilterColumn, Pagination, TableChange, UrlParams, reduce};
///
/// let current = UrlParams::parse("estado=ABIERTO&prioridad=ALTA");
/// let columns = [FilterColumn::list("estado"), FilterColumn::list("prioridad")];
/// let next = reduce(&current, &TableChange::Pagination(Pagination::new(1, 10)), &columns);
/// assert_eq!(next.to_query_string(), "estado=ABIERTO&prioridad=ALTA&page=2&limit=10");
/// ```
pub fn reduce(current: &UrlParams, change: &TableChange, columns: &[FilterColumn]) -> UrlParams {
    let mut next = current.clone();
    match change {
        TableChange::Pagination(p) => {
            next.set(PAGE_KEY, p.url_page().min(MAX_WIRE_INT).to_string());
            next.set(LIMIT_KEY, p.page_size.clamp(1, MAX_WIRE_INT).to_string());
        },
        TableChange::Filters(filters) => {
            for f in filters {
                if !columns.iter().any(|c| c.column_id() == f.column_id) {
                    crate::log!(debug, "filter ignored", column: f.column_id, reason: "undeclared column");
                }
            }

            let mut narrowed = false;
            for col in columns {
                let encoded = filters
                    .iter()
                    .find(|f| f.column_id == col.column_id())
                    .and_then(|f| col.encode(&f.value));
                match encoded {
                    Some(value) => {
                        let value = RawValue::One(value);
                        if current.get(col.key()) != Some(&value) {
                            narrowed = true;
                        }
                        next.set(col.key(), value);
                    },
                    None => {
                        next.remove(col.key());
                    },
                }
            }

            if narrowed {
                next.set(PAGE_KEY, DEFAULT_PAGE.to_string());
            }
        },
        TableChange::Sorting(entries) => match entries.first() {
            Some(entry) => next.set(SORT_KEY, format_sort(entry)),
            None => {
                next.remove(SORT_KEY);
            },
        },
    }
    next
}
