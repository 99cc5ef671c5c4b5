//! The table-state synchronizer.
//!
//! [`TableSync`] binds one listing screen: its route, its parameter
//! schema, the filterable columns and the sortable columns. It is built
//! once per screen and reused for every render and every table change.
//!
//! ```
//! use tabla_sync::{
//!     FilterColumn, MemoryNavigator, Pagination, QueryParamSchema, TableChange, TableSync,
//! };
//!
//! let schema = QueryParamSchema::builder()
//!     .pagination()
//!     .string("q")
//!     .sort()
//!     .build()
//!     .unwrap();
//! let sync = TableSync::builder("/oficinas", schema)
//!     .filter(FilterColumn::text("q"))
//!     .sortable(["nombre"])
//!     .build()
//!     .unwrap();
//!
//! let mut nav = MemoryNavigator::new("/oficinas?q=Partes");
//! sync.apply(&mut nav, &TableChange::Pagination(Pagination::new(2, 10)));
//! assert_eq!(nav.href(), "/oficinas?q=Partes&page=3&limit=10");
//! assert_eq!(sync.table_state(&nav).pagination.page_index, 2);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::constants::SORT_KEY;
use crate::navigation::{NavigateRequest, Navigator};
use crate::params::UrlParams;
use crate::project::{FilterColumn, project};
use crate::reduce::{TableChange, reduce};
use crate::schema::{ParamKind, QueryParamSchema, SchemaError};
use crate::table::TableState;
use crate::typed::TypedParams;

/// Bidirectional mapping between a screen's URL and its table state.
///
/// Not `Sync`: the projection cache is a single-threaded `RefCell`.
#[derive(Debug)]
pub struct TableSync {
    route: String,
    schema: QueryParamSchema,
    columns: Vec<FilterColumn>,
    sortable: Vec<String>,
    cache: RefCell<Option<(String, Rc<TableState>)>>,
}

impl TableSync {
    /// Start declaring a synchronizer for `route`.
    pub fn builder(route: &str, schema: QueryParamSchema) -> TableSyncBuilder {
        TableSyncBuilder {
            route: route.to_string(),
            schema,
            columns: Vec::new(),
            sortable: Vec::new(),
        }
    }

    /// Route path the synchronizer navigates to.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Parameter schema.
    pub const fn schema(&self) -> &QueryParamSchema {
        &self.schema
    }

    /// Filter columns in declaration order.
    pub fn columns(&self) -> &[FilterColumn] {
        &self.columns
    }

    /// Filter column with `column_id`.
    pub fn column(&self, column_id: &str) -> Option<&FilterColumn> {
        self.columns.iter().find(|c| c.column_id() == column_id)
    }

    /// Sortable column ids. Empty means any column may be sorted.
    pub fn sortable(&self) -> &[String] {
        &self.sortable
    }

    /// Typed, defaulted view of `params`.
    pub fn read(&self, params: &UrlParams) -> TypedParams {
        self.schema.read(params)
    }

    /// Table state for `params`, computed without the cache.
    pub fn project(&self, params: &UrlParams) -> TableState {
        project(&self.read(params), &self.columns, &self.sortable)
    }

    /// Table state of the navigator's current location.
    ///
    /// Memoized on the serialized parameters: while the URL does not change,
    /// every call returns the same shared instance.
    pub fn table_state<N: Navigator + ?Sized>(&self, nav: &N) -> Rc<TableState> {
        let params = nav.current_search();
        let key = params.to_query_string();

        if let Some((cached_key, state)) = self.cache.borrow().as_ref()
            && *cached_key == key
        {
            return Rc::clone(state);
        }

        let state = Rc::new(self.project(&params));
        *self.cache.borrow_mut() = Some((key, Rc::clone(&state)));
        state
    }

    /// Next parameters for `change` applied on top of `current`. Pure.
    pub fn reduce(&self, current: &UrlParams, change: &TableChange) -> UrlParams {
        reduce(current, change, &self.columns)
    }

    /// Apply `change` to the navigator's current location.
    ///
    /// Reads the live parameters, reduces, and issues exactly one
    /// replacing navigation. Returns the parameters navigated to.
    pub fn apply<N: Navigator + ?Sized>(&self, nav: &mut N, change: &TableChange) -> UrlParams {
        let current = nav.current_search();
        let next = self.reduce(&current, change);
        crate::log!(debug, "table navigation", to: self.route, from: current, search: next);
        nav.navigate(NavigateRequest::replace(self.route.as_str(), next.clone()));
        next
    }

    /// Link to this screen with `params`.
    pub fn href(&self, params: &UrlParams) -> String {
        NavigateRequest::push(self.route.as_str(), params.clone()).href()
    }
}

/// Builder for [`TableSync`]. See [`TableSync::builder`].
#[derive(Debug)]
pub struct TableSyncBuilder {
    route: String,
    schema: QueryParamSchema,
    columns: Vec<FilterColumn>,
    sortable: Vec<String>,
}

impl TableSyncBuilder {
    /// Add a filter column.
    #[must_use]
    pub fn filter(mut self, column: FilterColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Restrict sorting to these column ids.
    #[must_use]
    pub fn sortable<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sortable.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Check every column against the schema and finish.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::UnknownKey`] when a column (or the sortable set)
    ///   needs a key the schema does not declare
    /// - [`SchemaError::KindMismatch`] when the declared kind does not fit
    /// - [`SchemaError::DuplicateColumn`] / [`SchemaError::DuplicateKey`]
    ///   when two columns share an id or a key
    pub fn build(self) -> Result<TableSync, SchemaError> {
        for (i, col) in self.columns.iter().enumerate() {
            let earlier = &self.columns[..i];
            if earlier.iter().any(|c| c.column_id() == col.column_id()) {
                return Err(SchemaError::DuplicateColumn {
                    column: col.column_id().to_string(),
                });
            }
            if earlier.iter().any(|c| c.key() == col.key()) {
                return Err(SchemaError::DuplicateKey {
                    key: col.key().to_string(),
                });
            }
            require_kind(&self.schema, col.key(), col.encoding().param_kind())?;
        }
        if !self.sortable.is_empty() {
            require_kind(&self.schema, SORT_KEY, ParamKind::String)?;
        }

        Ok(TableSync {
            route: self.route,
            schema: self.schema,
            columns: self.columns,
            sortable: self.sortable,
            cache: RefCell::new(None),
        })
    }
}

fn require_kind(
    schema: &QueryParamSchema,
    key: &str,
    expected: ParamKind,
) -> Result<(), SchemaError> {
    let spec = schema.spec(key).ok_or_else(|| SchemaError::UnknownKey {
        key: key.to_string(),
    })?;
    if spec.kind() == expected {
        Ok(())
    } else {
        Err(SchemaError::KindMismatch {
            key: key.to_string(),
            expected,
            found: spec.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::MemoryNavigator;
    use crate::table::{ColumnFilter, FilterValue, Pagination, SortEntry};

    fn sync() -> TableSync {
        let schema = QueryParamSchema::builder()
            .pagination()
            .string("q")
            .string_array("estado")
            .sort()
            .build()
            .unwrap();
        TableSync::builder("/tramites", schema)
            .filter(FilterColumn::text("q"))
            .filter(FilterColumn::list("estado"))
            .sortable(["fechaIngreso", "numero"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_memoized_state_is_shared() {
        let sync = sync();
        let nav = MemoryNavigator::new("/tramites?estado=ABIERTO");
        let a = sync.table_state(&nav);
        let b = sync.table_state(&nav);
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_memo_invalidated_by_navigation() {
        let sync = sync();
        let mut nav = MemoryNavigator::new("/tramites");
        let before = sync.table_state(&nav);
        sync.apply(&mut nav, &TableChange::Sorting(vec![SortEntry::desc("numero")]));
        let after = sync.table_state(&nav);
        assert!(!Rc::ptr_eq(&before, &after));
        assert_eq!(after.sort, vec![SortEntry::desc("numero")]);
    }

    #[test]
    fn test_apply_replaces_once() {
        let sync = sync();
        let mut nav = MemoryNavigator::new("/tramites?estado=ABIERTO&page=4");
        let next = sync.apply(
            &mut nav,
            &TableChange::Filters(vec![ColumnFilter::new(
                "estado",
                FilterValue::list(["ARCHIVADO"]),
            )]),
        );
        assert_eq!(next.to_query_string(), "estado=ARCHIVADO&page=1");
        assert_eq!(nav.navigations(), 1);
        assert_eq!(nav.history_len(), 1);
        assert_eq!(nav.href(), "/tramites?estado=ARCHIVADO&page=1");
    }

    #[test]
    fn test_apply_reads_live_location() {
        let sync = sync();
        let mut nav = MemoryNavigator::new("/tramites");
        sync.apply(&mut nav, &TableChange::Pagination(Pagination::new(1, 10)));
        sync.apply(&mut nav, &TableChange::Sorting(vec![SortEntry::asc("numero")]));
        assert_eq!(nav.href(), "/tramites?page=2&limit=10&sortBy=numero:asc");
    }

    #[test]
    fn test_large_page_size_survives_navigation() {
        let sync = sync();
        let mut nav = MemoryNavigator::new("/tramites");
        sync.apply(&mut nav, &TableChange::Pagination(Pagination::new(0, 200)));
        assert_eq!(nav.href(), "/tramites?page=1&limit=200");
        assert_eq!(sync.table_state(&nav).pagination, Pagination::new(0, 200));

        let state = sync.project(&UrlParams::parse("limit=500"));
        assert_eq!(state.pagination.page_size, 500);
    }

    #[test]
    fn test_unsortable_column_ignored() {
        let sync = sync();
        let state = sync.project(&UrlParams::parse("sortBy=asunto:asc"));
        assert!(state.sort.is_empty());
    }

    #[test]
    fn test_href() {
        let sync = sync();
        assert_eq!(sync.href(&UrlParams::new()), "/tramites");
        assert_eq!(
            sync.href(&UrlParams::parse("q=oficio 12")),
            "/tramites?q=oficio%2012"
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let schema = QueryParamSchema::builder().pagination().build().unwrap();
        let err = TableSync::builder("/x", schema)
            .filter(FilterColumn::list("estado"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownKey {
                key: "estado".to_string()
            }
        );
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let schema = QueryParamSchema::builder().string("estado").build().unwrap();
        let err = TableSync::builder("/x", schema)
            .filter(FilterColumn::list("estado"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::KindMismatch {
                key: "estado".to_string(),
                expected: ParamKind::StringArray,
                found: ParamKind::String,
            }
        );
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let schema = QueryParamSchema::builder()
            .string("q")
            .string("texto")
            .build()
            .unwrap();
        let err = TableSync::builder("/x", schema)
            .filter(FilterColumn::text("q"))
            .filter(FilterColumn::text("q").with_key("texto"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateColumn {
                column: "q".to_string()
            }
        );
    }

    #[test]
    fn test_sortable_requires_sort_key() {
        let schema = QueryParamSchema::builder().pagination().build().unwrap();
        let err = TableSync::builder("/x", schema)
            .sortable(["nombre"])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownKey {
                key: "sortBy".to_string()
            }
        );
    }
}
