// =============================================================================
// CRATE-LEVEL QUALITY LINTS
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Spanish column ids in docs
#![allow(clippy::must_use_candidate)] // Not all returned values need must_use
#![allow(clippy::return_self_not_must_use)] // Builders return Self
#![allow(clippy::missing_errors_doc)] // Error enums document their variants
#![allow(clippy::match_same_arms)] // Kind tables read better unmerged
#![allow(clippy::format_push_string)] // String building style
// Internal implementation where bounds/values are known or checked
#![allow(clippy::indexing_slicing)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! tabla-sync - URL-driven table state for server-side listing screens
//!
//! # Overview
//!
//! The address bar is the single source of truth for a listing screen's
//! pagination, filters and sort. tabla-sync reads the query string through a
//! per-screen schema, projects it onto the state a remote-data table widget
//! consumes, and turns the widget's change events back into new query
//! strings, navigated to by replacing the current history entry.
//!
//! ```text
//!   ?estado=ABIERTO&page=2 ──parse──▶ UrlParams ──read──▶ TypedParams
//!            ▲                                                 │
//!            │ navigate (replace)                          project
//!            │                                                 ▼
//!   UrlParams ◀──────────reduce──────── TableChange ◀── TableState
//! ```
//!
//! # Quick Start
//!
//! ```
//! use tabla_sync::prelude::*;
//!
//! let sync = screens::tramites().unwrap();
//! let mut nav = MemoryNavigator::new("/tramites?estado=ABIERTO&prioridad=ALTA");
//!
//! sync.apply(&mut nav, &TableChange::Pagination(Pagination::new(1, 10)));
//! assert_eq!(nav.href(), "/tramites?estado=ABIERTO&prioridad=ALTA&page=2&limit=10");
//!
//! sync.apply(
//!     &mut nav,
//!     &TableChange::Filters(vec![ColumnFilter::new("estado", FilterValue::list(["ARCHIVADO"]))]),
//! );
//! let state = sync.table_state(&nav);
//! assert_eq!(state.pagination.page_index, 0);
//! assert_eq!(state.filter("estado"), Some(&FilterValue::list(["ARCHIVADO"])));
//! ```
//!
//! # Wire format
//!
//! | Key | Kind | Default |
//! |-----|------|---------|
//! | `page` | 1-based integer | `1` |
//! | `limit` | integer `>= 1` | `10` |
//! | `sortBy` | `<columnId>:<asc\|desc>` | none |
//! | list filters | comma-joined tokens | none |
//! | text filters | percent-encoded text | none |
//! | boolean filters | `true` / `false` | none |
//!
//! Malformed values never fail: they fall back to the default and are logged
//! at debug level (`TABLA_SYNC_LOG=debug`).

pub mod constants;
pub mod log;
pub mod schema;
pub mod screens;
pub mod typed;

mod navigation;
mod params;
mod project;
mod reduce;
mod sync;
mod table;

pub use navigation::{Location, MemoryNavigator, NavigateRequest, Navigator, split_href};
pub use params::{DecodeError, RawValue, UrlParams, url_decode, url_encode};
pub use project::{FilterColumn, FilterEncoding, format_sort, parse_sort, project};
pub use reduce::{TableChange, reduce};
pub use schema::{ParamKind, ParamSpec, QueryParamSchema, SchemaBuilder, SchemaError};
pub use sync::{TableSync, TableSyncBuilder};
pub use table::{ColumnFilter, FilterValue, Pagination, SortEntry, TableState};
pub use typed::{CoerceError, TypedParams, TypedValue};

/// Everything a listing screen needs.
pub mod prelude {
    pub use crate::screens;
    pub use crate::{
        ColumnFilter, FilterColumn, FilterValue, MemoryNavigator, NavigateRequest, Navigator,
        Pagination, QueryParamSchema, SortEntry, TableChange, TableState, TableSync, UrlParams,
    };
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
