//! Listing screens of the Trámites admin UI.
//!
//! Every screen shares `page`, `limit` and `sortBy`; the filter keys are
//! disjoint per screen.

use crate::project::FilterColumn;
use crate::schema::{QueryParamSchema, SchemaError};
use crate::sync::TableSync;

/// Cases (`/tramites`).
pub const TRAMITES_ROUTE: &str = "/tramites";
/// Users (`/usuarios`).
pub const USUARIOS_ROUTE: &str = "/usuarios";
/// Offices (`/oficinas`).
pub const OFICINAS_ROUTE: &str = "/oficinas";
/// Document types (`/tipos-documento`).
pub const TIPOS_DOCUMENTO_ROUTE: &str = "/tipos-documento";

/// Case listing: text search, subject, status, priority and document type.
///
/// ```
/// use tabla_sync::{UrlParams, screens};
///
/// let sync = screens::tramites().unwrap();
/// let state = sync.project(&UrlParams::parse("estado=ABIERTO,EN_PROCESO&page=2"));
/// assert_eq!(state.pagination.page_index, 1);
/// assert_eq!(state.filters.len(), 1);
/// ```
pub fn tramites() -> Result<TableSync, SchemaError> {
    let schema = QueryParamSchema::builder()
        .pagination()
        .string("q")
        .string("asunto")
        .string_array("estado")
        .string_array("prioridad")
        .string_array("tipoDocumentoId")
        .sort()
        .build()?;
    TableSync::builder(TRAMITES_ROUTE, schema)
        .filter(FilterColumn::text("q"))
        .filter(FilterColumn::text("asunto"))
        .filter(FilterColumn::list("estado"))
        .filter(FilterColumn::list("prioridad"))
        .filter(FilterColumn::list("tipoDocumentoId"))
        .sortable(["fechaIngreso", "numero", "asunto", "prioridad", "estado"])
        .build()
}

/// User listing: text search, role and active flag.
pub fn usuarios() -> Result<TableSync, SchemaError> {
    let schema = QueryParamSchema::builder()
        .pagination()
        .string("q")
        .string_array("role")
        .boolean("activo")
        .sort()
        .build()?;
    TableSync::builder(USUARIOS_ROUTE, schema)
        .filter(FilterColumn::text("q"))
        .filter(FilterColumn::list("role"))
        .filter(FilterColumn::boolean("activo"))
        .sortable(["nombre", "email", "createdAt"])
        .build()
}

/// Office listing.
pub fn oficinas() -> Result<TableSync, SchemaError> {
    active_catalog(OFICINAS_ROUTE, &["nombre", "codigo"])
}

/// Document type listing.
pub fn tipos_documento() -> Result<TableSync, SchemaError> {
    active_catalog(TIPOS_DOCUMENTO_ROUTE, &["nombre"])
}

fn active_catalog(route: &str, sortable: &[&str]) -> Result<TableSync, SchemaError> {
    let schema = QueryParamSchema::builder()
        .pagination()
        .string("q")
        .boolean("activo")
        .sort()
        .build()?;
    TableSync::builder(route, schema)
        .filter(FilterColumn::text("q"))
        .filter(FilterColumn::boolean("activo"))
        .sortable(sortable.iter().copied())
        .build()
}
