//! Generic CRUD tables.
//!
//! One `EntityTable<R>` drives every entity screen: paging and search
//! state, column rendering, create/edit modals backed by a field schema,
//! and confirmed deletes. Per-entity differences live in `entities`.

pub mod column;
pub mod controller;
pub mod entities;
pub mod form;
pub mod state;

pub use column::{format_naira, render_cell, Cell, CellRenderer, CellValue, ColumnDef};
pub use controller::{EntityConfig, EntityTable, Modal, PaginationMode, RowAction};
pub use form::{FieldKind, FormField, FormSchema, FormValues};
pub use state::TableState;
