//! # Column Table
//!
//! A [`Table`] owns one frozen [`ColumnStore`] per column plus the row
//! count, and serves row scans by decoding positionally from each store.
//! Construction enforces the structural invariants once; after that every
//! read path is check-free and the table is freely shared across threads.
//!
//! ## Invariants
//!
//! 1. `schema.len() == columns.len()`
//! 2. every store decodes exactly `row_count` values
//! 3. every store's decoded logical kind matches its spec's declared type
//! 4. the row-type descriptor's field count matches the schema length
//!
//! ## Construction Paths
//!
//! - [`TableBuilder`]: the loader — push rows, freeze once (the normal
//!   path; see `builder`)
//! - [`Table::new`]: assemble from already-frozen stores (for hosts that
//!   freeze columns themselves)

mod builder;
mod cursor;

pub use builder::TableBuilder;
pub use cursor::{Row, RowCursor};

use crate::column::ColumnStore;
use crate::types::ColumnSpec;
use eyre::{ensure, Result};
use std::any::Any;
use std::sync::Arc;

/// Row-type descriptor echoed through [`Table::element_type`]. The core
/// uses only the field count, for arity assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowType {
    field_count: usize,
}

impl RowType {
    /// Creates a descriptor with the given field count.
    pub fn new(field_count: usize) -> Self {
        Self { field_count }
    }

    /// Number of fields in one row.
    pub fn field_count(&self) -> usize {
        self.field_count
    }
}

/// Opaque host context handle, echoed but never interpreted.
pub type Context = Arc<dyn Any + Send + Sync>;

/// An immutable table of frozen column stores.
pub struct Table {
    schema: Vec<ColumnSpec>,
    columns: Vec<ColumnStore>,
    row_count: u64,
    element_type: RowType,
    context: Option<Context>,
}

impl Table {
    /// Assembles a table from frozen stores, checking the structural
    /// invariants.
    pub fn new(
        element_type: RowType,
        schema: Vec<ColumnSpec>,
        columns: Vec<ColumnStore>,
        row_count: u64,
    ) -> Result<Self> {
        ensure!(
            schema.len() == columns.len(),
            "schema has {} columns but {} stores were supplied",
            schema.len(),
            columns.len()
        );
        ensure!(
            element_type.field_count() == schema.len(),
            "row type has {} fields but schema has {} columns",
            element_type.field_count(),
            schema.len()
        );
        for (spec, store) in schema.iter().zip(&columns) {
            ensure!(
                store.len() as u64 == row_count,
                "column '{}' decodes {} values, table has {} rows",
                spec.name(),
                store.len(),
                row_count
            );
            if let Some(decoded) = store.decoded_type() {
                ensure!(
                    decoded == spec.logical_type(),
                    "column '{}' store decodes {:?} but is declared {:?}",
                    spec.name(),
                    decoded,
                    spec.logical_type()
                );
            }
        }
        Ok(Self {
            schema,
            columns,
            row_count,
            element_type,
            context: None,
        })
    }

    /// Attaches an opaque host context handle.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Number of rows.
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Column specifications, in column order.
    pub fn schema(&self) -> &[ColumnSpec] {
        &self.schema
    }

    /// The row-type descriptor supplied at construction.
    pub fn element_type(&self) -> &RowType {
        &self.element_type
    }

    /// The host context handle, if one was attached.
    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// Direct positional access to one column's store.
    pub fn column(&self, index: usize) -> &ColumnStore {
        &self.columns[index]
    }

    /// Opens a fresh cursor positioned before the first row. Cursors are
    /// independent; any number may scan concurrently.
    pub fn scan(&self) -> RowCursor<'_> {
        RowCursor::new(self)
    }
}
