//! # Table Builder
//!
//! The loading path: rows in, frozen table out. [`TableBuilder::push_row`]
//! is the ingest boundary — it checks arity and per-cell kind against the
//! schema once, so the per-column value lists handed to the codecs are
//! already homogeneous and the decode paths stay check-free.
//!
//! [`TableBuilder::freeze`] runs the selector and the chosen codec over
//! each column's value list and assembles the immutable [`Table`].

use super::{Context, RowType, Table};
use crate::column::select;
use crate::config::SelectorConfig;
use crate::types::{CellValue, ColumnSpec};
use eyre::{ensure, Result};

/// Accumulates rows as per-column value lists, then freezes them.
pub struct TableBuilder {
    schema: Vec<ColumnSpec>,
    config: SelectorConfig,
    columns: Vec<Vec<CellValue>>,
    row_count: u64,
    context: Option<Context>,
}

impl TableBuilder {
    /// Creates a builder for the given schema with default selector
    /// configuration.
    pub fn new(schema: Vec<ColumnSpec>) -> Self {
        let columns = schema.iter().map(|_| Vec::new()).collect();
        Self {
            schema,
            config: SelectorConfig::default(),
            columns,
            row_count: 0,
            context: None,
        }
    }

    /// Overrides the selector configuration.
    pub fn with_config(mut self, config: SelectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches an opaque host context handle, echoed by the frozen
    /// table.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Number of rows accumulated so far.
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Validates and appends one row.
    pub fn push_row(&mut self, row: &[CellValue]) -> Result<()> {
        ensure!(
            row.len() == self.schema.len(),
            "row has {} cells but schema has {} columns",
            row.len(),
            self.schema.len()
        );
        for (spec, cell) in self.schema.iter().zip(row) {
            if cell.is_null() {
                ensure!(
                    spec.is_nullable(),
                    "null in non-nullable column '{}'",
                    spec.name()
                );
            } else {
                ensure!(
                    cell.matches_type(spec.logical_type()),
                    "column '{}' is {:?} but row holds {:?}",
                    spec.name(),
                    spec.logical_type(),
                    cell
                );
            }
        }
        for (column, cell) in self.columns.iter_mut().zip(row) {
            column.push(cell.clone());
        }
        self.row_count += 1;
        Ok(())
    }

    /// Validates and appends a batch of rows.
    pub fn push_rows<'a>(&mut self, rows: impl IntoIterator<Item = &'a [CellValue]>) -> Result<()> {
        for row in rows {
            self.push_row(row)?;
        }
        Ok(())
    }

    /// Freezes every column through the selector and assembles the table.
    pub fn freeze(self) -> Result<Table> {
        let row_count = self.row_count;
        let element_type = RowType::new(self.schema.len());
        let mut stores = Vec::with_capacity(self.columns.len());
        for (spec, cells) in self.schema.iter().zip(self.columns) {
            stores.push(select::freeze_column(spec, cells, &self.config)?);
        }
        let table = Table::new(element_type, self.schema, stores, row_count)?;
        Ok(match self.context {
            Some(context) => table.with_context(context),
            None => table,
        })
    }
}
