//! # Row Scan Cursor
//!
//! Forward, resettable cursor over `[0, row_count)`. The cursor starts
//! before the first row; [`RowCursor::advance`] steps it forward and
//! reports whether a row is available; [`RowCursor::current`] materializes
//! the tuple at the cursor by decoding each column store at the cursor
//! ordinal.
//!
//! Decode is purely positional, so any number of cursors can scan one
//! table concurrently and observe identical values at identical ordinals.
//!
//! ## Allocation
//!
//! `current` allocates a fresh tuple per row. Tight scan loops can reuse
//! one buffer across rows with [`RowCursor::current_into`].

use super::Table;
use crate::types::CellValue;
use eyre::{bail, ensure, Result};
use smallvec::SmallVec;

/// One materialized row: a tuple of cell values in column order.
pub type Row = SmallVec<[CellValue; 16]>;

/// Forward cursor over a table's rows.
pub struct RowCursor<'a> {
    table: &'a Table,
    position: Option<u64>,
}

impl<'a> RowCursor<'a> {
    pub(super) fn new(table: &'a Table) -> Self {
        Self {
            table,
            position: None,
        }
    }

    /// Steps to the next row. Returns false once the cursor has moved
    /// past the last row, at which point `current` is an error.
    pub fn advance(&mut self) -> bool {
        let next = match self.position {
            None => 0,
            Some(p) => p.saturating_add(1),
        };
        self.position = Some(next);
        next < self.table.row_count()
    }

    /// Restores the before-first state.
    pub fn reset(&mut self) {
        self.position = None;
    }

    /// The current row ordinal, if the cursor is on a row.
    pub fn position(&self) -> Option<u64> {
        match self.position {
            Some(p) if p < self.table.row_count() => Some(p),
            _ => None,
        }
    }

    /// Materializes the tuple at the cursor.
    pub fn current(&self) -> Result<Row> {
        let mut row = Row::new();
        self.current_into(&mut row)?;
        Ok(row)
    }

    /// Materializes the tuple at the cursor into a reusable buffer. The
    /// buffer is cleared first.
    pub fn current_into(&self, row: &mut Row) -> Result<()> {
        let ordinal = match self.position {
            None => bail!("cursor is before the first row; call advance first"),
            Some(p) => {
                ensure!(
                    p < self.table.row_count(),
                    "cursor is past the last row (position {}, rows {})",
                    p,
                    self.table.row_count()
                );
                p as usize
            }
        };
        row.clear();
        row.reserve(self.table.schema().len());
        for i in 0..self.table.schema().len() {
            row.push(self.table.column(i).get(ordinal)?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableBuilder;
    use crate::types::{ColumnSpec, LogicalType};

    fn two_column_table() -> Table {
        let mut builder = TableBuilder::new(vec![
            ColumnSpec::new("n", LogicalType::Int4),
            ColumnSpec::new("s", LogicalType::Text),
        ]);
        builder
            .push_row(&[CellValue::Int4(10), CellValue::text("α")])
            .unwrap();
        builder
            .push_row(&[CellValue::Int4(20), CellValue::text("β")])
            .unwrap();
        builder
            .push_row(&[CellValue::Int4(30), CellValue::text("α")])
            .unwrap();
        builder.freeze().unwrap()
    }

    #[test]
    fn scan_yields_rows_in_order() {
        let table = two_column_table();
        let mut cursor = table.scan();
        let mut seen = Vec::new();
        while cursor.advance() {
            seen.push(cursor.current().unwrap());
        }
        assert_eq!(seen.len(), 3);
        assert_eq!(&seen[0][..], &[CellValue::Int4(10), CellValue::text("α")]);
        assert_eq!(&seen[1][..], &[CellValue::Int4(20), CellValue::text("β")]);
        assert_eq!(&seen[2][..], &[CellValue::Int4(30), CellValue::text("α")]);
    }

    #[test]
    fn current_before_first_is_an_error() {
        let table = two_column_table();
        let cursor = table.scan();
        assert!(cursor.current().is_err());
    }

    #[test]
    fn current_past_end_is_an_error() {
        let table = two_column_table();
        let mut cursor = table.scan();
        while cursor.advance() {}
        assert!(cursor.current().is_err());
        assert_eq!(cursor.position(), None);
    }

    #[test]
    fn reset_restores_before_first() {
        let table = two_column_table();
        let mut cursor = table.scan();
        while cursor.advance() {}
        cursor.reset();
        assert!(cursor.current().is_err());
        assert!(cursor.advance());
        assert_eq!(
            &cursor.current().unwrap()[..],
            &[CellValue::Int4(10), CellValue::text("α")]
        );
    }

    #[test]
    fn independent_cursors_observe_identical_values() {
        let table = two_column_table();
        let mut a = table.scan();
        let mut b = table.scan();
        while a.advance() {
            assert!(b.advance());
            assert_eq!(a.current().unwrap(), b.current().unwrap());
        }
        assert!(!b.advance());
    }

    #[test]
    fn current_into_reuses_a_buffer() {
        let table = two_column_table();
        let mut cursor = table.scan();
        let mut row = Row::new();
        let mut count = 0;
        while cursor.advance() {
            cursor.current_into(&mut row).unwrap();
            assert_eq!(row, cursor.current().unwrap());
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn advance_on_empty_table_is_immediately_exhausted() {
        let builder = TableBuilder::new(vec![ColumnSpec::new("n", LogicalType::Int4)]);
        let table = builder.freeze().unwrap();
        let mut cursor = table.scan();
        assert!(!cursor.advance());
        assert!(cursor.current().is_err());
    }
}
