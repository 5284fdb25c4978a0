//! Fuzz testing for the load-freeze-scan pipeline.
//!
//! This fuzz target builds a single-column table from arbitrary typed
//! cells, freezes it under whatever representation the selector picks,
//! and checks that a scan decodes every ingested value unchanged.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use tundra::{CellValue, ColumnSpec, LogicalType, TableBuilder};

#[derive(Debug, Arbitrary, Clone, Copy)]
enum FuzzColumnType {
    Bool,
    Int1,
    Int2,
    Int4,
    Int8,
    Float8,
    Char,
    Text,
    Blob,
}

#[derive(Debug, Arbitrary)]
enum FuzzCell {
    Null,
    Bool(bool),
    Int1(i8),
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Float8(f64),
    Char(u16),
    Text(String),
    Blob(Vec<u8>),
}

#[derive(Debug, Arbitrary)]
struct BuilderInput {
    column_type: FuzzColumnType,
    cells: Vec<FuzzCell>,
}

impl From<FuzzColumnType> for LogicalType {
    fn from(ty: FuzzColumnType) -> Self {
        match ty {
            FuzzColumnType::Bool => LogicalType::Bool,
            FuzzColumnType::Int1 => LogicalType::Int1,
            FuzzColumnType::Int2 => LogicalType::Int2,
            FuzzColumnType::Int4 => LogicalType::Int4,
            FuzzColumnType::Int8 => LogicalType::Int8,
            FuzzColumnType::Float8 => LogicalType::Float8,
            FuzzColumnType::Char => LogicalType::Char,
            FuzzColumnType::Text => LogicalType::Text,
            FuzzColumnType::Blob => LogicalType::Blob,
        }
    }
}

impl From<&FuzzCell> for CellValue {
    fn from(cell: &FuzzCell) -> Self {
        match cell {
            FuzzCell::Null => CellValue::Null,
            FuzzCell::Bool(v) => CellValue::Bool(*v),
            FuzzCell::Int1(v) => CellValue::Int1(*v),
            FuzzCell::Int2(v) => CellValue::Int2(*v),
            FuzzCell::Int4(v) => CellValue::Int4(*v),
            FuzzCell::Int8(v) => CellValue::Int8(*v),
            FuzzCell::Float8(v) => CellValue::Float8(*v),
            FuzzCell::Char(v) => CellValue::Char(*v),
            FuzzCell::Text(v) => CellValue::text(v),
            FuzzCell::Blob(v) => CellValue::blob(v),
        }
    }
}

fuzz_target!(|input: BuilderInput| {
    let ty = LogicalType::from(input.column_type);
    let mut builder = TableBuilder::new(vec![ColumnSpec::nullable("c", ty)]);

    let mut accepted: Vec<CellValue> = Vec::new();
    for cell in &input.cells {
        let value = CellValue::from(cell);
        let row = [value.clone()];
        match builder.push_row(&row) {
            Ok(()) => accepted.push(value),
            // Kind mismatches are rejected at the ingest boundary.
            Err(_) => assert!(!value.is_null() && !value.matches_type(ty)),
        }
    }

    let table = builder.freeze().expect("validated cells always freeze");
    assert_eq!(table.row_count(), accepted.len() as u64);

    let mut cursor = table.scan();
    for expected in &accepted {
        assert!(cursor.advance());
        let row = cursor.current().unwrap();
        assert_eq!(row.len(), 1);
        assert_eq!(&row[0], expected);
    }
    assert!(!cursor.advance());
});
