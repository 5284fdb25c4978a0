//! # Tundra - In-Memory Columnar Table Engine
//!
//! Tundra ingests row tuples, freezes each column into a compressed
//! physical representation chosen from that column's type and value
//! distribution, and serves row-by-row scans by decoding positionally
//! from the per-column stores.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tundra::{CellValue, ColumnSpec, LogicalType, TableBuilder};
//!
//! let mut builder = TableBuilder::new(vec![
//!     ColumnSpec::new("id", LogicalType::Int8),
//!     ColumnSpec::new("name", LogicalType::Text),
//! ]);
//! builder.push_row(&[CellValue::Int8(1), CellValue::text("alice")])?;
//! builder.push_row(&[CellValue::Int8(2), CellValue::text("bob")])?;
//!
//! let table = builder.freeze()?;
//! let mut cursor = table.scan();
//! while cursor.advance() {
//!     let row = cursor.current()?;
//!     println!("{:?}", row);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │      Row Scan Cursor (advance)       │
//! ├─────────────────────────────────────┤
//! │     Column Table (frozen stores)     │
//! ├─────────────────────────────────────┤
//! │   Representation Selector (stats)    │
//! ├─────────────────────────────────────┤
//! │  Codec Library (arrays, bit slices,  │
//! │         dictionaries, blocks)        │
//! └─────────────────────────────────────┘
//! ```
//!
//! Data flow: row batches → per-column value lists → selector → codec
//! freeze → column stores → scan cursor.
//!
//! ## Representations
//!
//! Each column freezes into one of seven physical forms:
//!
//! - **Object array**: the value list itself, for opaque or irregular
//!   columns
//! - **Primitive array**: dense native array at full width
//! - **Bit-sliced array**: sub-word values packed into 64-bit words
//! - **Primitive dictionary**: sorted value table plus packed row codes
//! - **Object dictionary**: first-seen value table plus packed row codes
//! - **String / byte-string dictionary**: contiguous length-prefixed
//!   entry block, exceptions side table, packed row codes
//!
//! ## Immutability
//!
//! Freezing is one-shot. A frozen store is never mutated; any number of
//! cursors may decode it concurrently without synchronization, and two
//! cursors always observe identical values at identical ordinals.
//!
//! ## Module Overview
//!
//! - [`types`]: logical types, primitive kinds, column specs, cell values
//! - [`column`]: codec library and representation selector
//! - [`table`]: frozen table, loading builder, scan cursor
//! - [`config`]: selector thresholds and their invariants

pub mod column;
pub mod config;
pub mod table;
pub mod types;

pub use column::{ColumnStore, Representation, RepresentationType};
pub use config::SelectorConfig;
pub use table::{Row, RowCursor, RowType, Table, TableBuilder};
pub use types::{CellValue, ColumnSpec, LogicalType, PrimitiveKind};
