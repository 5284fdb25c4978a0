//! # Type System
//!
//! Logical column types, physical primitive kinds, column specifications,
//! and the runtime cell value representation.
//!
//! - [`LogicalType`] / [`PrimitiveKind`]: declared vs packed type taxonomy
//! - [`ColumnSpec`]: per-column name, type, nullability
//! - [`CellValue`]: owned runtime value, the unit cursors materialize

mod column;
mod data_type;
mod value;

pub use column::ColumnSpec;
pub use data_type::{LogicalType, PrimitiveKind};
pub use value::CellValue;
