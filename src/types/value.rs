//! # Runtime Cell Values
//!
//! This module provides [`CellValue`], the owned runtime representation of
//! one cell of one row. Cursors materialize tuples of `CellValue`; codec
//! freeze paths consume validated lists of them.
//!
//! ## Value Variants
//!
//! | Variant | Rust type | Logical type |
//! |---------|-----------|--------------|
//! | Null | - | any nullable column |
//! | Bool | bool | Bool |
//! | Int1 | i8 | Int1 |
//! | Int2 | i16 | Int2 |
//! | Int4 | i32 | Int4 |
//! | Int8 | i64 | Int8 |
//! | Float4 | f32 | Float4 |
//! | Float8 | f64 | Float8 |
//! | Char | u16 | Char (UTF-16 code unit) |
//! | Text | Arc<str> | Text |
//! | Blob | Arc<[u8]> | Blob |
//!
//! An `Object` column holds arbitrary `CellValue`s boxed as-is; there is no
//! dedicated variant for it.
//!
//! ## Equality and Hashing
//!
//! `CellValue` implements `Eq` and `Hash` so dictionary codecs can
//! canonicalize values in hash maps. Floats compare and hash by their raw
//! bit pattern: `NaN == NaN` holds when the payloads match, and `0.0` and
//! `-0.0` are distinct dictionary entries. Decode is positional and
//! bit-preserving, so bit equality is exactly round-trip equality.
//!
//! ## Sharing
//!
//! `Text` and `Blob` payloads are reference-counted. Cloning a decoded
//! value shares storage; dictionary exception entries hand out clones of
//! one pre-materialized allocation.

use super::LogicalType;
use std::hash::{Hash, Hasher};
use std::mem;
use std::sync::Arc;

/// Owned runtime representation of a single cell.
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int1(i8),
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Float4(f32),
    Float8(f64),
    Char(u16),
    Text(Arc<str>),
    Blob(Arc<[u8]>),
}

impl CellValue {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns true if a non-null value of this variant is admissible in a
    /// column of the given logical type. Object columns admit anything.
    pub fn matches_type(&self, ty: LogicalType) -> bool {
        match ty {
            LogicalType::Object => true,
            LogicalType::Bool => matches!(self, CellValue::Bool(_)),
            LogicalType::Int1 => matches!(self, CellValue::Int1(_)),
            LogicalType::Int2 => matches!(self, CellValue::Int2(_)),
            LogicalType::Int4 => matches!(self, CellValue::Int4(_)),
            LogicalType::Int8 => matches!(self, CellValue::Int8(_)),
            LogicalType::Float4 => matches!(self, CellValue::Float4(_)),
            LogicalType::Float8 => matches!(self, CellValue::Float8(_)),
            LogicalType::Char => matches!(self, CellValue::Char(_)),
            LogicalType::Text => matches!(self, CellValue::Text(_)),
            LogicalType::Blob => matches!(self, CellValue::Blob(_)),
        }
    }

    /// Widens an integer-domain value (bool, integer kinds, char) to i64.
    /// Returns None for null, floats, text, blob.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Bool(b) => Some(*b as i64),
            CellValue::Int1(v) => Some(*v as i64),
            CellValue::Int2(v) => Some(*v as i64),
            CellValue::Int4(v) => Some(*v as i64),
            CellValue::Int8(v) => Some(*v),
            CellValue::Char(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Convenience constructor for text cells.
    pub fn text(s: impl AsRef<str>) -> Self {
        CellValue::Text(Arc::from(s.as_ref()))
    }

    /// Convenience constructor for blob cells.
    pub fn blob(b: impl AsRef<[u8]>) -> Self {
        CellValue::Blob(Arc::from(b.as_ref()))
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int1(a), CellValue::Int1(b)) => a == b,
            (CellValue::Int2(a), CellValue::Int2(b)) => a == b,
            (CellValue::Int4(a), CellValue::Int4(b)) => a == b,
            (CellValue::Int8(a), CellValue::Int8(b)) => a == b,
            (CellValue::Float4(a), CellValue::Float4(b)) => a.to_bits() == b.to_bits(),
            (CellValue::Float8(a), CellValue::Float8(b)) => a.to_bits() == b.to_bits(),
            (CellValue::Char(a), CellValue::Char(b)) => a == b,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Blob(a), CellValue::Blob(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Bool(v) => v.hash(state),
            CellValue::Int1(v) => v.hash(state),
            CellValue::Int2(v) => v.hash(state),
            CellValue::Int4(v) => v.hash(state),
            CellValue::Int8(v) => v.hash(state),
            CellValue::Float4(v) => v.to_bits().hash(state),
            CellValue::Float8(v) => v.to_bits().hash(state),
            CellValue::Char(v) => v.hash(state),
            CellValue::Text(v) => v.hash(state),
            CellValue::Blob(v) => v.hash(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;

    #[test]
    fn null_matches_no_concrete_variant_check() {
        assert!(CellValue::Null.is_null());
        assert!(!CellValue::Bool(true).is_null());
    }

    #[test]
    fn matches_type_per_variant() {
        assert!(CellValue::Int4(1).matches_type(LogicalType::Int4));
        assert!(!CellValue::Int4(1).matches_type(LogicalType::Int8));
        assert!(CellValue::text("x").matches_type(LogicalType::Text));
        assert!(!CellValue::text("x").matches_type(LogicalType::Blob));
        assert!(CellValue::Char(65).matches_type(LogicalType::Char));
    }

    #[test]
    fn object_columns_admit_any_variant() {
        assert!(CellValue::Int8(7).matches_type(LogicalType::Object));
        assert!(CellValue::text("x").matches_type(LogicalType::Object));
        assert!(CellValue::Float8(1.5).matches_type(LogicalType::Object));
    }

    #[test]
    fn as_i64_widens_integer_domain() {
        assert_eq!(CellValue::Bool(true).as_i64(), Some(1));
        assert_eq!(CellValue::Int1(-5).as_i64(), Some(-5));
        assert_eq!(CellValue::Int2(300).as_i64(), Some(300));
        assert_eq!(CellValue::Char(0xFFFF).as_i64(), Some(65535));
        assert_eq!(CellValue::Float8(1.0).as_i64(), None);
        assert_eq!(CellValue::Null.as_i64(), None);
    }

    #[test]
    fn float_equality_is_bitwise() {
        assert_eq!(CellValue::Float8(f64::NAN), CellValue::Float8(f64::NAN));
        assert_ne!(CellValue::Float8(0.0), CellValue::Float8(-0.0));
        assert_eq!(CellValue::Float4(1.5), CellValue::Float4(1.5));
    }

    #[test]
    fn hash_is_consistent_with_eq() {
        let mut set = HashSet::new();
        set.insert(CellValue::Float8(f64::NAN));
        set.insert(CellValue::Float8(f64::NAN));
        set.insert(CellValue::Float8(0.0));
        set.insert(CellValue::Float8(-0.0));
        set.insert(CellValue::text("a"));
        set.insert(CellValue::text("a"));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn text_clones_share_storage() {
        let a = CellValue::text("shared");
        let b = a.clone();
        match (&a, &b) {
            (CellValue::Text(x), CellValue::Text(y)) => {
                assert!(Arc::ptr_eq(x, y));
            }
            _ => unreachable!(),
        }
    }
}
