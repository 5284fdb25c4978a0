//! # Dense Primitive Arrays
//!
//! [`PrimitiveBuffer`] is the tightly packed native array behind the
//! primitive-array representation and the dictionary value tables. One
//! variant per primitive kind keeps every read monomorphized: `get`
//! dispatches on the variant once and reads at native width, with no
//! per-call kind checks and no reflective width switch.
//!
//! Freeze copies out of the validated generic value list into the matching
//! native array; a cell of the wrong variant is a freeze precondition
//! violation. Nulls are not representable here; columns with nulls take a
//! dictionary or object representation.

use crate::types::{CellValue, PrimitiveKind};
use eyre::{bail, ensure, Result};

/// Densely packed array of one primitive kind.
#[derive(Debug, Clone)]
pub enum PrimitiveBuffer {
    Bool(Box<[bool]>),
    Int1(Box<[i8]>),
    Int2(Box<[i16]>),
    Int4(Box<[i32]>),
    Int8(Box<[i64]>),
    Char(Box<[u16]>),
    Float4(Box<[f32]>),
    Float8(Box<[f64]>),
}

macro_rules! collect_cells {
    ($cells:expr, $kind:expr, $variant:ident, $buf:ident) => {{
        let mut out = Vec::with_capacity($cells.len());
        for (i, cell) in $cells.iter().enumerate() {
            match cell {
                CellValue::$variant(v) => out.push(*v),
                other => bail!(
                    "freeze precondition violated: row {} holds {:?}, column packs {:?}",
                    i,
                    other,
                    $kind
                ),
            }
        }
        Ok(PrimitiveBuffer::$buf(out.into_boxed_slice()))
    }};
}

impl PrimitiveBuffer {
    /// Copies the validated value list into a tight native array of the
    /// given kind.
    pub fn from_cells(kind: PrimitiveKind, cells: &[CellValue]) -> Result<Self> {
        match kind {
            PrimitiveKind::Bool => collect_cells!(cells, kind, Bool, Bool),
            PrimitiveKind::Int1 => collect_cells!(cells, kind, Int1, Int1),
            PrimitiveKind::Int2 => collect_cells!(cells, kind, Int2, Int2),
            PrimitiveKind::Int4 => collect_cells!(cells, kind, Int4, Int4),
            PrimitiveKind::Int8 => collect_cells!(cells, kind, Int8, Int8),
            PrimitiveKind::Char => collect_cells!(cells, kind, Char, Char),
            PrimitiveKind::Float4 => collect_cells!(cells, kind, Float4, Float4),
            PrimitiveKind::Float8 => collect_cells!(cells, kind, Float8, Float8),
        }
    }

    /// Primitive kind of the packed elements.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            PrimitiveBuffer::Bool(_) => PrimitiveKind::Bool,
            PrimitiveBuffer::Int1(_) => PrimitiveKind::Int1,
            PrimitiveBuffer::Int2(_) => PrimitiveKind::Int2,
            PrimitiveBuffer::Int4(_) => PrimitiveKind::Int4,
            PrimitiveBuffer::Int8(_) => PrimitiveKind::Int8,
            PrimitiveBuffer::Char(_) => PrimitiveKind::Char,
            PrimitiveBuffer::Float4(_) => PrimitiveKind::Float4,
            PrimitiveBuffer::Float8(_) => PrimitiveKind::Float8,
        }
    }

    /// Number of packed elements.
    pub fn len(&self) -> usize {
        match self {
            PrimitiveBuffer::Bool(v) => v.len(),
            PrimitiveBuffer::Int1(v) => v.len(),
            PrimitiveBuffer::Int2(v) => v.len(),
            PrimitiveBuffer::Int4(v) => v.len(),
            PrimitiveBuffer::Int8(v) => v.len(),
            PrimitiveBuffer::Char(v) => v.len(),
            PrimitiveBuffer::Float4(v) => v.len(),
            PrimitiveBuffer::Float8(v) => v.len(),
        }
    }

    /// Returns true if the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the element at `ordinal` back as a cell value.
    pub fn get(&self, ordinal: usize) -> Result<CellValue> {
        ensure!(
            ordinal < self.len(),
            "ordinal {} out of range (len={})",
            ordinal,
            self.len()
        );
        Ok(match self {
            PrimitiveBuffer::Bool(v) => CellValue::Bool(v[ordinal]),
            PrimitiveBuffer::Int1(v) => CellValue::Int1(v[ordinal]),
            PrimitiveBuffer::Int2(v) => CellValue::Int2(v[ordinal]),
            PrimitiveBuffer::Int4(v) => CellValue::Int4(v[ordinal]),
            PrimitiveBuffer::Int8(v) => CellValue::Int8(v[ordinal]),
            PrimitiveBuffer::Char(v) => CellValue::Char(v[ordinal]),
            PrimitiveBuffer::Float4(v) => CellValue::Float4(v[ordinal]),
            PrimitiveBuffer::Float8(v) => CellValue::Float8(v[ordinal]),
        })
    }

    /// Payload footprint in bytes.
    pub fn payload_bytes(&self) -> usize {
        self.len() * self.kind().byte_width()
    }
}
