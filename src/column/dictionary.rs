//! # Primitive Dictionary
//!
//! Dictionary encoding for primitive columns: a sorted, deduplicated
//! native value table plus a packed per-row code array. The sort is the
//! contract — `code(v1) < code(v2)` if and only if `v1 < v2` under the
//! kind's natural order — so range predicates can run on codes without
//! touching the value table.
//!
//! Floats order by IEEE total order, which agrees with `<` on ordinary
//! values and gives NaN payloads and signed zeros stable, distinct slots.
//!
//! ## Null
//!
//! A nullable column reserves the code one past the last dictionary entry
//! (the high end of the code space). The payload records the reserved code
//! so decoders never confuse it with a value lookup.

use super::bitslice::CodeArray;
use super::code_bits_for;
use super::primitive::PrimitiveBuffer;
use crate::types::{CellValue, PrimitiveKind};
use eyre::{bail, ensure, Result};
use std::cmp::Ordering;

/// Sorted primitive dictionary with packed row codes.
#[derive(Debug, Clone)]
pub struct PrimitiveDictionary {
    dict: PrimitiveBuffer,
    null_code: Option<u32>,
    codes: CodeArray,
}

macro_rules! dict_arm {
    ($cells:expr, $kind:expr, $variant:ident, $buf:ident, $cmp:expr) => {{
        let mut vals: Vec<Option<_>> = Vec::with_capacity($cells.len());
        for (i, cell) in $cells.iter().enumerate() {
            match cell {
                CellValue::Null => vals.push(None),
                CellValue::$variant(v) => vals.push(Some(*v)),
                other => bail!(
                    "freeze precondition violated: row {} holds {:?}, dictionary packs {:?}",
                    i,
                    other,
                    $kind
                ),
            }
        }

        let mut distinct: Vec<_> = vals.iter().filter_map(|v| *v).collect();
        distinct.sort_by($cmp);
        distinct.dedup_by(|a, b| $cmp(a, b) == Ordering::Equal);

        let null_code = if vals.iter().any(|v| v.is_none()) {
            Some(distinct.len() as u32)
        } else {
            None
        };

        let mut codes: Vec<u32> = Vec::with_capacity(vals.len());
        for v in &vals {
            match v {
                None => codes.push(distinct.len() as u32),
                Some(x) => {
                    // INVARIANT: x was collected into distinct above
                    let idx = distinct.binary_search_by(|probe| $cmp(probe, x)).unwrap();
                    codes.push(idx as u32);
                }
            }
        }

        let code_space = distinct.len() + null_code.is_some() as usize;
        (
            PrimitiveBuffer::$buf(distinct.into_boxed_slice()),
            null_code,
            codes,
            code_space,
        )
    }};
}

impl PrimitiveDictionary {
    /// Extracts the distinct values of a validated value list, sorts them,
    /// and packs one code per row. Nulls take the reserved high code.
    pub fn freeze(kind: PrimitiveKind, cells: &[CellValue]) -> Result<Self> {
        let (dict, null_code, codes, code_space) = match kind {
            PrimitiveKind::Bool => {
                dict_arm!(cells, kind, Bool, Bool, |a: &bool, b: &bool| a.cmp(b))
            }
            PrimitiveKind::Int1 => {
                dict_arm!(cells, kind, Int1, Int1, |a: &i8, b: &i8| a.cmp(b))
            }
            PrimitiveKind::Int2 => {
                dict_arm!(cells, kind, Int2, Int2, |a: &i16, b: &i16| a.cmp(b))
            }
            PrimitiveKind::Int4 => {
                dict_arm!(cells, kind, Int4, Int4, |a: &i32, b: &i32| a.cmp(b))
            }
            PrimitiveKind::Int8 => {
                dict_arm!(cells, kind, Int8, Int8, |a: &i64, b: &i64| a.cmp(b))
            }
            PrimitiveKind::Char => {
                dict_arm!(cells, kind, Char, Char, |a: &u16, b: &u16| a.cmp(b))
            }
            PrimitiveKind::Float4 => {
                dict_arm!(cells, kind, Float4, Float4, |a: &f32, b: &f32| a.total_cmp(b))
            }
            PrimitiveKind::Float8 => {
                dict_arm!(cells, kind, Float8, Float8, |a: &f64, b: &f64| a.total_cmp(b))
            }
        };

        let codes = CodeArray::freeze(code_bits_for(code_space), &codes)?;
        Ok(Self {
            dict,
            null_code,
            codes,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns true if the dictionary encodes no rows.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Primitive kind of the dictionary entries.
    pub fn kind(&self) -> PrimitiveKind {
        self.dict.kind()
    }

    /// Sorted distinct value table.
    pub fn dict(&self) -> &PrimitiveBuffer {
        &self.dict
    }

    /// The reserved null code, if the frozen column contained nulls.
    pub fn null_code(&self) -> Option<u32> {
        self.null_code
    }

    /// Decodes the value at `ordinal` through the dictionary.
    pub fn get(&self, ordinal: usize) -> Result<CellValue> {
        ensure!(
            ordinal < self.codes.len(),
            "ordinal {} out of range (len={})",
            ordinal,
            self.codes.len()
        );
        let code = self.codes.get(ordinal);
        if self.null_code == Some(code) {
            return Ok(CellValue::Null);
        }
        self.dict.get(code as usize)
    }

    /// Payload footprint in bytes: value table plus packed codes.
    pub fn payload_bytes(&self) -> usize {
        self.dict.payload_bytes() + self.codes.payload_bytes()
    }
}
