//! # Object Array and Object Dictionary
//!
//! Fallback representations for columns no specialized codec fits: opaque
//! object columns, and primitive columns whose null or value distribution
//! rules out the dense codecs.
//!
//! ## ObjectArray
//!
//! The payload is the ingested value list itself, aliased without copy.
//! Nulls round-trip as the null cell. When the loader has canonicalized
//! the values (equal values share one allocation), the store records it so
//! downstream equality can short-circuit on identity.
//!
//! ## ObjectDictionary
//!
//! Distinct values in **first-seen order** plus a packed per-row code
//! array. Unlike the primitive dictionary the entry order is canonical,
//! not sorted; null, when present, is an ordinary dictionary entry.

use super::bitslice::CodeArray;
use crate::types::CellValue;
use eyre::{ensure, Result};
use hashbrown::HashMap;
use std::sync::Arc;

use super::code_bits_for;

/// Ordered sequence of opaque values, aliased from the ingest buffer.
#[derive(Debug, Clone)]
pub struct ObjectArray {
    values: Arc<[CellValue]>,
    canonicalized: bool,
}

impl ObjectArray {
    /// Freezes the value list as-is. No copy beyond moving the vector
    /// behind an `Arc`.
    pub fn freeze(values: Vec<CellValue>, canonicalized: bool) -> Self {
        Self {
            values: values.into(),
            canonicalized,
        }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the array holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when equal values are guaranteed to share one allocation.
    pub fn is_canonicalized(&self) -> bool {
        self.canonicalized
    }

    /// Returns the value at `ordinal`.
    pub fn get(&self, ordinal: usize) -> Result<CellValue> {
        ensure!(
            ordinal < self.values.len(),
            "ordinal {} out of range (len={})",
            ordinal,
            self.values.len()
        );
        Ok(self.values[ordinal].clone())
    }

    /// Approximate payload footprint in bytes.
    pub fn payload_bytes(&self) -> usize {
        self.values.len() * std::mem::size_of::<CellValue>()
    }
}

/// Dictionary of opaque values in first-seen order, with packed row codes.
#[derive(Debug, Clone)]
pub struct ObjectDictionary {
    dict: Box<[CellValue]>,
    codes: CodeArray,
}

impl ObjectDictionary {
    /// Canonicalizes the value list into a first-seen dictionary and packs
    /// one code per row.
    pub fn freeze(values: &[CellValue]) -> Result<Self> {
        let mut index: HashMap<&CellValue, u32> = HashMap::new();
        let mut dict: Vec<CellValue> = Vec::new();
        let mut codes: Vec<u32> = Vec::with_capacity(values.len());

        for value in values {
            let code = match index.get(value) {
                Some(&code) => code,
                None => {
                    let code = dict.len() as u32;
                    index.insert(value, code);
                    dict.push(value.clone());
                    code
                }
            };
            codes.push(code);
        }

        let codes = CodeArray::freeze(code_bits_for(dict.len()), &codes)?;
        Ok(Self {
            dict: dict.into_boxed_slice(),
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

    /// Distinct entries in first-seen order.
    pub fn dict(&self) -> &[CellValue] {
        &self.dict
    }

    /// Decodes the value at `ordinal` through the dictionary.
    pub fn get(&self, ordinal: usize) -> Result<CellValue> {
        ensure!(
            ordinal < self.codes.len(),
            "ordinal {} out of range (len={})",
            ordinal,
            self.codes.len()
        );
        Ok(self.dict[self.codes.get(ordinal) as usize].clone())
    }

    /// Approximate payload footprint in bytes.
    pub fn payload_bytes(&self) -> usize {
        self.dict.len() * std::mem::size_of::<CellValue>() + self.codes.payload_bytes()
    }
}
