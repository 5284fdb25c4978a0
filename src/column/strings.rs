//! # Compressed String and Byte-String Dictionaries
//!
//! Dictionary encoding for text and blob columns. Distinct entries live in
//! one contiguous byte block; rows store packed unsigned codes; a small
//! exceptions table holds the entries that cannot or should not live in
//! the block.
//!
//! ## Block Layout
//!
//! ```text
//! +--------------------+--------------------+-----
//! | entry 0            | entry 1            | ...
//! | [len: u16 BE][data]| [len: u16 BE][data]|
//! +--------------------+--------------------+-----
//! ```
//!
//! `offsets[c]` is the byte offset of entry `c`'s length prefix; entries
//! are appended in code order, so offsets ascend. Only entries shorter
//! than 2^16 bytes are block-eligible.
//!
//! ## Exceptions
//!
//! Three kinds of entry live outside the block, pre-materialized:
//!
//! 1. the null sentinel (nullable columns),
//! 2. entries longer than the inline limit,
//! 3. entries frequent enough that re-materializing them every row would
//!    churn allocations (threshold in [`SelectorConfig`]).
//!
//! Exception codes sit at the high end of the code space: a code
//! `c >= exception_base` indexes `exceptions[c - exception_base]`
//! directly. Null, when present, is always `exceptions[0]`.
//!
//! ## Decode
//!
//! Block entries are materialized on demand — one shared-storage value is
//! created per `get`, and nothing else is allocated up front. Exception
//! entries hand out clones of the single pre-materialized allocation.
//! This keeps the live object count low for wide dictionaries while the
//! hot values stay cheap.

use super::bitslice::CodeArray;
use super::code_bits_for;
use crate::config::SelectorConfig;
use crate::types::CellValue;
use eyre::{bail, ensure, Result};
use hashbrown::HashMap;
use std::sync::Arc;

/// Appends `[len: u16 BE][data]` entries and returns (block, offsets).
fn build_entry_block<'a>(entries: impl Iterator<Item = &'a [u8]>) -> Result<(Box<[u8]>, Box<[u32]>)> {
    let mut block: Vec<u8> = Vec::new();
    let mut offsets: Vec<u32> = Vec::new();
    for entry in entries {
        ensure!(
            entry.len() <= u16::MAX as usize,
            "block entry of {} bytes exceeds the u16 length prefix",
            entry.len()
        );
        let offset = u32::try_from(block.len())
            .map_err(|_| eyre::eyre!("dictionary block exceeds u32 offset space"))?;
        offsets.push(offset);
        block.extend_from_slice(&(entry.len() as u16).to_be_bytes());
        block.extend_from_slice(entry);
    }
    Ok((block.into_boxed_slice(), offsets.into_boxed_slice()))
}

/// Reads the entry whose length prefix starts at `offset`.
fn entry_at(block: &[u8], offset: usize) -> &[u8] {
    let len = u16::from_be_bytes([block[offset], block[offset + 1]]) as usize;
    &block[offset + 2..offset + 2 + len]
}

/// Shared freeze plan for both dictionary flavours, operating on raw
/// entry bytes. Produces the per-row codes, the block entry list, and the
/// exception entry list (first-seen order, null excluded).
struct DictPlan<'a> {
    codes: Vec<u32>,
    block_entries: Vec<&'a [u8]>,
    exception_entries: Vec<&'a [u8]>,
    has_null: bool,
    code_space: usize,
}

fn plan_dictionary<'a>(
    entries: &[Option<&'a [u8]>],
    config: &SelectorConfig,
) -> Result<DictPlan<'a>> {
    ensure!(
        config.max_inline_length <= u16::MAX as usize,
        "max_inline_length {} exceeds the u16 block length prefix",
        config.max_inline_length
    );

    // One pass for distinct entries (first-seen order) and frequencies.
    let mut index: HashMap<&[u8], usize> = HashMap::new();
    let mut distinct: Vec<(&'a [u8], usize)> = Vec::new();
    let mut has_null = false;
    for entry in entries {
        match *entry {
            None => has_null = true,
            Some(bytes) => match index.get(bytes) {
                Some(&slot) => distinct[slot].1 += 1,
                None => {
                    index.insert(bytes, distinct.len());
                    distinct.push((bytes, 1));
                }
            },
        }
    }

    let row_count = entries.len();
    let is_eager = |count: usize| {
        row_count > 0 && (count as f64) / (row_count as f64) > config.eager_exception_frequency
    };

    let mut block_entries: Vec<&[u8]> = Vec::new();
    let mut exception_entries: Vec<&[u8]> = Vec::new();
    for &(bytes, count) in &distinct {
        if bytes.len() > config.max_inline_length || is_eager(count) {
            exception_entries.push(bytes);
        } else {
            block_entries.push(bytes);
        }
    }

    // Codes: block entries first, then null, then the other exceptions.
    let exception_base = block_entries.len() as u32;
    let mut code_of: HashMap<&[u8], u32> = HashMap::new();
    for (i, &bytes) in block_entries.iter().enumerate() {
        code_of.insert(bytes, i as u32);
    }
    let null_code = exception_base;
    let exception_start = exception_base + has_null as u32;
    for (i, &bytes) in exception_entries.iter().enumerate() {
        code_of.insert(bytes, exception_start + i as u32);
    }

    let mut codes: Vec<u32> = Vec::with_capacity(entries.len());
    for entry in entries {
        match *entry {
            None => codes.push(null_code),
            // INVARIANT: every distinct entry was assigned a code above
            Some(bytes) => codes.push(*code_of.get(bytes).unwrap()),
        }
    }

    let code_space =
        block_entries.len() + exception_entries.len() + has_null as usize;
    Ok(DictPlan {
        codes,
        block_entries,
        exception_entries,
        has_null,
        code_space,
    })
}

/// Compressed dictionary over UTF-8 strings.
#[derive(Debug, Clone)]
pub struct StringDictionary {
    block: Box<[u8]>,
    offsets: Box<[u32]>,
    exceptions: Box<[Option<Arc<str>>]>,
    codes: CodeArray,
}

impl StringDictionary {
    /// Freezes a validated text value list.
    pub fn freeze(cells: &[CellValue], config: &SelectorConfig) -> Result<Self> {
        let mut entries: Vec<Option<&[u8]>> = Vec::with_capacity(cells.len());
        let mut sources: Vec<Option<&Arc<str>>> = Vec::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            match cell {
                CellValue::Null => {
                    entries.push(None);
                    sources.push(None);
                }
                CellValue::Text(s) => {
                    entries.push(Some(s.as_bytes()));
                    sources.push(Some(s));
                }
                other => bail!(
                    "freeze precondition violated: row {} holds {:?} in a text column",
                    i,
                    other
                ),
            }
        }

        let plan = plan_dictionary(&entries, config)?;
        let (block, offsets) = build_entry_block(plan.block_entries.iter().copied())?;

        // Exception entries reuse the ingested allocation where possible.
        let mut materialized: HashMap<&[u8], Arc<str>> = HashMap::new();
        for (entry, source) in entries.iter().zip(&sources) {
            if let (Some(bytes), Some(arc)) = (*entry, *source) {
                materialized.entry(bytes).or_insert_with(|| Arc::clone(arc));
            }
        }
        let mut exceptions: Vec<Option<Arc<str>>> =
            Vec::with_capacity(plan.has_null as usize + plan.exception_entries.len());
        if plan.has_null {
            exceptions.push(None);
        }
        for bytes in &plan.exception_entries {
            // INVARIANT: every exception entry came from an ingested cell
            exceptions.push(Some(Arc::clone(materialized.get(bytes).unwrap())));
        }

        let codes = CodeArray::freeze(code_bits_for(plan.code_space), &plan.codes)?;
        Ok(Self {
            block,
            offsets,
            exceptions: exceptions.into_boxed_slice(),
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

    /// First code in the exception range.
    pub fn exception_base(&self) -> u32 {
        self.offsets.len() as u32
    }

    /// Number of exception entries (null included when present).
    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }

    /// Size of the contiguous entry block in bytes.
    pub fn block_bytes(&self) -> usize {
        self.block.len()
    }

    /// Decodes the value at `ordinal`: exceptions by table lookup, block
    /// entries by on-demand materialization.
    pub fn get(&self, ordinal: usize) -> Result<CellValue> {
        ensure!(
            ordinal < self.codes.len(),
            "ordinal {} out of range (len={})",
            ordinal,
            self.codes.len()
        );
        let code = self.codes.get(ordinal);
        let base = self.exception_base();
        if code >= base {
            return Ok(match &self.exceptions[(code - base) as usize] {
                None => CellValue::Null,
                Some(s) => CellValue::Text(Arc::clone(s)),
            });
        }
        let bytes = entry_at(&self.block, self.offsets[code as usize] as usize);
        let s = std::str::from_utf8(bytes)
            .map_err(|e| eyre::eyre!("invalid UTF-8 in dictionary block entry {}: {}", code, e))?;
        Ok(CellValue::Text(Arc::from(s)))
    }

    /// Payload footprint in bytes: block, offsets, and packed codes.
    pub fn payload_bytes(&self) -> usize {
        self.block.len() + self.offsets.len() * 4 + self.codes.payload_bytes()
    }
}

/// Compressed dictionary over raw byte strings. Structurally identical to
/// [`StringDictionary`] without the UTF-8 constraint.
#[derive(Debug, Clone)]
pub struct ByteStringDictionary {
    block: Box<[u8]>,
    offsets: Box<[u32]>,
    exceptions: Box<[Option<Arc<[u8]>>]>,
    codes: CodeArray,
}

impl ByteStringDictionary {
    /// Freezes a validated blob value list.
    pub fn freeze(cells: &[CellValue], config: &SelectorConfig) -> Result<Self> {
        let mut entries: Vec<Option<&[u8]>> = Vec::with_capacity(cells.len());
        let mut sources: Vec<Option<&Arc<[u8]>>> = Vec::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            match cell {
                CellValue::Null => {
                    entries.push(None);
                    sources.push(None);
                }
                CellValue::Blob(b) => {
                    entries.push(Some(&b[..]));
                    sources.push(Some(b));
                }
                other => bail!(
                    "freeze precondition violated: row {} holds {:?} in a blob column",
                    i,
                    other
                ),
            }
        }

        let plan = plan_dictionary(&entries, config)?;
        let (block, offsets) = build_entry_block(plan.block_entries.iter().copied())?;

        let mut materialized: HashMap<&[u8], Arc<[u8]>> = HashMap::new();
        for (entry, source) in entries.iter().zip(&sources) {
            if let (Some(bytes), Some(arc)) = (*entry, *source) {
                materialized.entry(bytes).or_insert_with(|| Arc::clone(arc));
            }
        }
        let mut exceptions: Vec<Option<Arc<[u8]>>> =
            Vec::with_capacity(plan.has_null as usize + plan.exception_entries.len());
        if plan.has_null {
            exceptions.push(None);
        }
        for bytes in &plan.exception_entries {
            // INVARIANT: every exception entry came from an ingested cell
            exceptions.push(Some(Arc::clone(materialized.get(bytes).unwrap())));
        }

        let codes = CodeArray::freeze(code_bits_for(plan.code_space), &plan.codes)?;
        Ok(Self {
            block,
            offsets,
            exceptions: exceptions.into_boxed_slice(),
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

    /// First code in the exception range.
    pub fn exception_base(&self) -> u32 {
        self.offsets.len() as u32
    }

    /// Number of exception entries (null included when present).
    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }

    /// Decodes the value at `ordinal`.
    pub fn get(&self, ordinal: usize) -> Result<CellValue> {
        ensure!(
            ordinal < self.codes.len(),
            "ordinal {} out of range (len={})",
            ordinal,
            self.codes.len()
        );
        let code = self.codes.get(ordinal);
        let base = self.exception_base();
        if code >= base {
            return Ok(match &self.exceptions[(code - base) as usize] {
                None => CellValue::Null,
                Some(b) => CellValue::Blob(Arc::clone(b)),
            });
        }
        let bytes = entry_at(&self.block, self.offsets[code as usize] as usize);
        Ok(CellValue::Blob(Arc::from(bytes)))
    }

    /// Payload footprint in bytes: block, offsets, and packed codes.
    pub fn payload_bytes(&self) -> usize {
        self.block.len() + self.offsets.len() * 4 + self.codes.payload_bytes()
    }
}
