//! # Bit-Sliced Word Packing
//!
//! This module provides the packed sub-word layout shared by the
//! bit-sliced primitive representation and the dictionary code arrays.
//! Values of `bit_count` bits each are packed into 64-bit words, several
//! chunks per word, with O(1) positional access.
//!
//! ## Word Layout
//!
//! ```text
//! chunks_per_word = 64 / bit_count          (integer division)
//! word(r)  = r / chunks_per_word
//! chunk(r) = r % chunks_per_word
//! bits(r)  = [chunk(r) * bit_count, chunk(r) * bit_count + bit_count)
//! mask     = (1 << bit_count) - 1
//! ```
//!
//! Chunks fill each word from the low bits upward; words follow row order.
//! When `64 % bit_count != 0` the top `64 % bit_count` bits of every word
//! are dead. Trailing chunks of the final word beyond the value count are
//! zero-filled. This layout is bit-exact and load-bearing for anyone
//! serializing payloads; see the tests for the packed-word fixtures.
//!
//! ## Signedness
//!
//! Chunks hold the low `bit_count` bits of the value, stored unsigned.
//! Decode zero-extends the chunk and casts to the requested primitive
//! kind. There is no sign extension: the selector only bit-slices columns
//! whose observed minimum is >= 0.
//!
//! ## Builders
//!
//! [`or_long`] ORs a chunk into place and exists for freeze-time random
//! access assembly. Payloads are immutable once frozen; nothing calls
//! `or_long` on a frozen store.

use crate::config::MAX_BIT_COUNT;
use crate::types::{CellValue, PrimitiveKind};
use eyre::{bail, ensure, Result};

/// Number of chunks packed into each 64-bit word at the given width.
#[inline]
pub fn chunks_per_word(bit_count: u8) -> usize {
    debug_assert!(bit_count >= 1 && bit_count <= MAX_BIT_COUNT);
    64 / bit_count as usize
}

/// Number of words needed to hold `len` chunks at the given width.
#[inline]
pub fn word_count(len: usize, bit_count: u8) -> usize {
    len.div_ceil(chunks_per_word(bit_count))
}

/// Chunk mask at the given width.
#[inline]
pub fn chunk_mask(bit_count: u8) -> u64 {
    (1u64 << bit_count) - 1
}

/// Decodes the raw chunk at `ordinal`. The caller guarantees
/// `ordinal < len`; out-of-range ordinals index past the word array and
/// panic.
#[inline]
pub fn get_long(bit_count: u8, words: &[u64], ordinal: usize) -> u64 {
    let cpw = chunks_per_word(bit_count);
    let word = words[ordinal / cpw];
    let chunk = ordinal % cpw;
    (word >> (chunk * bit_count as usize)) & chunk_mask(bit_count)
}

/// ORs the low `bit_count` bits of `value` into the chunk at `ordinal`.
/// Freeze-time assembly only.
#[inline]
pub fn or_long(bit_count: u8, words: &mut [u64], ordinal: usize, value: u64) {
    let cpw = chunks_per_word(bit_count);
    let chunk = ordinal % cpw;
    words[ordinal / cpw] |= (value & chunk_mask(bit_count)) << (chunk * bit_count as usize);
}

fn pack(bit_count: u8, values: impl ExactSizeIterator<Item = u64>) -> Box<[u64]> {
    let cpw = chunks_per_word(bit_count);
    let mut words = vec![0u64; values.len().div_ceil(cpw)];
    for (i, v) in values.enumerate() {
        words[i / cpw] |= v << ((i % cpw) * bit_count as usize);
    }
    words.into_boxed_slice()
}

/// Packed array of unsigned row codes, nested inside the dictionary
/// representations. Not a representation of its own.
#[derive(Debug, Clone)]
pub struct CodeArray {
    bit_count: u8,
    len: usize,
    words: Box<[u64]>,
}

impl CodeArray {
    /// Packs `codes` at the given width. Every code must fit in
    /// `bit_count` bits.
    pub fn freeze(bit_count: u8, codes: &[u32]) -> Result<Self> {
        ensure!(
            (1..=32).contains(&bit_count),
            "code array bit count {} out of range [1, 32]",
            bit_count
        );
        let mask = chunk_mask(bit_count);
        for (i, &code) in codes.iter().enumerate() {
            ensure!(
                code as u64 <= mask,
                "code {} at row {} does not fit in {} bits",
                code,
                i,
                bit_count
            );
        }
        Ok(Self {
            bit_count,
            len: codes.len(),
            words: pack(bit_count, codes.iter().map(|&c| c as u64)),
        })
    }

    /// Number of row codes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the array holds no codes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Code width in bits.
    pub fn bit_count(&self) -> u8 {
        self.bit_count
    }

    /// Decodes the code at `ordinal`. Caller guarantees `ordinal < len()`.
    #[inline]
    pub fn get(&self, ordinal: usize) -> u32 {
        debug_assert!(ordinal < self.len);
        get_long(self.bit_count, &self.words, ordinal) as u32
    }

    /// Payload footprint in bytes.
    pub fn payload_bytes(&self) -> usize {
        self.words.len() * 8
    }
}

/// Bit-sliced primitive array: `bit_count`-bit chunks packed into 64-bit
/// words, decoded by zero-extend-and-cast to `kind`.
#[derive(Debug, Clone)]
pub struct BitSlicedArray {
    kind: PrimitiveKind,
    bit_count: u8,
    len: usize,
    words: Box<[u64]>,
}

impl BitSlicedArray {
    /// Freezes a boolean column at the canonical one-bit width.
    pub fn freeze_bools(values: &[bool]) -> Self {
        Self {
            kind: PrimitiveKind::Bool,
            bit_count: 1,
            len: values.len(),
            words: pack(1, values.iter().map(|&b| b as u64)),
        }
    }

    /// Freezes an integer-domain column (integer kinds and char) at the
    /// given width. Every value must be non-negative and fit in
    /// `bit_count` bits; violations are freeze precondition errors.
    pub fn freeze_ints(kind: PrimitiveKind, bit_count: u8, values: &[i64]) -> Result<Self> {
        ensure!(
            kind.is_bit_sliceable(),
            "cannot bit-slice primitive kind {:?}",
            kind
        );
        ensure!(
            (1..=MAX_BIT_COUNT).contains(&bit_count),
            "bit count {} out of range [1, {}]",
            bit_count,
            MAX_BIT_COUNT
        );
        let mask = chunk_mask(bit_count);
        for (i, &v) in values.iter().enumerate() {
            ensure!(
                v >= 0 && v as u64 <= mask,
                "value {} at row {} does not fit in {} unsigned bits",
                v,
                i,
                bit_count
            );
        }
        Ok(Self {
            kind,
            bit_count,
            len: values.len(),
            words: pack(bit_count, values.iter().map(|&v| v as u64)),
        })
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the array holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Chunk width in bits.
    pub fn bit_count(&self) -> u8 {
        self.bit_count
    }

    /// Primitive kind the chunks decode to.
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Raw packed words, low chunk first within each word.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Decodes the value at `ordinal`: zero-extend the chunk, cast to the
    /// primitive kind.
    pub fn get(&self, ordinal: usize) -> Result<CellValue> {
        ensure!(
            ordinal < self.len,
            "ordinal {} out of range (len={})",
            ordinal,
            self.len
        );
        let raw = get_long(self.bit_count, &self.words, ordinal);
        match self.kind {
            PrimitiveKind::Bool => Ok(CellValue::Bool(raw != 0)),
            PrimitiveKind::Int1 => Ok(CellValue::Int1(raw as i8)),
            PrimitiveKind::Int2 => Ok(CellValue::Int2(raw as i16)),
            PrimitiveKind::Int4 => Ok(CellValue::Int4(raw as i32)),
            PrimitiveKind::Int8 => Ok(CellValue::Int8(raw as i64)),
            PrimitiveKind::Char => Ok(CellValue::Char(raw as u16)),
            PrimitiveKind::Float4 | PrimitiveKind::Float8 => {
                bail!("bit-sliced store cannot decode primitive kind {:?}", self.kind)
            }
        }
    }

    /// Payload footprint in bytes.
    pub fn payload_bytes(&self) -> usize {
        self.words.len() * 8
    }
}
