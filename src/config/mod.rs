//! # Tundra Configuration Constants
//!
//! This module centralizes the constants that shape representation
//! selection, grouping interdependent values together. Constants that
//! depend on each other are co-located to prevent mismatch bugs.
//!
//! ## Dependency Graph
//!
//! ```text
//! MAX_INLINE_STRING_LEN (65535)
//!       │
//!       └─> String/byte-string block entries store their length in a
//!           u16 big-endian prefix. An entry longer than u16::MAX cannot
//!           live in the block and is forced into the exceptions table.
//!           MAX_INLINE_STRING_LEN must therefore never exceed u16::MAX.
//!
//! MAX_BIT_COUNT (63)
//!       │
//!       └─> Bit-sliced chunks are masked with (1 << bit_count) - 1 inside
//!           a 64-bit word; bit_count 64 would shift out of range. A value
//!           needing all 64 bits takes a native Int8 primitive array.
//!
//! DEFAULT_EAGER_EXCEPTION_FREQUENCY (0.5)
//!       │
//!       └─> A string occurring in more than this fraction of rows is
//!           pre-materialized into the exceptions table so scans hand out
//!           clones of one shared allocation instead of re-materializing
//!           from the block on every row.
//!
//! DEFAULT_DICTIONARY_SAVINGS_THRESHOLD (0.5)
//!       │
//!       └─> An object column dictionary-encodes when
//!           distinct_count < row_count * threshold.
//! ```
//!
//! ## Critical Invariants
//!
//! Enforced by compile-time assertions:
//!
//! 1. `MAX_INLINE_STRING_LEN <= u16::MAX` (block length prefix fits)
//! 2. `MAX_BIT_COUNT < 64` (chunk mask is computable)

/// Longest entry (in bytes) storable inline in a string/byte-string
/// dictionary block. Longer entries are forced into the exceptions table.
pub const MAX_INLINE_STRING_LEN: usize = u16::MAX as usize;

/// Widest admissible bit-sliced chunk. Values needing 64 bits use a native
/// primitive array instead.
pub const MAX_BIT_COUNT: u8 = 63;

/// Fraction of rows above which a string value is pre-materialized into
/// the dictionary's exceptions table.
pub const DEFAULT_EAGER_EXCEPTION_FREQUENCY: f64 = 0.5;

/// Distinct/total ratio below which an object column prefers a dictionary
/// over a plain object array.
pub const DEFAULT_DICTIONARY_SAVINGS_THRESHOLD: f64 = 0.5;

/// Estimated per-row footprint of boxed storage, in bytes. Used when
/// weighing a primitive dictionary against an object array for nullable
/// primitive columns.
pub const BOXED_VALUE_BYTES: usize = 8;

const _: () = assert!(
    MAX_INLINE_STRING_LEN <= u16::MAX as usize,
    "block length prefix is u16 big-endian; inline entries must fit"
);

const _: () = assert!(MAX_BIT_COUNT < 64, "chunk mask (1 << bit_count) - 1 requires bit_count < 64");

/// Tunable thresholds consumed by the representation selector.
///
/// Policy, not contract: changing these changes which representation is
/// chosen, never what a chosen representation decodes to.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Longest string/byte-string storable inline in the block.
    pub max_inline_length: usize,
    /// Fraction of rows above which a string is pre-materialized as an
    /// exception.
    pub eager_exception_frequency: f64,
    /// Distinct/total ratio below which object columns dictionary-encode.
    pub dictionary_savings_threshold: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_inline_length: MAX_INLINE_STRING_LEN,
            eager_exception_frequency: DEFAULT_EAGER_EXCEPTION_FREQUENCY,
            dictionary_savings_threshold: DEFAULT_DICTIONARY_SAVINGS_THRESHOLD,
        }
    }
}
