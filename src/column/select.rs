//! # Representation Selection
//!
//! One pass over a column's validated value list produces a
//! [`ColumnStats`]; [`choose`] turns the stats into a [`Representation`]
//! plan; [`freeze_column`] runs the chosen codec. The selection is policy:
//! it decides footprint, never decode semantics.
//!
//! ## Policy
//!
//! | Column | Choice |
//! |--------|--------|
//! | Text | string dictionary, always |
//! | Blob | byte-string dictionary, always |
//! | Object | object dictionary when distinct count is small, else object array |
//! | Bool, no nulls | 1-bit slice (canonical) |
//! | Integer/char, no nulls, min >= 0, max fits 7 bits | bit-sliced at the exact width |
//! | Integer/char, no nulls, otherwise | native primitive array |
//! | Float, no nulls | native primitive array |
//! | Any primitive | dictionary instead, when its expected footprint is smaller |
//! | Primitive with nulls | dictionary when it beats boxed storage, else object array |
//!
//! Bit-sliced chunks decode by zero-extension, so slicing is never chosen
//! for columns containing negatives, and widths of 8 bits or more lose to
//! the native array (the sorted dictionary covers the wide-value,
//! low-cardinality case instead).
//!
//! Ties prefer the smaller expected payload, then the simpler codec:
//! primitive array over bit-slice over dictionary.

use super::bitslice::{word_count, BitSlicedArray};
use super::dictionary::PrimitiveDictionary;
use super::object::{ObjectArray, ObjectDictionary};
use super::primitive::PrimitiveBuffer;
use super::strings::{ByteStringDictionary, StringDictionary};
use super::{bits_for, code_bits_for, ColumnStore, RepresentationType};
use crate::config::{SelectorConfig, BOXED_VALUE_BYTES};
use crate::types::{CellValue, ColumnSpec, LogicalType, PrimitiveKind};
use eyre::{bail, ensure, Result};
use hashbrown::HashSet;

/// Observed value distribution of one column, gathered in a single pass.
#[derive(Debug, Clone, Default)]
pub struct ColumnStats {
    /// Total rows, nulls included.
    pub row_count: usize,
    /// Rows holding the null sentinel.
    pub null_count: usize,
    /// Distinct non-null values.
    pub distinct: usize,
    /// Minimum over the integer domain (integer kinds, bool, char).
    pub min: Option<i64>,
    /// Maximum over the integer domain.
    pub max: Option<i64>,
    /// Total entry bytes of text/blob values.
    pub total_bytes: usize,
    /// Longest text/blob entry in bytes.
    pub max_len: usize,
}

impl ColumnStats {
    /// Gathers stats over a validated value list.
    pub fn analyze(cells: &[CellValue]) -> Self {
        let mut stats = ColumnStats {
            row_count: cells.len(),
            ..ColumnStats::default()
        };
        let mut distinct: HashSet<&CellValue> = HashSet::new();
        for cell in cells {
            if cell.is_null() {
                stats.null_count += 1;
                continue;
            }
            distinct.insert(cell);
            if let Some(v) = cell.as_i64() {
                stats.min = Some(stats.min.map_or(v, |m| m.min(v)));
                stats.max = Some(stats.max.map_or(v, |m| m.max(v)));
            }
            match cell {
                CellValue::Text(s) => {
                    stats.total_bytes += s.len();
                    stats.max_len = stats.max_len.max(s.len());
                }
                CellValue::Blob(b) => {
                    stats.total_bytes += b.len();
                    stats.max_len = stats.max_len.max(b.len());
                }
                _ => {}
            }
        }
        stats.distinct = distinct.len();
        stats
    }
}

/// A selected representation with its parameters, prior to freezing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    ObjectArray,
    PrimitiveArray(PrimitiveKind),
    BitSlicedPrimitiveArray { kind: PrimitiveKind, bit_count: u8 },
    PrimitiveDictionary(PrimitiveKind),
    ObjectDictionary,
    StringDictionary,
    ByteStringDictionary,
}

impl Representation {
    /// The tag this plan freezes into.
    pub fn representation_type(&self) -> RepresentationType {
        match self {
            Representation::ObjectArray => RepresentationType::ObjectArray,
            Representation::PrimitiveArray(_) => RepresentationType::PrimitiveArray,
            Representation::BitSlicedPrimitiveArray { .. } => {
                RepresentationType::BitSlicedPrimitiveArray
            }
            Representation::PrimitiveDictionary(_) => RepresentationType::PrimitiveDictionary,
            Representation::ObjectDictionary => RepresentationType::ObjectDictionary,
            Representation::StringDictionary => RepresentationType::StringDictionary,
            Representation::ByteStringDictionary => RepresentationType::ByteStringDictionary,
        }
    }
}

/// Picks the representation for a column from its spec and stats.
pub fn choose(spec: &ColumnSpec, stats: &ColumnStats, config: &SelectorConfig) -> Representation {
    match spec.logical_type() {
        LogicalType::Text => Representation::StringDictionary,
        LogicalType::Blob => Representation::ByteStringDictionary,
        LogicalType::Object => {
            let cutoff = stats.row_count as f64 * config.dictionary_savings_threshold;
            if (stats.distinct as f64) < cutoff {
                Representation::ObjectDictionary
            } else {
                Representation::ObjectArray
            }
        }
        ty => {
            // INVARIANT: remaining logical types are primitive
            choose_primitive(ty.primitive_kind().unwrap(), stats)
        }
    }
}

fn choose_primitive(kind: PrimitiveKind, stats: &ColumnStats) -> Representation {
    let n = stats.row_count;

    let direct = if stats.null_count > 0 {
        None
    } else {
        Some(direct_representation(kind, stats))
    };

    let code_space = stats.distinct + (stats.null_count > 0) as usize;
    let dict_bytes =
        stats.distinct * kind.byte_width() + word_count(n, code_bits_for(code_space)) * 8;

    match direct {
        Some(repr) if expected_bytes(repr, n) <= dict_bytes => repr,
        Some(_) => Representation::PrimitiveDictionary(kind),
        None if dict_bytes < n * BOXED_VALUE_BYTES => Representation::PrimitiveDictionary(kind),
        None => Representation::ObjectArray,
    }
}

fn direct_representation(kind: PrimitiveKind, stats: &ColumnStats) -> Representation {
    match kind {
        PrimitiveKind::Bool => Representation::BitSlicedPrimitiveArray { kind, bit_count: 1 },
        PrimitiveKind::Float4 | PrimitiveKind::Float8 => Representation::PrimitiveArray(kind),
        _ => {
            let min = stats.min.unwrap_or(0);
            let max = stats.max.unwrap_or(0);
            if min < 0 {
                // Chunks zero-extend on decode; negatives need full width.
                return Representation::PrimitiveArray(kind);
            }
            let bit_count = bits_for(max as u64);
            if bit_count < 8 {
                Representation::BitSlicedPrimitiveArray { kind, bit_count }
            } else {
                Representation::PrimitiveArray(kind)
            }
        }
    }
}

fn expected_bytes(repr: Representation, row_count: usize) -> usize {
    match repr {
        Representation::PrimitiveArray(kind) => row_count * kind.byte_width(),
        Representation::BitSlicedPrimitiveArray { bit_count, .. } => {
            word_count(row_count, bit_count) * 8
        }
        // Direct candidates are only ever arrays or slices.
        _ => usize::MAX,
    }
}

/// Analyzes, selects, and freezes one column in a single call.
pub fn freeze_column(
    spec: &ColumnSpec,
    cells: Vec<CellValue>,
    config: &SelectorConfig,
) -> Result<ColumnStore> {
    let stats = ColumnStats::analyze(&cells);
    let repr = choose(spec, &stats, config);
    freeze_as(repr, cells, config)
}

/// Freezes a validated value list under an already-selected plan.
pub fn freeze_as(
    repr: Representation,
    cells: Vec<CellValue>,
    config: &SelectorConfig,
) -> Result<ColumnStore> {
    match repr {
        Representation::ObjectArray => Ok(ColumnStore::Objects(ObjectArray::freeze(cells, false))),
        Representation::ObjectDictionary => {
            Ok(ColumnStore::ObjectDict(ObjectDictionary::freeze(&cells)?))
        }
        Representation::PrimitiveArray(kind) => Ok(ColumnStore::Primitives(
            PrimitiveBuffer::from_cells(kind, &cells)?,
        )),
        Representation::BitSlicedPrimitiveArray { kind, bit_count } => {
            let store = if kind == PrimitiveKind::Bool && bit_count == 1 {
                BitSlicedArray::freeze_bools(&bools_of(&cells)?)
            } else {
                BitSlicedArray::freeze_ints(kind, bit_count, &ints_of(kind, &cells)?)?
            };
            Ok(ColumnStore::BitSliced(store))
        }
        Representation::PrimitiveDictionary(kind) => Ok(ColumnStore::PrimitiveDict(
            PrimitiveDictionary::freeze(kind, &cells)?,
        )),
        Representation::StringDictionary => Ok(ColumnStore::Strings(StringDictionary::freeze(
            &cells, config,
        )?)),
        Representation::ByteStringDictionary => Ok(ColumnStore::ByteStrings(
            ByteStringDictionary::freeze(&cells, config)?,
        )),
    }
}

fn bools_of(cells: &[CellValue]) -> Result<Vec<bool>> {
    let mut out = Vec::with_capacity(cells.len());
    for (i, cell) in cells.iter().enumerate() {
        match cell {
            CellValue::Bool(b) => out.push(*b),
            other => bail!(
                "freeze precondition violated: row {} holds {:?} in a boolean column",
                i,
                other
            ),
        }
    }
    Ok(out)
}

fn ints_of(kind: PrimitiveKind, cells: &[CellValue]) -> Result<Vec<i64>> {
    let mut out = Vec::with_capacity(cells.len());
    for (i, cell) in cells.iter().enumerate() {
        ensure!(
            cell.matches_type(kind.logical_type()),
            "freeze precondition violated: row {} holds {:?}, column packs {:?}",
            i,
            cell,
            kind
        );
        match cell.as_i64() {
            Some(v) => out.push(v),
            None => bail!(
                "freeze precondition violated: row {} holds {:?}, column packs {:?}",
                i,
                cell,
                kind
            ),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SelectorConfig {
        SelectorConfig::default()
    }

    fn int4_cells(values: &[i32]) -> Vec<CellValue> {
        values.iter().map(|&v| CellValue::Int4(v)).collect()
    }

    #[test]
    fn dense_ints_take_a_native_array() {
        let cells = int4_cells(&(1..=1000).collect::<Vec<_>>());
        let spec = ColumnSpec::new("n", LogicalType::Int4);
        let stats = ColumnStats::analyze(&cells);
        assert_eq!(
            choose(&spec, &stats, &config()),
            Representation::PrimitiveArray(PrimitiveKind::Int4)
        );

        let store = freeze_column(&spec, cells, &config()).unwrap();
        assert_eq!(store.payload_bytes(), 4000);
        assert_eq!(store.get(499).unwrap(), CellValue::Int4(500));
    }

    #[test]
    fn small_range_ints_bit_slice_at_exact_width() {
        let cells = int4_cells(&[0, 3, 1, 2, 2, 0, 3, 1]);
        let spec = ColumnSpec::new("n", LogicalType::Int4);
        let stats = ColumnStats::analyze(&cells);
        assert_eq!(
            choose(&spec, &stats, &config()),
            Representation::BitSlicedPrimitiveArray {
                kind: PrimitiveKind::Int4,
                bit_count: 2
            }
        );

        let store = freeze_column(&spec, cells, &config()).unwrap();
        match &store {
            ColumnStore::BitSliced(arr) => assert_eq!(arr.words()[0], 0x729C),
            other => panic!("unexpected store {:?}", other),
        }
        assert_eq!(store.get(3).unwrap(), CellValue::Int4(2));
    }

    #[test]
    fn booleans_always_bit_slice() {
        let cells = vec![
            CellValue::Bool(true),
            CellValue::Bool(false),
            CellValue::Bool(true),
            CellValue::Bool(true),
        ];
        let spec = ColumnSpec::new("flag", LogicalType::Bool);
        let stats = ColumnStats::analyze(&cells);
        assert_eq!(
            choose(&spec, &stats, &config()),
            Representation::BitSlicedPrimitiveArray {
                kind: PrimitiveKind::Bool,
                bit_count: 1
            }
        );

        let store = freeze_column(&spec, cells, &config()).unwrap();
        match &store {
            ColumnStore::BitSliced(arr) => assert_eq!(arr.words()[0], 0x0D),
            other => panic!("unexpected store {:?}", other),
        }
        assert_eq!(store.get(2).unwrap(), CellValue::Bool(true));
    }

    #[test]
    fn wide_low_cardinality_ints_take_a_dictionary() {
        let values: Vec<i32> = (0..1000).map(|i| [5, 1_000_000, 99][i % 3]).collect();
        let cells = int4_cells(&values);
        let spec = ColumnSpec::new("n", LogicalType::Int4);
        let stats = ColumnStats::analyze(&cells);
        assert_eq!(
            choose(&spec, &stats, &config()),
            Representation::PrimitiveDictionary(PrimitiveKind::Int4)
        );

        let store = freeze_column(&spec, cells, &config()).unwrap();
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(store.get(i).unwrap(), CellValue::Int4(v));
        }
    }

    #[test]
    fn negative_values_never_bit_slice() {
        let values: Vec<i32> = (0..100).map(|i| i - 50).collect();
        let cells = int4_cells(&values);
        let spec = ColumnSpec::new("n", LogicalType::Int4);
        let stats = ColumnStats::analyze(&cells);
        assert_eq!(
            choose(&spec, &stats, &config()),
            Representation::PrimitiveArray(PrimitiveKind::Int4)
        );
    }

    #[test]
    fn nullable_low_cardinality_takes_dictionary_with_null_code() {
        let mut cells = int4_cells(&[7, 7, 9, 7, 9]);
        cells.push(CellValue::Null);
        let spec = ColumnSpec::nullable("n", LogicalType::Int4);
        let stats = ColumnStats::analyze(&cells);
        assert_eq!(
            choose(&spec, &stats, &config()),
            Representation::PrimitiveDictionary(PrimitiveKind::Int4)
        );

        let store = freeze_column(&spec, cells, &config()).unwrap();
        assert_eq!(store.get(5).unwrap(), CellValue::Null);
        assert_eq!(store.get(0).unwrap(), CellValue::Int4(7));
    }

    #[test]
    fn nullable_high_cardinality_falls_back_to_objects() {
        let mut cells: Vec<CellValue> = (0..100).map(|i| CellValue::Int8(i as i64)).collect();
        cells.push(CellValue::Null);
        let spec = ColumnSpec::nullable("n", LogicalType::Int8);
        let stats = ColumnStats::analyze(&cells);
        assert_eq!(choose(&spec, &stats, &config()), Representation::ObjectArray);

        let store = freeze_column(&spec, cells, &config()).unwrap();
        assert_eq!(store.get(100).unwrap(), CellValue::Null);
        assert_eq!(store.get(42).unwrap(), CellValue::Int8(42));
    }

    #[test]
    fn text_always_takes_the_string_dictionary() {
        let cells = vec![CellValue::text("a"), CellValue::text("b")];
        let spec = ColumnSpec::new("s", LogicalType::Text);
        let stats = ColumnStats::analyze(&cells);
        assert_eq!(
            choose(&spec, &stats, &config()),
            Representation::StringDictionary
        );
    }

    #[test]
    fn blob_always_takes_the_byte_string_dictionary() {
        let cells = vec![CellValue::blob([1u8, 2])];
        let spec = ColumnSpec::new("b", LogicalType::Blob);
        let stats = ColumnStats::analyze(&cells);
        assert_eq!(
            choose(&spec, &stats, &config()),
            Representation::ByteStringDictionary
        );
    }

    #[test]
    fn low_cardinality_objects_dictionary_encode() {
        let cells: Vec<CellValue> = (0..100)
            .map(|i| {
                if i % 2 == 0 {
                    CellValue::Int8(1)
                } else {
                    CellValue::text("odd")
                }
            })
            .collect();
        let spec = ColumnSpec::new("o", LogicalType::Object);
        let stats = ColumnStats::analyze(&cells);
        assert_eq!(
            choose(&spec, &stats, &config()),
            Representation::ObjectDictionary
        );

        let store = freeze_column(&spec, cells.clone(), &config()).unwrap();
        for (i, cell) in cells.iter().enumerate() {
            assert_eq!(&store.get(i).unwrap(), cell);
        }
    }

    #[test]
    fn high_cardinality_objects_stay_an_array() {
        let cells: Vec<CellValue> = (0..100).map(|i| CellValue::Int8(i as i64)).collect();
        let spec = ColumnSpec::new("o", LogicalType::Object);
        let stats = ColumnStats::analyze(&cells);
        assert_eq!(choose(&spec, &stats, &config()), Representation::ObjectArray);
    }

    #[test]
    fn floats_with_few_distinct_values_dictionary_encode() {
        let cells: Vec<CellValue> = (0..1000)
            .map(|i| CellValue::Float8([0.5, 2.25][i % 2]))
            .collect();
        let spec = ColumnSpec::new("f", LogicalType::Float8);
        let stats = ColumnStats::analyze(&cells);
        assert_eq!(
            choose(&spec, &stats, &config()),
            Representation::PrimitiveDictionary(PrimitiveKind::Float8)
        );
    }

    #[test]
    fn unique_floats_stay_a_native_array() {
        let cells: Vec<CellValue> = (0..100).map(|i| CellValue::Float8(i as f64 * 0.7)).collect();
        let spec = ColumnSpec::new("f", LogicalType::Float8);
        let stats = ColumnStats::analyze(&cells);
        assert_eq!(
            choose(&spec, &stats, &config()),
            Representation::PrimitiveArray(PrimitiveKind::Float8)
        );
    }

    #[test]
    fn char_columns_slice_when_code_units_are_narrow() {
        let cells: Vec<CellValue> = "0123456789"
            .encode_utf16()
            .map(CellValue::Char)
            .collect();
        let spec = ColumnSpec::new("c", LogicalType::Char);
        let stats = ColumnStats::analyze(&cells);
        // '9' is code unit 57, which fits in 6 bits.
        assert_eq!(
            choose(&spec, &stats, &config()),
            Representation::BitSlicedPrimitiveArray {
                kind: PrimitiveKind::Char,
                bit_count: 6
            }
        );
    }

    #[test]
    fn empty_column_freezes_under_any_primitive_plan() {
        let spec = ColumnSpec::new("n", LogicalType::Int4);
        let store = freeze_column(&spec, Vec::new(), &config()).unwrap();
        assert!(store.is_empty());
        assert!(store.get(0).is_err());
    }

    #[test]
    fn stats_capture_distribution() {
        let cells = vec![
            CellValue::Int4(-3),
            CellValue::Int4(10),
            CellValue::Int4(-3),
            CellValue::Null,
        ];
        let stats = ColumnStats::analyze(&cells);
        assert_eq!(stats.row_count, 4);
        assert_eq!(stats.null_count, 1);
        assert_eq!(stats.distinct, 2);
        assert_eq!(stats.min, Some(-3));
        assert_eq!(stats.max, Some(10));
    }

    #[test]
    fn stats_capture_string_lengths() {
        let cells = vec![CellValue::text("ab"), CellValue::text("abcd")];
        let stats = ColumnStats::analyze(&cells);
        assert_eq!(stats.total_bytes, 6);
        assert_eq!(stats.max_len, 4);
    }
}
