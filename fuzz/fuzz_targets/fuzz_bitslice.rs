//! Fuzz testing for the bit-sliced word layout.
//!
//! This fuzz target packs arbitrary values at arbitrary chunk widths and
//! checks that every ordinal decodes back to the packed value, both
//! through the typed array and the raw word helpers.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use tundra::column::bitslice::{get_long, or_long, word_count, BitSlicedArray, CodeArray};
use tundra::{CellValue, PrimitiveKind};

#[derive(Debug, Arbitrary)]
struct BitSliceInput {
    bit_count: u8,
    values: Vec<u64>,
}

fuzz_target!(|input: BitSliceInput| {
    let bit_count = input.bit_count % 63 + 1;
    let mask = (1u64 << bit_count) - 1;
    let values: Vec<i64> = input.values.iter().map(|&v| (v & mask) as i64).collect();

    let arr = BitSlicedArray::freeze_ints(PrimitiveKind::Int8, bit_count, &values)
        .expect("masked values always fit the chunk width");
    assert_eq!(arr.len(), values.len());

    let mut assembled = vec![0u64; word_count(values.len(), bit_count)];
    for (i, &v) in values.iter().enumerate() {
        or_long(bit_count, &mut assembled, i, v as u64);
    }
    assert_eq!(arr.words(), &assembled[..]);

    for (i, &v) in values.iter().enumerate() {
        assert_eq!(arr.get(i).unwrap(), CellValue::Int8(v));
        assert_eq!(get_long(bit_count, arr.words(), i), v as u64);
    }
    assert!(arr.get(values.len()).is_err());

    if bit_count <= 32 {
        let codes: Vec<u32> = values.iter().map(|&v| v as u32).collect();
        let code_arr = CodeArray::freeze(bit_count, &codes).unwrap();
        for (i, &c) in codes.iter().enumerate() {
            assert_eq!(code_arr.get(i), c);
        }
    }
});
