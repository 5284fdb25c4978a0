//! Codec benchmarks for tundra
//!
//! These benchmarks measure freeze cost per representation and positional
//! decode throughput, which dominate load and scan performance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box as hint_black_box;

use tundra::column::bitslice::BitSlicedArray;
use tundra::column::select::{choose, ColumnStats};
use tundra::{CellValue, ColumnSpec, LogicalType, PrimitiveKind, SelectorConfig, TableBuilder};

const ROWS: usize = 10_000;

fn bench_bitslice_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("bitslice_get");

    for bit_count in [1u8, 2, 4, 7] {
        let mask = (1u64 << bit_count) - 1;
        let values: Vec<i64> = (0..ROWS as u64).map(|i| (i & mask) as i64).collect();
        let arr = BitSlicedArray::freeze_ints(PrimitiveKind::Int8, bit_count, &values).unwrap();

        group.bench_with_input(
            BenchmarkId::new("get", bit_count),
            &arr,
            |b, arr| {
                b.iter(|| {
                    let mut acc = 0u64;
                    for i in 0..ROWS {
                        if let CellValue::Int8(v) = arr.get(black_box(i)).unwrap() {
                            acc = acc.wrapping_add(v as u64);
                        }
                    }
                    hint_black_box(acc)
                });
            },
        );
    }

    group.finish();
}

fn bench_freeze(c: &mut Criterion) {
    let mut group = c.benchmark_group("freeze");

    let small_range: Vec<CellValue> = (0..ROWS).map(|i| CellValue::Int4((i % 8) as i32)).collect();
    let dense: Vec<CellValue> = (0..ROWS).map(|i| CellValue::Int4(i as i32 * 1000)).collect();
    let strings: Vec<CellValue> = (0..ROWS)
        .map(|i| CellValue::text(format!("label-{}", i % 50)))
        .collect();

    let cases: Vec<(&str, LogicalType, &[CellValue])> = vec![
        ("bit_sliced_int", LogicalType::Int4, &small_range),
        ("dense_int", LogicalType::Int4, &dense),
        ("string_dict", LogicalType::Text, &strings),
    ];

    for (name, ty, cells) in cases {
        group.bench_function(name, |b| {
            b.iter(|| {
                let spec = ColumnSpec::new("c", ty);
                let store = tundra::column::select::freeze_column(
                    &spec,
                    black_box(cells.to_vec()),
                    &SelectorConfig::default(),
                )
                .unwrap();
                hint_black_box(store.len())
            });
        });
    }

    group.finish();
}

fn bench_selector(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector");

    let cells: Vec<CellValue> = (0..ROWS).map(|i| CellValue::Int8((i % 100) as i64)).collect();
    let spec = ColumnSpec::new("n", LogicalType::Int8);

    group.bench_function("analyze", |b| {
        b.iter(|| {
            let stats = ColumnStats::analyze(black_box(&cells));
            hint_black_box(stats.distinct)
        });
    });

    group.bench_function("choose", |b| {
        let stats = ColumnStats::analyze(&cells);
        let config = SelectorConfig::default();
        b.iter(|| hint_black_box(choose(black_box(&spec), &stats, &config)));
    });

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    let mut builder = TableBuilder::new(vec![
        ColumnSpec::new("id", LogicalType::Int8),
        ColumnSpec::new("bucket", LogicalType::Int4),
        ColumnSpec::new("label", LogicalType::Text),
    ]);
    for i in 0..ROWS as i64 {
        builder
            .push_row(&[
                CellValue::Int8(i),
                CellValue::Int4((i % 16) as i32),
                CellValue::text(format!("label-{}", i % 50)),
            ])
            .unwrap();
    }
    let table = builder.freeze().unwrap();

    group.bench_function("current", |b| {
        b.iter(|| {
            let mut cursor = table.scan();
            let mut rows = 0usize;
            while cursor.advance() {
                let row = cursor.current().unwrap();
                rows += row.len();
            }
            hint_black_box(rows)
        });
    });

    group.bench_function("current_into", |b| {
        b.iter(|| {
            let mut cursor = table.scan();
            let mut row = tundra::Row::new();
            let mut rows = 0usize;
            while cursor.advance() {
                cursor.current_into(&mut row).unwrap();
                rows += row.len();
            }
            hint_black_box(rows)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_bitslice_get,
    bench_freeze,
    bench_selector,
    bench_scan
);
criterion_main!(benches);
