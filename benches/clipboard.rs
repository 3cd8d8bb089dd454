//! Benchmarks for the clipboard codec on large selections.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use netgrid::clipboard::{deserialize, serialize};
use netgrid::types::{row_from, CellPosition, CellValue, GridSelection, Row};
use netgrid::GridColumn;

fn pipe_columns() -> Vec<GridColumn> {
    vec![
        GridColumn::text("id", "ID").disabled(true),
        GridColumn::text("from", "From"),
        GridColumn::text("to", "To"),
        GridColumn::number("length", "Length"),
        GridColumn::number("diameter", "Diameter"),
        GridColumn::number("roughness", "Roughness"),
        GridColumn::text("status", "Status"),
    ]
}

fn pipe_rows(count: u32) -> Vec<Row> {
    (0..count)
        .map(|i| {
            row_from([
                ("id", CellValue::from(format!("P{i}"))),
                ("from", CellValue::from(format!("J{i}"))),
                ("to", CellValue::from(format!("J{}", i + 1))),
                ("length", CellValue::Number(f64::from(i) * 12.5)),
                ("diameter", CellValue::Number(300.0)),
                ("roughness", CellValue::Number(130.0)),
                ("status", CellValue::from("Open")),
            ])
        })
        .collect()
}

fn bench_serialize(c: &mut Criterion) {
    let columns = pipe_columns();
    let mut group = c.benchmark_group("serialize");
    for count in [100u32, 1_000, 10_000] {
        let rows = pipe_rows(count);
        let selection = GridSelection::from_corners(
            CellPosition::new(0, 0),
            CellPosition::new(columns.len() as u32 - 1, count - 1),
        );
        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(BenchmarkId::from_parameter(count), &rows, |b, rows| {
            b.iter(|| serialize(black_box(&selection), black_box(rows), &columns));
        });
    }
    group.finish();
}

fn bench_deserialize(c: &mut Criterion) {
    let columns = pipe_columns();
    let mut group = c.benchmark_group("deserialize");
    for count in [100u32, 1_000, 10_000] {
        let rows = pipe_rows(count);
        let selection = GridSelection::from_corners(
            CellPosition::new(0, 0),
            CellPosition::new(columns.len() as u32 - 1, count - 1),
        );
        let text = serialize(&selection, &rows, &columns);
        // Paste half-way down so the table has to grow.
        let origin = CellPosition::new(0, count / 2);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &text, |b, text| {
            b.iter(|| deserialize(black_box(text), origin, &rows, &columns, Row::new));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_serialize, bench_deserialize);
criterion_main!(benches);
