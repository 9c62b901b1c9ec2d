use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polars::prelude::*;
use solar_compare::{format_summary, summarize, REGION_COLUMN};

fn synthetic_table(rows_per_region: usize) -> PolarsResult<DataFrame> {
    let labels = ["Benin (Malanville)", "Sierra Leone (Bumbuna)", "Togo (Dapaong)"];
    let mut regions = Vec::with_capacity(rows_per_region * labels.len());
    let mut ghi = Vec::with_capacity(rows_per_region * labels.len());
    for (offset, label) in labels.iter().enumerate() {
        for i in 0..rows_per_region {
            regions.push(*label);
            ghi.push(((i * 37 + offset * 11) % 1_200) as f64);
        }
    }
    df!(REGION_COLUMN => regions, "GHI" => ghi)
}

fn bench_summarize(c: &mut Criterion) {
    let Ok(table) = synthetic_table(100_000) else {
        return;
    };
    c.bench_function("summarize_300k_rows", |b| {
        b.iter(|| summarize(black_box(&table), black_box("GHI")))
    });
    c.bench_function("summarize_and_format", |b| {
        b.iter(|| summarize(black_box(&table), "GHI").map(|summary| format_summary(&summary)))
    });
}

criterion_group!(benches, bench_summarize);
criterion_main!(benches);
