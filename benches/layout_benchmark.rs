//! Benchmarks for table inference on report pages.
//!
//! Run with: cargo bench
//!
//! Pages are built directly from glyphs, so only layout inference is
//! measured, not PDF decoding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use salarypdf::table::find_gutters;
use salarypdf::{ClubAliases, LayoutOptions, Page, TextChar};

const COLUMN_X: [f32; 6] = [50.0, 120.0, 220.0, 320.0, 380.0, 470.0];

fn glyphs(text: &str, x: f32, top: f32, out: &mut Vec<TextChar>) {
    for (i, c) in text.chars().enumerate() {
        out.push(TextChar {
            text: c.to_string(),
            x0: x + i as f32 * 6.0,
            x1: x + (i + 1) as f32 * 6.0,
            top,
            bottom: top + 10.0,
            size: 10.0,
            font_name: "Courier".to_string(),
        });
    }
}

/// A modern-layout continuation page with `rows` salary rows.
fn synthetic_page(rows: usize) -> Page {
    let mut chars = Vec::new();
    glyphs("MLSPA", 50.0, 20.0, &mut chars);

    let cells = ["NYCFC", "Van Dyke", "Andrew", "M-F", "$1,250,000.00", "$1,400,000.00"];
    for row in 0..rows {
        let top = 40.0 + row as f32 * 12.0;
        for (x, cell) in COLUMN_X.iter().zip(cells) {
            glyphs(cell, *x, top, &mut chars);
        }
    }

    glyphs("2", 300.0, 40.0 + rows as f32 * 12.0 + 20.0, &mut chars);
    Page::new(2, 612.0, 40.0 + rows as f32 * 12.0 + 40.0, chars)
}

/// Benchmark PDF header detection.
fn bench_header_detection(c: &mut Criterion) {
    let pdf_header = b"%PDF-1.5\n%\xE2\xE3\xCF\xD3\n";
    let non_pdf_data = b"<!DOCTYPE html><html><body>Not found</body></html>";

    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| salarypdf::pdf_version_from_bytes(black_box(pdf_header)).unwrap());
    });

    c.bench_function("detect_non_pdf", |b| {
        b.iter(|| salarypdf::pdf_version_from_bytes(black_box(non_pdf_data)).is_err());
    });
}

/// Benchmark gutter inference at various page sizes.
fn bench_gutters(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_gutters");

    for rows in [25, 50, 100].iter() {
        let page = synthetic_page(*rows);

        group.bench_function(format!("{}_rows", rows), |b| {
            b.iter(|| find_gutters(black_box(&page.chars), 10.0));
        });
    }

    group.finish();
}

/// Benchmark the full per-page path: region, crop, gutters, grid, cleaning.
fn bench_parse_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_page");
    let options = LayoutOptions::default();
    let aliases = ClubAliases::default();

    for rows in [25, 50, 100].iter() {
        let page = synthetic_page(*rows);

        group.bench_function(format!("{}_rows", rows), |b| {
            b.iter(|| {
                salarypdf::parse_page(black_box(&page), 2019, &options, &aliases).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_header_detection,
    bench_gutters,
    bench_parse_page,
);
criterion_main!(benches);
