//! Benchmarks for exclusion-aware measurement.
//!
//! Run with: cargo bench -p foldtext-text

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use foldtext_core::geometry::LayoutRect;
use foldtext_text::{Content, Font, LayoutConstraints, MonospaceMeasurer, TextMeasurer};
use std::hint::black_box;

fn ascii_text(len: usize) -> String {
    "The quick brown fox jumps over the lazy dog. "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

fn cjk_text(len: usize) -> String {
    "\u{4E2D}\u{6587}\u{6D4B}\u{8BD5}\u{6587}\u{672C}\u{FF0C}"
        .chars()
        .cycle()
        .take(len)
        .collect()
}

fn bench_measure(c: &mut Criterion) {
    let measurer = MonospaceMeasurer::new();
    let font = Font::system(13.0);
    let mut group = c.benchmark_group("measure");

    for len in [64usize, 512, 4096] {
        for (name, text) in [("ascii", ascii_text(len)), ("cjk", cjk_text(len))] {
            let content = Content::plain(text);
            group.throughput(Throughput::Bytes(len as u64));

            let free = LayoutConstraints::new(320.0, font);
            group.bench_with_input(BenchmarkId::new(format!("{name}/free"), len), &content, |b, content| {
                b.iter(|| black_box(measurer.measure(black_box(content), &free)));
            });

            let excluded = LayoutConstraints::new(320.0, font)
                .with_max_lines(3)
                .with_exclusions([LayoutRect::new(294.0, 32.0, 26.0, 16.0)]);
            group.bench_with_input(
                BenchmarkId::new(format!("{name}/excluded"), len),
                &content,
                |b, content| {
                    b.iter(|| black_box(measurer.measure(black_box(content), &excluded)));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_measure);
criterion_main!(benches);
