use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use newsboard::export::{compose, write_pdf};
use newsboard::rendering::split;
use newsboard::surface::RasterSurface;
use newsboard::{CaptureOptions, ExportConfig, RasterImage};

fn bench_split(c: &mut Criterion) {
    let image = Arc::new(RasterImage::solid(1000, 1260, [40, 80, 120, 255]));

    c.bench_function("split_chart_block", |b| {
        b.iter(|| {
            let parts = split(&image, 600.0);
            assert_eq!(parts.len(), 3);
        })
    });
}

fn bench_compose(c: &mut Criterion) {
    let options = CaptureOptions {
        width: 500,
        chart_height: 200,
        chart_gap: 10,
        row_height: 12,
        table_chunk: 30,
    };
    let config = ExportConfig::default();

    c.bench_function("compose_demo_dashboard", |b| {
        b.iter(|| {
            let mut surface = RasterSurface::new(options.clone());
            compose(&mut surface, &config.layout).unwrap()
        })
    });

    let mut surface = RasterSurface::new(options.clone());
    let pages = compose(&mut surface, &config.layout).unwrap();
    c.bench_function("write_pdf_demo_dashboard", |b| {
        b.iter(|| write_pdf(&pages, &config).unwrap())
    });
}

criterion_group!(benches, bench_split, bench_compose);
criterion_main!(benches);
