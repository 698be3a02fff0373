use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma};
use qr_reader::{Point, confidence, quality_score};

fn checkerboard(size: u32, cell: u32) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_fn(size, size, |x, y| {
        Luma([if (x / cell + y / cell) % 2 == 0 { 0 } else { 255 }])
    }))
}

fn bench_quality_score(c: &mut Criterion) {
    let small = checkerboard(100, 4);
    let large = checkerboard(1024, 8);
    c.bench_function("quality_score_100x100", |b| {
        b.iter(|| quality_score(black_box(&small)))
    });
    c.bench_function("quality_score_1024x1024", |b| {
        b.iter(|| quality_score(black_box(&large)))
    });
}

fn bench_confidence(c: &mut Criterion) {
    let image = checkerboard(640, 8);
    let corners = [
        Point::new(120.0, 100.0),
        Point::new(420.0, 104.0),
        Point::new(416.0, 402.0),
        Point::new(118.0, 398.0),
    ];
    c.bench_function("confidence_640x640", |b| {
        b.iter(|| confidence(black_box(&corners), black_box(&image)))
    });
}

criterion_group!(benches, bench_quality_score, bench_confidence);
criterion_main!(benches);
