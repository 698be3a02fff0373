use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::morphology::{Mask, grayscale_close};
use qr_reader::enhance::{enhance, remove_noise, sharpen};
use qr_reader::utils::binarization::otsu_binarize;
use qr_reader::utils::clahe::{DEFAULT_TILE_GRID, clahe};

fn gradient(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([((x * 7 + y * 3) % 256) as u8]))
}

fn bench_enhance_small(c: &mut Criterion) {
    // Below the upscale threshold, so this includes the 600px resize
    let image = DynamicImage::ImageLuma8(gradient(200, 200));
    c.bench_function("enhance_200x200", |b| b.iter(|| enhance(black_box(&image))));
}

fn bench_enhance_medium(c: &mut Criterion) {
    let image = DynamicImage::ImageLuma8(gradient(640, 480));
    c.bench_function("enhance_640x480", |b| b.iter(|| enhance(black_box(&image))));
}

fn bench_stages_640x480(c: &mut Criterion) {
    let gray = gradient(640, 480);
    c.bench_function("otsu_640x480", |b| b.iter(|| otsu_binarize(black_box(&gray))));
    c.bench_function("clahe_640x480", |b| {
        b.iter(|| clahe(black_box(&gray), 2.0, DEFAULT_TILE_GRID))
    });
    c.bench_function("close_640x480", |b| {
        b.iter(|| grayscale_close(black_box(&gray), &Mask::square(1)))
    });
}

fn bench_toolbox_640x480(c: &mut Criterion) {
    let image = DynamicImage::ImageLuma8(gradient(640, 480));
    c.bench_function("remove_noise_640x480", |b| {
        b.iter(|| remove_noise(black_box(&image)))
    });
    c.bench_function("sharpen_640x480", |b| b.iter(|| sharpen(black_box(&image))));
}

criterion_group!(
    benches,
    bench_enhance_small,
    bench_enhance_medium,
    bench_stages_640x480,
    bench_toolbox_640x480
);
criterion_main!(benches);
