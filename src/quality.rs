//! Sharpness score from the variance of the Laplacian
//!
//! Higher variance means more high-frequency content, which usually means a
//! sharper scan. The score has no upper bound.

use crate::utils::grayscale::luminance;
use image::{DynamicImage, GrayImage};

/// Variance of the 3x3 Laplacian response over the luminance channel
///
/// Returns 0.0 for an empty image.
pub fn quality_score(image: &DynamicImage) -> f64 {
    if image.width() == 0 || image.height() == 0 {
        return 0.0;
    }
    laplacian_variance(&luminance(image))
}

/// Population variance of the `[0 1 0; 1 -4 1; 0 1 0]` response
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let response = laplacian(gray);
    if response.is_empty() {
        return 0.0;
    }
    let n = response.len() as f64;
    let mean = response.iter().sum::<f64>() / n;
    response.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}

fn laplacian(gray: &GrayImage) -> Vec<f64> {
    let (width, height) = gray.dimensions();
    let mut response = Vec::with_capacity((width * height) as usize);
    let at = |x: i64, y: i64| {
        let x = reflect_101(x, width as i64);
        let y = reflect_101(y, height as i64);
        gray.get_pixel(x as u32, y as u32)[0] as f64
    };

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let v = at(x, y - 1) + at(x - 1, y) + at(x + 1, y) + at(x, y + 1) - 4.0 * at(x, y);
            response.push(v);
        }
    }
    response
}

/// Mirror an index into `[0, len)` without repeating the edge pixel
fn reflect_101(i: i64, len: i64) -> i64 {
    if len == 1 {
        return 0;
    }
    let mut i = i;
    while i < 0 || i >= len {
        i = if i < 0 { -i } else { 2 * len - 2 - i };
    }
    i
}
