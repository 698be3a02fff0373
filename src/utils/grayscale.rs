/// Luminance conversion for the enhancement and scoring passes
/// Y = 0.299*R + 0.587*G + 0.114*B
/// Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8;
    lum.min(255) as u8
}

/// Reduce any image to a single luminance channel
///
/// Single-channel 8-bit input is copied unchanged; alpha is ignored.
pub fn luminance(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        DynamicImage::ImageLumaA8(gray_alpha) => {
            let (width, height) = gray_alpha.dimensions();
            let raw = gray_alpha
                .as_raw()
                .chunks_exact(2)
                .map(|px| px[0])
                .collect();
            GrayImage::from_raw(width, height, raw).unwrap_or_else(|| GrayImage::new(width, height))
        }
        DynamicImage::ImageRgb8(rgb) => rgb_to_grayscale(rgb),
        DynamicImage::ImageRgba8(rgba) => rgba_to_grayscale(rgba),
        DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA16(_) => image.to_luma8(),
        other => rgb_to_grayscale(&other.to_rgb8()),
    }
}

/// Convert an RGB image to grayscale
pub fn rgb_to_grayscale(rgb: &RgbImage) -> GrayImage {
    let (width, height) = rgb.dimensions();
    let raw = rgb
        .as_raw()
        .chunks_exact(3)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect();
    GrayImage::from_raw(width, height, raw).unwrap_or_else(|| GrayImage::new(width, height))
}

/// Convert an RGBA image to grayscale (ignores alpha channel)
pub fn rgba_to_grayscale(rgba: &RgbaImage) -> GrayImage {
    let (width, height) = rgba.dimensions();
    let raw = rgba
        .as_raw()
        .chunks_exact(4)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect();
    GrayImage::from_raw(width, height, raw).unwrap_or_else(|| GrayImage::new(width, height))
}

/// Mean luminance, 0.0 for an empty image
pub fn mean_luminance(gray: &GrayImage) -> f64 {
    let raw = gray.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    let sum: u64 = raw.iter().map(|&v| v as u64).sum();
    sum as f64 / raw.len() as f64
}
