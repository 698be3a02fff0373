//! Image enhancement for the retry pass
//!
//! [`enhance`] is the fixed pipeline the detector runs when a raw decode
//! fails. The remaining functions are standalone adjustments exposed for
//! tooling (`qrtool enhance`, `qrtool inspect`).

use crate::utils::binarization::otsu_binarize;
use crate::utils::clahe::{DEFAULT_TILE_GRID, clahe};
use crate::utils::grayscale::{luminance, mean_luminance};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, RgbImage};
use imageproc::filter::{gaussian_blur_f32, median_filter};
use imageproc::morphology::{Mask, grayscale_close};
use log::debug;

/// Clip limit used by the contrast stage of [`enhance`]
pub const CLAHE_CLIP_LIMIT: f32 = 2.0;
/// Radius of the square closing element (3x3)
pub const CLOSING_RADIUS: u8 = 1;
/// Images whose shorter side is below this are upscaled
pub const UPSCALE_BELOW: u32 = 300;
/// Shorter side after upscaling
pub const UPSCALE_TARGET: u32 = 600;
/// Default minimum side for [`resize_to_min`]
pub const DEFAULT_MIN_SIZE: u32 = 500;

/// Transform an image into a version more likely to decode
///
/// Luminance, Otsu binarization, CLAHE, 3x3 closing, then an isotropic
/// bicubic upscale when the shorter side is under 300 pixels. An empty image
/// is returned unchanged.
pub fn enhance(image: &DynamicImage) -> DynamicImage {
    if is_empty(image) {
        return image.clone();
    }
    debug!("Starting: Enhancing image for QR detection");

    let gray = luminance(image);
    let binary = otsu_binarize(&gray);
    let contrasted = clahe(&binary, CLAHE_CLIP_LIMIT, DEFAULT_TILE_GRID);
    let closed = grayscale_close(&contrasted, &Mask::square(CLOSING_RADIUS));
    let processed = upscale_small(closed);

    debug!(
        "Completed: Enhancing image for QR detection ({}x{} -> {}x{})",
        image.width(),
        image.height(),
        processed.width(),
        processed.height()
    );
    DynamicImage::ImageLuma8(processed)
}

fn upscale_small(gray: GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    let shorter = width.min(height);
    if shorter >= UPSCALE_BELOW {
        return gray;
    }
    let scale = UPSCALE_TARGET as f64 / shorter as f64;
    let new_width = ((width as f64 * scale).round() as u32).max(1);
    let new_height = ((height as f64 * scale).round() as u32).max(1);
    imageops::resize(&gray, new_width, new_height, FilterType::CatmullRom)
}

fn is_empty(image: &DynamicImage) -> bool {
    image.width() == 0 || image.height() == 0
}

fn is_single_channel(image: &DynamicImage) -> bool {
    image.color().channel_count() <= 2
}

/// True when the image is very dark or very bright (mean luminance < 50 or > 200)
pub fn needs_enhancement(image: &DynamicImage) -> bool {
    if is_empty(image) {
        return false;
    }
    let avg_brightness = mean_luminance(&luminance(image));
    !(50.0..=200.0).contains(&avg_brightness)
}

/// Linear brightness/contrast adjustment: `alpha * v + beta`, saturated
///
/// Single-channel images stay single-channel; everything else becomes RGB.
pub fn adjust_brightness(image: &DynamicImage, alpha: f32, beta: i32) -> DynamicImage {
    let adjust = |raw: &[u8]| -> Vec<u8> {
        raw.iter()
            .map(|&v| (alpha * v as f32 + beta as f32).round().clamp(0.0, 255.0) as u8)
            .collect()
    };
    map_channels(
        image,
        |gray| GrayImage::from_raw(gray.width(), gray.height(), adjust(gray.as_raw())),
        |rgb| RgbImage::from_raw(rgb.width(), rgb.height(), adjust(rgb.as_raw())),
    )
}

/// CLAHE for single-channel input, a 1.3x gain otherwise
pub fn enhance_contrast(image: &DynamicImage) -> DynamicImage {
    if is_single_channel(image) {
        DynamicImage::ImageLuma8(clahe(&luminance(image), CLAHE_CLIP_LIMIT, DEFAULT_TILE_GRID))
    } else {
        adjust_brightness(image, 1.3, 0)
    }
}

/// 3x3 median filter
pub fn remove_noise(image: &DynamicImage) -> DynamicImage {
    map_channels(
        image,
        |gray| Some(median_filter(gray, 1, 1)),
        |rgb| Some(median_filter(rgb, 1, 1)),
    )
}

/// Unsharp mask: `1.5 * image - 0.5 * gaussian(image, sigma = 3)`
pub fn sharpen(image: &DynamicImage) -> DynamicImage {
    map_channels(
        image,
        |gray| {
            let blurred = gaussian_blur_f32(gray, 3.0);
            GrayImage::from_raw(gray.width(), gray.height(), unsharp_mix(gray, &blurred))
        },
        |rgb| {
            let blurred = gaussian_blur_f32(rgb, 3.0);
            RgbImage::from_raw(rgb.width(), rgb.height(), unsharp_mix(rgb, &blurred))
        },
    )
}

fn unsharp_mix(original: &[u8], blurred: &[u8]) -> Vec<u8> {
    original
        .iter()
        .zip(blurred)
        .map(|(&v, &b)| (1.5 * v as f32 - 0.5 * b as f32).round().clamp(0.0, 255.0) as u8)
        .collect()
}

/// Bicubic upscale so that both sides reach `min_size`
///
/// The scale comes from the shorter side. Images already large enough are
/// returned unchanged.
pub fn resize_to_min(image: &DynamicImage, min_size: u32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    if is_empty(image) || (width >= min_size && height >= min_size) {
        return image.clone();
    }
    let scale = min_size as f64 / width.min(height) as f64;
    let new_width = ((width as f64 * scale) as u32).max(1);
    let new_height = ((height as f64 * scale) as u32).max(1);
    debug!("Image resized from {width}x{height} to {new_width}x{new_height}");
    image.resize_exact(new_width, new_height, FilterType::CatmullRom)
}

/// Run a per-buffer operation on the 8-bit gray or RGB form of an image
fn map_channels<G, C>(image: &DynamicImage, gray_op: G, rgb_op: C) -> DynamicImage
where
    G: FnOnce(&GrayImage) -> Option<GrayImage>,
    C: FnOnce(&RgbImage) -> Option<RgbImage>,
{
    if is_empty(image) {
        return image.clone();
    }
    if is_single_channel(image) {
        let gray = luminance(image);
        match gray_op(&gray) {
            Some(out) => DynamicImage::ImageLuma8(out),
            None => DynamicImage::ImageLuma8(gray),
        }
    } else {
        let rgb = image.to_rgb8();
        match rgb_op(&rgb) {
            Some(out) => DynamicImage::ImageRgb8(out),
            None => DynamicImage::ImageRgb8(rgb),
        }
    }
}
