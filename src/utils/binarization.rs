use image::GrayImage;

/// Binarize a grayscale image using Otsu's thresholding method
/// Returns a 0/255 image where 255 = at or above the threshold
pub fn otsu_binarize(gray: &GrayImage) -> GrayImage {
    let threshold = calculate_otsu_threshold(gray.as_raw());
    threshold_binarize(gray, threshold)
}

/// Calculate Otsu's optimal threshold
///
/// The returned value splits the histogram into `[0, t)` and `[t, 255]`.
/// Uniform images have no valid split and fall back to 128.
pub fn calculate_otsu_threshold(gray: &[u8]) -> u8 {
    // Build histogram
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total_pixels = gray.len() as f64;
    let total_sum: u64 = histogram
        .iter()
        .enumerate()
        .map(|(intensity, &count)| count * intensity as u64)
        .sum();

    let mut max_variance = 0.0;
    let mut optimal_threshold = 128u8;

    // Running sums over [0, threshold)
    let mut class1_pixels = 0u64;
    let mut class1_sum = 0u64;

    for threshold in 0..=255usize {
        if threshold > 0 {
            class1_pixels += histogram[threshold - 1];
            class1_sum += histogram[threshold - 1] * (threshold as u64 - 1);
        }
        let class2_pixels = gray.len() as u64 - class1_pixels;
        let class2_sum = total_sum - class1_sum;

        if class1_pixels == 0 || class2_pixels == 0 {
            continue;
        }

        let class1_mean = class1_sum as f64 / class1_pixels as f64;
        let class2_mean = class2_sum as f64 / class2_pixels as f64;

        let weight1 = class1_pixels as f64 / total_pixels;
        let weight2 = class2_pixels as f64 / total_pixels;

        let variance = weight1 * weight2 * (class1_mean - class2_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold as u8;
        }
    }

    optimal_threshold
}

/// Simple global threshold binarization to 0/255
pub fn threshold_binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    let mut binary = gray.clone();
    for pixel in binary.iter_mut() {
        *pixel = if *pixel >= threshold { 255 } else { 0 };
    }
    binary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_binarize() {
        let gray = GrayImage::from_raw(2, 2, vec![100, 150, 200, 50]).unwrap();
        let binary = threshold_binarize(&gray, 128);

        // Pixels < 128 should be black (0)
        assert_eq!(binary.get_pixel(0, 0)[0], 0); // 100 < 128
        assert_eq!(binary.get_pixel(1, 0)[0], 255); // 150 >= 128
        assert_eq!(binary.get_pixel(0, 1)[0], 255); // 200 >= 128
        assert_eq!(binary.get_pixel(1, 1)[0], 0); // 50 < 128
    }

    #[test]
    fn test_otsu_binarize() {
        // Create a simple two-class image
        let mut raw = vec![50u8; 50]; // Dark class
        raw.extend(vec![200u8; 50]); // Light class
        let gray = GrayImage::from_raw(10, 10, raw).unwrap();

        let threshold = calculate_otsu_threshold(gray.as_raw());
        assert!(threshold > 50 && threshold <= 200);

        let binary = otsu_binarize(&gray);
        // Top half should be black, bottom half white
        assert_eq!(binary.get_pixel(0, 0)[0], 0);
        assert_eq!(binary.get_pixel(0, 7)[0], 255);
    }

    #[test]
    fn test_otsu_uniform_falls_back() {
        assert_eq!(calculate_otsu_threshold(&[90u8; 64]), 128);
        assert_eq!(calculate_otsu_threshold(&[]), 128);
    }
}
