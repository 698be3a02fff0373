//! Heuristic confidence for a decoded symbol
//!
//! Three additive terms, each worth up to 0.4 / 0.3 / 0.3, summed and capped
//! at 1.0. This is not a probability from the decoder; it rates how plausible
//! the located quadrilateral and the image it came from look.

use crate::models::Point;
use crate::quality::quality_score;
use crate::utils::geometry::{polygon_area, side_lengths};
use image::DynamicImage;

/// Score a 4-corner bounding box against the image it was found in
///
/// Anything other than exactly four corners, or an empty image, scores 0.0.
pub fn confidence(bounding_box: &[Point], image: &DynamicImage) -> f64 {
    if bounding_box.len() != 4 {
        return 0.0;
    }
    let image_area = image.width() as f64 * image.height() as f64;
    if image_area == 0.0 {
        return 0.0;
    }

    let ratio = polygon_area(bounding_box) / image_area;
    let score =
        area_term(ratio) + quality_term(quality_score(image)) + regularity_term(bounding_box);
    score.min(1.0)
}

/// The tight band is checked first; the bands overlap on purpose
fn area_term(ratio: f64) -> f64 {
    if ratio > 0.1 && ratio < 0.8 {
        0.4
    } else if ratio > 0.05 && ratio < 0.9 {
        0.2
    } else {
        0.0
    }
}

fn quality_term(score: f64) -> f64 {
    if score > 100.0 {
        0.3
    } else if score > 50.0 {
        0.15
    } else {
        0.0
    }
}

/// Mean absolute deviation of the side lengths, relative to their mean
fn regularity_term(bounding_box: &[Point]) -> f64 {
    let sides = side_lengths(bounding_box);
    let avg = sides.iter().sum::<f64>() / sides.len() as f64;
    if avg <= 0.0 {
        return 0.0;
    }
    let deviation = sides.iter().map(|s| (s - avg).abs()).sum::<f64>() / avg;

    if deviation < 0.1 {
        0.3
    } else if deviation < 0.2 {
        0.15
    } else {
        0.0
    }
}
