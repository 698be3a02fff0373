/// Geometry helpers for corner quadrilaterals
use crate::models::Point;

/// Area of a simple polygon (shoelace formula), always non-negative
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0f64;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        twice_area += p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64;
    }
    twice_area.abs() / 2.0
}

/// Lengths of consecutive edges, wrapping from the last point to the first
pub fn side_lengths(points: &[Point]) -> Vec<f64> {
    (0..points.len())
        .map(|i| points[i].distance(&points[(i + 1) % points.len()]) as f64)
        .collect()
}
