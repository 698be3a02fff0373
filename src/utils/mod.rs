//! Utility functions for image processing
//!
//! This module provides the building blocks of the enhancement pass and the
//! confidence scorer:
//! - Grayscale conversion (RGB/RGBA to luminance)
//! - Binarization (Otsu's method and fixed threshold)
//! - CLAHE (tiled, contrast-limited histogram equalization)
//! - Geometry (polygon area, side lengths)

/// Otsu and fixed-threshold binarization
pub mod binarization;
/// Contrast-limited adaptive histogram equalization
pub mod clahe;
/// Polygon helpers
pub mod geometry;
/// Luminance conversion
pub mod grayscale;
