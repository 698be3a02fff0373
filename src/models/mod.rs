/// 2D point
pub mod point;
/// Detection outcome types
pub mod result;

pub use point::Point;
pub use result::{Detection, DetectionResult, ImageVariant};
