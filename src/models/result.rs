use super::Point;
use crate::error::FailureReason;
use image::DynamicImage;

/// Which image variant produced a detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVariant {
    /// Clone of the caller's image, decoded as-is
    Original,
    /// Output of the enhancement pipeline
    Enhanced,
}

/// A decoded and validated QR symbol
#[derive(Debug, Clone)]
pub struct Detection {
    /// Decoded payload, never empty
    pub data: String,
    /// Zero or four corners, in the coordinate space of `processed_image`
    pub bounding_box: Vec<Point>,
    /// Heuristic confidence in `[0, 1]`
    pub confidence: f64,
    /// Image variant that decoded, owned by the result
    pub processed_image: DynamicImage,
    /// Whether `processed_image` is the original clone or the enhanced image
    pub variant: ImageVariant,
}

/// Outcome of one call to [`crate::QrDetector::detect`]
#[derive(Debug, Clone)]
pub enum DetectionResult {
    /// A symbol decoded and passed validation
    Success(Detection),
    /// No usable symbol, with the reason
    Failure(FailureReason),
}

impl DetectionResult {
    /// True when a symbol decoded and passed validation
    pub fn is_success(&self) -> bool {
        matches!(self, DetectionResult::Success(_))
    }

    /// The detection, if any
    pub fn detection(&self) -> Option<&Detection> {
        match self {
            DetectionResult::Success(detection) => Some(detection),
            DetectionResult::Failure(_) => None,
        }
    }

    /// The failure reason, if any
    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            DetectionResult::Success(_) => None,
            DetectionResult::Failure(reason) => Some(reason),
        }
    }

    /// Decoded payload; empty on failure
    pub fn data(&self) -> &str {
        self.detection().map_or("", |d| d.data.as_str())
    }

    /// Corner points; empty on failure
    pub fn bounding_box(&self) -> &[Point] {
        match self {
            DetectionResult::Success(detection) => &detection.bounding_box,
            DetectionResult::Failure(_) => &[],
        }
    }

    /// Confidence; 0.0 on failure
    pub fn confidence(&self) -> f64 {
        self.detection().map_or(0.0, |d| d.confidence)
    }

    /// Image variant that decoded; `None` on failure
    pub fn processed_image(&self) -> Option<&DynamicImage> {
        self.detection().map(|d| &d.processed_image)
    }

    /// Human-readable failure reason; empty on success
    pub fn error_message(&self) -> String {
        self.failure().map(ToString::to_string).unwrap_or_default()
    }
}
