//! qr_reader - QR code reader for still images
//!
//! Decodes a single QR symbol from a photo, retrying on an enhanced copy of
//! the image when the first attempt misses, and scores each success with a
//! heuristic confidence in `[0, 1]`.
//!
//! ```no_run
//! use qr_reader::QrDetector;
//!
//! let image = image::open("ticket.jpg").unwrap();
//! let mut detector = QrDetector::new();
//! let result = detector.detect(&image);
//! if result.is_success() {
//!     println!("{} ({:.0}%)", result.data(), result.confidence() * 100.0);
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Heuristic confidence for decoded symbols
pub mod confidence;
/// Detector configuration and environment overrides
pub mod config;
/// Debug image dumps for failed detections
pub mod debug;
/// Decoder capability and the default backend
pub mod decoder;
/// Detection orchestrator
pub mod detector;
/// Enhancement pipeline and standalone adjustments
pub mod enhance;
/// Error and failure types
pub mod error;
/// Console logger setup
pub mod logging;
/// Core data structures (Point, DetectionResult)
pub mod models;
/// Sharpness score of an image
pub mod quality;
/// Image loading and result reporting
pub mod tools;
/// Pixel-level helpers (grayscale, binarization, CLAHE, geometry)
pub mod utils;

pub use config::DetectorConfig;
pub use confidence::confidence;
pub use decoder::{Decoded, Decoder, RqrrDecoder};
pub use detector::{DetectorState, QrDetector, validate_payload};
pub use enhance::enhance;
pub use error::{DecoderFault, FailureReason, LoadError, ReportError};
pub use logging::LogLevel;
pub use models::{Detection, DetectionResult, ImageVariant, Point};
pub use quality::quality_score;
