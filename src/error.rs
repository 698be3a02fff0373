//! Error types shared across the reader
//!
//! Nothing in the detection core returns these to the caller of
//! [`crate::QrDetector::detect`]; decoder faults and misses are folded into
//! [`FailureReason`]. Loader and report errors surface at the I/O boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Fault raised by a decoder backend while looking at an image
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecoderFault {
    /// The backend was handed an image with no pixels
    #[error("image has no pixels")]
    EmptyImage,
    /// The backend failed internally (panic or unexpected state)
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Why a detection produced no usable payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// The input image was empty
    #[error("Empty input image")]
    EmptyInput,
    /// The decoder ran but found no symbol
    #[error("No QR code detected in image")]
    NoSymbol,
    /// A symbol was decoded but the payload contained control characters
    #[error("QR code found but data validation failed")]
    InvalidPayload,
    /// The decoder capability itself faulted
    #[error("Decoder error: {0}")]
    Decoder(DecoderFault),
    /// Live capture is not supported
    #[error("Webcam detection not implemented yet")]
    WebcamUnsupported,
}

/// Errors raised while loading an image
#[derive(Debug, Error)]
pub enum LoadError {
    /// No file at the given path
    #[error("File does not exist: {}", .0.display())]
    NotFound(PathBuf),
    /// Extension outside the supported whitelist
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    /// File exists but could not be decoded
    #[error("Failed to load image (file may be corrupted): {path}")]
    Corrupted {
        /// Path that failed to decode
        path: PathBuf,
        /// Underlying decoder error
        #[source]
        source: image::ImageError,
    },
    /// Decoded image has zero width or height
    #[error("Loaded image is empty: {}", .0.display())]
    Empty(PathBuf),
    /// Camera capture is not available in this build
    #[error("Failed to open webcam device: {0}")]
    CameraUnavailable(u32),
}

/// Errors raised while writing reports and visualizations
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem failure
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        /// Target path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Image encoding failure
    #[error("failed to save image {}: {source}", .path.display())]
    Image {
        /// Target path
        path: PathBuf,
        /// Underlying encoder error
        #[source]
        source: image::ImageError,
    },
    /// Visualization requested for a failed detection
    #[error("Cannot save visualization - no successful result or empty image")]
    NothingToDraw,
    /// Font file could not be read or parsed
    #[error("invalid font {}: {reason}", .path.display())]
    Font {
        /// Font path
        path: PathBuf,
        /// Parse or read failure
        reason: String,
    },
}
