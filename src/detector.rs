//! Detection orchestrator
//!
//! One [`QrDetector::detect`] call makes at most two decode attempts: the
//! caller's image as-is, then (when preprocessing is enabled) the output of
//! [`crate::enhance::enhance`]. The first attempt that yields a valid
//! payload wins and is scored with [`crate::confidence::confidence`].
//! Every failure path ends in [`DetectionResult::Failure`]; nothing is
//! propagated to the caller.

use crate::config::DetectorConfig;
use crate::confidence::confidence;
use crate::debug::{DebugArtifact, DebugSink};
use crate::decoder::{Decoder, RqrrDecoder};
use crate::enhance::enhance;
use crate::error::FailureReason;
use crate::models::{Detection, DetectionResult, ImageVariant, Point};
use image::DynamicImage;
use log::{debug, error, info, warn};

/// Counters and flags owned by one [`QrDetector`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorState {
    /// Calls to `detect`, including those with empty input
    pub total_detections: u64,
    /// Calls to `detect` that returned a success
    pub successful_detections: u64,
    /// Retry on an enhanced image after a raw failure
    pub preprocessing_enabled: bool,
    /// Reserved for multi-symbol support; no code path consults it
    pub multiple_qr_enabled: bool,
}

impl Default for DetectorState {
    fn default() -> Self {
        Self {
            total_detections: 0,
            successful_detections: 0,
            preprocessing_enabled: true,
            multiple_qr_enabled: false,
        }
    }
}

/// Payload and geometry of a successful single attempt
struct Hit {
    data: String,
    bounding_box: Vec<Point>,
    confidence: f64,
}

impl Hit {
    fn into_detection(self, processed_image: DynamicImage, variant: ImageVariant) -> Detection {
        Detection {
            data: self.data,
            bounding_box: self.bounding_box,
            confidence: self.confidence,
            processed_image,
            variant,
        }
    }
}

/// QR detector with an enhancement retry and running statistics
///
/// `detect` takes `&mut self`: the counters belong to this instance, and
/// sharing one detector across threads needs an external lock.
pub struct QrDetector<D = RqrrDecoder> {
    decoder: D,
    state: DetectorState,
    debug: DebugSink,
}

impl QrDetector<RqrrDecoder> {
    /// Detector with the default decoder and default configuration
    pub fn new() -> Self {
        Self::with_decoder(RqrrDecoder::new(), DetectorConfig::default())
    }
}

impl Default for QrDetector<RqrrDecoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Decoder> QrDetector<D> {
    /// Detector using `decoder` and `config`
    pub fn with_decoder(decoder: D, config: DetectorConfig) -> Self {
        info!("QrDetector initialized");
        Self {
            decoder,
            state: DetectorState {
                preprocessing_enabled: config.preprocessing_enabled,
                multiple_qr_enabled: config.multiple_qr_enabled,
                ..DetectorState::default()
            },
            debug: DebugSink::new(config.debug_dir),
        }
    }

    /// Decode one QR symbol from `image`
    pub fn detect(&mut self, image: &DynamicImage) -> DetectionResult {
        debug!("Starting: QR detection from image");
        self.state.total_detections += 1;

        if image.width() == 0 || image.height() == 0 {
            error!("Cannot detect QR codes in empty image");
            return DetectionResult::Failure(FailureReason::EmptyInput);
        }

        let working = image.clone();
        let original_failure = match self.attempt(&working) {
            Ok(hit) => {
                self.state.successful_detections += 1;
                info!("QR detection successful: {}", hit.data);
                debug!("Completed: QR detection from image");
                let detection = hit.into_detection(working, ImageVariant::Original);
                return DetectionResult::Success(detection);
            }
            Err(reason) => reason,
        };

        if self.state.preprocessing_enabled {
            debug!("Trying with image enhancement...");
            let enhanced = enhance(image);
            match self.attempt(&enhanced) {
                Ok(hit) => {
                    self.state.successful_detections += 1;
                    info!("QR found after enhancement!");
                    debug!("Completed: QR detection from image");
                    return DetectionResult::Success(
                        hit.into_detection(enhanced, ImageVariant::Enhanced),
                    );
                }
                Err(reason) => {
                    debug!("Enhanced attempt failed: {reason}");
                    self.debug.write(DebugArtifact::Enhanced, &enhanced);
                }
            }
        }

        warn!("QR detection failed: {original_failure}");
        self.debug.write(DebugArtifact::Original, &working);
        debug!("Completed: QR detection from image");
        DetectionResult::Failure(original_failure)
    }

    /// Live capture is not supported; always fails without touching counters
    pub fn detect_from_webcam(&mut self) -> DetectionResult {
        info!("Attempting QR detection from webcam");
        DetectionResult::Failure(FailureReason::WebcamUnsupported)
    }

    /// One decode, validate and score pass over a single image variant
    fn attempt(&self, image: &DynamicImage) -> Result<Hit, FailureReason> {
        let decoded = match self.decoder.decode(image) {
            Ok(decoded) => decoded,
            Err(fault) => {
                error!("Decoder fault: {fault}");
                return Err(FailureReason::Decoder(fault));
            }
        };

        debug!(
            "QR detection attempted, data length: {}, points: {}",
            decoded.text.len(),
            decoded.points.len()
        );
        if decoded.text.is_empty() {
            return Err(FailureReason::NoSymbol);
        }
        debug!("Raw QR data: {}", decoded.text);
        if !validate_payload(&decoded.text) {
            return Err(FailureReason::InvalidPayload);
        }

        debug!("QR validation passed");
        let score = confidence(&decoded.points, image);
        Ok(Hit {
            data: decoded.text,
            bounding_box: decoded.points,
            confidence: score,
        })
    }

    /// Enable or disable the enhancement retry
    pub fn set_preprocessing_enabled(&mut self, enabled: bool) {
        self.state.preprocessing_enabled = enabled;
        debug!("Preprocessing {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Set the reserved multi-symbol flag (no behavioural effect)
    pub fn set_multiple_qr_enabled(&mut self, enabled: bool) {
        self.state.multiple_qr_enabled = enabled;
        debug!("Multiple QR detection {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Whether the enhancement retry is enabled
    pub fn preprocessing_enabled(&self) -> bool {
        self.state.preprocessing_enabled
    }

    /// Value of the reserved multi-symbol flag
    pub fn multiple_qr_enabled(&self) -> bool {
        self.state.multiple_qr_enabled
    }

    /// Number of `detect` calls so far
    pub fn total_detections(&self) -> u64 {
        self.state.total_detections
    }

    /// Number of successful `detect` calls so far
    pub fn successful_detections(&self) -> u64 {
        self.state.successful_detections
    }

    /// Successful / total, or 0.0 before the first call
    pub fn success_rate(&self) -> f64 {
        if self.state.total_detections == 0 {
            return 0.0;
        }
        self.state.successful_detections as f64 / self.state.total_detections as f64
    }

    /// Snapshot of counters and flags
    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    /// The decoder in use
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Directory receiving debug artifacts
    pub fn debug_dir(&self) -> &std::path::Path {
        self.debug.dir()
    }
}

/// A payload is valid when it is non-empty and free of control characters
/// other than `'\n'` and `'\r'`
pub fn validate_payload(data: &str) -> bool {
    !data.is_empty() && data.chars().all(|c| c as u32 >= 32 || c == '\n' || c == '\r')
}
