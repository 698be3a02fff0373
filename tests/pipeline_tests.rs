//! Integration tests for the detect -> enhance -> retry pipeline
//!
//! A scripted decoder replays canned responses so the orchestration, the
//! counters and the debug artifacts can be checked without real QR images.
//! One test runs the default rqrr backend on a symbol rendered by `qrcode`.

use image::{DynamicImage, GrayImage, Luma};
use qrcode::QrCode;
use qr_reader::enhance::enhance;
use qr_reader::{
    Decoded, Decoder, DecoderFault, DetectorConfig, FailureReason, ImageVariant, Point,
    QrDetector, confidence,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::Path;
use tempfile::TempDir;

/// Replays responses in order, then reports misses
struct ScriptedDecoder {
    responses: RefCell<VecDeque<Result<Decoded, DecoderFault>>>,
    calls: Cell<usize>,
}

impl ScriptedDecoder {
    fn new(responses: Vec<Result<Decoded, DecoderFault>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            calls: Cell::new(0),
        }
    }
}

impl Decoder for ScriptedDecoder {
    fn decode(&self, _image: &DynamicImage) -> Result<Decoded, DecoderFault> {
        self.calls.set(self.calls.get() + 1);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Decoded::miss()))
    }
}

fn detector_with(
    responses: Vec<Result<Decoded, DecoderFault>>,
    preprocessing: bool,
) -> (QrDetector<ScriptedDecoder>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = DetectorConfig {
        preprocessing_enabled: preprocessing,
        ..DetectorConfig::default()
    }
    .with_debug_dir(dir.path());
    (
        QrDetector::with_decoder(ScriptedDecoder::new(responses), config),
        dir,
    )
}

/// One-pixel checkerboard; every Laplacian response is +-1020
fn sharp_frame(size: u32) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_fn(size, size, |x, y| {
        Luma([if (x + y) % 2 == 0 { 0 } else { 255 }])
    }))
}

fn square(x: f32, y: f32, side: f32) -> Vec<Point> {
    vec![
        Point::new(x, y),
        Point::new(x + side, y),
        Point::new(x + side, y + side),
        Point::new(x, y + side),
    ]
}

fn artifact(dir: &Path, name: &str) -> bool {
    dir.join(name).exists()
}

#[test]
fn raw_decode_succeeds_with_full_confidence() {
    // 45x45 box on a 100x100 frame covers 20.25% of the area
    let corners = square(20.0, 20.0, 45.0);
    let (mut detector, dir) = detector_with(vec![Ok(Decoded::new("HELLO", corners.clone()))], true);
    let frame = sharp_frame(100);

    let result = detector.detect(&frame);

    let detection = result.detection().expect("expected a detection");
    assert_eq!(detection.data, "HELLO");
    assert_eq!(detection.bounding_box, corners);
    assert_eq!(detection.confidence, 1.0);
    assert_eq!(detection.variant, ImageVariant::Original);
    assert_eq!(detection.processed_image.as_bytes(), frame.as_bytes());
    assert_eq!(detector.successful_detections(), 1);
    assert_eq!(detector.decoder().calls.get(), 1);
    assert!(!artifact(dir.path(), "debug_original.png"));
    assert!(!artifact(dir.path(), "debug_enhanced.png"));
}

#[test]
fn enhanced_retry_rescues_a_raw_miss() {
    let (mut detector, dir) = detector_with(
        vec![
            Ok(Decoded::miss()),
            Ok(Decoded::new("BACKUP", square(100.0, 100.0, 300.0))),
        ],
        true,
    );
    let frame = sharp_frame(120);

    let result = detector.detect(&frame);

    assert!(result.is_success());
    assert_eq!(result.data(), "BACKUP");
    let detection = result.detection().unwrap();
    assert_eq!(detection.variant, ImageVariant::Enhanced);
    let expected = enhance(&frame);
    assert_eq!(
        (detection.processed_image.width(), detection.processed_image.height()),
        (600, 600)
    );
    assert_eq!(detection.processed_image.as_bytes(), expected.as_bytes());
    // Scored against the enhanced image, not the original
    assert_eq!(
        detection.confidence,
        confidence(&detection.bounding_box, &expected)
    );
    assert_eq!(detector.successful_detections(), 1);
    assert_eq!(detector.total_detections(), 1);
    assert!(!artifact(dir.path(), "debug_original.png"));
    assert!(!artifact(dir.path(), "debug_enhanced.png"));
}

#[test]
fn double_miss_writes_both_artifacts() {
    let (mut detector, dir) = detector_with(vec![], true);

    let result = detector.detect(&sharp_frame(64));

    assert!(!result.is_success());
    assert_eq!(result.error_message(), "No QR code detected in image");
    assert_eq!(detector.decoder().calls.get(), 2);
    assert!(artifact(dir.path(), "debug_original.png"));
    assert!(artifact(dir.path(), "debug_enhanced.png"));
    assert_eq!(detector.successful_detections(), 0);
}

#[test]
fn raw_failure_reason_wins_over_enhanced_failure() {
    let (mut detector, _dir) = detector_with(
        vec![
            Ok(Decoded::new("bad\u{7}", vec![])),
            Err(DecoderFault::Backend("boom".into())),
        ],
        true,
    );

    let result = detector.detect(&sharp_frame(32));

    assert_eq!(result.failure(), Some(&FailureReason::InvalidPayload));
}

#[test]
fn disabled_preprocessing_fails_immediately() {
    let (mut detector, dir) = detector_with(vec![], false);

    let result = detector.detect(&sharp_frame(64));

    assert!(!result.is_success());
    assert_eq!(detector.decoder().calls.get(), 1);
    assert!(artifact(dir.path(), "debug_original.png"));
    assert!(!artifact(dir.path(), "debug_enhanced.png"));
}

#[test]
fn counters_track_every_call() {
    let (mut detector, _dir) = detector_with(
        vec![
            Ok(Decoded::new("ONE", vec![])),
            Ok(Decoded::miss()),
            Ok(Decoded::miss()),
            Ok(Decoded::new("TWO", vec![])),
        ],
        false,
    );
    assert_eq!(detector.success_rate(), 0.0);

    let frame = sharp_frame(16);
    let outcomes = [
        detector.detect(&frame).is_success(),
        detector.detect(&frame).is_success(),
        detector.detect(&DynamicImage::new_luma8(0, 0)).is_success(),
        detector.detect(&frame).is_success(),
        detector.detect(&frame).is_success(),
    ];

    assert_eq!(outcomes, [true, false, false, false, true]);
    assert_eq!(detector.total_detections(), 5);
    assert_eq!(detector.successful_detections(), 2);
    assert!((detector.success_rate() - 0.4).abs() < 1e-12);
}

#[test]
fn toggling_preprocessing_between_calls() {
    let (mut detector, dir) = detector_with(vec![], true);
    detector.set_preprocessing_enabled(false);
    detector.detect(&sharp_frame(16));
    assert_eq!(detector.decoder().calls.get(), 1);
    assert!(!artifact(dir.path(), "debug_enhanced.png"));

    detector.set_preprocessing_enabled(true);
    detector.detect(&sharp_frame(16));
    assert_eq!(detector.decoder().calls.get(), 3);
    assert!(artifact(dir.path(), "debug_enhanced.png"));
}

#[test]
fn confidence_is_bounded_and_repeatable() {
    let frame = sharp_frame(50);
    let boxes = [
        square(0.0, 0.0, 50.0),
        square(10.0, 10.0, 20.0),
        vec![
            Point::new(0.0, 0.0),
            Point::new(49.0, 3.0),
            Point::new(30.0, 40.0),
            Point::new(2.0, 45.0),
        ],
        square(5.0, 5.0, 0.0),
    ];
    for corners in &boxes {
        let first = confidence(corners, &frame);
        assert_eq!(first, confidence(corners, &frame));
        assert!((0.0..=1.0).contains(&first), "score = {first}");
    }
    for n in 0..4 {
        assert_eq!(confidence(&boxes[0][..n], &frame), 0.0);
    }
}

#[test]
fn default_detector_reads_a_rendered_symbol() {
    let code = QrCode::new(b"HELLO").unwrap();
    let frame = DynamicImage::ImageLuma8(
        code.render::<Luma<u8>>().module_dimensions(7, 7).build(),
    );
    let mut detector = QrDetector::new();

    let result = detector.detect(&frame);

    let detection = result.detection().expect("expected a detection");
    assert_eq!(detection.data, "HELLO");
    assert_eq!(detection.variant, ImageVariant::Original);
    assert_eq!(detection.bounding_box.len(), 4);
    for corner in &detection.bounding_box {
        assert!((14.0..=189.0).contains(&corner.x), "{corner:?}");
        assert!((14.0..=189.0).contains(&corner.y), "{corner:?}");
    }
    // Crisp, square and covering about half the frame
    assert_eq!(detection.confidence, 1.0);
    assert_eq!(detector.total_detections(), 1);
    assert_eq!(detector.successful_detections(), 1);
}
