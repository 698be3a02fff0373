use crate::error::ReportError;
use crate::models::{DetectionResult, Point};
use ab_glyph::{FontVec, PxScale};
use chrono::Local;
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut, text_size,
};
use imageproc::rect::Rect;
use log::{debug, error, info, warn};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

const LINE_THICKNESS: i32 = 3;
const OUTER_MARKER_RADIUS: i32 = 8;
const INNER_MARKER_RADIUS: i32 = 4;
const TEXT_SCALE: f32 = 20.0;
const MAX_DATA_CHARS: usize = 50;
const TRUNCATED_DATA_CHARS: usize = 47;

/// Text size estimate used when no font is loaded
const FALLBACK_CHAR_WIDTH: u32 = 11;
const FALLBACK_TEXT_HEIGHT: u32 = 13;
const TEXT_BASELINE: i32 = 5;

fn timestamp() -> String {
    Local::now().format("%b %e %Y %H:%M:%S").to_string()
}

fn write_points(out: &mut String, points: &[Point]) {
    for point in points {
        let (x, y) = point.rounded();
        let _ = write!(out, "({x},{y}) ");
    }
}

/// Text block for one result, stamped with the current local time
pub fn format_result(result: &DetectionResult) -> String {
    format_result_at(result, &timestamp())
}

/// Text block for one result with an explicit timestamp
pub fn format_result_at(result: &DetectionResult, timestamp: &str) -> String {
    let mut out = String::new();
    out.push_str("Detection Result:\n");
    match result {
        DetectionResult::Success(detection) => {
            out.push_str("  Success: YES\n");
            let _ = writeln!(out, "  Data: {}", detection.data);
            let _ = writeln!(out, "  Confidence: {:.1}%", detection.confidence * 100.0);
            if !detection.bounding_box.is_empty() {
                out.push_str("  Bounding Box: ");
                write_points(&mut out, &detection.bounding_box);
                out.push('\n');
            }
        }
        DetectionResult::Failure(reason) => {
            out.push_str("  Success: NO\n");
            let _ = writeln!(out, "  Error: {reason}");
        }
    }
    let _ = writeln!(out, "  Timestamp: {timestamp}");
    out
}

/// Human-oriented summary framed by a 50-character rule
pub fn console_summary(result: &DetectionResult) -> String {
    let rule = "=".repeat(50);
    let mut out = String::new();
    let _ = writeln!(out, "\n{rule}");
    out.push_str("QR CODE DETECTION RESULT\n");
    let _ = writeln!(out, "{rule}");
    match result {
        DetectionResult::Success(detection) => {
            out.push_str("Status: SUCCESS\n");
            let _ = writeln!(out, "Data: {}", detection.data);
            let _ = writeln!(out, "Confidence: {:.2}%", detection.confidence * 100.0);
            if !detection.bounding_box.is_empty() {
                out.push_str("Bounding Box: ");
                write_points(&mut out, &detection.bounding_box);
                out.push('\n');
            }
        }
        DetectionResult::Failure(reason) => {
            out.push_str("Status: FAILED\n");
            let _ = writeln!(out, "Error: {reason}");
        }
    }
    let _ = writeln!(out, "{rule}");
    out
}

fn write_file(path: &Path, contents: &str) -> Result<(), ReportError> {
    fs::write(path, contents).map_err(|source| {
        error!("Failed to open file for writing: {}", path.display());
        ReportError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Write [`format_result`] to `path`
pub fn save_to_text_file<P: AsRef<Path>>(
    result: &DetectionResult,
    path: P,
) -> Result<(), ReportError> {
    let path = path.as_ref();
    debug!("Starting: Saving results to text file: {}", path.display());
    write_file(path, &format_result(result))?;
    info!("Results saved to: {}", path.display());
    debug!("Completed: Saving results to text file");
    Ok(())
}

/// Batch report text for `results`
pub fn format_batch_at(results: &[DetectionResult], timestamp: &str) -> String {
    let rule = "-".repeat(40);
    let mut out = String::new();
    out.push_str("BATCH QR CODE DETECTION RESULTS\n");
    let _ = writeln!(out, "Generated: {timestamp}");
    let _ = writeln!(out, "Total files processed: {}", results.len());
    let _ = writeln!(out, "{rule}");

    for (idx, result) in results.iter().enumerate() {
        let _ = writeln!(out, "Result {}:", idx + 1);
        out.push_str(&format_result_at(result, timestamp));
        out.push('\n');
    }

    let successes = results.iter().filter(|r| r.is_success()).count();
    let rate = if results.is_empty() {
        0.0
    } else {
        successes as f64 / results.len() as f64 * 100.0
    };
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "Successful detections: {successes}/{} ({rate:.1}%)",
        results.len()
    );
    out
}

/// Write the batch report to `<base>_batch.txt` and return that path
pub fn save_batch_results<P: AsRef<Path>>(
    results: &[DetectionResult],
    base: P,
) -> Result<PathBuf, ReportError> {
    debug!("Starting: Saving batch results");
    let mut name = base.as_ref().as_os_str().to_os_string();
    name.push("_batch.txt");
    let path = PathBuf::from(name);
    write_file(&path, &format_batch_at(results, &timestamp()))?;
    info!("Batch results saved: {}", path.display());
    debug!("Completed: Saving batch results");
    Ok(path)
}

/// Shorten payloads longer than 50 chars to 47 chars plus `...`
pub fn display_data(data: &str) -> String {
    if data.chars().count() > MAX_DATA_CHARS {
        let mut short: String = data.chars().take(TRUNCATED_DATA_CHARS).collect();
        short.push_str("...");
        short
    } else {
        data.to_string()
    }
}

/// Draws detection overlays; glyphs need a font, boxes and markers do not
#[derive(Default)]
pub struct Visualizer {
    font: Option<FontVec>,
}

impl Visualizer {
    /// Visualizer without text glyphs
    pub fn new() -> Self {
        Self::default()
    }

    /// Visualizer that renders labels with the TTF/OTF font at `path`
    pub fn with_font_file<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let font_error = |reason: String| ReportError::Font {
            path: path.to_path_buf(),
            reason,
        };
        let bytes = fs::read(path).map_err(|e| font_error(e.to_string()))?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| font_error(e.to_string()))?;
        Ok(Self { font: Some(font) })
    }

    /// Whether labels will be rendered as glyphs
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Overlay polygon, markers and labels on a copy of the processed image
    pub fn render(&self, result: &DetectionResult) -> Result<RgbImage, ReportError> {
        let detection = match result.detection() {
            Some(d) if d.processed_image.width() > 0 && d.processed_image.height() > 0 => d,
            _ => {
                warn!("Cannot save visualization - no successful result or empty image");
                return Err(ReportError::NothingToDraw);
            }
        };

        let mut canvas = detection.processed_image.to_rgb8();
        if detection.bounding_box.len() == 4 {
            draw_bounding_box(&mut canvas, &detection.bounding_box);
        }

        let labels = [
            "QR DETECTED".to_string(),
            format!("Confidence: {}%", (detection.confidence * 100.0) as i32),
            format!("Data: {}", display_data(&detection.data)),
        ];
        let mut origin = (10i32, 30i32);
        for label in &labels {
            let (w, h) = self.measure(label);
            let left = origin.0 - 5;
            let top = origin.1 - h as i32 - 5;
            let rect = Rect::at(left, top).of_size(w + 10, h + TEXT_BASELINE as u32 + 10);
            draw_filled_rect_mut(&mut canvas, rect, BLACK);
            if let Some(font) = &self.font {
                draw_text_mut(
                    &mut canvas,
                    WHITE,
                    origin.0,
                    origin.1 - h as i32,
                    PxScale::from(TEXT_SCALE),
                    font,
                    label,
                );
            }
            origin.1 += h as i32 + 15;
        }
        Ok(canvas)
    }

    fn measure(&self, text: &str) -> (u32, u32) {
        match &self.font {
            Some(font) => {
                let (w, h) = text_size(PxScale::from(TEXT_SCALE), font, text);
                (w.max(1), h.max(1))
            }
            None => (
                FALLBACK_CHAR_WIDTH * text.chars().count().max(1) as u32,
                FALLBACK_TEXT_HEIGHT,
            ),
        }
    }

    /// Render and save to `path`; the format follows the extension
    pub fn save<P: AsRef<Path>>(
        &self,
        result: &DetectionResult,
        path: P,
    ) -> Result<(), ReportError> {
        let path = path.as_ref();
        let canvas = self.render(result)?;
        debug!("Starting: Saving visualization: {}", path.display());
        canvas.save(path).map_err(|source| {
            error!("Failed to save visualization: {}", path.display());
            ReportError::Image {
                path: path.to_path_buf(),
                source,
            }
        })?;
        info!("Visualization saved to: {}", path.display());
        debug!("Completed: Saving visualization");
        Ok(())
    }
}

/// Save an overlay without text glyphs
pub fn save_visualization<P: AsRef<Path>>(
    result: &DetectionResult,
    path: P,
) -> Result<(), ReportError> {
    Visualizer::new().save(result, path)
}

fn draw_bounding_box(canvas: &mut RgbImage, corners: &[Point]) {
    let half = LINE_THICKNESS / 2;
    for i in 0..corners.len() {
        let a = corners[i];
        let b = corners[(i + 1) % corners.len()];
        for dy in -half..=half {
            for dx in -half..=half {
                let (ox, oy) = (dx as f32, dy as f32);
                draw_line_segment_mut(canvas, (a.x + ox, a.y + oy), (b.x + ox, b.y + oy), GREEN);
            }
        }
    }
    for corner in corners {
        let center = corner.rounded();
        draw_filled_circle_mut(canvas, center, OUTER_MARKER_RADIUS, RED);
        draw_filled_circle_mut(canvas, center, INNER_MARKER_RADIUS, GREEN);
    }
}
