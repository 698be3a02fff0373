use super::{Decoded, Decoder};
use crate::error::DecoderFault;
use crate::models::Point;
use crate::utils::grayscale::luminance;
use image::DynamicImage;
use log::debug;
use rqrr::PreparedImage;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Decoder backed by the `rqrr` crate
///
/// The first grid that decodes wins. When grids are located but none
/// decodes, the corners of the first one are reported with empty text.
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for RqrrDecoder {
    fn decode(&self, image: &DynamicImage) -> Result<Decoded, DecoderFault> {
        if image.width() == 0 || image.height() == 0 {
            return Err(DecoderFault::EmptyImage);
        }
        let gray = luminance(image);

        catch_unwind(AssertUnwindSafe(|| {
            let (width, height) = gray.dimensions();
            let mut prepared =
                PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
                    gray.get_pixel(x as u32, y as u32)[0]
                });
            let grids = prepared.detect_grids();
            debug!("rqrr located {} grid(s)", grids.len());

            let mut located = Vec::new();
            for (idx, grid) in grids.iter().enumerate() {
                let points = grid
                    .bounds
                    .iter()
                    .map(|p| Point::new(p.x as f32, p.y as f32))
                    .collect::<Vec<_>>();
                match grid.decode() {
                    Ok((_, content)) => return Decoded::new(content, points),
                    Err(err) => {
                        debug!("rqrr grid {idx} failed to decode: {err:?}");
                        if located.is_empty() {
                            located = points;
                        }
                    }
                }
            }
            Decoded::new(String::new(), located)
        }))
        .map_err(|payload| DecoderFault::Backend(panic_message(payload.as_ref())))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "decoder panicked".to_string()
    }
}
