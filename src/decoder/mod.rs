//! Decoder capability
//!
//! The reader never decodes QR symbols itself. It hands each image variant
//! to a [`Decoder`] and works with whatever text and corners come back:
//! - [`Decoded`] carries the (possibly empty) text and 0 or 4 corners
//! - [`DecoderFault`] reports a backend failure, which the detector turns
//!   into a failed result instead of propagating it
//!
//! [`RqrrDecoder`] is the default backend.

use crate::error::DecoderFault;
use crate::models::Point;
use image::DynamicImage;

/// rqrr-backed decoder
pub mod rqrr_backend;

pub use rqrr_backend::RqrrDecoder;

/// Raw output of one decode attempt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    /// Decoded text; empty when no symbol was decoded
    pub text: String,
    /// Corners of the located symbol, empty when nothing was located
    pub points: Vec<Point>,
}

impl Decoded {
    /// Nothing located
    pub fn miss() -> Self {
        Self::default()
    }

    /// A symbol located at `points` with payload `text`
    pub fn new(text: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            text: text.into(),
            points,
        }
    }
}

/// Locate and decode a single QR symbol in an image
pub trait Decoder {
    /// Attempt one decode on `image`
    fn decode(&self, image: &DynamicImage) -> Result<Decoded, DecoderFault>;
}

impl<D: Decoder + ?Sized> Decoder for &D {
    fn decode(&self, image: &DynamicImage) -> Result<Decoded, DecoderFault> {
        (**self).decode(image)
    }
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    fn decode(&self, image: &DynamicImage) -> Result<Decoded, DecoderFault> {
        (**self).decode(image)
    }
}
