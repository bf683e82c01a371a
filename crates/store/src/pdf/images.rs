//! Image XObjects
//!
//! Raster pages are embedded as 8-bit DeviceRGB image XObjects.

use super::objects::{PdfDictionary, PdfObject, PdfStream};
use super::writer::{PdfError, Result};

/// Raw RGB raster ready for embedding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB triples, three bytes per pixel
    pub rgb: Vec<u8>,
}

impl ImageData {
    /// Wrap raw RGB bytes, checking the buffer matches the dimensions
    pub fn from_raw_rgb(rgb: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PdfError::InvalidImage(format!(
                "Image has no pixels ({}x{})",
                width, height
            )));
        }
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(PdfError::InvalidImage(format!(
                "Expected {} bytes for {}x{} RGB, got {}",
                expected,
                width,
                height,
                rgb.len()
            )));
        }
        Ok(Self { width, height, rgb })
    }

    /// Height over width
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.height) / f64::from(self.width)
    }

    /// Image XObject stream; the writer applies compression
    pub fn to_xobject(&self) -> PdfStream {
        let dict = PdfDictionary::typed("XObject")
            .with("Subtype", PdfObject::name("Image"))
            .with("Width", self.width.into())
            .with("Height", self.height.into())
            .with("ColorSpace", PdfObject::name("DeviceRGB"))
            .with("BitsPerComponent", PdfObject::Integer(8));
        PdfStream::with_dict(dict, self.rgb.clone())
    }
}
