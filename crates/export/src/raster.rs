//! Rasterization seam
//!
//! The pipeline asks a `Rasterizer` for a bitmap of the staged container.
//! Drawing is host-specific; `SnapshotRasterizer` takes a PNG the host
//! captured and normalizes it to the staging width.

use crate::{ExportError, Result};
use async_trait::async_trait;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, RgbaImage};
use render_model::PreviewDocument;
use std::path::PathBuf;

/// How the staged container should be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Container width in CSS pixels
    pub width_px: u32,
    /// Device pixels per CSS pixel
    pub pixel_ratio: f64,
    pub background: [u8; 3],
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            width_px: 1100,
            pixel_ratio: 2.0,
            background: [255, 255, 255],
        }
    }
}

impl RasterOptions {
    /// Expected bitmap width in device pixels
    pub fn bitmap_width(&self) -> u32 {
        (f64::from(self.width_px) * self.pixel_ratio).round() as u32
    }
}

#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Draw the element `container_id` of `document` into a bitmap
    async fn rasterize(
        &self,
        document: &PreviewDocument,
        container_id: &str,
        options: &RasterOptions,
    ) -> Result<RgbaImage>;
}

/// Source of a host-captured PNG snapshot
#[derive(Debug, Clone)]
pub enum Snapshot {
    File(PathBuf),
    Bytes(Vec<u8>),
}

/// Rasterizer backed by a PNG captured outside the process.
///
/// The snapshot is used as-is: only its width is normalized. It must be a
/// capture of the print tree (see [`print_tree`](crate::print_tree)), which
/// carries the print palette and the stripped decoration. A capture of the
/// live preview keeps the on-screen theme and border.
#[derive(Debug, Clone)]
pub struct SnapshotRasterizer {
    snapshot: Snapshot,
}

impl SnapshotRasterizer {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot: Snapshot::File(path.into()),
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            snapshot: Snapshot::Bytes(bytes),
        }
    }

    async fn read(&self) -> Result<Vec<u8>> {
        match &self.snapshot {
            Snapshot::File(path) => Ok(tokio::fs::read(path).await?),
            Snapshot::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

#[async_trait]
impl Rasterizer for SnapshotRasterizer {
    async fn rasterize(
        &self,
        document: &PreviewDocument,
        container_id: &str,
        options: &RasterOptions,
    ) -> Result<RgbaImage> {
        if !document.contains(container_id) {
            return Err(ExportError::Rasterize(format!(
                "element {} is not mounted",
                container_id
            )));
        }

        let bytes = self.read().await?;
        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(|e| ExportError::Rasterize(e.to_string()))??
            .to_rgba8();

        let target_width = options.bitmap_width();
        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(ExportError::InvalidRaster("snapshot is empty".to_string()));
        }
        if decoded.width() == target_width || target_width == 0 {
            return Ok(decoded);
        }

        let target_height = (u64::from(decoded.height()) * u64::from(target_width)
            / u64::from(decoded.width()))
        .max(1) as u32;
        tracing::debug!(
            from = decoded.width(),
            to = target_width,
            "Resizing snapshot to staging width"
        );
        Ok(imageops::resize(&decoded, target_width, target_height, FilterType::Triangle))
    }
}

/// Composite onto an opaque background, dropping alpha
pub fn flatten_onto(image: &RgbaImage, background: [u8; 3]) -> RgbImage {
    let mut out = RgbImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u32::from(a);
        let blend = |fg: u8, bg: u8| -> u8 {
            ((u32::from(fg) * alpha + u32::from(bg) * (255 - alpha) + 127) / 255) as u8
        };
        out.put_pixel(
            x,
            y,
            Rgb([
                blend(r, background[0]),
                blend(g, background[1]),
                blend(b, background[2]),
            ]),
        );
    }
    out
}
