//! Error types for the export pipeline

use cv_model::DownloadLayout;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No preview is mounted for the {0} layout")]
    MissingPreview(DownloadLayout),

    #[error("Staging failed: {0}")]
    Staging(#[from] render_model::RenderError),

    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] store::pdf::PdfError),
}

pub type Result<T> = std::result::Result<T, ExportError>;
