//! The export pipeline

use crate::filename::export_filename;
use crate::geometry::PageGeometry;
use crate::raster::{flatten_onto, RasterOptions, Rasterizer};
use crate::sink::{DownloadSink, Notice, Notifier};
use crate::staging::{stage_clone, staging_container, StagingGuard, STAGING_ID_PREFIX};
use crate::{ExportError, Result};
use cv_model::{DownloadLayout, PersonalData};
use render_model::{PreviewDocument, PreviewNode};
use std::path::PathBuf;
use store::pdf::{export_image_pages_bytes, ImageData, PdfExportOptions};
use store::ExportSettings;

/// A generated document, not yet saved
#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub filename: String,
    /// Layout of the root that was actually exported
    pub layout: DownloadLayout,
    pub page_count: usize,
    pub bitmap_width: u32,
    pub bitmap_height: u32,
    pub bytes: Vec<u8>,
}

/// A completed download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub filename: String,
    pub path: PathBuf,
    pub page_count: usize,
}

/// Exports the mounted preview through a rasterizer
pub struct Exporter<R: Rasterizer> {
    rasterizer: R,
    settings: ExportSettings,
}

impl<R: Rasterizer> Exporter<R> {
    pub fn new(rasterizer: R, settings: ExportSettings) -> Self {
        Self {
            rasterizer,
            settings,
        }
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::from_settings(&self.settings)
    }

    fn raster_options(&self) -> RasterOptions {
        RasterOptions {
            width_px: self.settings.staging_width_px,
            pixel_ratio: self.settings.pixel_ratio,
            ..Default::default()
        }
    }

    fn pdf_options(&self, personal: &PersonalData) -> PdfExportOptions {
        let mut options = PdfExportOptions::new().with_compression(self.settings.compress);
        let full_name = personal.full_name();
        if self.settings.title_from_name && !full_name.is_empty() {
            options = options
                .with_title(format!("{} CV", full_name))
                .with_author(full_name);
        }
        options
    }

    /// Render the preview for `layout` into PDF bytes.
    ///
    /// The live document is left as it was: work happens on a detached
    /// clone, and the staging container is gone before this returns.
    pub async fn export(
        &self,
        document: &mut PreviewDocument,
        personal: &PersonalData,
        layout: DownloadLayout,
    ) -> Result<ExportedPdf> {
        let (layout, staged) = locate_root(document, layout)?;
        let options = self.raster_options();

        let bitmap = {
            let guard = StagingGuard::mount(document, staged, options.width_px)?;
            // Bound before the block ends so the guard outlives the borrow
            let result = self
                .rasterizer
                .rasterize(guard.document(), guard.id(), &options)
                .await;
            result
        }?;
        let (bitmap_width, bitmap_height) = bitmap.dimensions();

        let geometry = self.geometry();
        let scaled_height = geometry.scaled_height(bitmap_width, bitmap_height)?;
        let placements = geometry.placements(scaled_height);
        tracing::debug!(
            bitmap_width,
            bitmap_height,
            scaled_height,
            pages = placements.len(),
            "Planned pages"
        );

        let rgb = flatten_onto(&bitmap, options.background);
        let image = ImageData::from_raw_rgb(rgb.into_raw(), bitmap_width, bitmap_height)?;
        let bytes = export_image_pages_bytes(
            &image,
            geometry.page_size(),
            &placements,
            &self.pdf_options(personal),
        )?;

        Ok(ExportedPdf {
            filename: export_filename(&personal.first_name, &personal.last_name, layout),
            layout,
            page_count: placements.len(),
            bitmap_width,
            bitmap_height,
            bytes,
        })
    }

    /// Export and save, turning failures into notices
    pub async fn download(
        &self,
        document: &mut PreviewDocument,
        personal: &PersonalData,
        layout: DownloadLayout,
        sink: &dyn DownloadSink,
        notifier: &dyn Notifier,
    ) -> Option<ExportOutcome> {
        let saved = match self.export(document, personal, layout).await {
            Ok(pdf) => sink.save(&pdf.filename, &pdf.bytes).map(|path| ExportOutcome {
                filename: pdf.filename,
                path,
                page_count: pdf.page_count,
            }),
            Err(e) => Err(e),
        };

        match saved {
            Ok(outcome) => {
                tracing::info!(
                    filename = %outcome.filename,
                    pages = outcome.page_count,
                    "Exported CV"
                );
                Some(outcome)
            }
            Err(ExportError::MissingPreview(layout)) => {
                tracing::info!(layout = %layout, "Export requested without a mounted preview");
                notifier.notify(Notice::MissingPreview);
                None
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                notifier.notify(Notice::ExportFailed);
                None
            }
        }
    }
}

/// The print-styled container an export of `layout` rasterizes, for hosts
/// that draw the snapshot themselves
pub fn print_tree(document: &PreviewDocument, layout: DownloadLayout, width_px: u32) -> Result<PreviewNode> {
    let (_, staged) = locate_root(document, layout)?;
    Ok(staging_container(STAGING_ID_PREFIX, width_px, staged))
}

/// Clone the root for `layout`, falling back to the other layout's root
fn locate_root(document: &PreviewDocument, layout: DownloadLayout) -> Result<(DownloadLayout, PreviewNode)> {
    let fallback = DownloadLayout::ALL.into_iter().filter(|other| *other != layout);
    for candidate in std::iter::once(layout).chain(fallback) {
        if let Some(root) = document.element_by_id(candidate.root_element_id()) {
            if candidate != layout {
                tracing::debug!(wanted = %layout, found = %candidate, "Falling back to other preview root");
            }
            return Ok((candidate, stage_clone(root)));
        }
    }
    Err(ExportError::MissingPreview(layout))
}
