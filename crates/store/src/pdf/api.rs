//! PDF Export Public API
//!
//! Writes an image-only document: one raster embedded once, painted on
//! every page at a per-page position.

use super::content::ContentStream;
use super::document::{create_catalog, create_image_page, create_pages, DocumentInfo, PageSize};
use super::images::ImageData;
use super::objects::{PdfObject, PdfStream};
use super::options::PdfExportOptions;
use super::writer::{PdfError, PdfWriter, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const IMAGE_NAME: &str = "Im1";

/// Where the image lands on one page, in points from the lower-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Write a document with one page per placement
pub fn write_image_pages<W: Write>(
    image: &ImageData,
    page: PageSize,
    placements: &[ImagePlacement],
    options: &PdfExportOptions,
    writer: W,
) -> Result<W> {
    if placements.is_empty() {
        return Err(PdfError::InvalidDocument("No pages to export".to_string()));
    }

    let mut pdf = PdfWriter::new(writer);
    pdf.set_compression(options.compress);
    pdf.write_header()?;

    let catalog_ref = pdf.allocate_object();
    let pages_ref = pdf.allocate_object();
    let info_ref = pdf.allocate_object();
    let image_ref = pdf.allocate_object();
    let page_refs: Vec<(u32, u32)> = placements
        .iter()
        .map(|_| (pdf.allocate_object(), pdf.allocate_object()))
        .collect();

    pdf.write_object(catalog_ref, &create_catalog(pages_ref).into())?;
    let kids: Vec<u32> = page_refs.iter().map(|(page_ref, _)| *page_ref).collect();
    pdf.write_object(pages_ref, &create_pages(&kids).into())?;

    let info = DocumentInfo {
        title: options.title.clone(),
        author: options.author.clone(),
        subject: options.subject.clone(),
        ..Default::default()
    };
    pdf.write_object(info_ref, &info.to_dictionary().into())?;
    pdf.write_stream_object(image_ref, image.to_xobject())?;

    for (placement, (page_ref, content_ref)) in placements.iter().zip(&page_refs) {
        let page_dict = create_image_page(pages_ref, &page, IMAGE_NAME, image_ref, *content_ref);
        pdf.write_object(*page_ref, &PdfObject::Dictionary(page_dict))?;

        let mut content = ContentStream::new();
        content.place_image(
            IMAGE_NAME,
            placement.x,
            placement.y,
            placement.width,
            placement.height,
            (0.0, 0.0, page.width, page.height),
        );
        pdf.write_stream_object(*content_ref, PdfStream::new(content.into_bytes()))?;
    }

    pdf.write_xref_and_trailer(catalog_ref, Some(info_ref))?;
    tracing::debug!(
        pages = placements.len(),
        width = image.width,
        height = image.height,
        bytes = pdf.position(),
        "Wrote image PDF"
    );
    pdf.finish()
}

/// Export image pages to PDF bytes in memory
pub fn export_image_pages_bytes(
    image: &ImageData,
    page: PageSize,
    placements: &[ImagePlacement],
    options: &PdfExportOptions,
) -> Result<Vec<u8>> {
    write_image_pages(image, page, placements, options, Vec::new())
}

/// Export image pages to a PDF file
pub fn export_image_pages(
    image: &ImageData,
    page: PageSize,
    placements: &[ImagePlacement],
    options: &PdfExportOptions,
    path: impl AsRef<Path>,
) -> Result<()> {
    let file = File::create(path)?;
    write_image_pages(image, page, placements, options, BufWriter::new(file))?;
    Ok(())
}
