//! PDF Export Module
//!
//! Image-only PDF generation for the CV export.
//!
//! # Architecture
//!
//! - `objects`: PDF object model and serializer
//! - `document`: catalog, page tree, pages, info dictionary
//! - `content`: content stream operators
//! - `images`: raw RGB image XObjects
//! - `options`: export configuration
//! - `writer`: file structure, xref table, compression
//! - `api`: public entry points

mod api;
mod content;
mod document;
mod images;
mod objects;
mod options;
mod writer;

pub use api::*;
pub use content::ContentStream;
pub use document::{mm_to_pt, pdf_date, DocumentInfo, PageSize, POINTS_PER_MM};
pub use images::ImageData;
pub use options::*;
pub use writer::{PdfError, Result as PdfResult};
