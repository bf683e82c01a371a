//! PDF Document Structure
//!
//! Catalog, page tree, page objects, and the info dictionary.

use super::objects::{PdfDictionary, PdfObject};
use chrono::{DateTime, Utc};

/// PDF points per millimetre
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

pub const PDF_VERSION: &str = "1.4";

/// Convert millimetres to PDF points
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

/// Page dimensions in points, origin at the lower-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn from_mm(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width: mm_to_pt(width_mm),
            height: mm_to_pt(height_mm),
        }
    }

    /// A4 portrait
    pub fn a4() -> Self {
        Self::from_mm(210.0, 297.0)
    }

    pub fn media_box(&self) -> PdfObject {
        PdfObject::rect(0.0, 0.0, self.width, self.height)
    }
}

/// PDF document information
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: String,
    pub producer: String,
    pub creation_date: DateTime<Utc>,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            creator: "FastCV".to_string(),
            producer: "FastCV PDF Export".to_string(),
            creation_date: Utc::now(),
        }
    }
}

impl DocumentInfo {
    pub fn to_dictionary(&self) -> PdfDictionary {
        let mut dict = PdfDictionary::new();
        let optional = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
        ];
        for (key, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                dict.insert(key, PdfObject::text(value));
            }
        }
        dict.insert("Creator", PdfObject::text(&self.creator));
        dict.insert("Producer", PdfObject::text(&self.producer));
        dict.insert("CreationDate", PdfObject::text(&pdf_date(&self.creation_date)));
        dict
    }
}

/// Date in PDF syntax, e.g. `D:20260118093000Z`
pub fn pdf_date(date: &DateTime<Utc>) -> String {
    date.format("D:%Y%m%d%H%M%SZ").to_string()
}

pub fn create_catalog(pages_ref: u32) -> PdfDictionary {
    PdfDictionary::typed("Catalog").with("Pages", PdfObject::reference(pages_ref))
}

pub fn create_pages(page_refs: &[u32]) -> PdfDictionary {
    PdfDictionary::typed("Pages")
        .with(
            "Kids",
            PdfObject::Array(page_refs.iter().map(|r| PdfObject::reference(*r)).collect()),
        )
        .with("Count", PdfObject::Integer(page_refs.len() as i64))
}

/// A page whose only resource is one image XObject
pub fn create_image_page(
    parent_ref: u32,
    size: &PageSize,
    image_name: &str,
    image_ref: u32,
    content_ref: u32,
) -> PdfDictionary {
    let mut xobjects = PdfDictionary::new();
    xobjects.insert(image_name, PdfObject::reference(image_ref));
    let resources = PdfDictionary::new().with("XObject", xobjects.into());

    PdfDictionary::typed("Page")
        .with("Parent", PdfObject::reference(parent_ref))
        .with("MediaBox", size.media_box())
        .with("Resources", resources.into())
        .with("Contents", PdfObject::reference(content_ref))
}
