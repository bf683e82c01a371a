//! Page geometry and the placement plan
//!
//! All lengths are millimetres until converted to PDF points for placement.

use crate::{ExportError, Result};
use store::pdf::{mm_to_pt, ImagePlacement, PageSize};
use store::ExportSettings;

/// Overflow smaller than this does not start a new page
const OVERFLOW_EPSILON_MM: f64 = 1e-6;

/// Fixed page format with a uniform margin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub margin_mm: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageGeometry {
    /// A4 portrait with 8 mm margins
    pub fn a4() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 8.0,
        }
    }

    pub fn from_settings(settings: &ExportSettings) -> Self {
        Self {
            page_width_mm: settings.page_width_mm,
            page_height_mm: settings.page_height_mm,
            margin_mm: settings.margin_mm,
        }
    }

    pub fn printable_width(&self) -> f64 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    pub fn printable_height(&self) -> f64 {
        self.page_height_mm - 2.0 * self.margin_mm
    }

    pub fn page_size(&self) -> PageSize {
        PageSize::from_mm(self.page_width_mm, self.page_height_mm)
    }

    /// Bitmap height once scaled to the printable width
    pub fn scaled_height(&self, bitmap_width: u32, bitmap_height: u32) -> Result<f64> {
        if bitmap_width == 0 {
            return Err(ExportError::InvalidRaster("bitmap has zero width".to_string()));
        }
        Ok(f64::from(bitmap_height) * self.printable_width() / f64::from(bitmap_width))
    }

    /// Top offset of the image on every page.
    ///
    /// Page one places the image at the margin. While content remains, each
    /// further page shifts the same image up by what earlier pages showed.
    pub fn plan_pages(&self, scaled_height: f64) -> Vec<f64> {
        let printable_height = self.printable_height();
        let mut offsets = vec![self.margin_mm];
        if printable_height <= 0.0 {
            return offsets;
        }
        let mut remaining = scaled_height - printable_height;
        while remaining > OVERFLOW_EPSILON_MM {
            offsets.push(self.margin_mm - (scaled_height - remaining));
            remaining -= printable_height;
        }
        offsets
    }

    /// The plan in PDF points, one placement per page
    pub fn placements(&self, scaled_height: f64) -> Vec<ImagePlacement> {
        let page_height = mm_to_pt(self.page_height_mm);
        let width = mm_to_pt(self.printable_width());
        let height = mm_to_pt(scaled_height);
        self.plan_pages(scaled_height)
            .into_iter()
            .map(|offset| ImagePlacement {
                x: mm_to_pt(self.margin_mm),
                y: page_height - mm_to_pt(offset) - height,
                width,
                height,
            })
            .collect()
    }
}
