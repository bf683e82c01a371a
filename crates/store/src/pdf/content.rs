//! PDF Content Stream Generation
//!
//! Builder for the graphics operators an image page needs:
//! - q/Q: save and restore graphics state
//! - cm: concatenate transformation matrix
//! - re/W/n: rectangular clipping path
//! - Do: paint an XObject

use super::objects::format_real;
use std::fmt::Write;

/// Content stream builder
#[derive(Debug, Default)]
pub struct ContentStream {
    data: String,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data.into_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn save_state(&mut self) -> &mut Self {
        self.line("q")
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.line("Q")
    }

    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        let operands = [a, b, c, d, e, f].map(format_real).join(" ");
        self.line(&format!("{} cm", operands))
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let operands = [x, y, width, height].map(format_real).join(" ");
        self.line(&format!("{} re", operands))
    }

    /// Intersect the clipping path with the current path
    pub fn clip(&mut self) -> &mut Self {
        self.line("W")
    }

    pub fn end_path(&mut self) -> &mut Self {
        self.line("n")
    }

    pub fn draw_xobject(&mut self, name: &str) -> &mut Self {
        self.line(&format!("/{} Do", name))
    }

    /// Paint `name` into the box whose lower-left corner is `(x, y)`,
    /// clipped to `clip` (x, y, width, height)
    pub fn place_image(
        &mut self,
        name: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        clip: (f64, f64, f64, f64),
    ) -> &mut Self {
        self.save_state()
            .rect(clip.0, clip.1, clip.2, clip.3)
            .clip()
            .end_path()
            .transform(width, 0.0, 0.0, height, x, y)
            .draw_xobject(name)
            .restore_state()
    }

    fn line(&mut self, op: &str) -> &mut Self {
        // Writing into a String cannot fail
        let _ = writeln!(self.data, "{}", op);
        self
    }
}
