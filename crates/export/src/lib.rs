//! Export - CV preview to paginated PDF
//!
//! The pipeline clones the selected preview root into an offscreen staging
//! container, rasterizes it, slides the one raster across as many fixed-size
//! pages as it needs, and hands the document to a download sink.

mod error;
mod geometry;
mod filename;
mod staging;
mod raster;
mod sink;
mod pipeline;

pub use error::*;
pub use geometry::*;
pub use filename::*;
pub use staging::*;
pub use raster::*;
pub use sink::*;
pub use pipeline::*;
