//! Render Model - State to preview conversion
//!
//! This crate projects application state into a preview node tree, one root
//! per layout variant, that the frontend draws and the exporter rasterizes.

mod node;
mod document;
mod preview;
mod error;

pub use node::*;
pub use document::*;
pub use preview::*;
pub use error::*;
