//! CV Model - Core CV data structures and editing rules
//!
//! This crate provides the data model for the CV builder: the CV aggregate,
//! structured dates, section visibility, the actions that mutate application
//! state, and the field-level validation used by the form pages.

mod error;
mod date;
mod personal;
mod entries;
mod cv;
mod sections;
mod state;
mod layout;
pub mod forms;
pub mod validation;

pub use error::*;
pub use date::*;
pub use personal::*;
pub use entries::*;
pub use cv::*;
pub use sections::*;
pub use state::*;
pub use layout::*;
