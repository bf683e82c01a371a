//! Error types for render model

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Top-level node has no id")]
    MissingId,

    #[error("Duplicate element id: {0}")]
    DuplicateId(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
