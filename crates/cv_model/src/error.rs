//! Error types for CV model operations

use crate::validation::FieldError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CvModelError {
    #[error("Invalid date: {0:?} (use MM/YYYY or DD/MM/YYYY)")]
    InvalidDate(String),

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Unknown layout: {0}")]
    UnknownLayout(String),

    #[error("Unknown proficiency level: {0}")]
    UnknownLevel(String),

    #[error("Index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Form has {} invalid field(s)", .0.len())]
    InvalidForm(Vec<FieldError>),
}

pub type Result<T> = std::result::Result<T, CvModelError>;
