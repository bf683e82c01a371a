//! Preview layout variants

use crate::{CvModelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which preview layout is downloaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadLayout {
    #[default]
    Classic,
    Compact,
}

impl DownloadLayout {
    pub const ALL: [DownloadLayout; 2] = [DownloadLayout::Classic, DownloadLayout::Compact];

    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadLayout::Classic => "classic",
            DownloadLayout::Compact => "compact",
        }
    }

    /// Exact match against the stored literals
    pub fn from_stored(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|layout| layout.as_str() == value)
    }

    /// Element id of the rendered preview root for this layout
    pub fn root_element_id(&self) -> &'static str {
        match self {
            DownloadLayout::Classic => "cv-preview-classic",
            DownloadLayout::Compact => "cv-preview-compact",
        }
    }
}

impl fmt::Display for DownloadLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DownloadLayout {
    type Err = CvModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_stored(s.trim().to_ascii_lowercase().as_str())
            .ok_or_else(|| CvModelError::UnknownLayout(s.to_string()))
    }
}
