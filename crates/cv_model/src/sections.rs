//! Section visibility flags

use crate::{CvModelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A toggleable CV section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CvSection {
    Personal,
    Experience,
    Skills,
    Languages,
    Education,
}

impl CvSection {
    pub const ALL: [CvSection; 5] = [
        CvSection::Personal,
        CvSection::Experience,
        CvSection::Skills,
        CvSection::Languages,
        CvSection::Education,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CvSection::Personal => "personal",
            CvSection::Experience => "experience",
            CvSection::Skills => "skills",
            CvSection::Languages => "languages",
            CvSection::Education => "education",
        }
    }

    /// Sections whose data is discarded when the section is switched off
    pub fn clears_data_when_disabled(&self) -> bool {
        matches!(
            self,
            CvSection::Skills | CvSection::Languages | CvSection::Education
        )
    }
}

impl fmt::Display for CvSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CvSection {
    type Err = CvModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CvModelError::UnknownSection(s.to_string()))
    }
}

/// Which sections the preview includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionVisibility {
    pub personal: bool,
    pub experience: bool,
    pub skills: bool,
    pub languages: bool,
    pub education: bool,
}

impl Default for SectionVisibility {
    fn default() -> Self {
        Self {
            personal: true,
            experience: true,
            skills: true,
            languages: false,
            education: false,
        }
    }
}

impl SectionVisibility {
    pub fn is_enabled(&self, section: CvSection) -> bool {
        match section {
            CvSection::Personal => self.personal,
            CvSection::Experience => self.experience,
            CvSection::Skills => self.skills,
            CvSection::Languages => self.languages,
            CvSection::Education => self.education,
        }
    }

    pub fn set(&mut self, section: CvSection, enabled: bool) {
        let flag = match section {
            CvSection::Personal => &mut self.personal,
            CvSection::Experience => &mut self.experience,
            CvSection::Skills => &mut self.skills,
            CvSection::Languages => &mut self.languages,
            CvSection::Education => &mut self.education,
        };
        *flag = enabled;
    }

    /// Flip a flag, returning the new value
    pub fn toggle(&mut self, section: CvSection) -> bool {
        let next = !self.is_enabled(section);
        self.set(section, next);
        next
    }

    /// Enabled sections in display order
    pub fn enabled(&self) -> impl Iterator<Item = CvSection> + '_ {
        CvSection::ALL.into_iter().filter(move |section| self.is_enabled(*section))
    }
}
