//! The CV aggregate

use crate::{Education, Experience, Language, PersonalData, Skill};
use serde::{Deserialize, Serialize};

/// Everything the user has entered. Missing lists decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cv {
    pub personal_data: PersonalData,
    pub experience_data: Vec<Experience>,
    pub skills_data: Vec<Skill>,
    pub languages_data: Vec<Language>,
    pub education_data: Vec<Education>,
}

impl Cv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been entered yet
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
