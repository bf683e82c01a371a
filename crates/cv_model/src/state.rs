//! Application state and the actions that change it

use crate::{
    CvModelError, CvSection, Cv, Education, Experience, Language, PersonalDataPatch, Result,
    SectionVisibility, Skill,
};
use serde::{Deserialize, Serialize};

/// The unit persisted between sessions: CV data plus section visibility
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub cv: Cv,
    pub sections: SectionVisibility,
}

/// A state transition
#[derive(Debug, Clone, PartialEq)]
pub enum CvAction {
    UpdatePersonalData(PersonalDataPatch),
    SetExperienceData(Vec<Experience>),
    SetSkillsData(Vec<Skill>),
    AddSkill(Skill),
    RemoveSkillAt(usize),
    SetLanguagesData(Vec<Language>),
    SetEducationData(Vec<Education>),
    ClearSkillsData,
    ClearLanguagesData,
    ClearEducationData,
    /// Flip a section flag; disabling a clearable section empties its list
    ToggleSection(CvSection),
}

impl CvAction {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            CvAction::UpdatePersonalData(_) => "updatePersonalData",
            CvAction::SetExperienceData(_) => "setExperienceData",
            CvAction::SetSkillsData(_) => "setSkillsData",
            CvAction::AddSkill(_) => "addSkill",
            CvAction::RemoveSkillAt(_) => "removeSkillAt",
            CvAction::SetLanguagesData(_) => "setLanguagesData",
            CvAction::SetEducationData(_) => "setEducationData",
            CvAction::ClearSkillsData => "clearSkillsData",
            CvAction::ClearLanguagesData => "clearLanguagesData",
            CvAction::ClearEducationData => "clearEducationData",
            CvAction::ToggleSection(_) => "toggleSection",
        }
    }
}

impl AppState {
    pub fn new(cv: Cv, sections: SectionVisibility) -> Self {
        Self { cv, sections }
    }

    /// Apply an action in place
    pub fn apply(&mut self, action: CvAction) -> Result<()> {
        match action {
            CvAction::UpdatePersonalData(patch) => self.cv.personal_data.apply(patch),
            CvAction::SetExperienceData(entries) => self.cv.experience_data = entries,
            CvAction::SetSkillsData(entries) => self.cv.skills_data = entries,
            CvAction::AddSkill(skill) => self.cv.skills_data.push(skill),
            CvAction::RemoveSkillAt(index) => {
                let len = self.cv.skills_data.len();
                if index >= len {
                    return Err(CvModelError::IndexOutOfRange { index, len });
                }
                self.cv.skills_data.remove(index);
            }
            CvAction::SetLanguagesData(entries) => self.cv.languages_data = entries,
            CvAction::SetEducationData(entries) => self.cv.education_data = entries,
            CvAction::ClearSkillsData => self.cv.skills_data.clear(),
            CvAction::ClearLanguagesData => self.cv.languages_data.clear(),
            CvAction::ClearEducationData => self.cv.education_data.clear(),
            CvAction::ToggleSection(section) => {
                self.toggle_section(section);
            }
        }
        Ok(())
    }

    /// Toggle a section flag, returning the new value.
    ///
    /// Switching skills, languages or education off also discards the list.
    /// Switching it back on does not bring the entries back.
    pub fn toggle_section(&mut self, section: CvSection) -> bool {
        if self.sections.is_enabled(section) && section.clears_data_when_disabled() {
            self.clear_section_data(section);
        }
        self.sections.toggle(section)
    }

    fn clear_section_data(&mut self, section: CvSection) {
        match section {
            CvSection::Skills => self.cv.skills_data.clear(),
            CvSection::Languages => self.cv.languages_data.clear(),
            CvSection::Education => self.cv.education_data.clear(),
            CvSection::Personal | CvSection::Experience => {}
        }
    }
}
