//! Form drafts for the list pages
//!
//! Drafts hold what the user is typing (dates as text) and convert to stored
//! entries on save. Toggle side effects happen on the draft immediately, the
//! way the form reflects them before anything is saved.

use crate::validation::{FieldError, Validator};
use crate::{
    apply_remote_marker, parse_date, CvModelError, DateParts, Education, Experience, Language,
    LanguageLevel, Result, Skill, SkillLevel,
};

fn parse_required(text: &str) -> Result<DateParts> {
    parse_date(text).ok_or_else(|| CvModelError::InvalidDate(text.to_string()))
}

fn parse_optional(text: &str) -> Result<Option<DateParts>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_required(text).map(Some)
}

fn format_optional(date: Option<&DateParts>) -> String {
    date.map(DateParts::to_string).unwrap_or_default()
}

/// One experience card on the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperienceDraft {
    pub role: String,
    pub company_name: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub remote: bool,
    pub still_working_here: bool,
    pub description: String,
}

impl ExperienceDraft {
    pub fn from_entry(entry: &Experience) -> Self {
        Self {
            role: entry.role.clone(),
            company_name: entry.company_name.clone(),
            start_date: entry.start_date.to_string(),
            end_date: format_optional(entry.end_date.as_ref()),
            location: entry.location.clone(),
            remote: entry.remote,
            still_working_here: entry.still_working_here,
            description: entry.description.clone(),
        }
    }

    /// Ticking "still working here" empties the end date field at once
    pub fn set_still_working_here(&mut self, value: bool) {
        self.still_working_here = value;
        if value {
            self.end_date.clear();
        }
    }

    pub fn set_remote(&mut self, value: bool) {
        self.remote = value;
        self.location = apply_remote_marker(&self.location, value);
    }

    pub fn validate(&self, index: usize) -> Vec<FieldError> {
        let path = |field: &str| format!("experienceData.{}.{}", index, field);
        let mut v = Validator::new();

        v.required(&path("role"), &self.role, "Job title is required");
        v.required(&path("companyName"), &self.company_name, "Company is required");
        if v.required(&path("startDate"), &self.start_date, "Start date is required") {
            v.date(&path("startDate"), &self.start_date);
        }
        if !self.still_working_here
            && v.required(&path("endDate"), &self.end_date, "End date is required")
        {
            v.date(&path("endDate"), &self.end_date);
        }

        v.into_errors()
    }

    /// Convert to a stored entry. Call [`validate`](Self::validate) first for field messages.
    pub fn to_entry(&self) -> Result<Experience> {
        Ok(Experience {
            role: self.role.clone(),
            company_name: self.company_name.clone(),
            start_date: parse_required(&self.start_date)?,
            end_date: if self.still_working_here {
                None
            } else {
                parse_optional(&self.end_date)?
            },
            location: self.location.clone(),
            remote: self.remote,
            still_working_here: self.still_working_here,
            description: self.description.clone(),
        })
    }
}

/// The experience page: at least one card is always shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceForm {
    pub entries: Vec<ExperienceDraft>,
}

impl ExperienceForm {
    pub fn from_entries(entries: &[Experience]) -> Self {
        let entries = if entries.is_empty() {
            vec![ExperienceDraft::default()]
        } else {
            entries.iter().map(ExperienceDraft::from_entry).collect()
        };
        Self { entries }
    }

    pub fn add(&mut self) {
        self.entries.push(ExperienceDraft::default());
    }

    /// Remove a card. The last remaining card cannot be removed.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.entries.len() <= 1 || index >= self.entries.len() {
            return false;
        }
        self.entries.remove(index);
        true
    }

    pub fn submit(&self) -> Result<Vec<Experience>> {
        let errors: Vec<FieldError> = self
            .entries
            .iter()
            .enumerate()
            .flat_map(|(index, draft)| draft.validate(index))
            .collect();
        if !errors.is_empty() {
            return Err(CvModelError::InvalidForm(errors));
        }
        self.entries.iter().map(ExperienceDraft::to_entry).collect()
    }
}

/// One education card on the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EducationDraft {
    pub institution_name: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub remote: bool,
    pub still_studying: bool,
    pub degree_type: String,
    pub field_of_study: String,
    pub description: String,
}

impl EducationDraft {
    pub fn from_entry(entry: &Education) -> Self {
        Self {
            institution_name: entry.institution_name.clone(),
            start_date: entry.start_date.to_string(),
            end_date: format_optional(entry.end_date.as_ref()),
            location: entry.location.clone(),
            remote: entry.remote,
            still_studying: entry.still_studying,
            degree_type: entry.degree_type.clone(),
            field_of_study: entry.field_of_study.clone(),
            description: entry.description.clone(),
        }
    }

    pub fn set_still_studying(&mut self, value: bool) {
        self.still_studying = value;
        if value {
            self.end_date.clear();
        }
    }

    pub fn set_remote(&mut self, value: bool) {
        self.remote = value;
        self.location = apply_remote_marker(&self.location, value);
    }

    pub fn validate(&self, index: usize) -> Vec<FieldError> {
        let path = |field: &str| format!("educationData.{}.{}", index, field);
        let mut v = Validator::new();

        v.required(
            &path("institutionName"),
            &self.institution_name,
            "Institution is required",
        );
        if v.required(&path("startDate"), &self.start_date, "Start date is required") {
            v.date(&path("startDate"), &self.start_date);
        }
        if !self.still_studying
            && v.required(&path("endDate"), &self.end_date, "End date is required")
        {
            v.date(&path("endDate"), &self.end_date);
        }

        v.into_errors()
    }

    pub fn to_entry(&self) -> Result<Education> {
        Ok(Education {
            institution_name: self.institution_name.clone(),
            start_date: parse_required(&self.start_date)?,
            end_date: if self.still_studying {
                None
            } else {
                parse_optional(&self.end_date)?
            },
            location: self.location.clone(),
            remote: self.remote,
            still_studying: self.still_studying,
            degree_type: self.degree_type.clone(),
            field_of_study: self.field_of_study.clone(),
            description: self.description.clone(),
        })
    }
}

/// Validate and convert education drafts
pub fn submit_education(drafts: &[EducationDraft]) -> Result<Vec<Education>> {
    let errors: Vec<FieldError> = drafts
        .iter()
        .enumerate()
        .flat_map(|(index, draft)| draft.validate(index))
        .collect();
    if !errors.is_empty() {
        return Err(CvModelError::InvalidForm(errors));
    }
    drafts.iter().map(EducationDraft::to_entry).collect()
}

/// One skill row on the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillDraft {
    pub name: String,
    pub proficiency_level: SkillLevel,
    pub description: String,
}

/// Number of blank rows offered when no skills exist yet
pub const BLANK_SKILL_ROWS: usize = 3;

/// Rows to show for the current skills
pub fn skill_drafts(skills: &[Skill]) -> Vec<SkillDraft> {
    if skills.is_empty() {
        return vec![SkillDraft::default(); BLANK_SKILL_ROWS];
    }
    skills
        .iter()
        .map(|skill| SkillDraft {
            name: skill.name.clone(),
            proficiency_level: skill.proficiency_level,
            description: skill.description.clone(),
        })
        .collect()
}

/// Validate skill rows, then trim them and drop rows whose name is blank
pub fn submit_skills(drafts: &[SkillDraft]) -> Result<Vec<Skill>> {
    let errors: Vec<FieldError> = drafts
        .iter()
        .enumerate()
        .filter(|(_, draft)| draft.name.is_empty())
        .map(|(index, _)| FieldError::new(format!("skills.{}.name", index), "Skill name is required"))
        .collect();
    if !errors.is_empty() {
        return Err(CvModelError::InvalidForm(errors));
    }

    Ok(drafts
        .iter()
        .map(|draft| Skill {
            name: draft.name.trim().to_string(),
            proficiency_level: draft.proficiency_level,
            description: draft.description.trim().to_string(),
        })
        .filter(|skill| !skill.name.is_empty())
        .collect())
}

/// Trim language rows and drop blank ones
pub fn submit_languages(rows: &[(String, Option<LanguageLevel>)]) -> Vec<Language> {
    rows.iter()
        .map(|(name, level)| Language::new(name.trim(), *level))
        .filter(|language| !language.language.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_draft() -> ExperienceDraft {
        ExperienceDraft {
            role: "Engineer".to_string(),
            company_name: "Acme".to_string(),
            start_date: "01/2020".to_string(),
            end_date: "15/06/2022".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_draft_round_trips_entry() {
        let entry = filled_draft().to_entry().unwrap();
        assert_eq!(entry.start_date, DateParts::month_year(1, 2020));
        assert_eq!(entry.end_date, Some(DateParts::full(15, 6, 2022)));
        assert_eq!(ExperienceDraft::from_entry(&entry), filled_draft());
    }

    #[test]
    fn test_still_working_clears_end_date_text() {
        let mut draft = filled_draft();
        draft.set_still_working_here(true);
        assert!(draft.end_date.is_empty());
        assert!(draft.validate(0).is_empty());
        assert_eq!(draft.to_entry().unwrap().end_date, None);
    }

    #[test]
    fn test_missing_end_date_requires_still_working() {
        let mut draft = filled_draft();
        draft.end_date.clear();
        let errors = draft.validate(2);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "experienceData.2.endDate");
        assert_eq!(errors[0].message, "End date is required");
    }

    #[test]
    fn test_malformed_start_date() {
        let mut draft = filled_draft();
        draft.start_date = "2020/01".to_string();
        let errors = draft.validate(0);
        assert_eq!(errors[0].field, "experienceData.0.startDate");
        assert_eq!(errors[0].message, "Use MM/YYYY or DD/MM/YYYY");
    }

    #[test]
    fn test_form_keeps_one_card() {
        let mut form = ExperienceForm::from_entries(&[]);
        assert_eq!(form.entries.len(), 1);
        assert!(!form.remove(0));
        form.add();
        assert!(form.remove(0));
        assert_eq!(form.entries.len(), 1);
    }

    #[test]
    fn test_form_submit_collects_all_errors() {
        let mut form = ExperienceForm::from_entries(&[]);
        form.add();
        match form.submit() {
            Err(CvModelError::InvalidForm(errors)) => {
                assert!(errors.iter().any(|e| e.field == "experienceData.0.role"));
                assert!(errors.iter().any(|e| e.field == "experienceData.1.role"));
            }
            other => panic!("expected form errors, got {:?}", other),
        }
    }

    #[test]
    fn test_education_draft() {
        let mut draft = EducationDraft {
            institution_name: "UNI".to_string(),
            start_date: "03/2015".to_string(),
            end_date: "12/2019".to_string(),
            location: "Lima".to_string(),
            ..Default::default()
        };
        draft.set_remote(true);
        assert_eq!(draft.location, "Lima (Remote)");
        draft.set_still_studying(true);
        assert!(draft.end_date.is_empty());

        let entries = submit_education(&[draft]).unwrap();
        assert!(entries[0].still_studying);
        assert!(entries[0].end_date.is_none());
    }

    #[test]
    fn test_skill_rows() {
        assert_eq!(skill_drafts(&[]).len(), BLANK_SKILL_ROWS);

        let drafts = vec![
            SkillDraft {
                name: "  Rust ".to_string(),
                proficiency_level: SkillLevel::Expert,
                description: " systems ".to_string(),
            },
            SkillDraft {
                name: "   ".to_string(),
                ..Default::default()
            },
        ];
        let skills = submit_skills(&drafts).unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "Rust");
        assert_eq!(skills[0].description, "systems");
    }

    #[test]
    fn test_empty_skill_name_is_rejected() {
        let err = submit_skills(&skill_drafts(&[])).unwrap_err();
        assert!(matches!(err, CvModelError::InvalidForm(ref errors) if errors.len() == BLANK_SKILL_ROWS));
    }

    #[test]
    fn test_language_rows() {
        let rows = vec![
            (" English ".to_string(), Some(LanguageLevel::Fluent)),
            ("".to_string(), None),
        ];
        let languages = submit_languages(&rows);
        assert_eq!(languages, vec![Language::new("English", Some(LanguageLevel::Fluent))]);
    }
}
