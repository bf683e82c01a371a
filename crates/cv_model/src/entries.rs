//! List entries: experience, education, skills and languages

use crate::{deserialize_optional_date, CvModelError, DateParts, Result};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Text appended to a location when the position is remote
pub const REMOTE_MARKER: &str = "Remote";

fn remote_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*\(Remote\)\s*$").expect("valid remote suffix pattern"))
}

/// Add or strip the remote marker on a location string.
///
/// Turning remote on appends ` (Remote)`, or yields just `Remote` for an empty
/// location. Turning it off strips a trailing `(Remote)` in any letter case.
pub fn apply_remote_marker(location: &str, remote: bool) -> String {
    let without_remote = remote_suffix_regex().replace(location, "").trim().to_string();
    match (remote, without_remote.is_empty()) {
        (true, true) => REMOTE_MARKER.to_string(),
        (true, false) => format!("{} ({})", without_remote, REMOTE_MARKER),
        (false, _) => without_remote,
    }
}

/// A work experience entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company_name: String,
    pub start_date: DateParts,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<DateParts>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub still_working_here: bool,
    #[serde(default)]
    pub description: String,
}

impl Experience {
    pub fn new(role: impl Into<String>, company_name: impl Into<String>, start_date: DateParts) -> Self {
        Self {
            role: role.into(),
            company_name: company_name.into(),
            start_date,
            end_date: None,
            location: String::new(),
            remote: false,
            still_working_here: false,
            description: String::new(),
        }
    }

    /// Set the "still working here" flag. Turning it on clears the end date.
    pub fn set_still_working_here(&mut self, value: bool) {
        self.still_working_here = value;
        if value {
            self.end_date = None;
        }
    }

    /// Set the remote flag, rewriting the location marker to match
    pub fn set_remote(&mut self, value: bool) {
        self.remote = value;
        self.location = apply_remote_marker(&self.location, value);
    }

    /// Whether the entry has no end
    pub fn is_ongoing(&self) -> bool {
        self.still_working_here
    }
}

/// An education entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default)]
    pub institution_name: String,
    pub start_date: DateParts,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<DateParts>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub still_studying: bool,
    #[serde(default)]
    pub degree_type: String,
    #[serde(default)]
    pub field_of_study: String,
    #[serde(default)]
    pub description: String,
}

impl Education {
    pub fn new(institution_name: impl Into<String>, start_date: DateParts) -> Self {
        Self {
            institution_name: institution_name.into(),
            start_date,
            end_date: None,
            location: String::new(),
            remote: false,
            still_studying: false,
            degree_type: String::new(),
            field_of_study: String::new(),
            description: String::new(),
        }
    }

    /// Set the "still studying" flag. Turning it on clears the end date.
    pub fn set_still_studying(&mut self, value: bool) {
        self.still_studying = value;
        if value {
            self.end_date = None;
        }
    }

    /// Set the remote flag, rewriting the location marker to match
    pub fn set_remote(&mut self, value: bool) {
        self.remote = value;
        self.location = apply_remote_marker(&self.location, value);
    }

    /// Degree and field of study joined by ` - `, skipping empty parts
    pub fn qualification(&self) -> String {
        [self.degree_type.trim(), self.field_of_study.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" - ")
    }

    pub fn is_ongoing(&self) -> bool {
        self.still_studying
    }
}

/// Skill proficiency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    #[default]
    #[serde(rename = "N/A")]
    NotApplicable,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 5] = [
        SkillLevel::NotApplicable,
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::NotApplicable => "N/A",
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = CvModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CvModelError::UnknownLevel(s.to_string()))
    }
}

/// A skill entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub proficiency_level: SkillLevel,
    #[serde(default)]
    pub description: String,
}

impl Skill {
    pub fn new(name: impl Into<String>, level: SkillLevel) -> Self {
        Self {
            name: name.into(),
            proficiency_level: level,
            description: String::new(),
        }
    }
}

/// Language proficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageLevel {
    Beginner,
    Intermediate,
    Advanced,
    Fluent,
    Native,
}

impl LanguageLevel {
    pub const ALL: [LanguageLevel; 5] = [
        LanguageLevel::Beginner,
        LanguageLevel::Intermediate,
        LanguageLevel::Advanced,
        LanguageLevel::Fluent,
        LanguageLevel::Native,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageLevel::Beginner => "Beginner",
            LanguageLevel::Intermediate => "Intermediate",
            LanguageLevel::Advanced => "Advanced",
            LanguageLevel::Fluent => "Fluent",
            LanguageLevel::Native => "Native",
        }
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageLevel {
    type Err = CvModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CvModelError::UnknownLevel(s.to_string()))
    }
}

/// A spoken language entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    #[serde(default)]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proficiency_level: Option<LanguageLevel>,
}

impl Language {
    pub fn new(language: impl Into<String>, level: Option<LanguageLevel>) -> Self {
        Self {
            language: language.into(),
            proficiency_level: level,
        }
    }

    /// `Language - Level`, or just the language when no level is set
    pub fn label(&self) -> String {
        match self.proficiency_level {
            Some(level) => format!("{} - {}", self.language, level),
            None => self.language.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_still_working_clears_end_date() {
        let mut exp = Experience::new("Engineer", "Acme", DateParts::month_year(1, 2020));
        exp.end_date = Some(DateParts::month_year(6, 2022));

        exp.set_still_working_here(true);
        assert!(exp.still_working_here);
        assert!(exp.end_date.is_none());

        exp.set_still_working_here(false);
        assert!(exp.end_date.is_none());
    }

    #[test]
    fn test_still_studying_clears_end_date() {
        let mut edu = Education::new("UNI", DateParts::month_year(3, 2015));
        edu.end_date = Some(DateParts::month_year(12, 2019));
        edu.set_still_studying(true);
        assert!(edu.end_date.is_none());
    }

    #[test]
    fn test_remote_marker() {
        assert_eq!(apply_remote_marker("Madrid", true), "Madrid (Remote)");
        assert_eq!(apply_remote_marker("", true), "Remote");
        assert_eq!(apply_remote_marker("Madrid (Remote)", true), "Madrid (Remote)");
        assert_eq!(apply_remote_marker("Madrid (remote) ", false), "Madrid");
        assert_eq!(apply_remote_marker("Madrid", false), "Madrid");
    }

    #[test]
    fn test_set_remote_rewrites_location() {
        let mut exp = Experience::new("Dev", "Acme", DateParts::month_year(1, 2020));
        exp.location = "Berlin".to_string();
        exp.set_remote(true);
        assert_eq!(exp.location, "Berlin (Remote)");
        exp.set_remote(false);
        assert_eq!(exp.location, "Berlin");
    }

    #[test]
    fn test_skill_level_wire_names() {
        assert_eq!(serde_json::to_string(&SkillLevel::NotApplicable).unwrap(), "\"N/A\"");
        assert_eq!("expert".parse::<SkillLevel>().unwrap(), SkillLevel::Expert);
        assert!("guru".parse::<SkillLevel>().is_err());
    }

    #[test]
    fn test_language_label() {
        let lang = Language::new("Spanish", Some(LanguageLevel::Native));
        assert_eq!(lang.label(), "Spanish - Native");
        assert_eq!(Language::new("Quechua", None).label(), "Quechua");
    }

    #[test]
    fn test_education_qualification() {
        let mut edu = Education::new("UNI", DateParts::month_year(3, 2015));
        edu.degree_type = "BSc".to_string();
        assert_eq!(edu.qualification(), "BSc");
        edu.field_of_study = "Physics".to_string();
        assert_eq!(edu.qualification(), "BSc - Physics");
    }

    #[test]
    fn test_experience_reads_legacy_text_dates() {
        let json = r#"{"role":"Dev","companyName":"Acme","startDate":"01/2020","endDate":"15/03/2021"}"#;
        let exp: Experience = serde_json::from_str(json).unwrap();
        assert_eq!(exp.start_date, DateParts::month_year(1, 2020));
        assert_eq!(exp.end_date, Some(DateParts::full(15, 3, 2021)));
    }
}
