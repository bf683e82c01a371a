//! Field validation rules used by the form pages
//!
//! Validation is field-local: every rule runs and all failures are collected,
//! so one bad field never hides problems in another.

use crate::{is_valid_date_text, PersonalData, DATE_FORMAT_HINT};
use regex_lite::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// A failed rule on one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted field path, e.g. `experienceData.0.role`
    pub field: String,
    /// Message shown next to the field
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z '.-]*$").expect("valid name pattern"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r".+@.+\..+").expect("valid email pattern"))
}

fn digits_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+$").expect("valid phone pattern"))
}

fn profile_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(https?://|www\.)").expect("valid url pattern"))
}

/// Collects field errors for one form submission
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `message` when `value` is empty. Returns whether the value is present.
    pub fn required(&mut self, field: &str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.errors.push(FieldError::new(field, message));
            return false;
        }
        true
    }

    /// Fail with `message` when `value` does not match `pattern`
    pub fn pattern(&mut self, field: &str, value: &str, pattern: &Regex, message: &str) {
        if !pattern.is_match(value) {
            self.errors.push(FieldError::new(field, message));
        }
    }

    /// Fail when `value` is not a date the forms accept
    pub fn date(&mut self, field: &str, value: &str) {
        if !is_valid_date_text(value) {
            self.errors
                .push(FieldError::new(field, format!("Use {}", DATE_FORMAT_HINT)));
        }
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// Validate the personal details form
pub fn validate_personal(data: &PersonalData) -> Vec<FieldError> {
    let mut v = Validator::new();

    if v.required("firstName", &data.first_name, "First name is required") {
        v.pattern("firstName", &data.first_name, name_regex(), "Letters only");
    }
    if v.required("lastName", &data.last_name, "Last name is required") {
        v.pattern("lastName", &data.last_name, name_regex(), "Letters only");
    }
    if v.required("email", &data.email, "Email is required") {
        v.pattern("email", &data.email, email_regex(), "Enter a valid email");
    }
    if !data.phone.is_empty() {
        v.pattern("phone", &data.phone, digits_regex(), "Numbers only");
    }
    v.required("country", &data.country, "Country is required");
    v.required("city", &data.city, "City is required");
    if !data.linked_in_url.is_empty() {
        v.pattern(
            "linkedInUrl",
            &data.linked_in_url,
            profile_url_regex(),
            "Must start with https:// or www.",
        );
    }

    v.into_errors()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_personal() -> PersonalData {
        PersonalData {
            first_name: "Ana".to_string(),
            last_name: "O'Neil-Smith".to_string(),
            email: "ana@example.com".to_string(),
            phone: "5551234".to_string(),
            country: "Peru".to_string(),
            city: "Lima".to_string(),
            linked_in_url: "https://linkedin.com/in/ana".to_string(),
            ..Default::default()
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_valid_personal_data() {
        assert!(validate_personal(&valid_personal()).is_empty());
    }

    #[test]
    fn test_missing_required_fields_are_all_reported() {
        let errors = validate_personal(&PersonalData::default());
        assert_eq!(
            fields(&errors),
            vec!["firstName", "lastName", "email", "country", "city"]
        );
        assert_eq!(errors[0].message, "First name is required");
    }

    #[test]
    fn test_pattern_failures() {
        let mut data = valid_personal();
        data.first_name = "4na".to_string();
        data.email = "ana@example".to_string();
        data.phone = "+51 555".to_string();
        data.linked_in_url = "linkedin.com/in/ana".to_string();

        let errors = validate_personal(&data);
        assert_eq!(fields(&errors), vec!["firstName", "email", "phone", "linkedInUrl"]);
        assert_eq!(errors[0].message, "Letters only");
        assert_eq!(errors[2].message, "Numbers only");
    }

    #[test]
    fn test_www_prefix_accepted() {
        let mut data = valid_personal();
        data.linked_in_url = "www.linkedin.com/in/ana".to_string();
        assert!(validate_personal(&data).is_empty());
    }

    #[test]
    fn test_validator_date_rule() {
        let mut v = Validator::new();
        v.date("startDate", "2020-01");
        v.date("endDate", "01/2021");
        let errors = v.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Use MM/YYYY or DD/MM/YYYY");
    }
}
