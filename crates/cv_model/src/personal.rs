//! Personal details block of the CV

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Personal details. Every text field defaults to the empty string; only the
/// profile image is genuinely optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub city: String,
    pub linked_in_url: String,
    pub personal_website: String,
    pub driver_license_category: String,
    pub desired_job_title: String,
    pub summary: String,
    /// Profile picture as a `data:` URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

impl PersonalData {
    /// First and last name joined by a space, skipping empty parts
    pub fn full_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// City and country joined by a comma, skipping empty parts
    pub fn location(&self) -> String {
        [self.city.trim(), self.country.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The profile image, ignoring empty placeholders written by older builds
    pub fn profile_image(&self) -> Option<&str> {
        self.profile_image_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Apply a partial update, leaving untouched fields as they are
    pub fn apply(&mut self, patch: PersonalDataPatch) {
        let PersonalDataPatch {
            first_name,
            last_name,
            email,
            phone,
            country,
            city,
            linked_in_url,
            personal_website,
            driver_license_category,
            desired_job_title,
            summary,
            profile_image_url,
        } = patch;

        let fields = [
            (&mut self.first_name, first_name),
            (&mut self.last_name, last_name),
            (&mut self.email, email),
            (&mut self.phone, phone),
            (&mut self.country, country),
            (&mut self.city, city),
            (&mut self.linked_in_url, linked_in_url),
            (&mut self.personal_website, personal_website),
            (&mut self.driver_license_category, driver_license_category),
            (&mut self.desired_job_title, desired_job_title),
            (&mut self.summary, summary),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }

        if let Some(image) = profile_image_url {
            self.profile_image_url = image;
        }
    }
}

/// Partial update of [`PersonalData`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalDataPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub linked_in_url: Option<String>,
    pub personal_website: Option<String>,
    pub driver_license_category: Option<String>,
    pub desired_job_title: Option<String>,
    pub summary: Option<String>,
    /// `Some(None)` removes the image
    pub profile_image_url: Option<Option<String>>,
}

impl PersonalDataPatch {
    /// A patch that replaces every text field with the form's values while
    /// keeping the stored profile image.
    pub fn from_form(data: PersonalData) -> Self {
        Self {
            first_name: Some(data.first_name),
            last_name: Some(data.last_name),
            email: Some(data.email),
            phone: Some(data.phone),
            country: Some(data.country),
            city: Some(data.city),
            linked_in_url: Some(data.linked_in_url),
            personal_website: Some(data.personal_website),
            driver_license_category: Some(data.driver_license_category),
            desired_job_title: Some(data.desired_job_title),
            summary: Some(data.summary),
            profile_image_url: None,
        }
    }

    /// A patch that only sets or clears the profile image
    pub fn image(url: Option<String>) -> Self {
        Self {
            profile_image_url: Some(url),
            ..Default::default()
        }
    }
}

/// Encode raw image bytes as a base64 `data:` URL
pub fn image_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_empty_strings() {
        let data: PersonalData = serde_json::from_str("{}").unwrap();
        assert_eq!(data.first_name, "");
        assert_eq!(data.summary, "");
        assert!(data.profile_image_url.is_none());
    }

    #[test]
    fn test_camel_case_field_names() {
        let data = PersonalData {
            linked_in_url: "https://linkedin.com/in/ana".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["linkedInUrl"], "https://linkedin.com/in/ana");
        assert!(json.get("profileImageUrl").is_none());
    }

    #[test]
    fn test_full_name_and_location() {
        let data = PersonalData {
            first_name: "Ana".to_string(),
            last_name: "".to_string(),
            city: "Lima".to_string(),
            country: "Peru".to_string(),
            ..Default::default()
        };
        assert_eq!(data.full_name(), "Ana");
        assert_eq!(data.location(), "Lima, Peru");
    }

    #[test]
    fn test_apply_patch_keeps_other_fields() {
        let mut data = PersonalData {
            first_name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            ..Default::default()
        };
        data.apply(PersonalDataPatch {
            email: Some("ana@work.com".to_string()),
            ..Default::default()
        });
        assert_eq!(data.first_name, "Ana");
        assert_eq!(data.email, "ana@work.com");
    }

    #[test]
    fn test_form_patch_keeps_image() {
        let mut data = PersonalData {
            profile_image_url: Some("data:image/png;base64,AAAA".to_string()),
            ..Default::default()
        };
        let form = PersonalData {
            first_name: "Luis".to_string(),
            ..Default::default()
        };
        data.apply(PersonalDataPatch::from_form(form));
        assert_eq!(data.first_name, "Luis");
        assert_eq!(data.profile_image(), Some("data:image/png;base64,AAAA"));

        data.apply(PersonalDataPatch::image(None));
        assert!(data.profile_image().is_none());
    }

    #[test]
    fn test_empty_image_is_absent() {
        let data = PersonalData {
            profile_image_url: Some(String::new()),
            ..Default::default()
        };
        assert!(data.profile_image().is_none());
    }

    #[test]
    fn test_image_data_url() {
        assert_eq!(image_data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }
}
