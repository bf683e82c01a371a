//! Persisted application state
//!
//! Loading and saving are fail-soft: storage and decode failures are logged
//! and never reach the caller.

use crate::storage::KeyValueStorage;
use crate::{Result, StoreError};
use cv_model::{AppState, Cv, Education, Experience, Language, SectionVisibility, Skill};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Storage key holding `{ cv, sections }`
pub const STORAGE_KEY: &str = "fastcv_state";

const LEGACY_SKILLS_FLAG: &str = "abilities";
const LEGACY_SKILLS_DATA: &str = "abilitiesData";

fn take_object(root: &mut Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
    match root.remove(key) {
        None | Some(Value::Null) => Some(Map::new()),
        Some(Value::Object(map)) => Some(map),
        Some(_) => None,
    }
}

/// Keep the entries under `key` that decode as `T`. A value that is not an
/// array becomes empty.
fn retain_decodable<T: DeserializeOwned>(cv: &mut Map<String, Value>, key: &str) {
    let items = match cv.remove(key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    let total = items.len();
    let kept: Vec<Value> = items
        .into_iter()
        .filter(|item| T::deserialize(item).is_ok())
        .collect();
    if kept.len() < total {
        tracing::warn!(key, dropped = total - kept.len(), "Dropped unreadable persisted entries");
    }
    cv.insert(key.to_string(), Value::Array(kept));
}

fn take_present(map: &mut Map<String, Value>, key: &str) -> Option<Value> {
    map.remove(key).filter(|value| !value.is_null())
}

/// Normalize a persisted blob written by any schema generation.
///
/// The skills list comes from `skillsData`, else `abilitiesData`, else is
/// empty; a value that is not an array also becomes empty. The skills flag
/// comes from the first of `skills`, `abilities` holding a boolean, else the
/// default. List entries that cannot be decoded are dropped one by one so the
/// rest of the state survives. Everything else is merged on top of the
/// defaults. Returns `None` when the blob does not have the persisted shape.
pub fn migrate_persisted(raw: Value) -> Option<AppState> {
    let Value::Object(mut root) = raw else {
        return None;
    };
    let mut cv = take_object(&mut root, "cv")?;
    let mut sections = take_object(&mut root, "sections")?;

    let current_flag = take_present(&mut sections, "skills");
    let legacy_flag = take_present(&mut sections, LEGACY_SKILLS_FLAG);
    let skills_visible = current_flag
        .as_ref()
        .and_then(Value::as_bool)
        .or_else(|| legacy_flag.as_ref().and_then(Value::as_bool))
        .unwrap_or(SectionVisibility::default().skills);
    sections.insert("skills".to_string(), Value::Bool(skills_visible));

    let current_data = take_present(&mut cv, "skillsData");
    let legacy_data = take_present(&mut cv, LEGACY_SKILLS_DATA);
    let skills_data = match current_data.or(legacy_data) {
        Some(Value::Array(items)) => Value::Array(items),
        _ => Value::Array(Vec::new()),
    };
    cv.insert("skillsData".to_string(), skills_data);

    retain_decodable::<Skill>(&mut cv, "skillsData");
    retain_decodable::<Experience>(&mut cv, "experienceData");
    retain_decodable::<Education>(&mut cv, "educationData");
    retain_decodable::<Language>(&mut cv, "languagesData");

    let cv: Cv = serde_json::from_value(Value::Object(cv)).ok()?;
    let sections: SectionVisibility = serde_json::from_value(Value::Object(sections)).ok()?;
    Some(AppState { cv, sections })
}

/// Load and migrate the persisted state, or `None` when there is nothing usable
pub fn load_state(storage: &dyn KeyValueStorage) -> Option<AppState> {
    let raw = match storage.get_item(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!("No persisted state under {}", STORAGE_KEY);
            return None;
        }
        Err(e) => {
            tracing::warn!("Failed to read persisted state: {}", e);
            return None;
        }
    };

    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Persisted state is not valid JSON, using defaults: {}", e);
            return None;
        }
    };

    let state = migrate_persisted(value);
    if state.is_none() {
        tracing::warn!("Persisted state has an unexpected shape, using defaults");
    }
    state
}

/// Serialize and write the state, reporting failures
pub fn persist_state(storage: &dyn KeyValueStorage, state: &AppState) -> Result<()> {
    let json = serde_json::to_string(state)?;
    storage.set_item(STORAGE_KEY, &json)
}

/// Best-effort save; failures are logged and dropped
pub fn save_state(storage: &dyn KeyValueStorage, state: &AppState) {
    match persist_state(storage, state) {
        Ok(()) => {}
        Err(StoreError::QuotaExceeded { needed, available, .. }) => {
            tracing::warn!(needed, available, "Storage quota exceeded, state not saved");
        }
        Err(e) => tracing::warn!("Failed to save state: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use cv_model::{DateParts, Skill, SkillLevel};
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_legacy_names_migrate() {
        let legacy = json!({
            "cv": { "abilitiesData": [{ "name": "Rust", "proficiencyLevel": "Expert" }] },
            "sections": { "abilities": false }
        });
        let current = json!({
            "cv": { "skillsData": [{ "name": "Rust", "proficiencyLevel": "Expert" }] },
            "sections": { "skills": false }
        });
        let from_legacy = migrate_persisted(legacy).unwrap();
        let from_current = migrate_persisted(current).unwrap();
        assert_eq!(from_legacy, from_current);
        assert_eq!(from_legacy.cv.skills_data, vec![Skill::new("Rust", SkillLevel::Expert)]);
        assert!(!from_legacy.sections.skills);
    }

    #[test]
    fn test_current_names_win_over_legacy() {
        let state = migrate_persisted(json!({
            "cv": { "skillsData": [], "abilitiesData": [{ "name": "Old" }] },
            "sections": { "skills": true, "abilities": false }
        }))
        .unwrap();
        assert!(state.cv.skills_data.is_empty());
        assert!(state.sections.skills);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let state = migrate_persisted(json!({
            "cv": { "personalData": { "firstName": "Ana" } },
            "sections": { "languages": true }
        }))
        .unwrap();
        assert_eq!(state.cv.personal_data.first_name, "Ana");
        assert!(state.cv.skills_data.is_empty());
        assert!(state.sections.languages);
        assert!(state.sections.personal);
        assert!(state.sections.skills);
        assert!(!state.sections.education);
    }

    #[test]
    fn test_non_boolean_flag_uses_default() {
        let state = migrate_persisted(json!({
            "cv": {},
            "sections": { "skills": "yes", "abilities": 1 }
        }))
        .unwrap();
        assert!(state.sections.skills);
    }

    #[test]
    fn test_non_array_skills_become_empty() {
        let state = migrate_persisted(json!({ "cv": { "skillsData": "Rust" } })).unwrap();
        assert!(state.cv.skills_data.is_empty());
    }

    #[test]
    fn test_wrong_shape_is_absent() {
        assert!(migrate_persisted(json!([1, 2, 3])).is_none());
        assert!(migrate_persisted(json!({ "cv": 5 })).is_none());
        assert!(migrate_persisted(json!({ "cv": { "personalData": 5 } })).is_none());
    }

    #[test]
    fn test_blank_legacy_end_date_keeps_state() {
        let state = migrate_persisted(json!({
            "cv": {
                "personalData": { "firstName": "Ana", "lastName": "Ruiz" },
                "skillsData": [{ "name": "Rust" }],
                "educationData": [
                    { "institutionName": "MIT", "startDate": "09/2010", "endDate": "" }
                ]
            },
            "sections": { "education": true }
        }))
        .unwrap();

        assert_eq!(state.cv.personal_data.first_name, "Ana");
        assert_eq!(state.cv.skills_data.len(), 1);
        let education = &state.cv.education_data[0];
        assert_eq!(education.start_date, DateParts::month_year(9, 2010));
        assert_eq!(education.end_date, None);
        assert!(state.sections.education);
    }

    #[test]
    fn test_unreadable_entries_are_dropped_individually() {
        let state = migrate_persisted(json!({
            "cv": {
                "personalData": { "firstName": "Ana" },
                "experienceData": [
                    { "role": "Dev", "companyName": "Acme", "startDate": "someday" },
                    { "role": "Lead", "companyName": "Acme", "startDate": "01/2020" }
                ],
                "languagesData": "Spanish"
            }
        }))
        .unwrap();

        assert_eq!(state.cv.personal_data.first_name, "Ana");
        assert_eq!(state.cv.experience_data.len(), 1);
        assert_eq!(state.cv.experience_data[0].role, "Lead");
        assert!(state.cv.languages_data.is_empty());
    }

    #[test]
    fn test_load_keeps_state_with_blank_end_date() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                STORAGE_KEY,
                r#"{"cv":{"personalData":{"firstName":"Ana"},"experienceData":[{"role":"Dev","companyName":"Acme","startDate":"03/2019","endDate":"  "}]}}"#,
            )
            .unwrap();

        let state = load_state(&storage).unwrap();
        assert_eq!(state.cv.personal_data.first_name, "Ana");
        assert_eq!(state.cv.experience_data[0].end_date, None);
    }

    #[test]
    fn test_load_state_fail_soft() {
        let storage = MemoryStorage::new();
        assert!(load_state(&storage).is_none());

        storage.set_item(STORAGE_KEY, "{not json").unwrap();
        assert!(load_state(&storage).is_none());
    }

    #[test]
    fn test_save_then_load() {
        let storage = MemoryStorage::new();
        let mut state = AppState::default();
        state.cv.personal_data.first_name = "Ana".into();
        state.sections.education = true;

        save_state(&storage, &state);
        assert_eq!(load_state(&storage), Some(state));
    }

    #[test]
    fn test_save_swallows_quota_errors() {
        let storage = MemoryStorage::with_quota(8);
        save_state(&storage, &AppState::default());
        assert!(storage.get_item(STORAGE_KEY).unwrap().is_none());
        assert!(matches!(
            persist_state(&storage, &AppState::default()),
            Err(StoreError::QuotaExceeded { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_migration_is_idempotent(
            skills in proptest::collection::vec("[a-zA-Z]{1,12}", 0..5),
            legacy in any::<bool>(),
            visible in any::<bool>(),
        ) {
            let items: Vec<Value> = skills.iter().map(|name| json!({ "name": name })).collect();
            let (data_key, flag_key) = if legacy {
                ("abilitiesData", "abilities")
            } else {
                ("skillsData", "skills")
            };
            let raw = json!({ "cv": { data_key: items }, "sections": { flag_key: visible } });

            let first = migrate_persisted(raw).unwrap();
            let second = migrate_persisted(serde_json::to_value(&first).unwrap()).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.cv.skills_data.len(), skills.len());
            prop_assert_eq!(first.sections.skills, visible);
        }
    }
}
