//! Observable application state
//!
//! Every dispatched action is reduced, saved, then announced to subscribers,
//! in that order and within the same call.

use crate::persisted::{load_state, save_state};
use crate::storage::KeyValueStorage;
use crate::Result;
use cv_model::{AppState, CvAction};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

impl Subscription {
    pub(crate) fn next(counter: &AtomicU64) -> Self {
        Subscription(counter.fetch_add(1, Ordering::Relaxed))
    }
}

type Listener = Box<dyn Fn(&AppState) + Send + Sync>;

pub struct StateStore {
    state: AppState,
    storage: Arc<dyn KeyValueStorage>,
    listeners: Vec<(Subscription, Listener)>,
    next_id: AtomicU64,
}

impl StateStore {
    /// Start from the persisted state, or defaults when there is none
    pub fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        let state = load_state(storage.as_ref()).unwrap_or_default();
        Self::with_state(storage, state)
    }

    pub fn with_state(storage: Arc<dyn KeyValueStorage>, state: AppState) -> Self {
        Self {
            state,
            storage,
            listeners: Vec::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStorage> {
        &self.storage
    }

    /// Reduce `action`, save, and notify subscribers.
    ///
    /// A rejected action leaves the state untouched and nothing is saved.
    pub fn dispatch(&mut self, action: CvAction) -> Result<()> {
        let name = action.name();
        let mut next = self.state.clone();
        next.apply(action)?;
        self.state = next;
        tracing::debug!(action = name, "Dispatched");

        save_state(self.storage.as_ref(), &self.state);
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
        Ok(())
    }

    pub fn subscribe(&mut self, listener: impl Fn(&AppState) + Send + Sync + 'static) -> Subscription {
        let subscription = Subscription::next(&self.next_id);
        self.listeners.push((subscription, Box::new(listener)));
        subscription
    }

    /// Returns false when the subscription was already gone
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        self.listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persisted::STORAGE_KEY;
    use crate::storage::MemoryStorage;
    use crate::StoreError;
    use cv_model::{CvSection, DateParts, Experience, PersonalDataPatch, Skill, SkillLevel};
    use std::sync::atomic::AtomicUsize;

    fn memory() -> Arc<MemoryStorage> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn test_dispatch_saves_every_change() {
        let storage = memory();
        let mut store = StateStore::open(storage.clone());
        assert!(storage.get_item(STORAGE_KEY).unwrap().is_none());

        store
            .dispatch(CvAction::UpdatePersonalData(PersonalDataPatch {
                first_name: Some("Ana".into()),
                ..Default::default()
            }))
            .unwrap();

        let reopened = StateStore::open(storage);
        assert_eq!(reopened.state().cv.personal_data.first_name, "Ana");
    }

    #[test]
    fn test_subscribers_see_saved_state() {
        let storage = memory();
        let mut store = StateStore::open(storage.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        let seen = calls.clone();
        let check_storage = storage.clone();
        let subscription = store.subscribe(move |state| {
            seen.fetch_add(1, Ordering::SeqCst);
            let saved = check_storage.get_item(STORAGE_KEY).unwrap().unwrap();
            assert_eq!(saved, serde_json::to_string(state).unwrap());
        });

        store.dispatch(CvAction::AddSkill(Skill::new("Rust", SkillLevel::Expert))).unwrap();
        store.dispatch(CvAction::ClearSkillsData).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(store.unsubscribe(subscription));
        assert!(!store.unsubscribe(subscription));
        store.dispatch(CvAction::ClearSkillsData).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_rejected_action_changes_nothing() {
        let storage = memory();
        let mut store = StateStore::open(storage.clone());
        let result = store.dispatch(CvAction::RemoveSkillAt(3));
        assert!(matches!(result, Err(StoreError::Model(_))));
        assert!(storage.get_item(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_toggle_clears_and_persists() {
        let storage = memory();
        let mut store = StateStore::open(storage.clone());
        store.dispatch(CvAction::AddSkill(Skill::new("Rust", SkillLevel::Expert))).unwrap();
        store.dispatch(CvAction::ToggleSection(CvSection::Skills)).unwrap();
        store.dispatch(CvAction::ToggleSection(CvSection::Skills)).unwrap();

        let reopened = StateStore::open(storage);
        assert!(reopened.state().sections.skills);
        assert!(reopened.state().cv.skills_data.is_empty());
    }

    #[test]
    fn test_save_failure_does_not_block_dispatch() {
        let storage = Arc::new(MemoryStorage::with_quota(4));
        let mut store = StateStore::open(storage);
        let job = Experience::new("Engineer", "Acme", DateParts::month_year(1, 2020));
        store.dispatch(CvAction::SetExperienceData(vec![job])).unwrap();
        assert_eq!(store.state().cv.experience_data.len(), 1);
    }
}
