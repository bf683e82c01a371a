//! Download layout preference
//!
//! Stored under a current key and a mirrored legacy key. Writers persist both
//! and raise both event names; readers heal unrecognized stored values.

use crate::notifications::{Notification, NotificationChannel};
use crate::state_store::Subscription;
use crate::storage::KeyValueStorage;
use cv_model::DownloadLayout;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

pub const LAYOUT_STORAGE_KEY: &str = "hero4job_download_layout";
pub const LEGACY_LAYOUT_STORAGE_KEY: &str = "fastcv_download_layout";
pub const LAYOUT_EVENT: &str = "hero4job:download-layout";
pub const LEGACY_LAYOUT_EVENT: &str = "fastcv:download-layout";

/// Layout used for values that are present but unrecognized
pub const HEALED_LAYOUT: DownloadLayout = DownloadLayout::Compact;

fn read_key(storage: &dyn KeyValueStorage, key: &str) -> Option<String> {
    match storage.get_item(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, "Failed to read layout preference: {}", e);
            None
        }
    }
}

fn write_keys(storage: &dyn KeyValueStorage, layout: DownloadLayout) {
    for key in [LAYOUT_STORAGE_KEY, LEGACY_LAYOUT_STORAGE_KEY] {
        if let Err(e) = storage.set_item(key, layout.as_str()) {
            tracing::warn!(key, "Failed to store layout preference: {}", e);
        }
    }
}

/// Read the stored layout: current key, then legacy key, then the default.
/// An unrecognized value becomes `compact` and both keys are rewritten.
pub fn read_layout(storage: &dyn KeyValueStorage) -> DownloadLayout {
    let stored = read_key(storage, LAYOUT_STORAGE_KEY)
        .or_else(|| read_key(storage, LEGACY_LAYOUT_STORAGE_KEY));
    let Some(raw) = stored else {
        return DownloadLayout::default();
    };
    match DownloadLayout::from_stored(&raw) {
        Some(layout) => layout,
        None => {
            tracing::info!(stored = %raw, "Healing unrecognized layout preference");
            write_keys(storage, HEALED_LAYOUT);
            HEALED_LAYOUT
        }
    }
}

/// Persist under both keys and raise both events
pub fn write_layout(storage: &dyn KeyValueStorage, channel: &NotificationChannel, layout: DownloadLayout) {
    write_keys(storage, layout);
    channel.emit_event(LAYOUT_EVENT);
    channel.emit_event(LEGACY_LAYOUT_EVENT);
}

/// Whether a notification should make listeners re-read the preference
pub fn concerns_layout(notification: &Notification) -> bool {
    match notification {
        Notification::Event(name) => name == LAYOUT_EVENT || name == LEGACY_LAYOUT_EVENT,
        Notification::StorageChanged { key } => {
            key == LAYOUT_STORAGE_KEY || key == LEGACY_LAYOUT_STORAGE_KEY
        }
    }
}

type Listener = Arc<dyn Fn(DownloadLayout) + Send + Sync>;

/// Observable view of the preference shared by everything that reads it
pub struct LayoutPreference {
    storage: Arc<dyn KeyValueStorage>,
    channel: NotificationChannel,
    current: Mutex<DownloadLayout>,
    listeners: Mutex<Vec<(Subscription, Listener)>>,
    next_id: AtomicU64,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LayoutPreference {
    pub fn new(storage: Arc<dyn KeyValueStorage>, channel: NotificationChannel) -> Self {
        let current = read_layout(storage.as_ref());
        Self {
            storage,
            channel,
            current: Mutex::new(current),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn get(&self) -> DownloadLayout {
        *guard(&self.current)
    }

    pub fn channel(&self) -> &NotificationChannel {
        &self.channel
    }

    /// Persist, broadcast, and update local listeners
    pub fn set(&self, layout: DownloadLayout) {
        write_layout(self.storage.as_ref(), &self.channel, layout);
        self.update(layout);
    }

    /// Re-read from storage, notifying listeners if the value moved
    pub fn refresh(&self) -> DownloadLayout {
        let layout = read_layout(self.storage.as_ref());
        self.update(layout);
        layout
    }

    fn update(&self, layout: DownloadLayout) {
        let changed = {
            let mut current = guard(&self.current);
            let changed = *current != layout;
            *current = layout;
            changed
        };
        if changed {
            tracing::debug!(layout = %layout, "Layout preference changed");
            let listeners: Vec<Listener> = guard(&self.listeners)
                .iter()
                .map(|(_, listener)| listener.clone())
                .collect();
            for listener in listeners {
                listener(layout);
            }
        }
    }

    pub fn subscribe(&self, listener: impl Fn(DownloadLayout) + Send + Sync + 'static) -> Subscription {
        let subscription = Subscription::next(&self.next_id);
        guard(&self.listeners).push((subscription, Arc::new(listener)));
        subscription
    }

    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut listeners = guard(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != subscription);
        listeners.len() != before
    }

    /// Re-read when `notification` is about the layout; returns the new value
    pub fn handle_notification(&self, notification: &Notification) -> Option<DownloadLayout> {
        concerns_layout(notification).then(|| self.refresh())
    }

    /// Follow the channel on a tokio task until every sender is gone
    pub fn spawn_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let preference = Arc::clone(self);
        let mut receiver = self.channel.subscribe();
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(notification) => {
                        preference.handle_notification(&notification);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Layout listener lagged, re-reading");
                        preference.refresh();
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
