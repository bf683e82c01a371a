//! Process-wide notification channel
//!
//! Carries same-tab named events and storage-change signals from other
//! writers. Listeners re-read whatever they care about; notifications carry
//! no payload beyond their name or key.

use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A named event raised in this process
    Event(String),
    /// Another writer changed a storage key
    StorageChanged { key: String },
}

#[derive(Debug, Clone)]
pub struct NotificationChannel {
    sender: broadcast::Sender<Notification>,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl NotificationChannel {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn emit_event(&self, name: &str) {
        self.send(Notification::Event(name.to_string()));
    }

    pub fn storage_changed(&self, key: &str) {
        self.send(Notification::StorageChanged {
            key: key.to_string(),
        });
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn send(&self, notification: Notification) {
        // No receivers is not an error
        if self.sender.send(notification).is_err() {
            tracing::trace!("Notification dropped, no listeners");
        }
    }
}
