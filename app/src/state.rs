//! Application state shared by the commands

use std::path::{Path, PathBuf};
use std::sync::Arc;

use store::{
    FileStorage, KeyValueStorage, LayoutPreference, NotificationChannel, SettingsManager,
    StateStore,
};

/// Everything a command needs, opened from one data directory
pub struct AppContext {
    data_dir: PathBuf,
    pub store: StateStore,
    pub layout: Arc<LayoutPreference>,
    pub settings: SettingsManager,
}

impl AppContext {
    /// Open (and create if needed) the data directory
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        tracing::debug!("Data directory: {:?}", data_dir);

        let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::in_dir(data_dir));
        let store = StateStore::open(Arc::clone(&storage));
        let layout = Arc::new(LayoutPreference::new(storage, NotificationChannel::default()));

        let settings = SettingsManager::open(data_dir)?;

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            store,
            layout,
            settings,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
