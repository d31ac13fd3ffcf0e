//! Cache logic for `SettingsManager`

use crate::settings::AmpSettings;
use crate::sync::RwLockExt;
use std::sync::RwLock;

/// Last loaded or saved settings
pub(crate) struct SettingsCache {
    state: RwLock<Option<AmpSettings>>,
}

impl SettingsCache {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(None),
        }
    }

    pub fn get(&self) -> Option<AmpSettings> {
        self.state.read_recovered().clone()
    }

    pub fn store(&self, settings: AmpSettings) {
        *self.state.write_recovered() = Some(settings);
    }

    pub fn invalidate(&self) {
        *self.state.write_recovered() = None;
    }
}
