use crate::config::{FLAG_OFF, FLAG_ON, defaults, post_type_key};
use crate::error::{Error, Result};
use crate::manager::core::SettingsManager;
use crate::sanitize::sanitize;
use crate::settings::{AmpSettings, PostTypeFlags, RawOptions};

use log::{debug, info};
use serde_json::{Value, json};
use std::collections::BTreeSet;

impl SettingsManager {
    /// Read the blob from the store and reconcile it
    ///
    /// Missing keys are filled from the defaults and every registered post
    /// type gets a flag. Stored values are never rewritten; the typed view
    /// reads values that do not fit their field as the empty or off form.
    /// The blob is written back only when keys were added.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn load(&self) -> Result<AmpSettings> {
        let blob = self.reconciled_blob()?;
        let settings = AmpSettings::from_raw(&blob);

        self.cache.store(settings.clone());
        debug!("Option '{}' loaded", self.option_name);
        Ok(settings)
    }

    /// Current settings, loaded on first access
    ///
    /// Post types registered since the last load trigger a reload so they
    /// get their default flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn settings(&self) -> Result<AmpSettings> {
        match self.cache.get() {
            Some(settings) if !self.has_unreconciled_post_types(&settings) => Ok(settings),
            _ => self.load(),
        }
    }

    /// Clean and persist a submission
    ///
    /// The submission is applied over the current blob, so keys it does not
    /// mention keep their value. Registered validators run first; a
    /// rejected value aborts the save without touching the store.
    ///
    /// # Errors
    ///
    /// Returns an error if a validator rejects a value or the store fails.
    pub fn save(&self, raw: &RawOptions) -> Result<AmpSettings> {
        for (key, value) in raw {
            self.events
                .validate(key, value)
                .map_err(|reason| Error::InvalidSettingValue {
                    key: key.clone(),
                    reason,
                })?;
        }

        let previous = self.reconciled_blob()?;
        let mut submission = previous.clone();
        submission.extend(raw.iter().map(|(k, v)| (k.clone(), v.clone())));

        let known = self.registry.post_type_names();
        let clean = sanitize(&submission, &known);
        let blob = clean.to_raw();

        self.store.set(&self.option_name, &blob)?;
        self.cache.store(clean.clone());

        let changed = self.notify_changes(&previous, &blob);
        info!(
            "Option '{}' saved ({changed} changed key(s))",
            self.option_name
        );
        Ok(clean)
    }

    /// Save a single key
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub fn save_setting(&self, key: &str, value: Value) -> Result<AmpSettings> {
        let mut raw = RawOptions::new();
        raw.insert(key.to_string(), value);
        self.save(&raw)
    }

    /// Drop the cached settings
    ///
    /// Call this if the blob was modified outside the manager.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate();
        debug!("Settings cache invalidated");
    }

    /// Stored blob with defaults and post type flags filled in
    ///
    /// Persists the blob when anything was added.
    fn reconciled_blob(&self) -> Result<RawOptions> {
        let stored = self.store.get(&self.option_name)?;

        let mut blob = defaults();
        if let Some(stored) = &stored {
            blob.extend(stored.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        for post_type in self.registry.post_type_names() {
            let key = post_type_key(&post_type);
            if !blob.contains_key(&key) {
                let flag = if PostTypeFlags::default_for(&post_type) {
                    FLAG_ON
                } else {
                    FLAG_OFF
                };
                blob.insert(key, json!(flag));
                debug!("Added AMP flag for post type '{post_type}'");
            }
        }

        if stored.as_ref() != Some(&blob) {
            self.store.set(&self.option_name, &blob)?;
            info!("Option '{}' updated after reconciliation", self.option_name);
        }
        Ok(blob)
    }

    fn has_unreconciled_post_types(&self, settings: &AmpSettings) -> bool {
        self.registry
            .post_type_names()
            .iter()
            .any(|post_type| !settings.post_types.contains(post_type))
    }

    fn notify_changes(&self, previous: &RawOptions, current: &RawOptions) -> usize {
        let keys: BTreeSet<&String> = previous.keys().chain(current.keys()).collect();
        let mut changed = 0;
        for key in keys {
            let old_value = previous.get(key).unwrap_or(&Value::Null);
            let new_value = current.get(key).unwrap_or(&Value::Null);
            if old_value != new_value {
                self.events.notify(key, old_value, new_value);
                changed += 1;
            }
        }
        changed
    }
}
