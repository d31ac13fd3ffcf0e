//! Event system for option changes
//!
//! The host integration layer wires its own event dispatch (admin save,
//! page render) to the two hook interfaces defined here. Change listeners
//! and per-key validators let callers react to saves without touching the
//! sanitize pipeline.

use crate::metadata::{PageMetadata, PostContext};
use crate::settings::{AmpSettings, RawOptions};
use crate::sync::RwLockExt;
use crate::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Type alias for a change callback
pub type ChangeCallback = Arc<dyn Fn(&str, &Value, &Value) + Send + Sync>;

/// Type alias for a validator function
pub type Validator = Arc<dyn Fn(&Value) -> std::result::Result<(), String> + Send + Sync>;

// =============================================================================
// Host hook interfaces
// =============================================================================

/// Called by the host when the settings form is submitted.
pub trait SaveHook {
    /// Clean and persist a raw submission, returning what was stored.
    fn on_save(&self, raw: &RawOptions) -> Result<AmpSettings>;
}

/// Called by the host while it builds the metadata of an AMP page.
pub trait RenderHook {
    /// Enrich the renderer's metadata for `post`.
    fn on_render_metadata(&self, meta: PageMetadata, post: &PostContext) -> PageMetadata;
}

// =============================================================================
// Event Manager
// =============================================================================

/// Manages event listeners for option changes
pub struct EventManager {
    /// Global listeners (called for all changes)
    global_listeners: RwLock<Vec<ChangeCallback>>,

    /// Per-key listeners (called only for specific option changes)
    key_listeners: RwLock<HashMap<String, Vec<ChangeCallback>>>,

    /// Validators per key
    validators: RwLock<HashMap<String, Vec<Validator>>>,
}

impl EventManager {
    /// Create a new event manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_listeners: RwLock::new(Vec::new()),
            key_listeners: RwLock::new(HashMap::new()),
            validators: RwLock::new(HashMap::new()),
        }
    }

    /// Register a global change listener (called for all option changes)
    ///
    /// # Arguments
    /// * `callback` - Function receiving (`key`, `old_value`, `new_value`)
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&str, &Value, &Value) + Send + Sync + 'static,
    {
        self.global_listeners
            .write_recovered()
            .push(Arc::new(callback));
    }

    /// Register a listener for a specific option key (e.g. `"header-color"`)
    pub fn watch<F>(&self, key: &str, callback: F)
    where
        F: Fn(&str, &Value, &Value) + Send + Sync + 'static,
    {
        self.key_listeners
            .write_recovered()
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(callback));
    }

    /// Register a validator for a specific option key
    ///
    /// Validators see the raw submitted value and run before sanitizing.
    /// If any validator returns an error, the save is rejected.
    pub fn add_validator<F>(&self, key: &str, validator: F)
    where
        F: Fn(&Value) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        self.validators
            .write_recovered()
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(validator));
    }

    /// Validate a value before saving
    ///
    /// # Errors
    ///
    /// Returns the first validation error message if any validator fails.
    pub fn validate(&self, key: &str, value: &Value) -> std::result::Result<(), String> {
        let guard = self.validators.read_recovered();
        if let Some(validators) = guard.get(key) {
            for validator in validators {
                validator(value)?;
            }
        }
        Ok(())
    }

    /// Keys that have at least one validator registered
    pub fn validated_keys(&self) -> Vec<String> {
        self.validators.read_recovered().keys().cloned().collect()
    }

    /// Notify all listeners about a change
    pub fn notify(&self, key: &str, old_value: &Value, new_value: &Value) {
        // Snapshot the callbacks so a listener may register others
        let global: Vec<ChangeCallback> = self.global_listeners.read_recovered().clone();
        for callback in &global {
            callback(key, old_value, new_value);
        }

        let keyed: Vec<ChangeCallback> = self
            .key_listeners
            .read_recovered()
            .get(key)
            .cloned()
            .unwrap_or_default();
        for callback in &keyed {
            callback(key, old_value, new_value);
        }
    }

    /// Remove all listeners for a specific key
    pub fn unwatch(&self, key: &str) {
        self.key_listeners.write_recovered().remove(key);
    }

    /// Clear all listeners and validators
    pub fn clear(&self) {
        self.global_listeners.write_recovered().clear();
        self.key_listeners.write_recovered().clear();
        self.validators.write_recovered().clear();
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
