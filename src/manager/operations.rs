use crate::config::{keys, post_type_key};
use crate::error::Result;
use crate::events::SaveHook;
use crate::manager::core::SettingsManager;
use crate::settings::{AmpSettings, RawOptions, value_text};
use crate::validate::{
    INVALID_VALUE, ImageConstraint, Validity, validate_image_constraint,
    validate_restricted_snippet,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the post type switch list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTypeToggle {
    /// Storage key, e.g. `post_types-post-amp`
    pub key: String,
    pub name: String,
    pub label: String,
    pub enabled: bool,
}

impl SettingsManager {
    /// Advisory checks for a submission, keyed by option
    ///
    /// Only keys with issues appear in the result. Nothing is stored.
    pub fn validate_submission(&self, raw: &RawOptions) -> BTreeMap<String, Validity> {
        let mut report = BTreeMap::new();

        for (key, value) in raw {
            let mut validity = Validity::new();
            let text = value_text(value);

            match key.as_str() {
                keys::EXTRA_HEAD => validity.merge(validate_restricted_snippet(&text)),
                keys::SITE_ICON => {
                    validity.merge(self.check_image(&text, &ImageConstraint::SITE_ICON));
                }
                keys::DEFAULT_IMAGE => {
                    validity.merge(self.check_image(&text, &ImageConstraint::DEFAULT_IMAGE));
                }
                _ => {}
            }

            if let Err(reason) = self.events.validate(key, value) {
                validity.add(INVALID_VALUE, reason);
            }

            if !validity.is_valid() {
                report.insert(key.clone(), validity);
            }
        }

        report
    }

    fn check_image(&self, reference: &str, constraint: &ImageConstraint) -> Validity {
        let reference = reference.trim();
        let dimensions = match &self.images {
            Some(images) if !reference.is_empty() => images.dimensions(reference),
            _ => None,
        };
        validate_image_constraint(dimensions, constraint)
    }

    /// Whether AMP is switched on for `post_type`
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be loaded.
    pub fn is_amp_enabled(&self, post_type: &str) -> Result<bool> {
        Ok(self.settings()?.post_types.is_enabled(post_type))
    }

    /// Switches for every registered post type, in registry order
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be loaded.
    pub fn post_type_toggles(&self) -> Result<Vec<PostTypeToggle>> {
        let settings = self.settings()?;
        Ok(self
            .registry
            .public_post_types()
            .into_iter()
            .map(|post_type| PostTypeToggle {
                key: post_type_key(&post_type.name),
                enabled: settings.post_types.is_enabled(&post_type.name),
                name: post_type.name,
                label: post_type.label,
            })
            .collect())
    }
}

impl SaveHook for SettingsManager {
    fn on_save(&self, raw: &RawOptions) -> Result<AmpSettings> {
        self.save(raw)
    }
}
