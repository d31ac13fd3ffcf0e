//! Option schema and manager configuration
//!
//! - `SettingsConfig` - where and how the option blob is stored
//! - `SettingMetadata` / `schema()` - recognized keys, classes and defaults

mod schema;
mod types;

pub use schema::{
    CURRENT_VERSION, DEFAULT_ENABLED_POST_TYPE, FLAG_OFF, FLAG_ON, OptionKind, SettingMetadata,
    defaults, keys, kind_of, parse_post_type_key, post_type_key, schema,
};

pub use types::{DEFAULT_OPTION_NAME, SettingsConfig, SettingsConfigBuilder};
