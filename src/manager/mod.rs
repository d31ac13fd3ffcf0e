//! Settings manager
//!
//! [`SettingsManager`] is the entry point for loading, saving and
//! validating the AMP options.

mod builder;
mod cache;
mod core;
mod io;
mod operations;

pub use builder::SettingsManagerBuilder;
pub use self::core::SettingsManager;
pub use operations::PostTypeToggle;
