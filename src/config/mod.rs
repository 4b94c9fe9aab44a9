//! Configuration module for parley.
//!
//! Handles the config file, environment variable expansion, and settings.

mod settings;

pub use settings::{
    expand_env_vars, CacheSettings, CompilerSettings, CompletionSettings, DatabaseSettings,
    Settings, SettingsError, ToggleSettings,
};
