//! Configuration types
//!
//! Idle page settings, display task settings and their persistence.
//! Persisted settings are stored as postcard binary data.

pub mod display;
pub mod idle;
pub mod settings;

pub use display::{DisplayTaskConfig, IDLE_REFRESH_S, SPLASH_TIMEOUT_S};
pub use idle::{
    DateFormat, IdleConfig, IdleLayout, IdleSettings, SharedIdleSettings, TimeFormat,
    PHONE_IDLE_BUFFER_ROWS, WATCH_DRAWN_IDLE_BUFFER_ROWS,
};
pub use settings::{
    decode_settings, encode_settings, NoPersistence, SettingsError, SettingsSink, StoredSettings,
    MAX_SETTINGS_SIZE,
};
