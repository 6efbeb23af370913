//! Display configuration
//!
//! Compiled-in defaults come from display.toml (validated by build.rs);
//! idle settings saved to flash replace the `[idle]` part at boot.

pub mod settings;

use gnomon_core::config::{DisplayTaskConfig, IdleSettings};

pub use settings::{load_idle_settings, save_idle_settings, FlashSettings};

mod generated {
    include!(concat!(env!("OUT_DIR"), "/display_config.rs"));
}

/// Defaults from display.toml
pub const DISPLAY_CONFIG: DisplayTaskConfig = DisplayTaskConfig {
    splash_timeout_s: generated::SPLASH_TIMEOUT_S,
    idle_refresh_s: generated::IDLE_REFRESH_S,
    idle: IdleSettings {
        layout: generated::IDLE_LAYOUT,
        invert: generated::IDLE_INVERT,
        show_seconds: generated::IDLE_SHOW_SECONDS,
        time_format: generated::IDLE_TIME_FORMAT,
        date_format: generated::IDLE_DATE_FORMAT,
    },
};
