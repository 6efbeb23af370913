//! Display task configuration

use super::idle::IdleSettings;

/// Seconds the splash screen stays up before the idle page takes over
pub const SPLASH_TIMEOUT_S: u16 = 3;

/// Default idle page refresh period in seconds
pub const IDLE_REFRESH_S: u16 = 60;

/// Display task settings fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayTaskConfig {
    /// Splash screen duration in seconds
    pub splash_timeout_s: u16,
    /// Idle page refresh period in seconds
    pub idle_refresh_s: u16,
    /// Idle settings applied by the startup initialisation
    pub idle: IdleSettings,
}

impl Default for DisplayTaskConfig {
    fn default() -> Self {
        Self {
            splash_timeout_s: SPLASH_TIMEOUT_S,
            idle_refresh_s: IDLE_REFRESH_S,
            idle: IdleSettings::default(),
        }
    }
}
