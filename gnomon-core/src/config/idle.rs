//! Idle page configuration
//!
//! Layout, colour inversion and time/date formatting read by the idle page
//! renderer. Written only from the display task, which publishes a copy
//! in [`SharedIdleSettings`] for the other tasks to read.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use serde::{Deserialize, Serialize};

/// Rows drawn by the watch itself (clock, date, status)
pub const WATCH_DRAWN_IDLE_BUFFER_ROWS: usize = 30;

/// Rows whose content comes from the phone
pub const PHONE_IDLE_BUFFER_ROWS: usize = 66;

/// Which region of the idle page sits at the top of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdleLayout {
    /// Watch-drawn controls on top, phone content below
    #[default]
    WatchControlsTop,
    /// Phone content on top, watch-drawn controls below
    PhoneControlsTop,
}

impl IdleLayout {
    /// The other layout
    pub fn toggled(self) -> Self {
        match self {
            IdleLayout::WatchControlsTop => IdleLayout::PhoneControlsTop,
            IdleLayout::PhoneControlsTop => IdleLayout::WatchControlsTop,
        }
    }

    /// First row of the watch-drawn region
    pub fn watch_region_start(self) -> usize {
        match self {
            IdleLayout::WatchControlsTop => 0,
            IdleLayout::PhoneControlsTop => PHONE_IDLE_BUFFER_ROWS,
        }
    }

    /// First row of the phone region
    pub fn phone_region_start(self) -> usize {
        match self {
            IdleLayout::WatchControlsTop => WATCH_DRAWN_IDLE_BUFFER_ROWS,
            IdleLayout::PhoneControlsTop => 0,
        }
    }
}

/// Clock format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeFormat {
    #[default]
    Hour12,
    Hour24,
}

/// Date order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DateFormat {
    #[default]
    MonthFirst,
    DayFirst,
}

/// Everything the idle page needs to know about how to draw itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdleSettings {
    /// Region order
    pub layout: IdleLayout,
    /// Draw light-on-dark
    pub invert: bool,
    /// Show seconds on the clock
    pub show_seconds: bool,
    /// 12 or 24 hour clock
    pub time_format: TimeFormat,
    /// Month/day order
    pub date_format: DateFormat,
}

impl IdleSettings {
    /// Settings of a watch that was never configured
    pub const FACTORY: Self = Self {
        layout: IdleLayout::WatchControlsTop,
        invert: false,
        show_seconds: false,
        time_format: TimeFormat::Hour12,
        date_format: DateFormat::MonthFirst,
    };
}

impl Default for IdleSettings {
    fn default() -> Self {
        Self::FACTORY
    }
}

/// Idle configuration store
///
/// Holds the startup values and the live values. A new store shows the
/// factory settings until the `initialize_*` calls copy in the startup
/// value of one field each.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdleConfig {
    startup: IdleSettings,
    current: IdleSettings,
}

impl IdleConfig {
    /// Create a store that initialises to `startup`
    pub const fn new(startup: IdleSettings) -> Self {
        Self {
            startup,
            current: IdleSettings::FACTORY,
        }
    }

    /// Set the layout to its startup value
    pub fn initialize_layout(&mut self) {
        self.current.layout = self.startup.layout;
    }

    /// Set inversion to its startup value
    pub fn initialize_invert(&mut self) {
        self.current.invert = self.startup.invert;
    }

    /// Set the seconds display to its startup value
    pub fn initialize_display_seconds(&mut self) {
        self.current.show_seconds = self.startup.show_seconds;
    }

    /// Set the clock format to its startup value
    pub fn initialize_time_format(&mut self) {
        self.current.time_format = self.startup.time_format;
    }

    /// Set the date order to its startup value
    pub fn initialize_date_format(&mut self) {
        self.current.date_format = self.startup.date_format;
    }

    /// Current layout
    pub fn layout(&self) -> IdleLayout {
        self.current.layout
    }

    /// Switch to the other layout
    pub fn toggle_layout(&mut self) {
        self.current.layout = self.current.layout.toggled();
    }

    /// Current inversion flag
    pub fn is_inverted(&self) -> bool {
        self.current.invert
    }

    /// Flip the inversion flag
    pub fn toggle_invert(&mut self) {
        self.current.invert = !self.current.invert;
    }

    /// Snapshot of the live settings
    pub fn settings(&self) -> IdleSettings {
        self.current
    }

    /// Replace the live settings, e.g. with values restored from flash
    pub fn apply(&mut self, settings: IdleSettings) {
        self.current = settings;
    }
}

/// Copy of the live idle settings readable from any task
pub struct SharedIdleSettings {
    inner: Mutex<CriticalSectionRawMutex, Cell<IdleSettings>>,
}

impl Default for SharedIdleSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedIdleSettings {
    /// Create a copy holding the factory settings
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(IdleSettings::FACTORY)),
        }
    }

    /// Replace the published settings
    pub fn publish(&self, settings: IdleSettings) {
        self.inner.lock(|cell| cell.set(settings));
    }

    /// Last published settings
    pub fn get(&self) -> IdleSettings {
        self.inner.lock(|cell| cell.get())
    }

    /// Current idle layout
    pub fn idle_buffer_configuration(&self) -> IdleLayout {
        self.get().layout
    }

    /// Current idle colour inversion
    pub fn query_invert_display(&self) -> bool {
        self.get().invert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_layout_is_watch_controls_top() {
        let config = IdleConfig::default();
        assert_eq!(config.layout(), IdleLayout::WatchControlsTop);
        assert!(!config.is_inverted());
    }

    #[test]
    fn test_new_store_shows_factory_until_initialized() {
        let startup = IdleSettings {
            layout: IdleLayout::PhoneControlsTop,
            invert: true,
            ..IdleSettings::FACTORY
        };
        let mut config = IdleConfig::new(startup);
        assert_eq!(config.settings(), IdleSettings::FACTORY);

        config.initialize_layout();
        assert_eq!(config.layout(), IdleLayout::PhoneControlsTop);
        assert!(!config.is_inverted());
        config.initialize_invert();
        assert!(config.is_inverted());
    }

    #[test]
    fn test_shared_settings_follow_publish() {
        let shared = SharedIdleSettings::new();
        assert_eq!(shared.get(), IdleSettings::FACTORY);

        shared.publish(IdleSettings {
            layout: IdleLayout::PhoneControlsTop,
            invert: true,
            ..IdleSettings::FACTORY
        });
        assert_eq!(shared.idle_buffer_configuration(), IdleLayout::PhoneControlsTop);
        assert!(shared.query_invert_display());
    }

    #[test]
    fn test_initialize_restores_defaults() {
        let defaults = IdleSettings {
            layout: IdleLayout::PhoneControlsTop,
            invert: true,
            show_seconds: true,
            time_format: TimeFormat::Hour24,
            date_format: DateFormat::DayFirst,
        };
        let mut config = IdleConfig::new(defaults);
        config.apply(IdleSettings::default());

        config.initialize_layout();
        config.initialize_invert();
        config.initialize_display_seconds();
        config.initialize_time_format();
        config.initialize_date_format();
        assert_eq!(config.settings(), defaults);
    }

    #[test]
    fn test_regions_cover_the_screen() {
        use gnomon_protocol::LCD_ROWS;

        assert_eq!(WATCH_DRAWN_IDLE_BUFFER_ROWS + PHONE_IDLE_BUFFER_ROWS, LCD_ROWS);
        for layout in [IdleLayout::WatchControlsTop, IdleLayout::PhoneControlsTop] {
            let watch = layout.watch_region_start();
            let phone = layout.phone_region_start();
            assert!(watch + WATCH_DRAWN_IDLE_BUFFER_ROWS <= LCD_ROWS);
            assert!(phone + PHONE_IDLE_BUFFER_ROWS <= LCD_ROWS);
            assert_ne!(watch, phone);
        }
    }

    #[test]
    fn test_toggle_layout() {
        let mut config = IdleConfig::default();
        config.toggle_layout();
        assert_eq!(config.layout(), IdleLayout::PhoneControlsTop);
        config.toggle_layout();
        assert_eq!(config.layout(), IdleLayout::WatchControlsTop);
    }

    proptest! {
        #[test]
        fn toggle_invert_twice_is_identity(start in any::<bool>()) {
            let mut config = IdleConfig::new(IdleSettings { invert: start, ..IdleSettings::default() });
            config.initialize_invert();
            config.toggle_invert();
            prop_assert_eq!(config.is_inverted(), !start);
            config.toggle_invert();
            prop_assert_eq!(config.is_inverted(), start);
        }
    }
}
