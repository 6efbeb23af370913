//! Idle settings persistence
//!
//! The display task calls a [`SettingsSink`] whenever a setting should be
//! made durable. The default sink does nothing; firmware wires in flash.
//! On flash the settings are stored as a postcard-encoded
//! [`StoredSettings`] record.

use serde::{Deserialize, Serialize};

use super::idle::IdleSettings;

/// Magic number to identify a settings record
pub const SETTINGS_MAGIC: u32 = 0x49444C45; // "IDLE"

/// Current settings record version
pub const SETTINGS_VERSION: u8 = 1;

/// Upper bound of an encoded record
pub const MAX_SETTINGS_SIZE: usize = 32;

/// Settings persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Invalid magic or version
    InvalidFormat,
    /// The backing store refused the write
    Storage,
}

/// Settings record as written to flash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StoredSettings {
    /// Magic number for validation
    pub magic: u32,
    /// Record format version
    pub version: u8,
    /// The settings themselves
    pub idle: IdleSettings,
}

impl StoredSettings {
    /// Wrap settings in a current-version record
    pub const fn new(idle: IdleSettings) -> Self {
        Self {
            magic: SETTINGS_MAGIC,
            version: SETTINGS_VERSION,
            idle,
        }
    }

    /// Check if the magic and version match
    pub fn is_valid(&self) -> bool {
        self.magic == SETTINGS_MAGIC && self.version == SETTINGS_VERSION
    }
}

/// Encode settings into `buffer`, returning the used prefix
pub fn encode_settings<'b>(
    settings: &IdleSettings,
    buffer: &'b mut [u8],
) -> Result<&'b mut [u8], SettingsError> {
    postcard::to_slice(&StoredSettings::new(*settings), buffer)
        .map_err(|_| SettingsError::Serialize)
}

/// Decode and validate a settings record
pub fn decode_settings(bytes: &[u8]) -> Result<IdleSettings, SettingsError> {
    let stored: StoredSettings =
        postcard::from_bytes(bytes).map_err(|_| SettingsError::Deserialize)?;
    if !stored.is_valid() {
        return Err(SettingsError::InvalidFormat);
    }
    Ok(stored.idle)
}

/// Destination for settings that should survive a reset
pub trait SettingsSink {
    /// Persist the given settings
    fn save(&mut self, settings: &IdleSettings) -> Result<(), SettingsError>;
}

/// Sink that keeps settings volatile
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersistence;

impl SettingsSink for NoPersistence {
    fn save(&mut self, _settings: &IdleSettings) -> Result<(), SettingsError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::idle::{DateFormat, IdleLayout, TimeFormat};

    #[test]
    fn test_encoded_record_fits() {
        let settings = IdleSettings {
            layout: IdleLayout::PhoneControlsTop,
            invert: true,
            show_seconds: true,
            time_format: TimeFormat::Hour24,
            date_format: DateFormat::DayFirst,
        };
        let mut buffer = [0u8; MAX_SETTINGS_SIZE];
        let bytes = encode_settings(&settings, &mut buffer).unwrap();
        assert!(bytes.len() <= MAX_SETTINGS_SIZE);
        assert_eq!(decode_settings(bytes), Ok(settings));
    }

    #[test]
    fn test_wrong_magic_rejected() {
        let mut record = StoredSettings::new(IdleSettings::default());
        record.magic = 0xDEADBEEF;
        let mut buffer = [0u8; MAX_SETTINGS_SIZE];
        let bytes = postcard::to_slice(&record, &mut buffer).unwrap();
        assert_eq!(decode_settings(bytes), Err(SettingsError::InvalidFormat));
    }

    #[test]
    fn test_truncated_record_rejected() {
        let mut buffer = [0u8; MAX_SETTINGS_SIZE];
        let len = encode_settings(&IdleSettings::default(), &mut buffer)
            .unwrap()
            .len();
        assert_eq!(
            decode_settings(&buffer[..len - 1]),
            Err(SettingsError::Deserialize)
        );
    }

    #[test]
    fn test_small_buffer_fails_to_encode() {
        let mut buffer = [0u8; 2];
        assert_eq!(
            encode_settings(&IdleSettings::default(), &mut buffer).map(|b| b.len()),
            Err(SettingsError::Serialize)
        );
    }

    #[test]
    fn test_no_persistence_accepts_everything() {
        assert_eq!(NoPersistence.save(&IdleSettings::default()), Ok(()));
    }
}
