//! Idle settings persistence
//!
//! Loads and saves idle settings to flash storage. Saving is requested by
//! the display task through [`FlashSettings`] and carried out by the
//! settings task, so the display task never waits on flash.

use defmt::*;

use gnomon_core::config::{
    decode_settings, encode_settings, IdleSettings, SettingsError, SettingsSink, MAX_SETTINGS_SIZE,
};
use gnomon_hal_rp2040::flash::{Rp2040SettingsStorage, StorageError, StorageKey};
use gnomon_hal_rp2040::SettingsStorage;

use crate::channels::SETTINGS_SAVE;

/// Settings sink handed to the display task
///
/// Queues the settings for the settings task; a newer request replaces
/// one that has not been written yet.
pub struct FlashSettings;

impl SettingsSink for FlashSettings {
    fn save(&mut self, settings: &IdleSettings) -> Result<(), SettingsError> {
        SETTINGS_SAVE.signal(*settings);
        Ok(())
    }
}

/// Load idle settings from flash
///
/// Returns `None` if nothing is stored or the record is unusable.
pub async fn load_idle_settings(storage: &mut Rp2040SettingsStorage<'_>) -> Option<IdleSettings> {
    let mut buffer = [0u8; MAX_SETTINGS_SIZE];
    let len = match storage.read(StorageKey::IdleSettings, &mut buffer).await {
        Ok(len) => len,
        Err(StorageError::NotFound) => {
            debug!("No idle settings in flash, using defaults");
            return None;
        }
        Err(e) => {
            warn!("Failed to read idle settings: {:?}, using defaults", e);
            return None;
        }
    };

    match decode_settings(&buffer[..len]) {
        Ok(settings) => {
            info!("Loaded idle settings from flash ({} bytes)", len);
            Some(settings)
        }
        Err(e) => {
            warn!("Stored idle settings unusable: {:?}, using defaults", e);
            None
        }
    }
}

/// Save idle settings to flash
pub async fn save_idle_settings(
    storage: &mut Rp2040SettingsStorage<'_>,
    settings: &IdleSettings,
) -> Result<(), SettingsError> {
    let mut buffer = [0u8; MAX_SETTINGS_SIZE];
    let bytes = encode_settings(settings, &mut buffer)?;

    debug!("Saving {} bytes of idle settings to flash", bytes.len());

    storage
        .write(StorageKey::IdleSettings, bytes)
        .await
        .map_err(|_| SettingsError::Storage)?;

    info!("Saved idle settings to flash");
    Ok(())
}
