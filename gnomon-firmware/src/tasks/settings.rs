//! Settings persistence task
//!
//! Writes idle settings to flash when the display task asks for it.

use defmt::*;

use gnomon_hal_rp2040::flash::Rp2040SettingsStorage;

use crate::channels::SETTINGS_SAVE;
use crate::config::save_idle_settings;

/// Settings task - owns the flash storage after boot
#[embassy_executor::task]
pub async fn settings_task(mut storage: Rp2040SettingsStorage<'static>) {
    info!("Settings task started");

    loop {
        let settings = SETTINGS_SAVE.wait().await;
        if let Err(e) = save_idle_settings(&mut storage, &settings).await {
            warn!("Failed to save idle settings: {:?}", e);
        }
    }
}
