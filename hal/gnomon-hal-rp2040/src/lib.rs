//! RP2040-specific HAL for the watch firmware
//!
//! Implementations of the shared `gnomon-hal` traits:
//!
//! - Settings storage on flash (implements `gnomon_hal::SettingsStorage`)
//! - Sharp memory LCD driver (implements `gnomon_hal::LcdPanel`)

#![no_std]

pub mod flash;
pub mod lcd;

// Re-export shared traits from gnomon-hal for convenience
pub use gnomon_hal::{LcdPanel, SettingsStorage, StorageKey};
