//! Gnomon Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the watch firmware is written
//! against, so the board-specific parts stay in one place.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (gnomon-firmware)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  gnomon-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  gnomon-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`lcd::LcdPanel`] - Memory LCD row transfer
//! - [`storage::SettingsStorage`] - Persistent key-value storage

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod lcd;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use lcd::{LcdPanel, Vcom};
pub use storage::{SettingsStorage, StorageError, StorageKey};
