//! Settings storage abstractions
//!
//! Persistent key-value storage, implemented by chip-specific HALs on top
//! of their flash memory.

/// Storage keys for persisted data
///
/// The storage implementation handles wear levelling and data integrity;
/// values are opaque bytes to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Idle page settings (postcard)
    IdleSettings = 0,
    /// Reserved for the application screens
    Reserved1 = 1,
    /// Reserved for the notification screens
    Reserved2 = 2,
}

impl StorageKey {
    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::IdleSettings),
            1 => Some(StorageKey::Reserved1),
            2 => Some(StorageKey::Reserved2),
            _ => None,
        }
    }
}

/// Errors from settings storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Flash operation failed
    Flash,
    /// Storage layer failed
    Storage,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
}

/// Settings storage trait
///
/// Wear-levelled key-value storage for small settings records.
pub trait SettingsStorage {
    /// Read a value by key into `buffer`, returning the number of bytes read
    fn read(
        &mut self,
        key: StorageKey,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, StorageError>>;

    /// Write a value by key, replacing any previous value
    fn write(
        &mut self,
        key: StorageKey,
        data: &[u8],
    ) -> impl core::future::Future<Output = Result<(), StorageError>>;

    /// Erase every stored value
    fn erase_all(&mut self) -> impl core::future::Future<Output = Result<(), StorageError>>;
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        let Some(first) = buffer.first_mut() else {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        };
        *first = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        let Some(&first) = buffer.first() else {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        };
        match StorageKey::from_u8(first) {
            Some(key) => Ok((key, 1)),
            None => Err(sequential_storage::map::SerializationError::InvalidFormat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bytes() {
        for key in [
            StorageKey::IdleSettings,
            StorageKey::Reserved1,
            StorageKey::Reserved2,
        ] {
            assert_eq!(StorageKey::from_u8(key.as_u8()), Some(key));
        }
        assert_eq!(StorageKey::from_u8(3), None);
    }
}
