//! Message type codes
//!
//! Codes are grouped by the task that consumes them:
//! - Display task: idle refresh, splash timeout, connection changes,
//!   idle settings requests and timer shutdown
//! - LCD output stage: frame buffer hand-off

// Message type IDs: consumed by the display task
pub const MSG_IDLE_UPDATE: u8 = 0x60;
pub const MSG_SPLASH_TIMEOUT: u8 = 0x61;
pub const MSG_CONNECTION_STATE_CHANGE: u8 = 0x63;
pub const MSG_TOGGLE_IDLE_INVERT: u8 = 0x64;
pub const MSG_TOGGLE_IDLE_LAYOUT: u8 = 0x65;
pub const MSG_SAVE_IDLE_SETTINGS: u8 = 0x66;
pub const MSG_STOP_DISPLAY_TIMERS: u8 = 0x67;

// Message type IDs: consumed by the LCD output stage
pub const MSG_UPDATE_DISPLAY: u8 = 0x62;

/// Option byte for messages that carry no options
pub const NO_MSG_OPTIONS: u8 = 0x00;

/// Option bit on a connection change: the link is now up
pub const OPT_CONNECTED: u8 = 0x01;

/// Known message types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageType {
    /// Redraw the idle page
    IdleUpdate,
    /// Splash screen has been shown long enough
    SplashTimeout,
    /// Frame buffer rows are ready for the panel
    UpdateDisplay,
    /// Bluetooth link came up or went down
    ConnectionStateChange,
    /// Flip the idle page colour inversion
    ToggleIdleInvert,
    /// Swap the idle page regions
    ToggleIdleLayout,
    /// Persist the idle settings
    SaveIdleSettings,
    /// Stop every display timer
    StopDisplayTimers,
}

impl MessageType {
    /// Parse a message type from its header code
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            MSG_IDLE_UPDATE => Some(MessageType::IdleUpdate),
            MSG_SPLASH_TIMEOUT => Some(MessageType::SplashTimeout),
            MSG_UPDATE_DISPLAY => Some(MessageType::UpdateDisplay),
            MSG_CONNECTION_STATE_CHANGE => Some(MessageType::ConnectionStateChange),
            MSG_TOGGLE_IDLE_INVERT => Some(MessageType::ToggleIdleInvert),
            MSG_TOGGLE_IDLE_LAYOUT => Some(MessageType::ToggleIdleLayout),
            MSG_SAVE_IDLE_SETTINGS => Some(MessageType::SaveIdleSettings),
            MSG_STOP_DISPLAY_TIMERS => Some(MessageType::StopDisplayTimers),
            _ => None,
        }
    }

    /// Convert to the header code
    pub fn to_byte(self) -> u8 {
        match self {
            MessageType::IdleUpdate => MSG_IDLE_UPDATE,
            MessageType::SplashTimeout => MSG_SPLASH_TIMEOUT,
            MessageType::UpdateDisplay => MSG_UPDATE_DISPLAY,
            MessageType::ConnectionStateChange => MSG_CONNECTION_STATE_CHANGE,
            MessageType::ToggleIdleInvert => MSG_TOGGLE_IDLE_INVERT,
            MessageType::ToggleIdleLayout => MSG_TOGGLE_IDLE_LAYOUT,
            MessageType::SaveIdleSettings => MSG_SAVE_IDLE_SETTINGS,
            MessageType::StopDisplayTimers => MSG_STOP_DISPLAY_TIMERS,
        }
    }

    /// Returns true if this message is handled by the LCD output stage
    pub fn is_lcd_bound(&self) -> bool {
        matches!(self, MessageType::UpdateDisplay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(MessageType::from_byte(0x60), Some(MessageType::IdleUpdate));
        assert_eq!(MessageType::from_byte(0x61), Some(MessageType::SplashTimeout));
        assert_eq!(MessageType::from_byte(0x62), Some(MessageType::UpdateDisplay));
        assert_eq!(
            MessageType::from_byte(0x63),
            Some(MessageType::ConnectionStateChange)
        );
        assert_eq!(MessageType::from_byte(0x64), Some(MessageType::ToggleIdleInvert));
        assert_eq!(MessageType::from_byte(0x67), Some(MessageType::StopDisplayTimers));
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(MessageType::from_byte(0x00), None);
        assert_eq!(MessageType::from_byte(0xFF), None);
    }

    #[test]
    fn test_only_update_display_goes_to_lcd() {
        assert!(MessageType::UpdateDisplay.is_lcd_bound());
        assert!(!MessageType::IdleUpdate.is_lcd_bound());
        assert!(!MessageType::SplashTimeout.is_lcd_bound());
        assert!(!MessageType::ConnectionStateChange.is_lcd_bound());
        assert!(!MessageType::SaveIdleSettings.is_lcd_bound());
    }

    proptest! {
        #[test]
        fn parsed_codes_map_back_to_themselves(byte in any::<u8>()) {
            if let Some(msg_type) = MessageType::from_byte(byte) {
                prop_assert_eq!(msg_type.to_byte(), byte);
            }
        }
    }
}
