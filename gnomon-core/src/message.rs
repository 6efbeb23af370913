//! Typed inter-task messages
//!
//! A message is one case per kind, each carrying only its own payload.
//! Header codes from `gnomon-protocol` are only used at the edges where a
//! message is built from a bare code (timer expiry).

use gnomon_protocol::messages::{OPT_CONNECTED, MSG_UPDATE_DISPLAY};
use gnomon_protocol::{MessageType, LCD_ROWS, NO_MSG_OPTIONS};

use crate::frame::FrameLease;
use crate::router::QueueIndex;

/// Payload of a frame buffer hand-off
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayUpdate {
    /// Number of rows, starting at row 0, to transfer
    pub rows: u8,
    /// The frame buffer itself; the receiver owns it until it docks it
    pub frame: FrameLease,
}

impl DisplayUpdate {
    /// Rows to transfer, clamped to the panel height
    pub fn row_count(&self) -> usize {
        (self.rows as usize).min(LCD_ROWS)
    }
}

/// A message as stored in the pool
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    /// Redraw the idle page
    IdleUpdate,
    /// Splash screen timer expired
    SplashTimeout,
    /// Bluetooth link state changed
    ConnectionStateChange { connected: bool },
    /// Flip the idle page colour inversion
    ToggleIdleInvert,
    /// Swap the watch and phone regions of the idle page
    ToggleIdleLayout,
    /// Persist the current idle settings
    SaveIdleSettings,
    /// Stop the idle, application and notification timers
    StopDisplayTimers,
    /// Frame buffer hand-off to the LCD output stage
    UpdateDisplay(DisplayUpdate),
    /// Any code this firmware has no typed payload for
    Other { msg_type: u8, options: u8 },
}

impl Message {
    /// Build a message from a header code and option byte
    ///
    /// `UpdateDisplay` cannot be built this way since it has to carry the
    /// frame; its code comes back as [`Message::Other`].
    pub fn from_code(msg_type: u8, options: u8) -> Self {
        match MessageType::from_byte(msg_type) {
            Some(MessageType::IdleUpdate) => Message::IdleUpdate,
            Some(MessageType::SplashTimeout) => Message::SplashTimeout,
            Some(MessageType::ConnectionStateChange) => Message::ConnectionStateChange {
                connected: options & OPT_CONNECTED != 0,
            },
            Some(MessageType::ToggleIdleInvert) => Message::ToggleIdleInvert,
            Some(MessageType::ToggleIdleLayout) => Message::ToggleIdleLayout,
            Some(MessageType::SaveIdleSettings) => Message::SaveIdleSettings,
            Some(MessageType::StopDisplayTimers) => Message::StopDisplayTimers,
            Some(MessageType::UpdateDisplay) | None => Message::Other { msg_type, options },
        }
    }

    /// Header code of this message
    pub fn msg_type(&self) -> u8 {
        match self {
            Message::IdleUpdate => MessageType::IdleUpdate.to_byte(),
            Message::SplashTimeout => MessageType::SplashTimeout.to_byte(),
            Message::ConnectionStateChange { .. } => {
                MessageType::ConnectionStateChange.to_byte()
            }
            Message::ToggleIdleInvert => MessageType::ToggleIdleInvert.to_byte(),
            Message::ToggleIdleLayout => MessageType::ToggleIdleLayout.to_byte(),
            Message::SaveIdleSettings => MessageType::SaveIdleSettings.to_byte(),
            Message::StopDisplayTimers => MessageType::StopDisplayTimers.to_byte(),
            Message::UpdateDisplay(_) => MSG_UPDATE_DISPLAY,
            Message::Other { msg_type, .. } => *msg_type,
        }
    }

    /// Option byte of this message
    pub fn options(&self) -> u8 {
        match self {
            Message::ConnectionStateChange { connected: true } => OPT_CONNECTED,
            Message::Other { options, .. } => *options,
            _ => NO_MSG_OPTIONS,
        }
    }

    /// Queue this message is routed to
    pub fn destination(&self) -> QueueIndex {
        match self {
            Message::UpdateDisplay(_) => QueueIndex::Lcd,
            _ => QueueIndex::Display,
        }
    }

    /// Take the frame back out of a hand-off message
    pub fn into_frame(self) -> Option<FrameLease> {
        match self {
            Message::UpdateDisplay(update) => Some(update.frame),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gnomon_protocol::messages::{
        MSG_CONNECTION_STATE_CHANGE, MSG_IDLE_UPDATE, MSG_SAVE_IDLE_SETTINGS, MSG_SPLASH_TIMEOUT,
        MSG_STOP_DISPLAY_TIMERS, MSG_TOGGLE_IDLE_INVERT, MSG_TOGGLE_IDLE_LAYOUT,
    };

    #[test]
    fn test_from_code_known_types() {
        assert!(matches!(
            Message::from_code(MSG_IDLE_UPDATE, NO_MSG_OPTIONS),
            Message::IdleUpdate
        ));
        assert!(matches!(
            Message::from_code(MSG_SPLASH_TIMEOUT, NO_MSG_OPTIONS),
            Message::SplashTimeout
        ));
        assert!(matches!(
            Message::from_code(MSG_CONNECTION_STATE_CHANGE, OPT_CONNECTED),
            Message::ConnectionStateChange { connected: true }
        ));
        assert!(matches!(
            Message::from_code(MSG_CONNECTION_STATE_CHANGE, NO_MSG_OPTIONS),
            Message::ConnectionStateChange { connected: false }
        ));
    }

    #[test]
    fn test_settings_requests_round_trip_codes() {
        for code in [
            MSG_TOGGLE_IDLE_INVERT,
            MSG_TOGGLE_IDLE_LAYOUT,
            MSG_SAVE_IDLE_SETTINGS,
            MSG_STOP_DISPLAY_TIMERS,
        ] {
            let msg = Message::from_code(code, NO_MSG_OPTIONS);
            assert!(!matches!(msg, Message::Other { .. }));
            assert_eq!(msg.msg_type(), code);
            assert_eq!(msg.destination(), QueueIndex::Display);
        }
    }

    #[test]
    fn test_update_display_code_without_frame_is_other() {
        let msg = Message::from_code(MSG_UPDATE_DISPLAY, 0x05);
        assert!(matches!(
            msg,
            Message::Other {
                msg_type: MSG_UPDATE_DISPLAY,
                options: 0x05
            }
        ));
        assert_eq!(msg.destination(), QueueIndex::Display);
    }

    #[test]
    fn test_unknown_code_keeps_header() {
        let msg = Message::from_code(0xEE, 0x42);
        assert_eq!(msg.msg_type(), 0xEE);
        assert_eq!(msg.options(), 0x42);
        assert!(msg.into_frame().is_none());
    }

    #[test]
    fn test_connection_change_options() {
        let up = Message::ConnectionStateChange { connected: true };
        let down = Message::ConnectionStateChange { connected: false };
        assert_eq!(up.options(), OPT_CONNECTED);
        assert_eq!(down.options(), NO_MSG_OPTIONS);
        assert_eq!(up.msg_type(), MSG_CONNECTION_STATE_CHANGE);
    }

    #[test]
    fn test_display_bound_messages() {
        assert_eq!(Message::IdleUpdate.destination(), QueueIndex::Display);
        assert_eq!(Message::SplashTimeout.destination(), QueueIndex::Display);
    }
}
