//! One-second timer service
//!
//! Timers count whole seconds and, on expiry, produce the message header
//! (type code and options) they were configured with. The owner of the
//! tick turns expiries into messages and posts them.

pub mod one_second;

pub use one_second::{OneSecondTimers, TickReport, TimerBank, TimerExpiry};

/// Number of one-second timers on the watch
pub const MAX_TIMERS: usize = 8;

/// Identifier of an allocated timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerId(pub(crate) u8);

impl TimerId {
    /// Slot index of this timer
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Whether a timer rearms itself after firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Repeat {
    /// Fire once, then stay disarmed
    Once,
    /// Fire every period until stopped
    Forever,
}

/// Scheduling parameters of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerSetup {
    /// Period in seconds (minimum 1)
    pub period_s: u16,
    /// One-shot or repeating
    pub repeat: Repeat,
    /// Message type code emitted on expiry
    pub msg_type: u8,
    /// Option byte emitted on expiry
    pub options: u8,
}

/// Scheduling state of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerState {
    /// Not allocated
    Free,
    /// Allocated, never configured
    Unconfigured,
    /// Configured but not counting
    Disarmed,
    /// Counting down
    Armed { remaining_s: u16 },
    /// One-shot timer that has expired
    Fired,
}

impl TimerState {
    /// Check if the timer is counting
    pub fn is_armed(&self) -> bool {
        matches!(self, TimerState::Armed { .. })
    }
}

/// Timer service errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// Every timer slot is allocated
    Exhausted,
    /// Timer id does not refer to an allocated timer
    InvalidId,
    /// Timer was started before being configured
    NotConfigured,
}

/// Timer service contract consumed by the display task
pub trait TimerService {
    /// Allocate a timer
    fn allocate(&mut self) -> Result<TimerId, TimerError>;

    /// Set period, repeat mode and expiry message; leaves the timer disarmed
    fn configure(&mut self, id: TimerId, setup: TimerSetup) -> Result<(), TimerError>;

    /// Arm a configured timer, restarting its countdown
    fn start(&mut self, id: TimerId) -> Result<(), TimerError>;

    /// Disarm a timer; has no effect on a timer that is not armed
    fn stop(&mut self, id: TimerId) -> Result<(), TimerError>;

    /// Current state of a timer
    fn state(&self, id: TimerId) -> Result<TimerState, TimerError>;
}
