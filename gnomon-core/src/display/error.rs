//! Display task errors

use crate::router::SendFailure;
use crate::timer::TimerError;

/// Why a frame hand-off to the LCD stage did not happen
///
/// In every case the display task keeps the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandoffError {
    /// No free message slot
    PoolExhausted,
    /// LCD stage has no queue
    NoRoute,
    /// LCD queue is full
    QueueFull,
    /// Row count is zero or larger than the panel
    InvalidRowCount(u8),
    /// The frame is already with the LCD stage
    FrameInFlight,
}

impl From<SendFailure> for HandoffError {
    fn from(failure: SendFailure) -> Self {
        match failure {
            SendFailure::PoolExhausted => HandoffError::PoolExhausted,
            SendFailure::NoRoute(_) => HandoffError::NoRoute,
            SendFailure::QueueFull(_) => HandoffError::QueueFull,
        }
    }
}

/// Display task startup failure
///
/// Startup does not continue past any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupError {
    /// The display task's own queue was never registered
    QueueMissing,
    /// Splash screen could not be sent to the LCD stage
    Splash(HandoffError),
    /// Timer allocation or setup failed
    Timer(TimerError),
}

impl From<TimerError> for StartupError {
    fn from(e: TimerError) -> Self {
        StartupError::Timer(e)
    }
}
