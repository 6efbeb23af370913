//! Timers owned by the display task

use gnomon_protocol::messages::MSG_SPLASH_TIMEOUT;
use gnomon_protocol::NO_MSG_OPTIONS;

use crate::timer::{Repeat, TimerError, TimerId, TimerService, TimerSetup};

/// The three one-second timers the display task allocates at startup
///
/// The idle timer first carries the splash timeout, then belongs to the
/// idle page. The application and notification timers are reserved for
/// those screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayTimers {
    pub idle: TimerId,
    pub application: TimerId,
    pub notification: TimerId,
}

impl DisplayTimers {
    /// Allocate idle, application and notification timers, in that order
    pub fn allocate<T: TimerService + ?Sized>(timers: &mut T) -> Result<Self, TimerError> {
        Ok(Self {
            idle: timers.allocate()?,
            application: timers.allocate()?,
            notification: timers.allocate()?,
        })
    }

    /// Arm the idle timer as the one-shot splash timeout
    pub fn start_splash_timeout<T: TimerService + ?Sized>(
        &self,
        timers: &mut T,
        period_s: u16,
    ) -> Result<(), TimerError> {
        timers.configure(
            self.idle,
            TimerSetup {
                period_s,
                repeat: Repeat::Once,
                msg_type: MSG_SPLASH_TIMEOUT,
                options: NO_MSG_OPTIONS,
            },
        )?;
        timers.start(self.idle)
    }

    /// Stop all three timers
    ///
    /// Every timer is stopped even if an earlier one fails; the first
    /// error is returned.
    pub fn stop_all<T: TimerService + ?Sized>(&self, timers: &mut T) -> Result<(), TimerError> {
        let mut result = Ok(());
        for id in self.all() {
            if let Err(e) = timers.stop(id) {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    /// All three ids
    pub fn all(&self) -> [TimerId; 3] {
        [self.idle, self.application, self.notification]
    }
}
