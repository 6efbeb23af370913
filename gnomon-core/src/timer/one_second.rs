//! Tick-driven timer implementation

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use super::{Repeat, TimerError, TimerId, TimerService, TimerSetup, TimerState};
use crate::message::Message;
use crate::router::Mailbox;

/// A timer that ran out during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerExpiry {
    /// Timer that expired
    pub id: TimerId,
    /// Message type code to post
    pub msg_type: u8,
    /// Option byte to post
    pub options: u8,
}

impl TimerExpiry {
    /// The message this expiry posts
    pub fn message(&self) -> Message {
        Message::from_code(self.msg_type, self.options)
    }
}

/// Expiries posted by [`TimerBank::tick_and_post`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Expiries that reached their queue
    pub posted: usize,
    /// Expiries kept for the next tick
    pub deferred: usize,
}

#[derive(Debug, Clone, Copy)]
struct TimerSlot {
    state: TimerState,
    setup: Option<TimerSetup>,
    /// Expiry that fired but was never posted
    undelivered: Option<TimerExpiry>,
}

impl TimerSlot {
    const FREE: Self = Self {
        state: TimerState::Free,
        setup: None,
        undelivered: None,
    };

    /// Count down by `elapsed_s`, returning the expiry if the timer ran out
    fn countdown(&mut self, index: usize, elapsed_s: u16) -> Option<TimerExpiry> {
        let TimerState::Armed { remaining_s } = self.state else {
            return None;
        };
        let setup = self.setup?;

        if remaining_s > elapsed_s {
            self.state = TimerState::Armed {
                remaining_s: remaining_s - elapsed_s,
            };
            return None;
        }

        self.state = match setup.repeat {
            Repeat::Once => TimerState::Fired,
            Repeat::Forever => TimerState::Armed {
                remaining_s: setup.period_s,
            },
        };
        Some(TimerExpiry {
            id: TimerId(index as u8),
            msg_type: setup.msg_type,
            options: setup.options,
        })
    }
}

/// Fixed set of second-resolution timers advanced by [`tick`](Self::tick)
#[derive(Debug, Clone)]
pub struct OneSecondTimers<const N: usize> {
    slots: [TimerSlot; N],
}

impl<const N: usize> Default for OneSecondTimers<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> OneSecondTimers<N> {
    /// Create a set with every timer free
    pub const fn new() -> Self {
        Self {
            slots: [TimerSlot::FREE; N],
        }
    }

    /// Advance every armed timer by `elapsed_s` seconds
    ///
    /// Returns the timers that reached zero, plus any expiry handed back
    /// with [`redeliver`](Self::redeliver) since the last tick. One-shot
    /// timers move to [`TimerState::Fired`]; repeating timers restart their
    /// period. Each timer yields at most one expiry per tick; a fresh expiry
    /// that differs from a redelivered one waits for the next tick.
    pub fn tick(&mut self, elapsed_s: u16) -> Vec<TimerExpiry, N> {
        let mut expired = Vec::new();
        if elapsed_s == 0 {
            return expired;
        }

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let fresh = slot.countdown(index, elapsed_s);
            let due = match (slot.undelivered.take(), fresh) {
                (Some(pending), Some(fresh)) if pending != fresh => {
                    slot.undelivered = Some(fresh);
                    Some(pending)
                }
                (Some(pending), _) => Some(pending),
                (None, fresh) => fresh,
            };
            if let Some(expiry) = due {
                // Capacity is N and there is at most one expiry per slot
                let _ = expired.push(expiry);
            }
        }

        expired
    }

    /// Hand back an expiry that could not be posted
    ///
    /// It is returned again by the next [`tick`](Self::tick) unless the
    /// timer is stopped or reconfigured first.
    pub fn redeliver(&mut self, expiry: TimerExpiry) -> Result<(), TimerError> {
        let slot = self.slot_mut(expiry.id)?;
        slot.undelivered = Some(expiry);
        Ok(())
    }

    /// Number of timers currently counting
    pub fn armed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.state.is_armed()).count()
    }

    fn slot_mut(&mut self, id: TimerId) -> Result<&mut TimerSlot, TimerError> {
        match self.slots.get_mut(id.0 as usize) {
            Some(slot) if slot.state != TimerState::Free => Ok(slot),
            _ => Err(TimerError::InvalidId),
        }
    }
}

impl<const N: usize> TimerService for OneSecondTimers<N> {
    fn allocate(&mut self) -> Result<TimerId, TimerError> {
        let index = self
            .slots
            .iter()
            .position(|s| s.state == TimerState::Free)
            .ok_or(TimerError::Exhausted)?;
        self.slots[index].state = TimerState::Unconfigured;
        Ok(TimerId(index as u8))
    }

    fn configure(&mut self, id: TimerId, setup: TimerSetup) -> Result<(), TimerError> {
        let slot = self.slot_mut(id)?;
        slot.setup = Some(TimerSetup {
            period_s: setup.period_s.max(1),
            ..setup
        });
        slot.state = TimerState::Disarmed;
        slot.undelivered = None;
        Ok(())
    }

    fn start(&mut self, id: TimerId) -> Result<(), TimerError> {
        let slot = self.slot_mut(id)?;
        let setup = slot.setup.ok_or(TimerError::NotConfigured)?;
        slot.state = TimerState::Armed {
            remaining_s: setup.period_s,
        };
        Ok(())
    }

    fn stop(&mut self, id: TimerId) -> Result<(), TimerError> {
        let slot = self.slot_mut(id)?;
        if slot.state.is_armed() {
            slot.state = TimerState::Disarmed;
        }
        slot.undelivered = None;
        Ok(())
    }

    fn state(&self, id: TimerId) -> Result<TimerState, TimerError> {
        self.slots
            .get(id.0 as usize)
            .map(|s| s.state)
            .ok_or(TimerError::InvalidId)
    }
}

/// [`OneSecondTimers`] shared between the tick task and the timer users
pub struct TimerBank<const N: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<OneSecondTimers<N>>>,
}

impl<const N: usize> Default for TimerBank<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TimerBank<N> {
    /// Create a bank with every timer free
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(OneSecondTimers::new())),
        }
    }

    /// Advance all timers; see [`OneSecondTimers::tick`]
    pub fn tick(&self, elapsed_s: u16) -> Vec<TimerExpiry, N> {
        self.with(|timers| timers.tick(elapsed_s))
    }

    /// Hand back an expiry that could not be posted; see
    /// [`OneSecondTimers::redeliver`]
    pub fn redeliver(&self, expiry: TimerExpiry) -> Result<(), TimerError> {
        self.with(|timers| timers.redeliver(expiry))
    }

    /// Advance all timers and post each expiry through `mailbox`
    ///
    /// An expiry whose message cannot be delivered (pool exhausted or
    /// queue full) stays with its timer and is posted on the next tick.
    pub fn tick_and_post<const P: usize, const Q: usize>(
        &self,
        elapsed_s: u16,
        mailbox: Mailbox<'_, P, Q>,
    ) -> TickReport {
        let mut report = TickReport::default();
        for expiry in self.tick(elapsed_s) {
            match mailbox.send(expiry.message()) {
                Ok(()) => report.posted += 1,
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!(
                        "Timer {} expiry (type {:#x}) not posted: {:?}, retrying",
                        expiry.id.index(),
                        expiry.msg_type,
                        _e.reason
                    );
                    // The id came out of this bank a moment ago
                    let _ = self.redeliver(expiry);
                    report.deferred += 1;
                }
            }
        }
        report
    }

    fn with<R>(&self, f: impl FnOnce(&mut OneSecondTimers<N>) -> R) -> R {
        self.inner.lock(|timers| f(&mut timers.borrow_mut()))
    }
}

impl<const N: usize> TimerService for &TimerBank<N> {
    fn allocate(&mut self) -> Result<TimerId, TimerError> {
        self.with(|t| t.allocate())
    }

    fn configure(&mut self, id: TimerId, setup: TimerSetup) -> Result<(), TimerError> {
        self.with(|t| t.configure(id, setup))
    }

    fn start(&mut self, id: TimerId) -> Result<(), TimerError> {
        self.with(|t| t.start(id))
    }

    fn stop(&mut self, id: TimerId) -> Result<(), TimerError> {
        self.with(|t| t.stop(id))
    }

    fn state(&self, id: TimerId) -> Result<TimerState, TimerError> {
        self.with(|t| t.state(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SPLASH: TimerSetup = TimerSetup {
        period_s: 3,
        repeat: Repeat::Once,
        msg_type: 0x61,
        options: 0,
    };

    #[test]
    fn test_allocate_until_exhausted() {
        let mut timers: OneSecondTimers<2> = OneSecondTimers::new();
        let a = timers.allocate().unwrap();
        let b = timers.allocate().unwrap();
        assert_ne!(a, b);
        assert_eq!(timers.allocate(), Err(TimerError::Exhausted));
        assert_eq!(timers.state(a), Ok(TimerState::Unconfigured));
    }

    #[test]
    fn test_start_requires_configure() {
        let mut timers: OneSecondTimers<1> = OneSecondTimers::new();
        let id = timers.allocate().unwrap();
        assert_eq!(timers.start(id), Err(TimerError::NotConfigured));

        timers.configure(id, SPLASH).unwrap();
        assert_eq!(timers.state(id), Ok(TimerState::Disarmed));
        timers.start(id).unwrap();
        assert_eq!(timers.state(id), Ok(TimerState::Armed { remaining_s: 3 }));
    }

    #[test]
    fn test_one_shot_fires_once_after_period() {
        let mut timers: OneSecondTimers<1> = OneSecondTimers::new();
        let id = timers.allocate().unwrap();
        timers.configure(id, SPLASH).unwrap();
        timers.start(id).unwrap();

        assert!(timers.tick(1).is_empty());
        assert!(timers.tick(1).is_empty());
        let fired = timers.tick(1);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, id);
        assert_eq!(fired[0].msg_type, 0x61);
        assert_eq!(timers.state(id), Ok(TimerState::Fired));

        for _ in 0..10 {
            assert!(timers.tick(1).is_empty());
        }
    }

    #[test]
    fn test_repeating_timer_rearms() {
        let mut timers: OneSecondTimers<1> = OneSecondTimers::new();
        let id = timers.allocate().unwrap();
        timers
            .configure(
                id,
                TimerSetup {
                    period_s: 2,
                    repeat: Repeat::Forever,
                    msg_type: 0x60,
                    options: 0,
                },
            )
            .unwrap();
        timers.start(id).unwrap();

        let fired: usize = (0..6).map(|_| timers.tick(1).len()).sum();
        assert_eq!(fired, 3);
        assert!(timers.state(id).unwrap().is_armed());
    }

    #[test]
    fn test_stop_disarms_and_is_idempotent() {
        let mut timers: OneSecondTimers<1> = OneSecondTimers::new();
        let id = timers.allocate().unwrap();
        timers.configure(id, SPLASH).unwrap();
        timers.start(id).unwrap();

        timers.stop(id).unwrap();
        assert_eq!(timers.state(id), Ok(TimerState::Disarmed));
        timers.stop(id).unwrap();
        assert_eq!(timers.state(id), Ok(TimerState::Disarmed));
        assert!(timers.tick(5).is_empty());
    }

    #[test]
    fn test_stop_keeps_fired_state() {
        let mut timers: OneSecondTimers<1> = OneSecondTimers::new();
        let id = timers.allocate().unwrap();
        timers.configure(id, SPLASH).unwrap();
        timers.start(id).unwrap();
        timers.tick(3);

        timers.stop(id).unwrap();
        assert_eq!(timers.state(id), Ok(TimerState::Fired));
    }

    #[test]
    fn test_reconfigure_after_fire() {
        let mut timers: OneSecondTimers<1> = OneSecondTimers::new();
        let id = timers.allocate().unwrap();
        timers.configure(id, SPLASH).unwrap();
        timers.start(id).unwrap();
        timers.tick(3);

        timers
            .configure(
                id,
                TimerSetup {
                    period_s: 0,
                    repeat: Repeat::Forever,
                    msg_type: 0x60,
                    options: 0,
                },
            )
            .unwrap();
        timers.start(id).unwrap();
        // Zero period is raised to one second
        let fired = timers.tick(1);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].msg_type, 0x60);
    }

    #[test]
    fn test_unallocated_id_is_invalid() {
        let mut timers: OneSecondTimers<2> = OneSecondTimers::new();
        assert_eq!(timers.stop(TimerId(1)), Err(TimerError::InvalidId));
        assert_eq!(timers.start(TimerId(9)), Err(TimerError::InvalidId));
        assert_eq!(timers.state(TimerId(9)), Err(TimerError::InvalidId));
    }

    #[test]
    fn test_bank_shares_state() {
        let bank: TimerBank<2> = TimerBank::new();
        let mut service = &bank;
        let id = service.allocate().unwrap();
        service.configure(id, SPLASH).unwrap();
        service.start(id).unwrap();

        assert!(bank.tick(2).is_empty());
        assert_eq!(bank.tick(1).len(), 1);
        assert_eq!(service.state(id), Ok(TimerState::Fired));
    }

    #[test]
    fn test_redelivered_one_shot_fires_on_next_tick() {
        let mut timers: OneSecondTimers<1> = OneSecondTimers::new();
        let id = timers.allocate().unwrap();
        timers.configure(id, SPLASH).unwrap();
        timers.start(id).unwrap();

        let fired = timers.tick(3);
        assert_eq!(fired.len(), 1);
        timers.redeliver(fired[0]).unwrap();

        assert_eq!(timers.tick(1).as_slice(), fired.as_slice());
        assert!(timers.tick(1).is_empty());
        assert_eq!(timers.state(id), Ok(TimerState::Fired));
    }

    #[test]
    fn test_stop_drops_redelivery() {
        let mut timers: OneSecondTimers<1> = OneSecondTimers::new();
        let id = timers.allocate().unwrap();
        timers.configure(id, SPLASH).unwrap();
        timers.start(id).unwrap();

        let fired = timers.tick(3);
        timers.redeliver(fired[0]).unwrap();
        timers.stop(id).unwrap();
        assert!(timers.tick(1).is_empty());
    }

    #[test]
    fn test_redelivery_coalesces_with_repeat() {
        let mut timers: OneSecondTimers<1> = OneSecondTimers::new();
        let id = timers.allocate().unwrap();
        let setup = TimerSetup {
            period_s: 1,
            repeat: Repeat::Forever,
            msg_type: 0x60,
            options: 0,
        };
        timers.configure(id, setup).unwrap();
        timers.start(id).unwrap();

        let fired = timers.tick(1);
        timers.redeliver(fired[0]).unwrap();
        // Same expiry again this tick: posted once
        assert_eq!(timers.tick(1).len(), 1);
        assert_eq!(timers.tick(1).len(), 1);
    }

    #[test]
    fn test_bank_defers_unposted_expiry() {
        use crate::router::{MessageQueue, QueueIndex, Router};
        use embassy_sync::channel::Channel;

        let bank: TimerBank<1> = TimerBank::new();
        let mut service = &bank;
        let id = service.allocate().unwrap();
        service.configure(id, SPLASH).unwrap();
        service.start(id).unwrap();

        let pool: crate::pool::MessagePool<4> = crate::pool::MessagePool::new();
        let display: MessageQueue<1> = Channel::new();
        let mut router = Router::new();
        router.register(QueueIndex::Display, &display);
        let mailbox = Mailbox::new(&pool, &router);

        // Queue already full when the timer runs out
        mailbox.send(Message::IdleUpdate).unwrap();
        bank.tick_and_post(2, mailbox);
        assert_eq!(
            bank.tick_and_post(1, mailbox),
            TickReport {
                posted: 0,
                deferred: 1
            }
        );

        let handle = display.try_receive().unwrap();
        pool.release(handle);
        assert_eq!(
            bank.tick_and_post(1, mailbox),
            TickReport {
                posted: 1,
                deferred: 0
            }
        );
        let handle = display.try_receive().unwrap();
        assert!(matches!(pool.take(&handle), Some(Message::SplashTimeout)));
        pool.release(handle);
        assert_eq!(bank.tick_and_post(5, mailbox), TickReport::default());
    }

    proptest! {
        #[test]
        fn stopped_timers_never_fire(period in 1u16..20, ticks in 0usize..50) {
            let mut timers: OneSecondTimers<1> = OneSecondTimers::new();
            let id = timers.allocate().unwrap();
            timers.configure(id, TimerSetup { period_s: period, ..SPLASH }).unwrap();
            timers.start(id).unwrap();
            timers.stop(id).unwrap();

            for _ in 0..ticks {
                prop_assert!(timers.tick(1).is_empty());
            }
            prop_assert_eq!(timers.state(id), Ok(TimerState::Disarmed));
        }
    }
}
