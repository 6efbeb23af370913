//! Queue routing between tasks
//!
//! Each consuming task owns one bounded FIFO of [`MessageHandle`]s. The
//! [`Router`] maps a [`QueueIndex`] to that queue, and the [`Mailbox`]
//! combines router and pool into the one call producers use to send.

pub mod mailbox;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::pool::MessageHandle;

pub use mailbox::{Mailbox, SendFailure, Undelivered};

/// Depth of each task queue
pub const QUEUE_DEPTH: usize = 8;

/// Bounded FIFO of message handles feeding one task
pub type MessageQueue<const Q: usize> = Channel<CriticalSectionRawMutex, MessageHandle, Q>;

/// Consuming tasks that own a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueueIndex {
    /// Display state machine
    Display,
    /// LCD output stage
    Lcd,
}

impl QueueIndex {
    /// Number of queues
    pub const COUNT: usize = 2;

    fn slot(self) -> usize {
        match self {
            QueueIndex::Display => 0,
            QueueIndex::Lcd => 1,
        }
    }
}

/// Table of task queues
///
/// A queue that was never registered reads back as `None`; tasks check for
/// their own queue at startup.
pub struct Router<'q, const Q: usize> {
    queues: [Option<&'q MessageQueue<Q>>; QueueIndex::COUNT],
}

impl<'q, const Q: usize> Default for Router<'q, Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'q, const Q: usize> Router<'q, Q> {
    /// Create a router with no queues registered
    pub const fn new() -> Self {
        Self {
            queues: [None; QueueIndex::COUNT],
        }
    }

    /// Register the queue for a task
    pub fn register(&mut self, index: QueueIndex, queue: &'q MessageQueue<Q>) {
        self.queues[index.slot()] = Some(queue);
    }

    /// Look up the queue for a task
    pub fn queue(&self, index: QueueIndex) -> Option<&'q MessageQueue<Q>> {
        self.queues[index.slot()]
    }
}
