//! Allocate-on-send
//!
//! [`Mailbox::send`] stores a message in the pool and queues its handle for
//! the destination task in one step. If either step fails, nothing stays
//! allocated and the message is handed back to the caller.

use embassy_sync::channel::TrySendError;

use crate::message::Message;
use crate::pool::MessagePool;

use super::{QueueIndex, Router};

/// Why a message was not delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendFailure {
    /// No free pool slot
    PoolExhausted,
    /// Destination task has no registered queue
    NoRoute(QueueIndex),
    /// Destination queue is full
    QueueFull(QueueIndex),
}

/// A message that could not be delivered, returned to its sender
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Undelivered {
    /// What went wrong
    pub reason: SendFailure,
    /// The message, untouched
    pub message: Message,
}

/// Pool plus router: the sending side of every queue
pub struct Mailbox<'a, const N: usize, const Q: usize> {
    pool: &'a MessagePool<N>,
    router: &'a Router<'a, Q>,
}

impl<'a, const N: usize, const Q: usize> Clone for Mailbox<'a, N, Q> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, const N: usize, const Q: usize> Copy for Mailbox<'a, N, Q> {}

impl<'a, const N: usize, const Q: usize> Mailbox<'a, N, Q> {
    /// Bundle a pool and a router
    pub const fn new(pool: &'a MessagePool<N>, router: &'a Router<'a, Q>) -> Self {
        Self { pool, router }
    }

    /// The shared message pool
    pub fn pool(&self) -> &'a MessagePool<N> {
        self.pool
    }

    /// The queue table
    pub fn router(&self) -> &'a Router<'a, Q> {
        self.router
    }

    /// Allocate a slot for `message` and queue it for its destination
    pub fn send(&self, message: Message) -> Result<(), Undelivered> {
        let destination = message.destination();
        let Some(queue) = self.router.queue(destination) else {
            return Err(Undelivered {
                reason: SendFailure::NoRoute(destination),
                message,
            });
        };

        let handle = self.pool.allocate(message).map_err(|e| Undelivered {
            reason: SendFailure::PoolExhausted,
            message: e.into_message(),
        })?;

        match queue.try_send(handle) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(handle)) => {
                let message = self.pool.take(&handle);
                self.pool.release(handle);
                match message {
                    Some(message) => Err(Undelivered {
                        reason: SendFailure::QueueFull(destination),
                        message,
                    }),
                    // Slot was loaded a moment ago by this call
                    None => unreachable!(),
                }
            }
        }
    }
}
