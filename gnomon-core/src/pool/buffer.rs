//! Fixed-capacity message pool
//!
//! Slots are reached through a [`MessageHandle`]. A handle is neither
//! `Clone` nor `Copy` and [`MessagePool::release`] consumes it, so a
//! message cannot be released twice.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::message::Message;

/// Reference to an allocated pool slot
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageHandle {
    index: u8,
}

impl MessageHandle {
    /// Slot index inside the pool
    pub fn index(&self) -> u8 {
        self.index
    }
}

/// Allocation failed; the message is handed back untouched
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PoolExhausted(pub Message);

impl PoolExhausted {
    /// Recover the message that could not be stored
    pub fn into_message(self) -> Message {
        self.0
    }
}

/// Pool usage counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PoolStats {
    /// Successful allocations since boot
    pub allocations: u32,
    /// Releases since boot
    pub releases: u32,
    /// Slots currently allocated
    pub in_use: u8,
    /// Highest `in_use` seen
    pub high_water: u8,
    /// Allocations refused because the pool was full
    pub exhausted: u32,
}

impl PoolStats {
    const fn new() -> Self {
        Self {
            allocations: 0,
            releases: 0,
            in_use: 0,
            high_water: 0,
            exhausted: 0,
        }
    }
}

enum Slot {
    /// Not allocated
    Free,
    /// Allocated, payload not yet consumed
    Loaded(Message),
    /// Allocated, payload moved out by the consumer
    Taken,
}

const FREE_SLOT: Slot = Slot::Free;

struct Slots<const N: usize> {
    slots: [Slot; N],
    stats: PoolStats,
}

/// Fixed-capacity pool of message slots shared between tasks
pub struct MessagePool<const N: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Slots<N>>>,
}

impl<const N: usize> Default for MessagePool<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MessagePool<N> {
    /// Create an empty pool
    pub const fn new() -> Self {
        assert!(N <= u8::MAX as usize, "pool index must fit in a u8");
        Self {
            inner: Mutex::new(RefCell::new(Slots {
                slots: [FREE_SLOT; N],
                stats: PoolStats::new(),
            })),
        }
    }

    /// Store a message in a free slot
    ///
    /// Returns the message inside [`PoolExhausted`] when every slot is in
    /// use, so the caller decides what happens to its payload.
    pub fn allocate(&self, message: Message) -> Result<MessageHandle, PoolExhausted> {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let Some(index) = inner.slots.iter().position(|s| matches!(s, Slot::Free)) else {
                inner.stats.exhausted = inner.stats.exhausted.wrapping_add(1);
                return Err(PoolExhausted(message));
            };

            inner.slots[index] = Slot::Loaded(message);
            let stats = &mut inner.stats;
            stats.allocations = stats.allocations.wrapping_add(1);
            stats.in_use += 1;
            stats.high_water = stats.high_water.max(stats.in_use);

            Ok(MessageHandle { index: index as u8 })
        })
    }

    /// Move the payload out of a slot
    ///
    /// The slot stays allocated until [`release`](Self::release). Returns
    /// `None` if the payload was already taken.
    pub fn take(&self, handle: &MessageHandle) -> Option<Message> {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let slot = inner.slots.get_mut(handle.index as usize)?;
            match core::mem::replace(slot, Slot::Taken) {
                Slot::Loaded(message) => Some(message),
                Slot::Taken => None,
                Slot::Free => {
                    *slot = Slot::Free;
                    None
                }
            }
        })
    }

    /// Header code of the message in a slot, without consuming it
    pub fn peek_type(&self, handle: &MessageHandle) -> Option<u8> {
        self.inner.lock(|inner| match inner.borrow().slots.get(handle.index as usize) {
            Some(Slot::Loaded(message)) => Some(message.msg_type()),
            _ => None,
        })
    }

    /// Return a slot to the pool
    ///
    /// Any payload still in the slot is dropped.
    pub fn release(&self, handle: MessageHandle) {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let Some(slot) = inner.slots.get_mut(handle.index as usize) else {
                return;
            };
            if matches!(slot, Slot::Free) {
                return;
            }
            *slot = Slot::Free;
            let stats = &mut inner.stats;
            stats.releases = stats.releases.wrapping_add(1);
            stats.in_use -= 1;
        })
    }

    /// Number of free slots
    pub fn available(&self) -> usize {
        self.inner.lock(|inner| {
            inner
                .borrow()
                .slots
                .iter()
                .filter(|s| matches!(s, Slot::Free))
                .count()
        })
    }

    /// Total number of slots
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Snapshot of the usage counters
    pub fn stats(&self) -> PoolStats {
        self.inner.lock(|inner| inner.borrow().stats)
    }
}
