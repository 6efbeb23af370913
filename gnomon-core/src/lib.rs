//! Board-agnostic display task logic for the watch firmware
//!
//! This crate contains everything the display task does that does not
//! depend on the board:
//!
//! - Message buffer pool and the allocate-on-send / release-after-consume
//!   discipline
//! - Queue routing between tasks
//! - One-second timer service
//! - The shared frame buffer and its ownership hand-off
//! - Idle page configuration and its persistence hook
//! - The display state machine itself
//!
//! All cross-task primitives use `CriticalSectionRawMutex`; host tests get
//! a critical section from the `critical-section/std` implementation.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod display;
pub mod frame;
pub mod message;
pub mod pool;
pub mod router;
pub mod timer;

pub use display::{DisplayParts, DisplayTask, HandoffError, IdlePage, IdlePageMain, StartupError};
pub use frame::{FrameBuffer, FrameDock, FrameLease};
pub use message::{DisplayUpdate, Message};
pub use pool::{MessageHandle, MessagePool, PoolExhausted};
pub use router::{Mailbox, MessageQueue, QueueIndex, Router};
