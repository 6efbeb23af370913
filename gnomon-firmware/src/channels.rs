//! Inter-task communication channels
//!
//! The message pool, the task queues and the other primitives shared
//! between Embassy tasks. Everything here is `static` because Embassy
//! tasks need `'static` data; the display task is the only one that
//! decides what goes on screen.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use gnomon_core::config::{IdleSettings, SharedIdleSettings};
use gnomon_core::pool::MESSAGE_POOL_SIZE;
use gnomon_core::router::QUEUE_DEPTH;
use gnomon_core::timer::{TimerBank, MAX_TIMERS};
use gnomon_core::{FrameDock, Mailbox, MessagePool, MessageQueue};

/// Sending side used by every task
pub type FwMailbox = Mailbox<'static, MESSAGE_POOL_SIZE, QUEUE_DEPTH>;

/// Storage for every message in flight
pub static POOL: MessagePool<MESSAGE_POOL_SIZE> = MessagePool::new();

/// Input queue of the display task
pub static DISPLAY_QUEUE: MessageQueue<QUEUE_DEPTH> = Channel::new();

/// Input queue of the LCD output task
pub static LCD_QUEUE: MessageQueue<QUEUE_DEPTH> = Channel::new();

/// Frame buffer return path from the LCD task
pub static FRAME_DOCK: FrameDock = FrameDock::new();

/// One-second timers, ticked by the tick task
pub static TIMERS: TimerBank<MAX_TIMERS> = TimerBank::new();

/// Live idle settings as published by the display task
pub static IDLE_SETTINGS: SharedIdleSettings = SharedIdleSettings::new();

/// Idle settings waiting to be written to flash
pub static SETTINGS_SAVE: Signal<CriticalSectionRawMutex, IdleSettings> = Signal::new();
