//! Gnomon inter-task message protocol
//!
//! Tasks on the watch communicate only by posting messages into each
//! other's queues. This crate defines the pieces every task has to agree on
//! without depending on the core runtime:
//!
//! - Message type codes carried in each message header
//! - Message option bits
//! - The geometry of the memory LCD (row count, bytes per row)
//!
//! ```text
//! ┌──────────┬─────────┬──────────────────────────┐
//! │ TYPE     │ OPTIONS │ PAYLOAD (type-specific)  │
//! │ 1B code  │ 1B      │                          │
//! └──────────┴─────────┴──────────────────────────┘
//! ```
//!
//! Timers only know a type code and option byte; the receiving task turns
//! the code back into a typed message.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod lcd;
pub mod messages;

pub use lcd::{LcdRow, BLANK_ROW, LCD_COLS, LCD_COL_BYTES, LCD_ROWS};
pub use messages::{MessageType, NO_MSG_OPTIONS};
