//! Frame buffer and its ownership hand-off
//!
//! There is exactly one frame buffer. The display task holds it as a
//! [`FrameLease`] and moves the lease into a hand-off message; the LCD
//! stage gives it back through the [`FrameDock`] once it has finished
//! reading. Whoever holds the lease is the only one who can touch it.

pub mod buffer;
pub mod lease;

pub use buffer::FrameBuffer;
pub use lease::{FrameDock, FrameLease};
