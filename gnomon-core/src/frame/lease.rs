//! Frame ownership transfer
//!
//! The frame buffer lives in static memory and is reached only through a
//! [`FrameLease`]. A lease is not `Clone`, so at any moment exactly one
//! party can reach the pixels: the display task while drawing, the LCD
//! stage while transferring. The LCD stage hands the lease back through a
//! [`FrameDock`], which the display task waits on before it draws again.

use core::fmt;
use core::ops::Deref;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use gnomon_protocol::LcdRow;

use super::buffer::FrameBuffer;

/// Exclusive handle to the frame buffer
pub struct FrameLease {
    frame: &'static mut FrameBuffer,
}

impl FrameLease {
    /// Wrap the one frame buffer
    pub fn new(frame: &'static mut FrameBuffer) -> Self {
        Self { frame }
    }

    /// The first `count` rows
    pub fn rows(&self, count: usize) -> &[LcdRow] {
        self.frame.rows(count)
    }

    /// Write access, only for the holder that is drawing
    pub(crate) fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut *self.frame
    }
}

impl Deref for FrameLease {
    type Target = FrameBuffer;

    fn deref(&self) -> &FrameBuffer {
        &*self.frame
    }
}

impl fmt::Debug for FrameLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FrameLease")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FrameLease {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "FrameLease")
    }
}

/// Return path for a frame lease
///
/// Holds at most one lease; there is only one to hold.
pub struct FrameDock {
    returned: Signal<CriticalSectionRawMutex, FrameLease>,
}

impl Default for FrameDock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDock {
    /// Create an empty dock
    pub const fn new() -> Self {
        Self {
            returned: Signal::new(),
        }
    }

    /// Hand the lease back once the frame has been read
    pub fn give_back(&self, lease: FrameLease) {
        self.returned.signal(lease);
    }

    /// Wait for the lease to come back
    pub async fn wait(&self) -> FrameLease {
        self.returned.wait().await
    }

    /// Take the lease if it is already back
    pub fn try_reclaim(&self) -> Option<FrameLease> {
        self.returned.try_take()
    }

    /// Check whether a lease is waiting in the dock
    pub fn is_docked(&self) -> bool {
        self.returned.signaled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leak_frame() -> &'static mut FrameBuffer {
        Box::leak(Box::new(FrameBuffer::new()))
    }

    #[test]
    fn test_lease_reads_frame() {
        let frame = leak_frame();
        frame.fill_rows(0..1, 0xAB);
        let lease = FrameLease::new(frame);
        assert_eq!(lease.rows(1)[0][0], 0xAB);
        assert_eq!(lease.row(0).map(|r| r[0]), Some(0xAB));
    }

    #[test]
    fn test_dock_round_trip() {
        let dock = FrameDock::new();
        assert!(!dock.is_docked());
        assert!(dock.try_reclaim().is_none());

        dock.give_back(FrameLease::new(leak_frame()));
        assert!(dock.is_docked());
        assert!(dock.try_reclaim().is_some());
        assert!(!dock.is_docked());
    }

    #[test]
    fn test_wait_returns_docked_lease() {
        let dock = FrameDock::new();
        let mut lease = FrameLease::new(leak_frame());
        lease.frame_mut().fill_rows(5..6, 0x11);
        dock.give_back(lease);

        let lease = embassy_futures::block_on(dock.wait());
        assert_eq!(lease.row(5), Some(&[0x11; gnomon_protocol::LCD_COL_BYTES]));
    }
}
