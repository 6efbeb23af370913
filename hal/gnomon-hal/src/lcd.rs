//! Memory LCD abstractions
//!
//! The watch panel is a 96x96 Sharp memory LCD. It is written one line at
//! a time over SPI and keeps its image without refresh, but its common
//! electrode (VCOM) has to be flipped periodically.
//!
//! Line transfer frame, MSB first:
//!
//! ```text
//! [mode] ([address] [12 data bytes] [0x00])* [0x00]
//! ```
//!
//! The address is the 1-based line number, sent bit-reversed.

use gnomon_protocol::{LcdRow, LCD_COL_BYTES, LCD_ROWS};

/// Mode bit: write lines
pub const CMD_WRITE_LINE: u8 = 0x80;
/// Mode bit: current VCOM level
pub const CMD_VCOM: u8 = 0x40;
/// Mode bit: clear the whole panel
pub const CMD_CLEAR: u8 = 0x20;

/// Bytes per line on the wire: address, data, trailer
pub const LINE_BYTES: usize = 1 + LCD_COL_BYTES + 1;

/// Default SPI clock for the panel
pub const LCD_SPI_FREQUENCY: u32 = 1_000_000;

/// VCOM level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Vcom {
    #[default]
    Low,
    High,
}

impl Vcom {
    /// The opposite level
    pub fn toggled(self) -> Self {
        match self {
            Vcom::Low => Vcom::High,
            Vcom::High => Vcom::Low,
        }
    }

    /// VCOM bit for the mode byte
    pub fn mode_bit(self) -> u8 {
        match self {
            Vcom::Low => 0,
            Vcom::High => CMD_VCOM,
        }
    }
}

/// Wire address of a 0-based row
pub fn line_address(row: usize) -> u8 {
    ((row + 1) as u8).reverse_bits()
}

/// Encode one line for transfer
pub fn encode_line(row: usize, data: &LcdRow) -> [u8; LINE_BYTES] {
    let mut line = [0u8; LINE_BYTES];
    line[0] = line_address(row);
    line[1..=LCD_COL_BYTES].copy_from_slice(data);
    line
}

/// Number of rows of a `first_row..first_row + count` write that fit on
/// the panel
pub fn clamp_rows(first_row: usize, count: usize) -> usize {
    count.min(LCD_ROWS.saturating_sub(first_row))
}

/// Memory LCD panel
pub trait LcdPanel {
    /// Error type for panel operations
    type Error;

    /// Write `rows` to the panel starting at `first_row`
    ///
    /// Rows past the bottom of the panel are ignored.
    fn write_rows(
        &mut self,
        first_row: usize,
        rows: &[LcdRow],
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Blank the whole panel
    fn clear(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Flip VCOM without writing any line
    fn toggle_vcom(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}
