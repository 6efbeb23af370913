//! Memory LCD geometry
//!
//! The panel is a 96x96 monochrome memory LCD written one full row at a
//! time. A row is 12 bytes, one bit per pixel, MSB is the leftmost pixel.

/// Number of pixel rows on the panel
pub const LCD_ROWS: usize = 96;

/// Number of pixel columns on the panel
pub const LCD_COLS: usize = 96;

/// Bytes needed to hold one row of pixels
pub const LCD_COL_BYTES: usize = LCD_COLS / 8;

/// One row of pixel data
pub type LcdRow = [u8; LCD_COL_BYTES];

/// A row with every pixel cleared
pub const BLANK_ROW: LcdRow = [0x00; LCD_COL_BYTES];
