//! Splash screen bitmap
//!
//! A sundial (dial plate, hour ticks, gnomon) inside a double border.
//! Built at compile time.

use gnomon_protocol::{LcdRow, BLANK_ROW, LCD_COLS, LCD_COL_BYTES, LCD_ROWS};

/// The splash image, one entry per panel row
pub static SPLASH: [LcdRow; LCD_ROWS] = build();

/// Row of the dial plate
const DIAL_ROW: usize = 72;
/// Height of the gnomon above the dial plate
const GNOMON_HEIGHT: usize = 40;
/// Column of the gnomon's vertical edge
const GNOMON_COL: usize = 48;

const fn build() -> [LcdRow; LCD_ROWS] {
    let mut rows = [BLANK_ROW; LCD_ROWS];

    // Border: two full rows top and bottom, two pixel columns each side
    let mut r = 0;
    while r < LCD_ROWS {
        if r < 2 || r >= LCD_ROWS - 2 {
            rows[r] = [0xFF; LCD_COL_BYTES];
        } else {
            rows[r][0] |= 0xC0;
            rows[r][LCD_COL_BYTES - 1] |= 0x03;
        }
        r += 1;
    }

    // Dial plate
    let mut col = 12;
    while col < LCD_COLS - 12 {
        rows[DIAL_ROW][col / 8] |= 0x80 >> (col % 8);
        rows[DIAL_ROW + 1][col / 8] |= 0x80 >> (col % 8);
        col += 1;
    }

    // Hour ticks below the plate
    let mut tick = 16;
    while tick < LCD_COLS - 12 {
        let mut r = DIAL_ROW + 2;
        while r < DIAL_ROW + 6 {
            rows[r][tick / 8] |= 0x80 >> (tick % 8);
            r += 1;
        }
        tick += 8;
    }

    // Gnomon: right triangle standing on the plate, vertical edge at GNOMON_COL
    let mut h = 0;
    while h < GNOMON_HEIGHT {
        let row = DIAL_ROW - 1 - h;
        let width = (GNOMON_HEIGHT - h) / 2;
        let mut col = GNOMON_COL;
        while col < GNOMON_COL + width {
            rows[row][col / 8] |= 0x80 >> (col % 8);
            col += 1;
        }
        h += 1;
    }

    rows
}
