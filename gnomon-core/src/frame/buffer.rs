//! Row-addressed pixel buffer

use core::ops::Range;

use gnomon_protocol::{LcdRow, BLANK_ROW, LCD_ROWS};

/// Full-screen pixel buffer, one [`LcdRow`] per panel row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    rows: [LcdRow; LCD_ROWS],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Create a blank frame
    pub const fn new() -> Self {
        Self {
            rows: [BLANK_ROW; LCD_ROWS],
        }
    }

    /// Clear every pixel
    pub fn clear(&mut self) {
        self.rows.fill(BLANK_ROW);
    }

    /// Get a single row
    pub fn row(&self, row: usize) -> Option<&LcdRow> {
        self.rows.get(row)
    }

    /// Get a single row for writing
    pub fn row_mut(&mut self, row: usize) -> Option<&mut LcdRow> {
        self.rows.get_mut(row)
    }

    /// The first `count` rows, clamped to the panel height
    pub fn rows(&self, count: usize) -> &[LcdRow] {
        &self.rows[..count.min(LCD_ROWS)]
    }

    /// Copy `src` into the buffer starting at `start_row`
    ///
    /// Rows that would fall past the bottom of the panel are dropped.
    /// Returns the number of rows copied.
    pub fn copy_rows_from(&mut self, src: &[LcdRow], start_row: usize) -> usize {
        if start_row >= LCD_ROWS {
            return 0;
        }
        let count = src.len().min(LCD_ROWS - start_row);
        self.rows[start_row..start_row + count].copy_from_slice(&src[..count]);
        count
    }

    /// Set every byte of the given rows to `value`
    pub fn fill_rows(&mut self, rows: Range<usize>, value: u8) {
        for row in self.clamp(rows) {
            self.rows[row].fill(value);
        }
    }

    /// Invert every pixel of the given rows
    pub fn invert_rows(&mut self, rows: Range<usize>) {
        for row in self.clamp(rows) {
            for byte in self.rows[row].iter_mut() {
                *byte = !*byte;
            }
        }
    }

    fn clamp(&self, rows: Range<usize>) -> Range<usize> {
        rows.start.min(LCD_ROWS)..rows.end.min(LCD_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gnomon_protocol::LCD_COL_BYTES;

    #[test]
    fn test_new_is_blank() {
        let frame = FrameBuffer::new();
        assert!(frame.rows(LCD_ROWS).iter().all(|row| *row == BLANK_ROW));
    }

    #[test]
    fn test_copy_rows_from_offset() {
        let mut frame = FrameBuffer::new();
        let src = [[0xAA; LCD_COL_BYTES]; 4];

        assert_eq!(frame.copy_rows_from(&src, 10), 4);
        assert_eq!(frame.row(9), Some(&BLANK_ROW));
        assert_eq!(frame.row(10), Some(&[0xAA; LCD_COL_BYTES]));
        assert_eq!(frame.row(13), Some(&[0xAA; LCD_COL_BYTES]));
        assert_eq!(frame.row(14), Some(&BLANK_ROW));
    }

    #[test]
    fn test_copy_rows_truncates_at_bottom() {
        let mut frame = FrameBuffer::new();
        let src = [[0x0F; LCD_COL_BYTES]; 8];

        assert_eq!(frame.copy_rows_from(&src, LCD_ROWS - 3), 3);
        assert_eq!(frame.row(LCD_ROWS - 1), Some(&[0x0F; LCD_COL_BYTES]));
        assert_eq!(frame.copy_rows_from(&src, LCD_ROWS), 0);
    }

    #[test]
    fn test_invert_is_limited_to_range() {
        let mut frame = FrameBuffer::new();
        frame.fill_rows(0..2, 0xF0);
        frame.invert_rows(1..3);

        assert_eq!(frame.row(0), Some(&[0xF0; LCD_COL_BYTES]));
        assert_eq!(frame.row(1), Some(&[0x0F; LCD_COL_BYTES]));
        assert_eq!(frame.row(2), Some(&[0xFF; LCD_COL_BYTES]));
        assert_eq!(frame.row(3), Some(&BLANK_ROW));
    }

    #[test]
    fn test_out_of_range_access() {
        let mut frame = FrameBuffer::new();
        assert!(frame.row(LCD_ROWS).is_none());
        assert!(frame.row_mut(LCD_ROWS).is_none());
        assert_eq!(frame.rows(LCD_ROWS + 10).len(), LCD_ROWS);
        frame.fill_rows(LCD_ROWS - 1..LCD_ROWS + 5, 0xFF);
        assert_eq!(frame.row(LCD_ROWS - 1), Some(&[0xFF; LCD_COL_BYTES]));
    }

    #[test]
    fn test_clear() {
        let mut frame = FrameBuffer::new();
        frame.fill_rows(0..LCD_ROWS, 0x55);
        frame.clear();
        assert_eq!(frame, FrameBuffer::new());
    }
}
