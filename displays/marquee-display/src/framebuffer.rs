//! Page-packed monochrome frame buffer
//!
//! Same memory layout as SSD1306-class controllers: the screen is split
//! into pages of 8 pixel rows, each page is one byte per column with the
//! top row in the LSB. Frames use the same packing, so drawing a frame is
//! a column-wise shift-and-OR into at most two pages.

use marquee_core::{Canvas, Frame};

use crate::backend::{DisplayBackend, DisplayError};

/// 128x32 panel (the common split-keyboard OLED)
pub type Oled128x32 = FrameBuffer<128, 4>;

/// 128x64 panel
pub type Oled128x64 = FrameBuffer<128, 8>;

/// Frame buffer `W` pixels wide and `PAGES * 8` pixels high
#[derive(Debug, Clone)]
pub struct FrameBuffer<const W: usize, const PAGES: usize> {
    pages: [[u8; W]; PAGES],
    dirty: [bool; PAGES],
}

impl<const W: usize, const PAGES: usize> Default for FrameBuffer<W, PAGES> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const PAGES: usize> FrameBuffer<W, PAGES> {
    /// Width in pixels
    pub const WIDTH: usize = W;
    /// Height in pixels
    pub const HEIGHT: usize = PAGES * 8;

    /// Create a blank buffer; every page starts dirty so the first flush
    /// overwrites whatever the panel powered up with
    pub const fn new() -> Self {
        Self {
            pages: [[0; W]; PAGES],
            dirty: [true; PAGES],
        }
    }

    /// Set every pixel to `on`
    pub fn fill(&mut self, on: bool) {
        let value = if on { 0xFF } else { 0x00 };
        for page in &mut self.pages {
            page.fill(value);
        }
        self.mark_dirty();
    }

    /// Clear the whole buffer
    pub fn clear(&mut self) {
        self.fill(false);
    }

    /// Read one pixel; out-of-range reads are off
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pages
            .get(y / 8)
            .and_then(|page| page.get(x))
            .is_some_and(|&byte| byte & (1 << (y % 8)) != 0)
    }

    /// Write one pixel; out-of-range writes are ignored
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        let page = y / 8;
        let Some(byte) = self.pages.get_mut(page).and_then(|p| p.get_mut(x)) else {
            return;
        };
        let bit = 1 << (y % 8);
        if on {
            *byte |= bit;
        } else {
            *byte &= !bit;
        }
        self.touch(page);
    }

    /// Raw bytes of one page
    pub fn page(&self, page: usize) -> Option<&[u8; W]> {
        self.pages.get(page)
    }

    /// True if any page changed since the last flush
    pub fn is_dirty(&self) -> bool {
        self.dirty.iter().any(|&d| d)
    }

    /// True if `page` changed since the last flush
    pub fn is_page_dirty(&self, page: usize) -> bool {
        self.dirty.get(page).copied().unwrap_or(false)
    }

    /// Force the next flush to rewrite every page
    pub fn mark_dirty(&mut self) {
        self.dirty = [true; PAGES];
    }

    /// Write every dirty page to `backend` and mark it clean
    ///
    /// Returns the number of pages written. On error the failed page and
    /// every page after it stay dirty.
    pub fn flush<B: DisplayBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<usize, DisplayError> {
        if !backend.is_ready() {
            return Err(DisplayError::NotInitialized);
        }

        let mut written = 0;
        for (index, (page, dirty)) in self.pages.iter().zip(self.dirty.iter_mut()).enumerate() {
            if !*dirty {
                continue;
            }
            backend.write_page(index as u8, 0, page)?;
            *dirty = false;
            written += 1;
        }
        Ok(written)
    }

    /// OR 8 vertical pixels starting at pixel row `row` into column `x`
    fn or_column(&mut self, x: usize, row: usize, bits: u8) {
        let page = row / 8;
        let wide = (bits as u16) << (row % 8);
        self.or_byte(page, x, wide as u8);
        self.or_byte(page + 1, x, (wide >> 8) as u8);
    }

    fn or_byte(&mut self, page: usize, x: usize, bits: u8) {
        if bits == 0 {
            return;
        }
        if let Some(byte) = self.pages.get_mut(page).and_then(|p| p.get_mut(x)) {
            *byte |= bits;
            self.touch(page);
        }
    }

    fn touch(&mut self, page: usize) {
        if let Some(dirty) = self.dirty.get_mut(page) {
            *dirty = true;
        }
    }
}

impl<const W: usize, const PAGES: usize> Canvas for FrameBuffer<W, PAGES> {
    /// OR a page-packed frame into the buffer, clipped to the screen
    fn draw_frame(&mut self, frame: &Frame<'_>, x: u8, y: u8) {
        let width = frame.width() as usize;
        let height = frame.height() as usize;
        let data = frame.data();

        for src_page in 0..height.div_ceil(8) {
            let row = y as usize + src_page * 8;
            if row >= Self::HEIGHT {
                break;
            }
            // Rows past the frame's height in its last page are padding
            let rows_left = height - src_page * 8;
            let mask = if rows_left >= 8 {
                0xFF
            } else {
                (1u8 << rows_left) - 1
            };

            for col in 0..width {
                let dst_x = x as usize + col;
                if dst_x >= W {
                    break;
                }
                let Some(&bits) = data.get(src_page * width + col) else {
                    return;
                };
                self.or_column(dst_x, row, bits & mask);
            }
        }
    }

    fn clear_rect(&mut self, x: u8, y: u8, width: u8, height: u8) {
        let x_start = x as usize;
        let x_end = (x_start + width as usize).min(W);
        let y_start = y as usize;
        let y_end = (y_start + height as usize).min(Self::HEIGHT);
        if x_start >= x_end || y_start >= y_end {
            return;
        }

        for page in y_start / 8..=(y_end - 1) / 8 {
            let top = page * 8;
            let from = y_start.max(top) - top;
            let to = y_end.min(top + 8) - top;
            let mask = (((1u16 << to) - 1) & !((1u16 << from) - 1)) as u8;

            let Some(columns) = self.pages.get_mut(page).and_then(|p| p.get_mut(x_start..x_end))
            else {
                continue;
            };
            for byte in columns {
                *byte &= !mask;
            }
            self.touch(page);
        }
    }
}
