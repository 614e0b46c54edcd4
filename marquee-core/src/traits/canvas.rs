//! Drawing surface trait
//!
//! The engine never touches pixels itself. Everything it shows goes through
//! these two primitives, implemented by the board's OLED buffer (see the
//! `marquee-display` crate) or by a test recorder.

use crate::frame::Frame;

/// Trait for the bitmap surface widgets draw into
///
/// A surface is single-writer: one render routine owns it for the whole
/// tick, so no locking is involved. Both operations must clip silently
/// instead of failing when a rectangle runs off the panel.
pub trait Canvas {
    /// Draw `frame` with its top-left corner at (`x`, `y`)
    ///
    /// Set pixels are merged onto existing content; widgets that need an
    /// opaque look clear their box first.
    fn draw_frame(&mut self, frame: &Frame<'_>, x: u8, y: u8);

    /// Clear a `width` x `height` rectangle at (`x`, `y`)
    fn clear_rect(&mut self, x: u8, y: u8, width: u8, height: u8);
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn draw_frame(&mut self, frame: &Frame<'_>, x: u8, y: u8) {
        (**self).draw_frame(frame, x, y)
    }

    fn clear_rect(&mut self, x: u8, y: u8, width: u8, height: u8) {
        (**self).clear_rect(x, y, width, height)
    }
}
