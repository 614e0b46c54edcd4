//! Frame placement and blend policy
//!
//! Whether a widget clears its box before drawing is a per-widget
//! decision: background widgets are opaque, overlays drawn on top of a
//! background frame are additive.

use crate::frame::Frame;
use crate::traits::Canvas;

/// How a widget's frames are combined with what is already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Blend {
    /// Clear the widget box, then draw
    #[default]
    Opaque,
    /// Draw over existing content without clearing
    Additive,
}

/// Where and how a widget draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Placement {
    /// Left edge in pixels
    pub x: u8,
    /// Top edge in pixels
    pub y: u8,
    /// Blend policy
    pub blend: Blend,
    /// Box cleared by opaque draws; defaults to each frame's own size
    pub bbox: Option<(u8, u8)>,
}

impl Placement {
    /// Opaque placement at (`x`, `y`)
    pub const fn at(x: u8, y: u8) -> Self {
        Self {
            x,
            y,
            blend: Blend::Opaque,
            bbox: None,
        }
    }

    /// Draw one frame according to the blend policy
    pub fn blit<C: Canvas + ?Sized>(&self, canvas: &mut C, frame: &Frame<'_>) {
        if self.blend == Blend::Opaque {
            let (w, h) = self.bbox.unwrap_or((frame.width(), frame.height()));
            canvas.clear_rect(self.x, self.y, w, h);
        }
        canvas.draw_frame(frame, self.x, self.y);
    }
}
