//! Steady-state renderer
//!
//! Picks the frame a widget shows while it is not transitioning.

use super::{Behavior, Widget};
use crate::frame::{Frame, SteadyFrame};
use crate::traits::Canvas;

impl<'a> Widget<'a> {
    /// Frame representing `state` at rest
    pub fn steady_frame(&self, state: u8) -> Option<&'a Frame<'a>> {
        match self.config.behavior {
            Behavior::Exclusive => self.descriptor(state)?.steady_frame(),
            Behavior::Toggle => {
                let end = if state == 0 {
                    SteadyFrame::First
                } else {
                    SteadyFrame::Last
                };
                self.descriptor(0)?.sequence.end(end)
            }
            Behavior::OneShot(end) | Behavior::Bounce(end) => {
                self.descriptor(0)?.sequence.end(end)
            }
            Behavior::OutAndBack => self.descriptor(0)?.sequence.last(),
        }
    }

    /// Redraw the steady frame of the current state
    ///
    /// Idempotent, so hosts can call it after clearing the whole surface.
    pub fn draw_steady<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        if !self.valid {
            return;
        }
        if let Some(frame) = self.steady_frame(self.src) {
            self.config.placement.blit(canvas, frame);
        }
    }
}
