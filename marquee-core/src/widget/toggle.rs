//! Two-state toggle transitions
//!
//! Off rests on the first frame, on rests on the last. Both states share
//! one sequence, so switching is a single sweep and cancelling it is a
//! single in-place reversal.

use super::{Phase, Widget};
use crate::anim::StepResult;
use crate::frame::Direction;
use crate::time::Timestamp;
use crate::traits::Canvas;

const OFF: u8 = 0;
const ON: u8 = 1;

impl<'a> Widget<'a> {
    pub(super) fn poll_toggle(&mut self, now: Timestamp) {
        let desired = self.poll_desired(now);

        match self.phase {
            Phase::Idle => {
                if desired == self.src {
                    return;
                }
                let Some(desc) = self.descriptor(0) else {
                    return;
                };
                let (direction, phase) = if desired == ON {
                    (Direction::Forward, Phase::Enter)
                } else {
                    (Direction::Reverse, Phase::Exit)
                };
                #[cfg(feature = "defmt")]
                defmt::debug!("toggle: {} -> {}", self.src, desired);
                self.dst = desired;
                self.anim.start(desc.sequence, direction, now);
                self.phase = phase;
            }
            Phase::Enter if desired == OFF => {
                #[cfg(feature = "defmt")]
                defmt::debug!("toggle: reversing to off");
                self.anim.reverse(now);
                self.phase = Phase::Exit;
                self.dst = OFF;
            }
            Phase::Exit if desired == ON => {
                #[cfg(feature = "defmt")]
                defmt::debug!("toggle: reversing to on");
                self.anim.reverse(now);
                self.phase = Phase::Enter;
                self.dst = ON;
            }
            Phase::Enter | Phase::Exit => {}
        }
    }

    pub(super) fn render_toggle<C: Canvas + ?Sized>(&mut self, canvas: &mut C, now: Timestamp) {
        if self.is_idle() {
            self.draw_steady(canvas);
            return;
        }

        match self.anim.step_and_draw(canvas, &self.config.placement, now) {
            StepResult::Running => {}
            StepResult::DoneAtEnd => {
                self.src = ON;
                self.settle(canvas);
            }
            StepResult::DoneAtStart => {
                self.src = OFF;
                self.settle(canvas);
            }
        }
    }
}
