//! One-shot and out-and-back playback
//!
//! None of these behaviors has a query; they are driven by boot and
//! [`Widget::trigger`]. A one-shot plays forward once and parks. An
//! out-and-back rests on its last frame and answers a trigger with a
//! reverse sweep followed by a forward one, ending where it started. A
//! bounce is the mirror image: forward to the last frame, then back to
//! the first, then its steady frame.

use super::{Behavior, Phase, Widget};
use crate::anim::StepResult;
use crate::frame::Direction;
use crate::time::Timestamp;
use crate::traits::Canvas;

impl<'a> Widget<'a> {
    pub(super) fn render_playback<C: Canvas + ?Sized>(&mut self, canvas: &mut C, now: Timestamp) {
        match self.phase {
            Phase::Idle => self.draw_steady(canvas),
            Phase::Enter => {
                if self.anim.step_and_draw(canvas, &self.config.placement, now)
                    != StepResult::DoneAtEnd
                {
                    return;
                }
                // Boot plays forward only
                if matches!(self.config.behavior, Behavior::Bounce(_)) && self.boot_done {
                    self.anim.resume(Direction::Reverse, now);
                    self.phase = Phase::Exit;
                } else {
                    self.settle(canvas);
                }
            }
            Phase::Exit => {
                if self.anim.step_and_draw(canvas, &self.config.placement, now)
                    != StepResult::DoneAtStart
                {
                    return;
                }
                if self.config.behavior == Behavior::OutAndBack {
                    self.anim.resume(Direction::Forward, now);
                    self.phase = Phase::Enter;
                } else {
                    self.settle(canvas);
                }
            }
        }
    }

    pub(super) fn trigger_one_shot(&mut self, now: Timestamp) -> bool {
        self.play(Direction::Forward, Phase::Enter, now)
    }

    pub(super) fn trigger_out_and_back(&mut self, now: Timestamp) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.play(Direction::Reverse, Phase::Exit, now)
    }

    pub(super) fn trigger_bounce(&mut self, now: Timestamp) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.play(Direction::Forward, Phase::Enter, now)
    }

    fn play(&mut self, direction: Direction, phase: Phase, now: Timestamp) -> bool {
        let Some(desc) = self.descriptor(0) else {
            return false;
        };
        self.anim.start(desc.sequence, direction, now);
        if !self.anim.is_active() {
            return false;
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("widget: triggered {}", self.config.behavior);
        self.phase = phase;
        self.last_change = now;
        true
    }
}
