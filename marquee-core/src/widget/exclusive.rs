//! Exclusive-state transitions
//!
//! Leaving a state plays its sequence backwards to the unwound end, then
//! the new state's sequence plays forwards to its steady end. A change of
//! mind mid-flight reverses the animator in place, so rapid flipping never
//! jumps or restarts an animation.

use super::{Outcome, Phase, Widget};
use crate::time::Timestamp;
use crate::traits::Canvas;

impl<'a> Widget<'a> {
    pub(super) fn poll_exclusive(&mut self, now: Timestamp) {
        let desired = self.poll_desired(now);

        match self.phase {
            Phase::Idle => {
                if desired != self.src {
                    self.dst = desired;
                    self.begin_exit(now);
                }
            }
            Phase::Exit => self.retarget_exit(desired, now),
            Phase::Enter => self.retarget_enter(desired, now),
        }
    }

    pub(super) fn render_exclusive<C: Canvas + ?Sized>(&mut self, canvas: &mut C, now: Timestamp) {
        if self.is_idle() {
            self.draw_steady(canvas);
            return;
        }

        let result = self.anim.step_and_draw(canvas, &self.config.placement, now);
        let Some(outcome) = self.outcome(result) else {
            return;
        };

        match (self.phase, outcome) {
            (Phase::Exit, Outcome::Unwound) => {
                self.src = self.dst;
                self.begin_enter(now);
            }
            (Phase::Enter, Outcome::Unwound) => match self.pending.take() {
                Some(next) if next != self.src => {
                    // Already at the unwound frame: finish the exit from here
                    self.dst = next;
                    self.phase = Phase::Exit;
                    if let Some(desc) = self.descriptor(self.src) {
                        self.anim.resume(desc.exit(), now);
                    }
                }
                _ => self.settle(canvas),
            },
            _ => self.settle(canvas),
        }
    }

    /// Adjust an in-flight exit to the latest desired state
    fn retarget_exit(&mut self, desired: u8, now: Timestamp) {
        let Some(desc) = self.descriptor(self.src) else {
            return;
        };
        let heading_out = self.anim.direction() == desc.exit();

        if desired == self.src {
            if heading_out {
                #[cfg(feature = "defmt")]
                defmt::debug!("widget: exit cancelled, back to {}", self.src);
                self.anim.reverse(now);
                self.dst = self.src;
            }
        } else if !heading_out {
            self.anim.reverse(now);
            self.dst = desired;
        } else if desired != self.dst {
            // Adopted once the exit completes
            self.dst = desired;
        }
    }

    /// Adjust an in-flight entry to the latest desired state
    fn retarget_enter(&mut self, desired: u8, now: Timestamp) {
        match self.pending {
            None if desired != self.src => {
                #[cfg(feature = "defmt")]
                defmt::debug!("widget: unwinding {} for {}", self.src, desired);
                self.anim.reverse(now);
                self.pending = Some(desired);
            }
            None => {}
            Some(_) if desired == self.src => {
                self.anim.reverse(now);
                self.pending = None;
            }
            Some(_) => self.pending = Some(desired),
        }
    }

    fn begin_exit(&mut self, now: Timestamp) {
        let Some(desc) = self.descriptor(self.src) else {
            return;
        };
        #[cfg(feature = "defmt")]
        defmt::debug!("widget: exit {} -> {}", self.src, self.dst);
        self.anim.start(desc.sequence, desc.exit(), now);
        self.phase = Phase::Exit;
    }

    fn begin_enter(&mut self, now: Timestamp) {
        let Some(desc) = self.descriptor(self.src) else {
            return;
        };
        #[cfg(feature = "defmt")]
        defmt::debug!("widget: enter {}", self.src);
        self.anim.start(desc.sequence, desc.enter, now);
        self.phase = Phase::Enter;
    }
}
