//! Low-level frame animator
//!
//! Walks an index through a [`Sequence`] at a fixed cadence in either
//! direction. Reversal flips the direction in place, so a cancelled
//! animation retraces exactly the frames it has shown.

use crate::frame::{Direction, Frame, Sequence};
use crate::render::Placement;
use crate::time::Timestamp;
use crate::traits::Canvas;

/// Default frame cadence in milliseconds
pub const DEFAULT_FRAME_MS: u16 = 80;

/// Outcome of one [`Animator::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepResult {
    /// Still playing (or nothing was due)
    Running,
    /// Ran off the front; parked on frame 0
    DoneAtStart,
    /// Ran off the back; parked on the last frame
    DoneAtEnd,
}

impl StepResult {
    /// True if playback finished this step
    pub fn is_done(self) -> bool {
        !matches!(self, StepResult::Running)
    }
}

/// Frame stepper with direction control and mid-flight reversal
#[derive(Debug, Clone, Copy)]
pub struct Animator<'a> {
    sequence: Option<Sequence<'a>>,
    direction: Direction,
    index: u8,
    active: bool,
    next_due: Timestamp,
    frame_ms: u16,
}

impl Default for Animator<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_MS)
    }
}

impl<'a> Animator<'a> {
    /// Create an idle animator with the given frame cadence
    pub const fn new(frame_ms: u16) -> Self {
        Self {
            sequence: None,
            direction: Direction::Forward,
            index: 0,
            active: false,
            next_due: Timestamp::ZERO,
            frame_ms,
        }
    }

    /// Start playing `sequence` from the end opposite to `direction`
    ///
    /// An empty sequence leaves the animator inactive.
    pub fn start(&mut self, sequence: Sequence<'a>, direction: Direction, now: Timestamp) {
        let Some(last) = sequence.last_index() else {
            self.sequence = None;
            self.active = false;
            return;
        };

        self.sequence = Some(sequence);
        self.direction = direction;
        self.index = if direction.is_forward() { 0 } else { last };
        self.active = true;
        self.schedule_from(now);
    }

    /// Continue from the current frame in `direction`
    ///
    /// Unlike [`start`](Self::start) this keeps the index, so playback picks
    /// up exactly where the last run parked. Does nothing if no sequence
    /// has been started yet.
    pub fn resume(&mut self, direction: Direction, now: Timestamp) {
        if self.sequence.is_none() {
            return;
        }
        self.direction = direction;
        self.active = true;
        self.schedule_from(now);
    }

    /// Flip direction without moving the index
    ///
    /// No frame is skipped or replayed. Ignored while inactive.
    pub fn reverse(&mut self, now: Timestamp) {
        if !self.active {
            return;
        }
        self.direction = self.direction.opposite();
        self.schedule_from(now);
    }

    /// Stop playback, leaving the index where it is
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Advance one frame if one is due
    ///
    /// When the index would leave the sequence it is clamped to the
    /// boundary, the animator goes inactive and the matching `Done*`
    /// result is returned. An inactive animator reports `Running`.
    pub fn step(&mut self, now: Timestamp) -> StepResult {
        if !self.active {
            return StepResult::Running;
        }
        let Some(last) = self.sequence.and_then(|s| s.last_index()) else {
            self.active = false;
            return StepResult::Running;
        };
        if !now.has_reached(self.next_due) {
            return StepResult::Running;
        }

        let next = self.index as i16 + self.direction.delta();
        if next < 0 {
            self.index = 0;
            self.active = false;
            return StepResult::DoneAtStart;
        }
        if next > last as i16 {
            self.index = last;
            self.active = false;
            return StepResult::DoneAtEnd;
        }

        self.index = next as u8;
        self.next_due = self.next_due.add_millis(self.frame_ms as u32);
        if now.signed_since(self.next_due) > 0 {
            // Fell behind (stalled host); resync instead of bursting
            self.schedule_from(now);
        }
        StepResult::Running
    }

    /// Draw the current frame, then step
    ///
    /// The frame shown this tick is the one reached by the previous step,
    /// which keeps animation speed independent of tick rate.
    pub fn step_and_draw<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        placement: &Placement,
        now: Timestamp,
    ) -> StepResult {
        self.draw_current(canvas, placement);
        self.step(now)
    }

    /// Draw the current frame if playing
    pub fn draw_current<C: Canvas + ?Sized>(&self, canvas: &mut C, placement: &Placement) {
        if !self.active {
            return;
        }
        if let Some(frame) = self.current_frame() {
            placement.blit(canvas, frame);
        }
    }

    /// Frame at the current index
    pub fn current_frame(&self) -> Option<&'a Frame<'a>> {
        self.sequence.and_then(|s| s.get(self.index))
    }

    /// Sequence being played
    pub fn sequence(&self) -> Option<Sequence<'a>> {
        self.sequence
    }

    /// Current frame index
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Current direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// True while playing
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// When the next frame advance is due
    pub fn next_due(&self) -> Timestamp {
        self.next_due
    }

    /// Frame cadence in milliseconds
    pub fn frame_ms(&self) -> u16 {
        self.frame_ms
    }

    fn schedule_from(&mut self, now: Timestamp) {
        self.next_due = now.add_millis(self.frame_ms as u32);
    }
}
