//! Generalized widget transition controller
//!
//! One machine drives every widget kind. The [`WidgetConfig`] preset picks
//! the behavior; the per-behavior tick logic lives in the submodules:
//!
//! - `exclusive`: one of N states, exit-then-enter with reversal
//! - `toggle`: two states sharing one sequence
//! - `playback`: one-shot, out-and-back and bounce effects
//!
//! A widget never allocates, never panics on bad input and only mutates
//! itself inside [`Widget::tick`] (or its two halves, [`Widget::poll`] and
//! [`Widget::render`]), [`Widget::trigger`] and [`Widget::force_state`].

mod config;
mod exclusive;
mod playback;
mod steady;
mod toggle;

pub use config::{Behavior, States, WidgetConfig};

use crate::anim::{Animator, StepResult};
use crate::frame::{Direction, StateDescriptor};
use crate::time::Timestamp;
use crate::traits::Canvas;

/// Transition phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Showing the steady frame of `src`
    #[default]
    Idle,
    /// Leaving a state (or, for toggles, heading off)
    Exit,
    /// Entering a state (or, for toggles, heading on)
    Enter,
}

/// Four-phase view of a toggle widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TogglePhase {
    IdleOff,
    Entering,
    IdleOn,
    Exiting,
}

/// How a finished animation relates to the state being animated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Reached the steady end of the state
    Settled,
    /// Ran back to the end opposite the steady one
    Unwound,
}

/// Animated status widget
#[derive(Debug, Clone, Copy)]
pub struct Widget<'a> {
    config: &'a WidgetConfig<'a>,
    anim: Animator<'a>,
    phase: Phase,
    src: u8,
    dst: u8,
    pending: Option<u8>,
    last_desired: u8,
    last_change: Timestamp,
    boot_done: bool,
    valid: bool,
}

impl<'a> Widget<'a> {
    /// Create a widget showing `initial_state`
    ///
    /// Draws the steady frame right away, or starts the boot animation if
    /// the config asks for one. An invalid config yields an inert widget
    /// that never draws; an out-of-range initial state falls back to
    /// state 0, skips the boot animation and draws nothing until the next
    /// tick.
    pub fn new<C: Canvas + ?Sized>(
        config: &'a WidgetConfig<'a>,
        initial_state: u8,
        canvas: &mut C,
        now: Timestamp,
    ) -> Self {
        let mut widget = Self {
            config,
            anim: Animator::new(config.frame_ms),
            phase: Phase::Idle,
            src: 0,
            dst: 0,
            pending: None,
            last_desired: 0,
            last_change: now,
            boot_done: true,
            valid: config.is_valid(),
        };

        if !widget.valid {
            #[cfg(feature = "defmt")]
            defmt::warn!("widget: invalid config {}, drawing nothing", config.behavior);
            return widget;
        }

        let in_range = initial_state < config.state_count();
        if in_range {
            widget.src = initial_state;
            widget.dst = initial_state;
            widget.last_desired = initial_state;
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("widget: initial state {} out of range", initial_state);
        }

        if !in_range {
            return widget;
        }
        if config.boot && widget.start_boot(now) {
            widget.boot_done = false;
        } else {
            widget.draw_steady(canvas);
        }
        widget
    }

    /// Advance one tick: [`poll`](Self::poll), then [`render`](Self::render)
    ///
    /// Returns true if a transition finished during this tick.
    pub fn tick<C: Canvas + ?Sized>(&mut self, canvas: &mut C, now: Timestamp) -> bool {
        let was_busy = self.is_busy();
        self.poll(now);
        self.render(canvas, now);
        was_busy && !self.is_busy()
    }

    /// Read the query and start or redirect a transition, without drawing
    ///
    /// Returns true if an idle widget started a transition. Hosts that tick
    /// in two passes poll every widget before rendering any of them.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        if !self.valid {
            return false;
        }
        let was_idle = self.is_idle();
        match self.config.behavior {
            Behavior::Exclusive => self.poll_exclusive(now),
            Behavior::Toggle => self.poll_toggle(now),
            Behavior::OneShot(_) | Behavior::OutAndBack | Behavior::Bounce(_) => {}
        }
        was_idle && self.is_busy()
    }

    /// Draw this tick's frame and advance the running animation
    pub fn render<C: Canvas + ?Sized>(&mut self, canvas: &mut C, now: Timestamp) {
        if !self.valid {
            return;
        }
        match self.config.behavior {
            Behavior::Exclusive => self.render_exclusive(canvas, now),
            Behavior::Toggle => self.render_toggle(canvas, now),
            Behavior::OneShot(_) | Behavior::OutAndBack | Behavior::Bounce(_) => {
                self.render_playback(canvas, now)
            }
        }
    }

    /// Jump straight to `state` without animating
    ///
    /// Used by recovery paths. Out-of-range states are ignored; widgets
    /// without logical states (the playback behaviors) just park on their
    /// steady frame.
    pub fn force_state<C: Canvas + ?Sized>(&mut self, state: u8, canvas: &mut C, now: Timestamp) {
        if !self.valid {
            return;
        }
        let state = match self.config.behavior {
            Behavior::Exclusive | Behavior::Toggle => state,
            Behavior::OneShot(_) | Behavior::OutAndBack | Behavior::Bounce(_) => 0,
        };
        if state >= self.config.state_count() {
            return;
        }

        self.anim.stop();
        self.src = state;
        self.dst = state;
        if state != self.last_desired {
            self.last_desired = state;
            self.last_change = now;
        }
        self.settle(canvas);
    }

    /// Fire the widget's effect
    ///
    /// One-shot widgets restart from frame 0, even mid-play. Out-and-back
    /// and bounce widgets start their blip if idle and ignore the trigger
    /// otherwise.
    /// Exclusive and toggle widgets follow their query and ignore triggers.
    /// Returns true if the trigger was accepted.
    pub fn trigger(&mut self, now: Timestamp) -> bool {
        if !self.valid {
            return false;
        }
        match self.config.behavior {
            Behavior::OneShot(_) => self.trigger_one_shot(now),
            Behavior::OutAndBack => self.trigger_out_and_back(now),
            Behavior::Bounce(_) => self.trigger_bounce(now),
            Behavior::Exclusive | Behavior::Toggle => false,
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while idle
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// True while a transition is running
    pub fn is_busy(&self) -> bool {
        !self.is_idle()
    }

    /// State currently shown (or being entered)
    pub fn state(&self) -> u8 {
        self.src
    }

    /// Target of the running transition
    pub fn target(&self) -> u8 {
        self.dst
    }

    /// State queued behind an unwinding entry
    pub fn pending(&self) -> Option<u8> {
        self.pending
    }

    /// Last in-range state reported by the query
    pub fn last_desired(&self) -> u8 {
        self.last_desired
    }

    /// When the desired state last changed (or the widget was triggered)
    pub fn last_change(&self) -> Timestamp {
        self.last_change
    }

    /// False until the boot animation has finished
    pub fn boot_done(&self) -> bool {
        self.boot_done
    }

    /// False if built from an invalid config
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The widget's configuration
    pub fn config(&self) -> &'a WidgetConfig<'a> {
        self.config
    }

    /// The widget's animator
    pub fn animator(&self) -> &Animator<'a> {
        &self.anim
    }

    /// Four-phase view, for toggle widgets only
    pub fn toggle_phase(&self) -> Option<TogglePhase> {
        if self.config.behavior != Behavior::Toggle {
            return None;
        }
        Some(match (self.phase, self.src) {
            (Phase::Idle, 0) => TogglePhase::IdleOff,
            (Phase::Idle, _) => TogglePhase::IdleOn,
            (Phase::Enter, _) => TogglePhase::Entering,
            (Phase::Exit, _) => TogglePhase::Exiting,
        })
    }

    /// Read the query, keeping the last good value on bad input
    fn poll_desired(&mut self, now: Timestamp) -> u8 {
        let Some(query) = self.config.query else {
            return self.last_desired;
        };
        let desired = query.desired_state();
        if desired >= self.config.state_count() {
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "widget: query {} out of range, keeping {}",
                desired,
                self.last_desired
            );
            return self.last_desired;
        }
        if desired != self.last_desired {
            self.last_desired = desired;
            self.last_change = now;
        }
        desired
    }

    fn start_boot(&mut self, now: Timestamp) -> bool {
        match self.config.behavior {
            Behavior::Exclusive => {
                let Some(desc) = self.descriptor(self.src) else {
                    return false;
                };
                self.anim.start(desc.sequence, desc.enter, now);
            }
            Behavior::Toggle => {
                if self.src != 1 {
                    return false;
                }
                let Some(desc) = self.descriptor(0) else {
                    return false;
                };
                self.anim.start(desc.sequence, Direction::Forward, now);
            }
            Behavior::OneShot(_) | Behavior::OutAndBack | Behavior::Bounce(_) => {
                let Some(desc) = self.descriptor(0) else {
                    return false;
                };
                self.anim.start(desc.sequence, Direction::Forward, now);
            }
        }
        if !self.anim.is_active() {
            return false;
        }
        self.phase = Phase::Enter;
        true
    }

    fn descriptor(&self, state: u8) -> Option<&'a StateDescriptor<'a>> {
        self.config.states.get(state)
    }

    /// Classify a step result against the enter direction of `src`
    fn outcome(&self, result: StepResult) -> Option<Outcome> {
        let enter = self.descriptor(self.src)?.enter;
        match (result, enter) {
            (StepResult::Running, _) => None,
            (StepResult::DoneAtEnd, Direction::Forward)
            | (StepResult::DoneAtStart, Direction::Reverse) => Some(Outcome::Settled),
            _ => Some(Outcome::Unwound),
        }
    }

    /// Return to idle and show the steady frame of `src`
    fn settle<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        self.phase = Phase::Idle;
        self.pending = None;
        self.dst = self.src;
        self.boot_done = true;
        self.draw_steady(canvas);
    }
}
