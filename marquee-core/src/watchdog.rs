//! Stuck-transition watchdog
//!
//! The last line of defence against a widget that never returns to idle
//! (frozen clock source, misbehaving query, absurd frame cadence). Once a
//! transition has run for longer than the timeout with no change in what
//! the widget was asked to show, a grace period starts; if the widget is
//! still busy when it ends, the watchdog forces it to its last requested
//! state and redraws the steady frame directly.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::time::Timestamp;
use crate::traits::Canvas;
use crate::widget::{Widget, WidgetConfig};

/// Default busy time before the grace period starts
pub const DEFAULT_TIMEOUT_MS: u32 = 1000;
/// Default grace period before a forced reset
pub const DEFAULT_GRACE_MS: u32 = 500;

/// Watchdog timings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WatchdogConfig {
    /// Continuous busy time tolerated before the grace period
    pub timeout_ms: u32,
    /// Extra time granted before forcing completion
    pub grace_ms: u32,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            grace_ms: DEFAULT_GRACE_MS,
        }
    }
}

/// Result of one watchdog check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchdogStatus {
    /// Idle, or busy within the timeout
    Ok,
    /// Timed out; waiting out the grace period
    Grace,
    /// Forced the widget to idle this check
    Reset,
}

/// Watchdog for one widget
#[derive(Debug, Clone, Copy)]
pub struct Watchdog {
    config: WatchdogConfig,
    /// Desired state and change time seen at the last check
    seen: Option<(u8, Timestamp)>,
    busy_since: Option<Timestamp>,
    grace_since: Option<Timestamp>,
    resets: u32,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new(WatchdogConfig::default())
    }
}

impl Watchdog {
    /// Create a watchdog with the given timings
    pub const fn new(config: WatchdogConfig) -> Self {
        Self {
            config,
            seen: None,
            busy_since: None,
            grace_since: None,
            resets: 0,
        }
    }

    /// Check `widget` after its tick, forcing completion if it is stuck
    ///
    /// Constant time. Once the grace period has elapsed the reset is
    /// unconditional.
    pub fn check<C: Canvas + ?Sized>(
        &mut self,
        widget: &mut Widget<'_>,
        canvas: &mut C,
        now: Timestamp,
    ) -> WatchdogStatus {
        let marker = (widget.last_desired(), widget.last_change());
        let changed = self.seen != Some(marker);
        self.seen = Some(marker);

        if widget.is_idle() {
            self.disarm();
            return WatchdogStatus::Ok;
        }
        if changed {
            // New request: the transition gets a fresh timeout
            self.busy_since = Some(now);
            self.grace_since = None;
        }

        let busy_since = *self.busy_since.get_or_insert(now);
        let busy_ms = now.millis_since(busy_since);
        if busy_ms <= self.config.timeout_ms {
            return WatchdogStatus::Ok;
        }

        let grace_since = match self.grace_since {
            Some(since) => since,
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "watchdog: widget busy {} ms in {}, grace started",
                    busy_ms,
                    widget.phase()
                );
                self.grace_since = Some(now);
                now
            }
        };
        if now.millis_since(grace_since) < self.config.grace_ms {
            return WatchdogStatus::Grace;
        }

        let target = widget.last_desired();
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "watchdog: forcing widget to state {} after {} ms",
            target,
            busy_ms
        );
        widget.force_state(target, canvas, now);
        self.resets = self.resets.saturating_add(1);
        self.disarm();
        WatchdogStatus::Reset
    }

    /// Number of forced resets so far
    pub fn resets(&self) -> u32 {
        self.resets
    }

    /// True while a grace period is running
    pub fn in_grace(&self) -> bool {
        self.grace_since.is_some()
    }

    /// Configured timings
    pub fn config(&self) -> WatchdogConfig {
        self.config
    }

    fn disarm(&mut self) {
        self.busy_since = None;
        self.grace_since = None;
    }
}

/// A widget paired with its watchdog
#[derive(Debug, Clone, Copy)]
pub struct Supervised<'a> {
    widget: Widget<'a>,
    watchdog: Watchdog,
}

impl<'a> Supervised<'a> {
    /// Create the widget (drawing its initial frame) under a watchdog
    pub fn new<C: Canvas + ?Sized>(
        config: &'a WidgetConfig<'a>,
        initial_state: u8,
        watchdog: WatchdogConfig,
        canvas: &mut C,
        now: Timestamp,
    ) -> Self {
        Self {
            widget: Widget::new(config, initial_state, canvas, now),
            watchdog: Watchdog::new(watchdog),
        }
    }

    /// Tick the widget, then let the watchdog inspect it
    ///
    /// Returns true if a transition finished, normally or forced.
    pub fn tick<C: Canvas + ?Sized>(&mut self, canvas: &mut C, now: Timestamp) -> bool {
        let was_busy = self.widget.is_busy();
        self.widget.poll(now);
        let status = self.render(canvas, now);
        (was_busy && self.widget.is_idle()) || status == WatchdogStatus::Reset
    }

    /// See [`Widget::poll`]
    pub fn poll(&mut self, now: Timestamp) -> bool {
        self.widget.poll(now)
    }

    /// Render the widget, then let the watchdog inspect it
    pub fn render<C: Canvas + ?Sized>(&mut self, canvas: &mut C, now: Timestamp) -> WatchdogStatus {
        self.widget.render(canvas, now);
        self.watchdog.check(&mut self.widget, canvas, now)
    }

    /// See [`Widget::trigger`]
    pub fn trigger(&mut self, now: Timestamp) -> bool {
        self.widget.trigger(now)
    }

    /// See [`Widget::force_state`]
    pub fn force_state<C: Canvas + ?Sized>(&mut self, state: u8, canvas: &mut C, now: Timestamp) {
        self.widget.force_state(state, canvas, now);
    }

    /// The supervised widget
    pub fn widget(&self) -> &Widget<'a> {
        &self.widget
    }

    /// The watchdog
    pub fn watchdog(&self) -> &Watchdog {
        &self.watchdog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::StateDescriptor;
    use crate::testing::{seq, RecordingCanvas, TAGGED, TAGGED_B};
    use crate::widget::Phase;
    use core::cell::Cell;

    fn t(ms: u32) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    #[test]
    fn test_defaults() {
        let config = WatchdogConfig::default();
        assert_eq!(config.timeout_ms, 1000);
        assert_eq!(config.grace_ms, 500);
    }

    #[test]
    fn test_stuck_enter_forced_exactly_once() {
        let states = [
            StateDescriptor::forward(seq(&TAGGED, 4)),
            StateDescriptor::forward(seq(&TAGGED_B, 4)),
        ];
        // Ten-second frames: the entry animation is effectively stuck
        let config = WidgetConfig::exclusive(&states, 0, 0)
            .with_frame_ms(10_000)
            .with_boot(true);
        let mut canvas = RecordingCanvas::default();
        let mut widget = Supervised::new(&config, 1, WatchdogConfig::default(), &mut canvas, t(0));
        assert_eq!(widget.widget().phase(), Phase::Enter);

        let mut reset_at = None;
        let mut now = 0;
        while now <= 5000 {
            if widget.tick(&mut canvas, t(now)) {
                assert!(reset_at.is_none());
                reset_at = Some(now);
            }
            now += 10;
        }

        let reset_at = reset_at.unwrap_or_default();
        assert!(reset_at > 1500 && reset_at <= 1520);
        assert_eq!(widget.watchdog().resets(), 1);
        assert_eq!(widget.widget().phase(), Phase::Idle);
        assert_eq!(widget.widget().state(), 1);
        assert_eq!(canvas.last_drawn(), Some(13));
    }

    #[test]
    fn test_stuck_across_rollover() {
        let states = [
            StateDescriptor::forward(seq(&TAGGED, 4)),
            StateDescriptor::forward(seq(&TAGGED_B, 4)),
        ];
        let config = WidgetConfig::exclusive(&states, 0, 0)
            .with_frame_ms(10_000)
            .with_boot(true);
        let start = u32::MAX - 500;
        let at = |offset: u32| Timestamp::from_millis(start.wrapping_add(offset));
        let mut canvas = RecordingCanvas::default();
        let mut widget = Supervised::new(&config, 1, WatchdogConfig::default(), &mut canvas, at(0));

        let mut reset_at = None;
        let mut offset = 0;
        while offset <= 5000 {
            if widget.tick(&mut canvas, at(offset)) {
                assert!(reset_at.is_none());
                reset_at = Some(offset);
            }
            offset += 10;
        }

        // Counter wrapped 500 ms in; the timeout and grace still add up
        let reset_at = reset_at.unwrap_or_default();
        assert!(reset_at > 1500 && reset_at <= 1520);
        assert_eq!(widget.watchdog().resets(), 1);
        assert!(widget.widget().is_idle());
        assert_eq!(canvas.last_drawn(), Some(13));
    }

    #[test]
    fn test_grace_period_reported() {
        let states = [StateDescriptor::forward(seq(&TAGGED, 4))];
        let config = WidgetConfig::exclusive(&states, 0, 0)
            .with_frame_ms(10_000)
            .with_boot(true);
        let mut canvas = RecordingCanvas::default();
        let mut widget = Widget::new(&config, 0, &mut canvas, t(0));
        let mut watchdog = Watchdog::default();

        assert_eq!(watchdog.check(&mut widget, &mut canvas, t(0)), WatchdogStatus::Ok);
        assert_eq!(watchdog.check(&mut widget, &mut canvas, t(1000)), WatchdogStatus::Ok);
        assert_eq!(watchdog.check(&mut widget, &mut canvas, t(1001)), WatchdogStatus::Grace);
        assert!(watchdog.in_grace());
        assert_eq!(watchdog.check(&mut widget, &mut canvas, t(1500)), WatchdogStatus::Grace);
        assert_eq!(watchdog.check(&mut widget, &mut canvas, t(1501)), WatchdogStatus::Reset);
        assert!(!watchdog.in_grace());
        assert_eq!(watchdog.check(&mut widget, &mut canvas, t(3000)), WatchdogStatus::Ok);
        assert_eq!(watchdog.resets(), 1);
    }

    #[test]
    fn test_stuck_again_after_new_request() {
        let states = [
            StateDescriptor::forward(seq(&TAGGED, 4)),
            StateDescriptor::forward(seq(&TAGGED_B, 4)),
        ];
        let desired = Cell::new(0u8);
        let query = || desired.get();
        let config = WidgetConfig::exclusive(&states, 0, 0)
            .with_frame_ms(10_000)
            .with_query(&query);
        let mut canvas = RecordingCanvas::default();
        let mut widget = Supervised::new(&config, 0, WatchdogConfig::default(), &mut canvas, t(0));

        desired.set(1);
        let mut now = 0;
        while now <= 3000 {
            widget.tick(&mut canvas, t(now));
            now += 10;
        }
        assert_eq!(widget.watchdog().resets(), 1);
        assert_eq!(widget.widget().state(), 1);

        desired.set(0);
        while now <= 6000 {
            widget.tick(&mut canvas, t(now));
            now += 10;
        }
        assert_eq!(widget.watchdog().resets(), 2);
        assert_eq!(widget.widget().state(), 0);
        assert!(widget.widget().is_idle());
    }

    #[test]
    fn test_changing_request_restarts_timeout() {
        let states = [
            StateDescriptor::forward(seq(&TAGGED, 4)),
            StateDescriptor::forward(seq(&TAGGED_B, 4)),
        ];
        let desired = Cell::new(1u8);
        let query = || desired.get();
        let config = WidgetConfig::exclusive(&states, 0, 0)
            .with_frame_ms(10_000)
            .with_query(&query);
        let mut canvas = RecordingCanvas::default();
        let mut widget = Supervised::new(&config, 0, WatchdogConfig::default(), &mut canvas, t(0));

        // Flip the request every 900 ms; the timeout never runs out
        let mut now = 0;
        while now <= 4500 {
            if now % 900 == 0 {
                desired.set(1 - desired.get());
            }
            widget.tick(&mut canvas, t(now));
            assert!(!widget.watchdog().in_grace());
            now += 10;
        }
        assert_eq!(widget.watchdog().resets(), 0);
    }

    #[test]
    fn test_normal_transition_never_trips() {
        let states = [
            StateDescriptor::forward(seq(&TAGGED, 4)),
            StateDescriptor::forward(seq(&TAGGED_B, 4)),
        ];
        let desired = Cell::new(1u8);
        let query = || desired.get();
        let config = WidgetConfig::exclusive(&states, 0, 0).with_query(&query);
        let mut canvas = RecordingCanvas::default();
        let mut widget = Supervised::new(&config, 0, WatchdogConfig::default(), &mut canvas, t(0));

        let mut now = 0;
        while now <= 3000 {
            widget.tick(&mut canvas, t(now));
            now += 10;
        }
        assert_eq!(widget.watchdog().resets(), 0);
        assert_eq!(widget.widget().state(), 1);
    }
}
