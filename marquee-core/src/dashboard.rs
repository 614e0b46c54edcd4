//! Widget arena with draw ordering
//!
//! A [`Dashboard`] owns every widget on one screen and ticks them in a fixed
//! order: all background widgets, then all foreground widgets. Opaque
//! background widgets clear their box before drawing, so an overlay drawn
//! before them in the same tick would be wiped. Keeping the order here
//! makes that impossible to get wrong at the call site.

use heapless::Vec;

use crate::time::{Clock, Timestamp};
use crate::traits::Canvas;
use crate::watchdog::{Supervised, WatchdogConfig, WatchdogStatus};
use crate::widget::WidgetConfig;

/// Maximum number of trigger links per dashboard
pub const MAX_LINKS: usize = 8;

/// Handle to a widget in a [`Dashboard`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WidgetId(u8);

impl WidgetId {
    /// Slot index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Draw layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layer {
    /// Drawn first; usually opaque, full-size art
    #[default]
    Background,
    /// Drawn after every background widget; usually additive overlays
    Foreground,
}

/// Dashboard setup errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DashboardError {
    /// No free widget slot
    Full,
    /// No free link slot
    LinksFull,
    /// Id does not name a widget of this dashboard
    UnknownWidget,
}

#[derive(Debug, Clone, Copy)]
struct Slot<'a> {
    widget: Supervised<'a>,
    layer: Layer,
}

/// Fixed-capacity set of up to `N` supervised widgets
#[derive(Debug)]
pub struct Dashboard<'a, const N: usize> {
    slots: Vec<Slot<'a>, N>,
    /// Slot indices, background before foreground
    order: Vec<u8, N>,
    /// (source, target): target is triggered when source starts a transition
    links: Vec<(WidgetId, WidgetId), MAX_LINKS>,
    watchdog: WatchdogConfig,
}

impl<'a, const N: usize> Default for Dashboard<'a, N> {
    fn default() -> Self {
        Self::new(WatchdogConfig::default())
    }
}

impl<'a, const N: usize> Dashboard<'a, N> {
    /// Create an empty dashboard; every widget gets a watchdog with `watchdog`
    pub const fn new(watchdog: WatchdogConfig) -> Self {
        Self {
            slots: Vec::new(),
            order: Vec::new(),
            links: Vec::new(),
            watchdog,
        }
    }

    /// Add a widget, drawing its initial frame
    ///
    /// Add background widgets before the foreground widgets they sit
    /// under, so initial frames land in draw order too.
    pub fn add<C: Canvas + ?Sized>(
        &mut self,
        config: &'a WidgetConfig<'a>,
        initial_state: u8,
        layer: Layer,
        canvas: &mut C,
        now: Timestamp,
    ) -> Result<WidgetId, DashboardError> {
        let index = self.slots.len();
        if index >= N || index > u8::MAX as usize {
            return Err(DashboardError::Full);
        }
        let id = WidgetId(index as u8);

        let widget = Supervised::new(config, initial_state, self.watchdog, canvas, now);
        self.slots
            .push(Slot { widget, layer })
            .map_err(|_| DashboardError::Full)?;

        // Stable: new background widgets go after existing ones but before
        // any foreground widget
        let position = match layer {
            Layer::Background => self
                .order
                .iter()
                .position(|&i| self.layer_of(i) == Some(Layer::Foreground))
                .unwrap_or(self.order.len()),
            Layer::Foreground => self.order.len(),
        };
        self.order
            .insert(position, id.0)
            .map_err(|_| DashboardError::Full)?;

        Ok(id)
    }

    /// Trigger `target` whenever `source` starts a transition
    ///
    /// The target is triggered before anything is drawn that tick, so it
    /// may sit on either layer. Links are not transitive: a linked trigger
    /// does not fire the target's own links.
    pub fn link(&mut self, source: WidgetId, target: WidgetId) -> Result<(), DashboardError> {
        self.check(source)?;
        self.check(target)?;
        self.links
            .push((source, target))
            .map_err(|_| DashboardError::LinksFull)
    }

    /// Tick every widget once
    ///
    /// Two passes: every widget polls its query first, links of the widgets
    /// that started a transition fire, then everything renders in draw
    /// order. A linked target therefore starts its effect on the same tick
    /// as its source, whichever layer either sits on.
    ///
    /// Returns the widgets whose transition completed this tick.
    pub fn tick<C: Canvas + ?Sized>(&mut self, canvas: &mut C, now: Timestamp) -> Vec<WidgetId, N> {
        // Capacity equals the slot count, so these pushes cannot overflow
        let mut busy_before: Vec<bool, N> = Vec::new();
        let mut started: Vec<WidgetId, N> = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let _ = busy_before.push(slot.widget.widget().is_busy());
            if slot.widget.poll(now) {
                let _ = started.push(WidgetId(index as u8));
            }
        }

        for &source in started.iter() {
            self.fire_links(source, now);
        }

        let mut completed = Vec::new();
        for &index in self.order.iter() {
            let Some(slot) = self.slots.get_mut(index as usize) else {
                continue;
            };
            let was_busy = busy_before.get(index as usize).copied().unwrap_or(false);
            let status = slot.widget.render(canvas, now);
            if (was_busy && slot.widget.widget().is_idle()) || status == WatchdogStatus::Reset {
                let _ = completed.push(WidgetId(index));
            }
        }

        completed
    }

    /// Read `clock` once and tick
    pub fn tick_with_clock<C: Canvas + ?Sized, K: Clock + ?Sized>(
        &mut self,
        canvas: &mut C,
        clock: &K,
    ) -> Vec<WidgetId, N> {
        self.tick(canvas, clock.now())
    }

    /// Trigger a widget (and its links, if accepted)
    ///
    /// Returns whether the widget accepted the trigger.
    pub fn trigger(&mut self, id: WidgetId, now: Timestamp) -> Result<bool, DashboardError> {
        let slot = self
            .slots
            .get_mut(id.index())
            .ok_or(DashboardError::UnknownWidget)?;
        let accepted = slot.widget.trigger(now);
        if accepted {
            self.fire_links(id, now);
        }
        Ok(accepted)
    }

    /// Jump a widget straight to `state`
    pub fn force_state<C: Canvas + ?Sized>(
        &mut self,
        id: WidgetId,
        state: u8,
        canvas: &mut C,
        now: Timestamp,
    ) -> Result<(), DashboardError> {
        let slot = self
            .slots
            .get_mut(id.index())
            .ok_or(DashboardError::UnknownWidget)?;
        slot.widget.force_state(state, canvas, now);
        Ok(())
    }

    /// Look up a widget
    pub fn widget(&self, id: WidgetId) -> Option<&Supervised<'a>> {
        self.slots.get(id.index()).map(|slot| &slot.widget)
    }

    /// Layer a widget was added on
    pub fn layer(&self, id: WidgetId) -> Option<Layer> {
        self.layer_of(id.0)
    }

    /// Widget ids in draw order
    pub fn draw_order(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.order.iter().map(|&index| WidgetId(index))
    }

    /// Number of widgets
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if no widget has been added
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn layer_of(&self, index: u8) -> Option<Layer> {
        self.slots.get(index as usize).map(|slot| slot.layer)
    }

    fn check(&self, id: WidgetId) -> Result<(), DashboardError> {
        if id.index() < self.slots.len() {
            Ok(())
        } else {
            Err(DashboardError::UnknownWidget)
        }
    }

    fn fire_links(&mut self, source: WidgetId, now: Timestamp) {
        for &(from, target) in self.links.iter() {
            if from != source {
                continue;
            }
            if let Some(slot) = self.slots.get_mut(target.index()) {
                slot.widget.trigger(now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{StateDescriptor, SteadyFrame};
    use crate::render::Blend;
    use crate::testing::{seq, RecordingCanvas, TAGGED, TAGGED_B, TAGGED_C};
    use crate::widget::Phase;
    use core::cell::Cell;

    fn t(ms: u32) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    #[test]
    fn test_background_drawn_before_foreground() {
        let overlay = WidgetConfig::toggle(seq(&TAGGED, 4), 0, 0).with_blend(Blend::Additive);
        let backdrop = WidgetConfig::toggle(seq(&TAGGED_B, 4), 0, 0);
        let badge = WidgetConfig::toggle(seq(&TAGGED_C, 4), 0, 0);
        let mut canvas = RecordingCanvas::default();
        let mut dash: Dashboard<'_, 4> = Dashboard::default();

        let fg = dash.add(&overlay, 0, Layer::Foreground, &mut canvas, t(0)).unwrap();
        let bg = dash.add(&backdrop, 0, Layer::Background, &mut canvas, t(0)).unwrap();
        let bg2 = dash.add(&badge, 0, Layer::Background, &mut canvas, t(0)).unwrap();
        assert_eq!(dash.draw_order().collect::<std::vec::Vec<_>>(), [bg, bg2, fg]);

        canvas.reset();
        dash.tick(&mut canvas, t(10));
        assert_eq!(canvas.drawn(), [10, 20, 0]);
    }

    #[test]
    fn test_capacity() {
        let config = WidgetConfig::toggle(seq(&TAGGED, 4), 0, 0);
        let mut canvas = RecordingCanvas::default();
        let mut dash: Dashboard<'_, 1> = Dashboard::default();

        assert!(dash.add(&config, 0, Layer::Background, &mut canvas, t(0)).is_ok());
        assert_eq!(
            dash.add(&config, 0, Layer::Background, &mut canvas, t(0)),
            Err(DashboardError::Full)
        );
        assert_eq!(dash.len(), 1);
    }

    #[test]
    fn test_unknown_widget() {
        let mut canvas = RecordingCanvas::default();
        let mut dash: Dashboard<'_, 2> = Dashboard::default();

        assert_eq!(dash.trigger(WidgetId(0), t(0)), Err(DashboardError::UnknownWidget));
        assert_eq!(
            dash.force_state(WidgetId(1), 0, &mut canvas, t(0)),
            Err(DashboardError::UnknownWidget)
        );
        assert_eq!(dash.link(WidgetId(0), WidgetId(1)), Err(DashboardError::UnknownWidget));
        assert!(dash.widget(WidgetId(0)).is_none());
    }

    #[test]
    fn test_link_triggers_on_transition_start() {
        let states = [
            StateDescriptor::forward(seq(&TAGGED, 4)),
            StateDescriptor::forward(seq(&TAGGED_B, 4)),
        ];
        let layer = Cell::new(0u8);
        let query = || layer.get();
        let layer_config = WidgetConfig::exclusive(&states, 0, 0).with_query(&query);
        let frame_config = WidgetConfig::out_and_back(seq(&TAGGED_C, 4), 0, 0, false)
            .with_blend(Blend::Additive);
        let mut canvas = RecordingCanvas::default();
        let mut dash: Dashboard<'_, 2> = Dashboard::default();

        let layer_id = dash.add(&layer_config, 0, Layer::Background, &mut canvas, t(0)).unwrap();
        let frame_id = dash.add(&frame_config, 0, Layer::Foreground, &mut canvas, t(0)).unwrap();
        dash.link(layer_id, frame_id).unwrap();

        dash.tick(&mut canvas, t(10));
        assert!(dash.widget(frame_id).unwrap().widget().is_idle());

        layer.set(1);
        dash.tick(&mut canvas, t(20));
        assert_eq!(dash.widget(layer_id).unwrap().widget().phase(), Phase::Exit);
        assert_eq!(dash.widget(frame_id).unwrap().widget().phase(), Phase::Exit);

        // No retrigger while the layer widget keeps animating
        dash.tick(&mut canvas, t(100));
        assert_eq!(dash.widget(frame_id).unwrap().widget().animator().index(), 2);
    }

    #[test]
    fn test_link_to_background_target_starts_same_tick() {
        let states = [
            StateDescriptor::forward(seq(&TAGGED, 4)),
            StateDescriptor::forward(seq(&TAGGED_B, 4)),
        ];
        let layer = Cell::new(0u8);
        let query = || layer.get();
        let layer_config = WidgetConfig::exclusive(&states, 0, 0)
            .with_query(&query)
            .with_blend(Blend::Additive);
        let flash_config = WidgetConfig::one_shot(seq(&TAGGED_C, 4), 0, 0, SteadyFrame::Last, false);
        let mut canvas = RecordingCanvas::default();
        let mut dash: Dashboard<'_, 2> = Dashboard::default();

        let layer_id = dash.add(&layer_config, 0, Layer::Foreground, &mut canvas, t(0)).unwrap();
        let flash_id = dash.add(&flash_config, 0, Layer::Background, &mut canvas, t(0)).unwrap();
        dash.link(layer_id, flash_id).unwrap();
        assert_eq!(dash.draw_order().collect::<std::vec::Vec<_>>(), [flash_id, layer_id]);

        layer.set(1);
        canvas.reset();
        dash.tick(&mut canvas, t(10));

        // Flash restarts from its first frame under the exiting layer art
        assert_eq!(canvas.drawn(), [20, 3]);
        assert_eq!(dash.widget(flash_id).unwrap().widget().phase(), Phase::Enter);
        assert_eq!(dash.widget(layer_id).unwrap().widget().phase(), Phase::Exit);
    }

    #[test]
    fn test_completed_ids_reported() {
        let flash = WidgetConfig::one_shot(seq(&TAGGED, 3), 0, 0, SteadyFrame::First, false);
        let idle = WidgetConfig::toggle(seq(&TAGGED_B, 3), 0, 0);
        let mut canvas = RecordingCanvas::default();
        let mut dash: Dashboard<'_, 2> = Dashboard::default();

        let _ = dash.add(&idle, 0, Layer::Background, &mut canvas, t(0)).unwrap();
        let flash_id = dash.add(&flash, 0, Layer::Foreground, &mut canvas, t(0)).unwrap();
        assert_eq!(dash.trigger(flash_id, t(0)), Ok(true));

        let mut completions = std::vec::Vec::new();
        let mut now = 10;
        while now <= 500 {
            for id in dash.tick(&mut canvas, t(now)) {
                completions.push((id, now));
            }
            now += 10;
        }
        assert_eq!(completions, [(flash_id, 240)]);
    }

    #[test]
    fn test_tick_with_clock_and_force() {
        let states = [
            StateDescriptor::forward(seq(&TAGGED, 4)),
            StateDescriptor::forward(seq(&TAGGED_B, 4)),
        ];
        let config = WidgetConfig::exclusive(&states, 0, 0);
        let mut canvas = RecordingCanvas::default();
        let mut dash: Dashboard<'_, 1> = Dashboard::default();
        let id = dash.add(&config, 0, Layer::Background, &mut canvas, t(0)).unwrap();

        dash.force_state(id, 1, &mut canvas, t(5)).unwrap();
        canvas.reset();
        let clock = || 50u32;
        dash.tick_with_clock(&mut canvas, &clock);
        assert_eq!(canvas.drawn(), [13]);
        assert_eq!(dash.layer(id), Some(Layer::Background));
    }
}
