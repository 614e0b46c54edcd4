//! Widget configuration and behavior presets
//!
//! Every widget is the same [`Widget`](super::Widget) machine; what differs
//! is this small, static configuration. The presets cover the widgets
//! a keyboard status screen needs:
//!
//! - [`WidgetConfig::exclusive`]: one of N states (active layer, WPM bucket)
//! - [`WidgetConfig::toggle`]: on/off indicator (a modifier)
//! - [`WidgetConfig::one_shot`]: play once, park (boot art, event flash)
//! - [`WidgetConfig::out_and_back`]: boot forward, blip back-and-forth on trigger
//! - [`WidgetConfig::bounce`]: play forward and straight back on trigger

use core::fmt;

use crate::anim::DEFAULT_FRAME_MS;
use crate::frame::{Sequence, StateDescriptor, SteadyFrame};
use crate::render::{Blend, Placement};
use crate::traits::StateQuery;

/// Behavior pattern selected by a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Behavior {
    /// Exactly one of N states; exit old state, then enter new one
    Exclusive,
    /// Two states sharing one sequence; off = first frame, on = last
    Toggle,
    /// Play forward once on boot or trigger, then park on the steady frame
    OneShot(SteadyFrame),
    /// Park on the last frame; a trigger plays last→first→last
    OutAndBack,
    /// Park on the steady frame; a trigger plays first→last→first
    Bounce(SteadyFrame),
}

/// The state table of a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum States<'a> {
    /// One descriptor (toggle and playback widgets)
    Single(StateDescriptor<'a>),
    /// One descriptor per logical state
    Table(&'a [StateDescriptor<'a>]),
}

impl<'a> States<'a> {
    /// Number of descriptors
    pub const fn len(&self) -> usize {
        match self {
            States::Single(_) => 1,
            States::Table(table) => table.len(),
        }
    }

    /// True if there are no descriptors
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Descriptor at `index`
    pub fn get(&self, index: u8) -> Option<&StateDescriptor<'a>> {
        match self {
            States::Single(desc) => (index == 0).then_some(desc),
            States::Table(table) => table.get(index as usize),
        }
    }

    /// Iterate over all descriptors
    pub fn iter(&self) -> impl Iterator<Item = &StateDescriptor<'a>> {
        let (single, table): (Option<&StateDescriptor<'a>>, &[StateDescriptor<'a>]) = match self {
            States::Single(desc) => (Some(desc), &[][..]),
            States::Table(table) => (None, *table),
        };
        single.into_iter().chain(table.iter())
    }
}

/// Static configuration of one widget
///
/// Built once (usually as a `static`) and shared by reference; the engine
/// never mutates it.
#[derive(Clone, Copy)]
pub struct WidgetConfig<'a> {
    /// Behavior pattern
    pub behavior: Behavior,
    /// Frames per logical state
    pub states: States<'a>,
    /// Position, blend policy and clear box
    pub placement: Placement,
    /// Frame cadence in milliseconds
    pub frame_ms: u16,
    /// Play the entry animation at init instead of drawing the steady frame
    pub boot: bool,
    /// Source of the desired state (exclusive and toggle widgets)
    pub query: Option<&'a dyn StateQuery>,
}

impl<'a> WidgetConfig<'a> {
    const fn base(behavior: Behavior, states: States<'a>, x: u8, y: u8) -> Self {
        Self {
            behavior,
            states,
            placement: Placement::at(x, y),
            frame_ms: DEFAULT_FRAME_MS,
            boot: false,
            query: None,
        }
    }

    /// Widget showing exactly one of `states`
    pub const fn exclusive(states: &'a [StateDescriptor<'a>], x: u8, y: u8) -> Self {
        Self::base(Behavior::Exclusive, States::Table(states), x, y)
    }

    /// On/off widget; "on" plays `sequence` forward, "off" plays it back
    pub const fn toggle(sequence: Sequence<'a>, x: u8, y: u8) -> Self {
        Self::base(
            Behavior::Toggle,
            States::Single(StateDescriptor::forward(sequence)),
            x,
            y,
        )
    }

    /// Play-once widget parking on `steady`
    pub const fn one_shot(
        sequence: Sequence<'a>,
        x: u8,
        y: u8,
        steady: SteadyFrame,
        boot: bool,
    ) -> Self {
        let mut config = Self::base(
            Behavior::OneShot(steady),
            States::Single(StateDescriptor::forward(sequence)),
            x,
            y,
        );
        config.boot = boot;
        config
    }

    /// Boot-then-reverse widget: resting frame is always the last one
    pub const fn out_and_back(sequence: Sequence<'a>, x: u8, y: u8, boot: bool) -> Self {
        let mut config = Self::base(
            Behavior::OutAndBack,
            States::Single(StateDescriptor::forward(sequence)),
            x,
            y,
        );
        config.boot = boot;
        config
    }

    /// Forward-then-back widget parking on `steady`
    ///
    /// Boot plays forward once and parks, like a one-shot.
    pub const fn bounce(
        sequence: Sequence<'a>,
        x: u8,
        y: u8,
        steady: SteadyFrame,
        boot: bool,
    ) -> Self {
        let mut config = Self::base(
            Behavior::Bounce(steady),
            States::Single(StateDescriptor::forward(sequence)),
            x,
            y,
        );
        config.boot = boot;
        config
    }

    /// Set the blend policy
    pub const fn with_blend(mut self, blend: Blend) -> Self {
        self.placement.blend = blend;
        self
    }

    /// Clear a fixed box instead of each frame's own size
    pub const fn with_bbox(mut self, width: u8, height: u8) -> Self {
        self.placement.bbox = Some((width, height));
        self
    }

    /// Set the frame cadence
    pub const fn with_frame_ms(mut self, frame_ms: u16) -> Self {
        self.frame_ms = frame_ms;
        self
    }

    /// Enable or disable the boot animation
    pub const fn with_boot(mut self, boot: bool) -> Self {
        self.boot = boot;
        self
    }

    /// Attach the desired-state source
    pub const fn with_query(mut self, query: &'a dyn StateQuery) -> Self {
        self.query = Some(query);
        self
    }

    /// Number of logical states the widget can show
    pub fn state_count(&self) -> u8 {
        match self.behavior {
            Behavior::Exclusive => self.states.len().min(u8::MAX as usize) as u8,
            Behavior::Toggle => 2,
            Behavior::OneShot(_) | Behavior::OutAndBack | Behavior::Bounce(_) => 1,
        }
    }

    /// Check the configuration can be animated
    ///
    /// A widget needs at least one state and no empty sequences.
    pub fn is_valid(&self) -> bool {
        !self.states.is_empty() && self.states.iter().all(|desc| !desc.sequence.is_empty())
    }
}

impl fmt::Debug for WidgetConfig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("behavior", &self.behavior)
            .field("states", &self.states)
            .field("placement", &self.placement)
            .field("frame_ms", &self.frame_ms)
            .field("boot", &self.boot)
            .field("query", &self.query.is_some())
            .finish()
    }
}
