//! Frames, sequences and per-state descriptors
//!
//! All of these are read-only views over asset data that lives in flash.
//! The engine never owns or mutates pixel payloads; it only picks which
//! frame to hand to the [`Canvas`](crate::traits::Canvas).

/// One still bitmap
///
/// The payload layout is opaque to the engine and interpreted by the
/// drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame<'a> {
    width: u8,
    height: u8,
    data: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Create a frame of `width` x `height` pixels over `data`
    pub const fn new(width: u8, height: u8, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Width in pixels
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u8 {
        self.height
    }

    /// Raw pixel payload
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }
}

/// Ordered, immutable list of frames
///
/// A usable sequence has at least one frame. Empty sequences can still be
/// constructed (so asset tables stay `const`), but every consumer treats
/// them as invalid configuration and draws nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sequence<'a> {
    frames: &'a [Frame<'a>],
}

impl<'a> Sequence<'a> {
    /// Wrap a frame table
    pub const fn new(frames: &'a [Frame<'a>]) -> Self {
        Self { frames }
    }

    /// Number of frames
    pub const fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if the sequence has no frames
    pub const fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the last frame, or `None` if empty
    pub const fn last_index(&self) -> Option<u8> {
        match self.frames.len() {
            0 => None,
            // Indices are u8; longer tables are truncated to 256 frames
            n if n > 256 => Some(u8::MAX),
            n => Some((n - 1) as u8),
        }
    }

    /// Frame at `index`
    pub fn get(&self, index: u8) -> Option<&'a Frame<'a>> {
        self.frames.get(index as usize)
    }

    /// First frame
    pub fn first(&self) -> Option<&'a Frame<'a>> {
        self.frames.first()
    }

    /// Last addressable frame
    pub fn last(&self) -> Option<&'a Frame<'a>> {
        self.last_index().and_then(|i| self.get(i))
    }

    /// Frame at one end of the sequence
    pub fn end(&self, end: SteadyFrame) -> Option<&'a Frame<'a>> {
        match end {
            SteadyFrame::First => self.first(),
            SteadyFrame::Last => self.last(),
        }
    }
}

/// Playback direction through a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// First frame to last
    #[default]
    Forward,
    /// Last frame to first
    Reverse,
}

impl Direction {
    /// Get the opposite direction
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// True for [`Direction::Forward`]
    pub const fn is_forward(self) -> bool {
        matches!(self, Direction::Forward)
    }

    /// Index step (+1 / -1)
    pub const fn delta(self) -> i16 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }

    /// The end of a sequence that playback in this direction finishes on
    pub const fn destination(self) -> SteadyFrame {
        match self {
            Direction::Forward => SteadyFrame::Last,
            Direction::Reverse => SteadyFrame::First,
        }
    }
}

/// Which end of a sequence is shown while idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SteadyFrame {
    /// Frame 0
    First,
    /// Frame `count - 1`
    #[default]
    Last,
}

/// How one logical state of a widget is animated
///
/// Entering the state plays `sequence` in `enter`; leaving it plays the
/// same frames in the opposite direction, so enter and exit are always
/// visual inverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateDescriptor<'a> {
    /// Frames for this state in canonical order
    pub sequence: Sequence<'a>,
    /// Direction used when entering the state
    pub enter: Direction,
}

impl<'a> StateDescriptor<'a> {
    /// State entered by playing forward (steady = last frame)
    pub const fn forward(sequence: Sequence<'a>) -> Self {
        Self {
            sequence,
            enter: Direction::Forward,
        }
    }

    /// State entered by playing backward (steady = first frame)
    pub const fn reverse(sequence: Sequence<'a>) -> Self {
        Self {
            sequence,
            enter: Direction::Reverse,
        }
    }

    /// Direction used when leaving the state
    pub const fn exit(&self) -> Direction {
        self.enter.opposite()
    }

    /// End of the sequence shown while the state is steady
    pub const fn steady_end(&self) -> SteadyFrame {
        self.enter.destination()
    }

    /// Frame shown while the state is steady
    pub fn steady_frame(&self) -> Option<&'a Frame<'a>> {
        self.sequence.end(self.steady_end())
    }
}
