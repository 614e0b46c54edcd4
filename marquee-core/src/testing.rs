//! Shared test fixtures: tagged frames and a recording canvas

use std::vec::Vec;

use crate::frame::{Frame, Sequence};
use crate::traits::Canvas;

/// Ten 8x8 frames whose single payload byte is their index
pub static TAGGED: [Frame<'static>; 10] = [
    Frame::new(8, 8, &[0]),
    Frame::new(8, 8, &[1]),
    Frame::new(8, 8, &[2]),
    Frame::new(8, 8, &[3]),
    Frame::new(8, 8, &[4]),
    Frame::new(8, 8, &[5]),
    Frame::new(8, 8, &[6]),
    Frame::new(8, 8, &[7]),
    Frame::new(8, 8, &[8]),
    Frame::new(8, 8, &[9]),
];

/// Second frame set, tags 10..=19
pub static TAGGED_B: [Frame<'static>; 10] = [
    Frame::new(8, 8, &[10]),
    Frame::new(8, 8, &[11]),
    Frame::new(8, 8, &[12]),
    Frame::new(8, 8, &[13]),
    Frame::new(8, 8, &[14]),
    Frame::new(8, 8, &[15]),
    Frame::new(8, 8, &[16]),
    Frame::new(8, 8, &[17]),
    Frame::new(8, 8, &[18]),
    Frame::new(8, 8, &[19]),
];

/// Third frame set, tags 20..=29
pub static TAGGED_C: [Frame<'static>; 10] = [
    Frame::new(8, 8, &[20]),
    Frame::new(8, 8, &[21]),
    Frame::new(8, 8, &[22]),
    Frame::new(8, 8, &[23]),
    Frame::new(8, 8, &[24]),
    Frame::new(8, 8, &[25]),
    Frame::new(8, 8, &[26]),
    Frame::new(8, 8, &[27]),
    Frame::new(8, 8, &[28]),
    Frame::new(8, 8, &[29]),
];

/// First `n` frames of `set` as a sequence
pub fn seq(set: &'static [Frame<'static>; 10], n: usize) -> Sequence<'static> {
    Sequence::new(&set[..n])
}

/// Tag byte identifying a test frame
pub fn frame_tag(frame: &Frame<'_>) -> u8 {
    frame.data().first().copied().unwrap_or(u8::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Draw(u8, u8, u8),
    Clear(u8, u8, u8, u8),
}

/// Canvas that remembers every call
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<Op>,
}

impl RecordingCanvas {
    /// Tags of drawn frames, in order
    pub fn drawn(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Draw(tag, _, _) => Some(*tag),
                Op::Clear(..) => None,
            })
            .collect()
    }

    /// Tag of the most recently drawn frame
    pub fn last_drawn(&self) -> Option<u8> {
        self.drawn().last().copied()
    }

    /// Forget recorded operations
    pub fn reset(&mut self) {
        self.ops.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn draw_frame(&mut self, frame: &Frame<'_>, x: u8, y: u8) {
        self.ops.push(Op::Draw(frame_tag(frame), x, y));
    }

    fn clear_rect(&mut self, x: u8, y: u8, width: u8, height: u8) {
        self.ops.push(Op::Clear(x, y, width, height));
    }
}
