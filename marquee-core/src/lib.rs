//! Allocation-free animation engine for keyboard OLED status widgets
//!
//! This crate contains everything that does not depend on a specific
//! display or keyboard firmware:
//!
//! - Wraparound-safe millisecond timing
//! - Frame sequences and a reversible frame animator
//! - The generalized widget transition controller and its presets
//!   (exclusive, toggle, one-shot, out-and-back)
//! - A watchdog that force-completes stuck transitions
//! - Desired-state query sources and a draw-ordered widget dashboard
//! - Engine tunables with postcard persistence
//!
//! Everything is driven by one synchronous `tick(now)` per frame from the
//! host's render loop. Drawing goes through the [`Canvas`] trait.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod anim;
pub mod config;
pub mod dashboard;
pub mod frame;
pub mod query;
pub mod render;
pub mod time;
pub mod traits;
pub mod watchdog;
pub mod widget;

#[cfg(test)]
mod testing;

pub use anim::{Animator, StepResult};
pub use dashboard::{Dashboard, DashboardError, Layer, WidgetId};
pub use frame::{Direction, Frame, Sequence, StateDescriptor, SteadyFrame};
pub use render::{Blend, Placement};
pub use time::{Clock, Timestamp};
pub use traits::{Canvas, StateQuery};
pub use watchdog::{Supervised, Watchdog, WatchdogConfig, WatchdogStatus};
pub use widget::{Behavior, Phase, TogglePhase, Widget, WidgetConfig};
