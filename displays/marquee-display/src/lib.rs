//! Reference drawing surface for marquee widgets
//!
//! This crate provides:
//! - `FrameBuffer`, a page-packed 1-bpp buffer implementing the engine's
//!   `Canvas` trait (OR-blend drawing, clipped clears, dirty-page tracking)
//! - `DisplayBackend` trait for the panel the buffer is flushed to
//!
//! # Architecture
//!
//! Widgets draw into the buffer during the render tick; afterwards the
//! host flushes only the pages that changed:
//!
//! ```ignore
//! let completed = dashboard.tick(&mut fb, now);
//! fb.flush(&mut ssd1306)?;
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod framebuffer;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use framebuffer::{FrameBuffer, Oled128x32, Oled128x64};
