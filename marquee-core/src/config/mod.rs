//! Configuration types
//!
//! Engine tunables stored as postcard binary data. Per-widget
//! configuration lives with the widget ([`crate::widget::WidgetConfig`]).

pub mod engine;

pub use engine::*;
