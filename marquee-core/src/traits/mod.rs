//! Collaborator traits
//!
//! These traits define the interface between the animation engine and the
//! keyboard-specific code around it: the surface frames are drawn on and
//! the sources that decide which state a widget should show.

pub mod canvas;
pub mod query;

pub use canvas::Canvas;
pub use query::StateQuery;
