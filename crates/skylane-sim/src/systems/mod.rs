//! Systems that operate on the airspace world each tick.
//!
//! Systems are free functions over `&mut World` plus whatever buffers the
//! caller owns. They hold no state between ticks.

pub mod advance;
pub mod cleanup;
pub mod separation;
