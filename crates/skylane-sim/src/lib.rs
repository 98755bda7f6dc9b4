//! Headless air traffic simulation.
//!
//! Owns the hecs world of aircraft, runs the per-tick pipeline and generates
//! flight plans for new traffic. Nothing here touches the network.

pub mod aircraft;
pub mod airspace;
pub mod collision;
pub mod generator;
pub mod kinematics;
pub mod spawner;
pub mod systems;

pub use airspace::{Airspace, ObjectId};
pub use skylane_core as core;
