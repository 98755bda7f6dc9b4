//! Core types and definitions for the skylane air traffic simulation.
//!
//! This crate defines the vocabulary shared across the other crates:
//! geometry, flight plans, configuration, constants and errors.
//! It has no dependency on the simulation runtime or the network layer.

pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod flight_plan;
pub mod types;

#[cfg(test)]
mod tests;
