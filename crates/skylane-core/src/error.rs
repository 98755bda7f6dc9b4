//! Configuration errors.
//!
//! These describe programming or data-file mistakes. The simulation itself
//! never produces errors during normal operation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a flight plan needs at least 2 waypoints, got {count}")]
    TooFewWaypoints { count: usize },

    #[error("world bounds must have a positive area")]
    EmptyBounds,

    #[error("at least 2 entry/exit points are required, got {count}")]
    TooFewEntryPoints { count: usize },

    #[error("waypoint count range {min}..={max} is empty")]
    WaypointRange { min: usize, max: usize },

    #[error("{0} must not be empty")]
    EmptyChoiceSet(&'static str),

    #[error("{0} must be finite")]
    NonFinite(&'static str),

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}
