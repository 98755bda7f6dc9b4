//! Flight plans: the immutable route an aircraft is expected to fly.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Vector2D;

/// Ordered waypoints plus initial kinematic state and landing intent.
///
/// Always holds at least two waypoints; deserialization enforces the same rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FlightPlanData")]
pub struct FlightPlan {
    waypoints: Vec<Vector2D>,
    initial_speed: f64,
    initial_altitude: f64,
    landing: bool,
    start_on_runway: bool,
}

#[derive(Deserialize)]
struct FlightPlanData {
    waypoints: Vec<Vector2D>,
    initial_speed: f64,
    initial_altitude: f64,
    landing: bool,
    start_on_runway: bool,
}

impl TryFrom<FlightPlanData> for FlightPlan {
    type Error = ConfigError;

    fn try_from(data: FlightPlanData) -> Result<Self, Self::Error> {
        FlightPlan::new(
            data.waypoints,
            data.initial_speed,
            data.initial_altitude,
            data.landing,
            data.start_on_runway,
        )
    }
}

impl FlightPlan {
    pub fn new(
        waypoints: Vec<Vector2D>,
        initial_speed: f64,
        initial_altitude: f64,
        landing: bool,
        start_on_runway: bool,
    ) -> Result<Self, ConfigError> {
        if waypoints.len() < 2 {
            return Err(ConfigError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }
        Ok(Self {
            waypoints,
            initial_speed,
            initial_altitude,
            landing,
            start_on_runway,
        })
    }

    pub fn waypoints(&self) -> &[Vector2D] {
        &self.waypoints
    }

    pub fn waypoint(&self, index: usize) -> Option<Vector2D> {
        self.waypoints.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false for a constructed plan.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn first(&self) -> Vector2D {
        self.waypoints[0]
    }

    pub fn last(&self) -> Vector2D {
        self.waypoints[self.waypoints.len() - 1]
    }

    pub fn initial_speed(&self) -> f64 {
        self.initial_speed
    }

    pub fn initial_altitude(&self) -> f64 {
        self.initial_altitude
    }

    pub fn is_landing(&self) -> bool {
        self.landing
    }

    pub fn starts_on_runway(&self) -> bool {
        self.start_on_runway
    }

    /// Heading of the final leg (second-to-last toward last waypoint).
    /// For a landing plan this is the runway heading.
    pub fn final_heading(&self) -> f64 {
        let n = self.waypoints.len();
        (self.waypoints[n - 1] - self.waypoints[n - 2]).angle()
    }

    /// Heading of the first leg.
    pub fn initial_heading(&self) -> f64 {
        (self.waypoints[1] - self.waypoints[0]).angle()
    }

    /// True if `index` is one of the two runway points ending a landing plan.
    pub fn is_final_approach(&self, index: usize) -> bool {
        self.landing && index + 2 >= self.waypoints.len()
    }
}
