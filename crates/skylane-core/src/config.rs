//! Airspace and flight-plan generator configuration.
//!
//! Both configs default to the built-in map and tuning constants and can be
//! loaded from JSON. Loading validates the values the simulation relies on.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::types::{Rectangle, Runway, Vector2D};

/// Static description of an airspace: bounds, separation thresholds and the
/// point sets flight plans are built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirspaceConfig {
    pub bounds: Rectangle,
    /// Warning threshold for ground distance.
    pub lateral_separation: f64,
    /// Warning threshold for altitude difference.
    pub vertical_separation: f64,
    /// Altitude difference below which overlapping aircraft collide.
    pub collision_vertical_separation: f64,
    pub waypoints: Vec<Vector2D>,
    pub entry_exits: Vec<Vector2D>,
    pub runways: Vec<Runway>,
}

impl Default for AirspaceConfig {
    fn default() -> Self {
        Self {
            bounds: Rectangle::new(Vector2D::ZERO, Vector2D::new(WORLD_WIDTH, WORLD_HEIGHT)),
            lateral_separation: LATERAL_SEPARATION,
            vertical_separation: VERTICAL_SEPARATION,
            collision_vertical_separation: COLLISION_VERTICAL_SEPARATION,
            waypoints: WAYPOINTS.iter().copied().map(Vector2D::from).collect(),
            entry_exits: ENTRY_EXITS.iter().copied().map(Vector2D::from).collect(),
            runways: RUNWAYS
                .iter()
                .map(|&(start, end)| Runway::new(start.into(), end.into()))
                .collect(),
        }
    }
}

impl AirspaceConfig {
    /// Parse and validate a JSON airspace description.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AirspaceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bounds.width() <= 0.0 || self.bounds.height() <= 0.0 {
            return Err(ConfigError::EmptyBounds);
        }
        if self.entry_exits.len() < 2 {
            return Err(ConfigError::TooFewEntryPoints {
                count: self.entry_exits.len(),
            });
        }
        Ok(())
    }
}

/// Flight-plan generator and arrival schedule tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Bounds on interior (non entry/exit) waypoints per plan.
    pub min_waypoints: usize,
    pub max_waypoints: usize,
    pub max_hop_distance: f64,
    pub min_safe_entry_distance: f64,
    pub allow_landing: bool,
    pub landing_probability: f64,
    pub speeds: Vec<f64>,
    pub altitudes: Vec<f64>,
    pub min_inter_arrival_secs: f64,
    pub max_aircraft: usize,
    pub arrival_rate_per_sec: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_waypoints: MIN_WAYPOINTS,
            max_waypoints: MAX_WAYPOINTS,
            max_hop_distance: MAX_HOP_DISTANCE,
            min_safe_entry_distance: MIN_SAFE_ENTRY_DISTANCE,
            allow_landing: true,
            landing_probability: LANDING_PROBABILITY,
            speeds: SPAWN_SPEEDS.to_vec(),
            altitudes: SPAWN_ALTITUDES.to_vec(),
            min_inter_arrival_secs: MIN_INTER_ARRIVAL_SECS,
            max_aircraft: MAX_AIRCRAFT,
            arrival_rate_per_sec: ARRIVAL_RATE_PER_SEC,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Every plan has at least the first hop.
        if self.min_waypoints > self.max_waypoints || self.max_waypoints == 0 {
            return Err(ConfigError::WaypointRange {
                min: self.min_waypoints,
                max: self.max_waypoints,
            });
        }
        if self.speeds.is_empty() {
            return Err(ConfigError::EmptyChoiceSet("speeds"));
        }
        if self.altitudes.is_empty() {
            return Err(ConfigError::EmptyChoiceSet("altitudes"));
        }
        let scalars = [
            ("max_hop_distance", self.max_hop_distance),
            ("min_safe_entry_distance", self.min_safe_entry_distance),
            ("landing_probability", self.landing_probability),
            ("min_inter_arrival_secs", self.min_inter_arrival_secs),
            ("arrival_rate_per_sec", self.arrival_rate_per_sec),
        ];
        if let Some(&(name, _)) = scalars.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NonFinite(name));
        }
        if !self.speeds.iter().all(|v| v.is_finite()) {
            return Err(ConfigError::NonFinite("speeds"));
        }
        if !self.altitudes.iter().all(|v| v.is_finite()) {
            return Err(ConfigError::NonFinite("altitudes"));
        }
        Ok(())
    }
}
