//! Simulation constants, tuning parameters and the aircraft capability table.

use serde::{Deserialize, Serialize};

use crate::enums::AircraftKind;

// --- World layout ---

/// World dimensions in world units.
pub const WORLD_WIDTH: f64 = 1280.0;
pub const WORLD_HEIGHT: f64 = 720.0;

/// Shared waypoint graph: a 5x4 grid across the airspace.
pub const WAYPOINTS: [(f64, f64); 20] = [
    (200.0, 140.0),
    (420.0, 140.0),
    (640.0, 140.0),
    (860.0, 140.0),
    (1080.0, 140.0),
    (200.0, 290.0),
    (420.0, 290.0),
    (640.0, 290.0),
    (860.0, 290.0),
    (1080.0, 290.0),
    (200.0, 430.0),
    (420.0, 430.0),
    (640.0, 430.0),
    (860.0, 430.0),
    (1080.0, 430.0),
    (200.0, 580.0),
    (420.0, 580.0),
    (640.0, 580.0),
    (860.0, 580.0),
    (1080.0, 580.0),
];

/// Entry/exit points on the world edge.
pub const ENTRY_EXITS: [(f64, f64); 8] = [
    (0.0, 200.0),
    (0.0, 520.0),
    (WORLD_WIDTH, 200.0),
    (WORLD_WIDTH, 520.0),
    (400.0, 0.0),
    (880.0, 0.0),
    (400.0, WORLD_HEIGHT),
    (880.0, WORLD_HEIGHT),
];

/// Runways as (start, end). Landing approaches fly start then end.
pub const RUNWAYS: [((f64, f64), (f64, f64)); 2] = [
    ((300.0, 360.0), (460.0, 360.0)),
    ((1000.0, 500.0), (840.0, 500.0)),
];

// --- Separation ---

/// Lateral distance below which a pair is warned about.
pub const LATERAL_SEPARATION: f64 = 100.0;

/// Altitude difference below which a pair is warned about.
pub const VERTICAL_SEPARATION: f64 = 1000.0;

/// Altitude difference below which overlapping aircraft collide.
pub const COLLISION_VERTICAL_SEPARATION: f64 = 200.0;

// --- Aircraft behaviour ---

/// Decay events of immunity granted at spawn.
pub const INITIAL_GRACE_PERIOD: u32 = 5;

/// Decay events of immunity granted per captured waypoint.
pub const WAYPOINT_GRACE_BONUS: u32 = 3;

/// Bearing tolerance for capturing a runway waypoint (radians, ±5°).
pub const LANDING_ALIGNMENT_TOLERANCE: f64 = 5.0 * std::f64::consts::PI / 180.0;

/// Seconds of accumulated time per score decay event.
pub const DECAY_INTERVAL_SECS: f64 = 1.0;

// --- Flight plan generation ---

pub const MIN_WAYPOINTS: usize = 2;
pub const MAX_WAYPOINTS: usize = 5;

/// Longest leg between consecutive generated waypoints.
pub const MAX_HOP_DISTANCE: f64 = 500.0;

/// No solid aircraft may be this close to an entry point used for a new plan.
pub const MIN_SAFE_ENTRY_DISTANCE: f64 = 150.0;

/// Chance that an arriving plan ends on a runway instead of an exit.
pub const LANDING_PROBABILITY: f64 = 0.25;

pub const SPAWN_SPEEDS: [f64; 3] = [30.0, 40.0, 50.0];
pub const SPAWN_ALTITUDES: [f64; 4] = [20_000.0, 24_000.0, 28_000.0, 32_000.0];

// --- Arrival schedule ---

/// Minimum seconds between two automatic arrivals.
pub const MIN_INTER_ARRIVAL_SECS: f64 = 3.0;

/// Automatic arrivals stop at this population.
pub const MAX_AIRCRAFT: usize = 10;

/// Expected automatic arrivals per second once the interval has elapsed.
pub const ARRIVAL_RATE_PER_SEC: f64 = 0.2;

// --- Capability table ---

/// Motion bounds of a kinematic object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicLimits {
    /// Collision radius (world units).
    pub size: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub min_altitude: f64,
    pub max_altitude: f64,
    /// Radians per second.
    pub max_turn_rate: f64,
    /// Speed change per second.
    pub max_acceleration: f64,
    /// Altitude change per second.
    pub ascent_rate: f64,
}

/// Per-kind constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindProfile {
    pub limits: KinematicLimits,
    pub weight: f64,
    pub crew: u32,
    pub initial_score: i32,
    /// Score lost per decay event outside the grace period.
    pub decay_rate: i32,
}

pub const AIRLINER_LIMITS: KinematicLimits = KinematicLimits {
    size: 32.0,
    min_speed: 25.0,
    max_speed: 55.0,
    min_altitude: 0.0,
    max_altitude: 40_000.0,
    max_turn_rate: 0.5,
    max_acceleration: 5.0,
    ascent_rate: 300.0,
};

pub const JET_LIMITS: KinematicLimits = KinematicLimits {
    size: 24.0,
    min_speed: 30.0,
    max_speed: 70.0,
    min_altitude: 0.0,
    max_altitude: 45_000.0,
    max_turn_rate: 1.0,
    max_acceleration: 10.0,
    ascent_rate: 600.0,
};

pub const PROP_LIMITS: KinematicLimits = KinematicLimits {
    size: 20.0,
    min_speed: 20.0,
    max_speed: 45.0,
    min_altitude: 0.0,
    max_altitude: 30_000.0,
    max_turn_rate: 0.8,
    max_acceleration: 6.0,
    ascent_rate: 400.0,
};

pub fn kind_profile(kind: AircraftKind) -> KindProfile {
    match kind {
        AircraftKind::Airliner => KindProfile {
            limits: AIRLINER_LIMITS,
            weight: 70_000.0,
            crew: 8,
            initial_score: 1000,
            decay_rate: 10,
        },
        AircraftKind::Jet => KindProfile {
            limits: JET_LIMITS,
            weight: 15_000.0,
            crew: 3,
            initial_score: 800,
            decay_rate: 15,
        },
        AircraftKind::Prop => KindProfile {
            limits: PROP_LIMITS,
            weight: 2_500.0,
            crew: 2,
            initial_score: 600,
            decay_rate: 8,
        },
    }
}
