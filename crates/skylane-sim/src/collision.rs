//! Pairwise separation warnings.

use skylane_core::types::Vector2D;

use crate::airspace::ObjectId;

/// The parts of an object the separation check looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationSample {
    pub id: ObjectId,
    pub position: Vector2D,
    pub altitude: f64,
    pub size: f64,
}

/// Two objects closer than the warning thresholds. Symmetric: swapping the
/// arguments yields the same distances and collision result.
#[derive(Debug, Clone, Copy)]
pub struct CollisionWarning {
    first: ObjectId,
    second: ObjectId,
    lateral_distance: f64,
    vertical_distance: f64,
    collided: bool,
}

impl CollisionWarning {
    pub fn new(a: &SeparationSample, b: &SeparationSample, collision_vertical_separation: f64) -> Self {
        Self {
            first: a.id,
            second: b.id,
            lateral_distance: lateral_distance(a, b),
            vertical_distance: vertical_distance(a, b),
            collided: collides(a, b, collision_vertical_separation),
        }
    }

    pub fn pair(&self) -> (ObjectId, ObjectId) {
        (self.first, self.second)
    }

    pub fn involves(&self, id: ObjectId) -> bool {
        self.first == id || self.second == id
    }

    /// Ground distance between the two objects.
    pub fn lateral_distance(&self) -> f64 {
        self.lateral_distance
    }

    /// Absolute altitude difference.
    pub fn vertical_distance(&self) -> f64 {
        self.vertical_distance
    }

    /// Exclusion zones overlap laterally and the altitudes are within the
    /// hard collision threshold.
    pub fn has_collided(&self) -> bool {
        self.collided
    }
}

/// Pairs compare as unordered.
impl PartialEq for CollisionWarning {
    fn eq(&self, other: &Self) -> bool {
        let same_pair = (self.first == other.first && self.second == other.second)
            || (self.first == other.second && self.second == other.first);
        same_pair
            && self.lateral_distance == other.lateral_distance
            && self.vertical_distance == other.vertical_distance
            && self.collided == other.collided
    }
}

pub fn lateral_distance(a: &SeparationSample, b: &SeparationSample) -> f64 {
    a.position.distance_to(b.position)
}

pub fn vertical_distance(a: &SeparationSample, b: &SeparationSample) -> f64 {
    (a.altitude - b.altitude).abs()
}

pub fn collides(a: &SeparationSample, b: &SeparationSample, collision_vertical_separation: f64) -> bool {
    lateral_distance(a, b) < a.size + b.size
        && vertical_distance(a, b) < collision_vertical_separation
}
