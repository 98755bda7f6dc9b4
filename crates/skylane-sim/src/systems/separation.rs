//! Separation and collision pass over every unordered pair of solid aircraft.

use hecs::World;

use skylane_core::config::AirspaceConfig;

use crate::aircraft::Aircraft;
use crate::collision::{self, CollisionWarning, SeparationSample};
use crate::kinematics::Kinematics;

/// Rebuild `warnings` and mark exactly the warned aircraft as violated.
/// Returns true if any pair collided.
pub fn run(world: &mut World, config: &AirspaceConfig, warnings: &mut Vec<CollisionWarning>) -> bool {
    warnings.clear();

    let mut samples = Vec::new();
    for (id, (kinematics, aircraft)) in world.query_mut::<(&Kinematics, &mut Aircraft)>() {
        aircraft.clear_violated();
        if aircraft.is_solid() {
            samples.push(SeparationSample {
                id,
                position: kinematics.position(),
                altitude: kinematics.altitude(),
                size: kinematics.size(),
            });
        }
    }

    let mut collided = false;
    for (i, a) in samples.iter().enumerate() {
        for b in &samples[i + 1..] {
            if collision::collides(a, b, config.collision_vertical_separation) {
                collided = true;
            }
            if collision::lateral_distance(a, b) < config.lateral_separation
                && collision::vertical_distance(a, b) < config.vertical_separation
            {
                warnings.push(CollisionWarning::new(a, b, config.collision_vertical_separation));
            }
        }
    }

    for warning in warnings.iter() {
        let (first, second) = warning.pair();
        for id in [first, second] {
            if let Ok(mut aircraft) = world.get::<&mut Aircraft>(id) {
                aircraft.mark_violated();
            }
        }
    }

    collided
}
