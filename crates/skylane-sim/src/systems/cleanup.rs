//! Cull system: moves out-of-bounds and finished aircraft to the culled list.

use hecs::{Entity, World};

use skylane_core::types::Rectangle;

use crate::aircraft::Aircraft;
use crate::airspace::CulledObject;
use crate::kinematics::Kinematics;

/// Purge last tick's culled objects, then cull this tick's.
/// Uses a caller-owned buffer to avoid per-tick allocation.
pub fn run(
    world: &mut World,
    bounds: &Rectangle,
    culled: &mut Vec<CulledObject>,
    cull_buffer: &mut Vec<Entity>,
) {
    culled.clear();
    cull_buffer.clear();

    for (entity, (kinematics, aircraft)) in world.query_mut::<(&Kinematics, &Aircraft)>() {
        if aircraft.is_finished() || !bounds.contains(kinematics.position()) {
            cull_buffer.push(entity);
        }
    }

    for entity in cull_buffer.drain(..) {
        if let Some(object) = take(world, entity) {
            culled.push(object);
        }
    }
}

/// Remove an entity from the world, keeping its components.
pub fn take(world: &mut World, entity: Entity) -> Option<CulledObject> {
    let (kinematics, aircraft) = world.remove::<(Kinematics, Aircraft)>(entity).ok()?;
    let _ = world.despawn(entity);
    Some(CulledObject {
        id: entity,
        kinematics,
        aircraft,
    })
}
