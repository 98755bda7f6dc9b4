//! Motion and flight-plan progress for every active aircraft.

use hecs::World;

use crate::aircraft::{Aircraft, FlightEvent};
use crate::airspace::ObjectId;
use crate::kinematics::Kinematics;

/// Refresh every aircraft and collect what happened to them.
pub fn run(world: &mut World, dt: f64, events: &mut Vec<(ObjectId, FlightEvent)>) {
    for (entity, (kinematics, aircraft)) in world.query_mut::<(&mut Kinematics, &mut Aircraft)>() {
        if let Some(event) = aircraft.refresh(kinematics, dt) {
            events.push((entity, event));
        }
    }
}
