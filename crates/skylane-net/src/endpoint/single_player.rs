use skylane_core::enums::{EndpointState, TurningState};
use skylane_core::types::Vector2D;
use skylane_sim::{Airspace, ObjectId};

use super::Endpoint;

/// No network: intents go straight to a locally owned airspace.
pub struct SinglePlayerEndpoint {
    airspace: Airspace,
    state: EndpointState,
}

impl SinglePlayerEndpoint {
    pub fn new(airspace: Airspace) -> Self {
        Self {
            airspace,
            state: EndpointState::Connected,
        }
    }
}

impl Endpoint for SinglePlayerEndpoint {
    fn state(&self) -> EndpointState {
        self.state
    }

    fn airspace(&self) -> &Airspace {
        &self.airspace
    }

    fn act_begin(&mut self) {}

    fn act_end(&mut self, delta: f64) {
        if self.state == EndpointState::Connected {
            self.airspace.refresh(delta);
        }
    }

    fn take_off(&mut self) {
        self.airspace.take_off();
    }

    fn set_target_velocity(&mut self, id: ObjectId, target: Vector2D) {
        self.airspace.set_target_velocity(id, target);
    }

    fn set_target_altitude(&mut self, id: ObjectId, target: f64) {
        self.airspace.set_target_altitude(id, target);
    }

    fn set_turning(&mut self, id: ObjectId, turning: TurningState) {
        self.airspace.set_turning(id, turning);
    }

    fn hand_over(&mut self, id: ObjectId) {
        self.airspace.hand_over(id);
    }

    fn close(&mut self) {
        self.state = EndpointState::Closed;
    }
}
