//! Enumeration types used throughout the simulation and the wire protocol.

use serde::{Deserialize, Serialize};

/// Aircraft kind tag. Selects a row of the capability table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AircraftKind {
    /// Large, slow-turning passenger aircraft.
    #[default]
    Airliner,
    /// Fast business jet.
    Jet,
    /// Small propeller aircraft, slow but agile.
    Prop,
}

impl AircraftKind {
    pub const ALL: [AircraftKind; 3] = [AircraftKind::Airliner, AircraftKind::Jet, AircraftKind::Prop];
}

/// Continuous turn requested by an operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurningState {
    #[default]
    Straight,
    /// Counter-clockwise (positive angle).
    Left,
    /// Clockwise (negative angle).
    Right,
}

impl TurningState {
    /// Sign applied to the turn rate.
    pub fn sign(self) -> f64 {
        match self {
            TurningState::Straight => 0.0,
            TurningState::Left => 1.0,
            TurningState::Right => -1.0,
        }
    }
}

/// Which player currently directs an aircraft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    #[default]
    Server,
    Client,
}

impl Controller {
    pub fn other(self) -> Controller {
        match self {
            Controller::Server => Controller::Client,
            Controller::Client => Controller::Server,
        }
    }
}

/// Connection state of a replication endpoint. `Closed` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointState {
    #[default]
    Connecting,
    Connected,
    Closed,
}
