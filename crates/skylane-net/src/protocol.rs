//! Wire messages exchanged between server and client.
//!
//! Any change to a message's fields, their types or order, or to the set of
//! messages requires bumping [`PROTOCOL_VERSION`]. The version message itself
//! never changes shape.

use serde::{Deserialize, Serialize};

use skylane_core::enums::{AircraftKind, TurningState};
use skylane_core::flight_plan::FlightPlan;
use skylane_core::types::Vector2D;
use skylane_sim::aircraft::ReplicatedState;

pub const PROTOCOL_VERSION: u32 = 3;

/// Aircraft id as assigned by the server's id map.
pub type WireId = u32;

/// One-byte message tags. `VERSION` is fixed at 0.
pub mod tags {
    pub const VERSION: u8 = 0;
    pub const SET_ALTITUDE: u8 = 1;
    pub const SET_VELOCITY: u8 = 2;
    pub const SET_TURNING: u8 = 3;
    pub const TAKE_OFF: u8 = 4;
    pub const HANDOVER: u8 = 5;
    pub const AIRCRAFT_CREATE: u8 = 16;
    pub const AIRCRAFT_DESTROY: u8 = 17;
    pub const AIRCRAFT_UPDATE: u8 = 18;
    pub const GAME_START: u8 = 19;
    pub const GAME_END: u8 = 20;
    pub const SCORE_UPDATE: u8 = 21;
    pub const LANDED_UPDATE: u8 = 22;
}

// --- Client to server ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetAltitude {
    pub aircraft_id: WireId,
    pub target: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetVelocity {
    pub aircraft_id: WireId,
    pub target: Vector2D,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetTurning {
    pub aircraft_id: WireId,
    pub turning: TurningState,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Handover {
    pub aircraft_id: WireId,
}

// --- Server to client ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftCreate {
    pub id: WireId,
    pub name: String,
    pub kind: AircraftKind,
    pub flight_plan: FlightPlan,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftDestroy {
    pub id: WireId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftUpdate {
    pub id: WireId,
    pub state: ReplicatedState,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameStart {
    pub lateral_separation: f64,
    pub vertical_separation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameEnd {
    pub final_time: f64,
    pub final_score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandedUpdate {
    pub landed: u32,
}

/// Every message that can cross the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Version(u32),
    SetAltitude(SetAltitude),
    SetVelocity(SetVelocity),
    SetTurning(SetTurning),
    TakeOff,
    Handover(Handover),
    AircraftCreate(AircraftCreate),
    AircraftDestroy(AircraftDestroy),
    AircraftUpdate(AircraftUpdate),
    GameStart(GameStart),
    GameEnd(GameEnd),
    ScoreUpdate(ScoreUpdate),
    LandedUpdate(LandedUpdate),
}

impl Message {
    pub fn tag(&self) -> u8 {
        match self {
            Message::Version(_) => tags::VERSION,
            Message::SetAltitude(_) => tags::SET_ALTITUDE,
            Message::SetVelocity(_) => tags::SET_VELOCITY,
            Message::SetTurning(_) => tags::SET_TURNING,
            Message::TakeOff => tags::TAKE_OFF,
            Message::Handover(_) => tags::HANDOVER,
            Message::AircraftCreate(_) => tags::AIRCRAFT_CREATE,
            Message::AircraftDestroy(_) => tags::AIRCRAFT_DESTROY,
            Message::AircraftUpdate(_) => tags::AIRCRAFT_UPDATE,
            Message::GameStart(_) => tags::GAME_START,
            Message::GameEnd(_) => tags::GAME_END,
            Message::ScoreUpdate(_) => tags::SCORE_UPDATE,
            Message::LandedUpdate(_) => tags::LANDED_UPDATE,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Message::Version(_) => "Version",
            Message::SetAltitude(_) => "SetAltitude",
            Message::SetVelocity(_) => "SetVelocity",
            Message::SetTurning(_) => "SetTurning",
            Message::TakeOff => "TakeOff",
            Message::Handover(_) => "Handover",
            Message::AircraftCreate(_) => "AircraftCreate",
            Message::AircraftDestroy(_) => "AircraftDestroy",
            Message::AircraftUpdate(_) => "AircraftUpdate",
            Message::GameStart(_) => "GameStart",
            Message::GameEnd(_) => "GameEnd",
            Message::ScoreUpdate(_) => "ScoreUpdate",
            Message::LandedUpdate(_) => "LandedUpdate",
        }
    }
}
