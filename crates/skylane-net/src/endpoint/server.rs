use std::collections::BTreeSet;
use std::net::{Ipv4Addr, SocketAddr};

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use skylane_core::enums::{EndpointState, TurningState};
use skylane_core::types::Vector2D;
use skylane_sim::{Airspace, ObjectId};

use super::{Connection, Endpoint};
use crate::config::NetConfig;
use crate::error::NetError;
use crate::id_map::IdMap;
use crate::link;
use crate::protocol::{
    AircraftCreate, AircraftDestroy, AircraftUpdate, GameEnd, GameStart, LandedUpdate, Message,
    ScoreUpdate, WireId,
};

/// Owns the authoritative airspace and replicates it to one client.
///
/// The simulation only advances while a client is connected.
pub struct ServerEndpoint {
    airspace: Airspace,
    connection: Connection,
    local_addr: SocketAddr,
    ids: IdMap,
    /// Wire ids sent to the client as of the last published tick.
    population: BTreeSet<WireId>,
    sent_score: Option<i32>,
    sent_landed: Option<u32>,
    sent_game_end: bool,
}

impl ServerEndpoint {
    /// Bind the configured port on all interfaces and wait for a client in
    /// the background. Port 0 picks a free port; see [`ServerEndpoint::local_addr`].
    pub fn listen(handle: &Handle, config: &NetConfig, airspace: Airspace) -> Result<Self, NetError> {
        let listener = std::net::TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.port))?;
        let local_addr = listener.local_addr()?;
        let cancel = CancellationToken::new();
        let pending = link::spawn_accept(
            handle,
            listener,
            config.protocol_version,
            config.connect_timeout(),
            cancel.clone(),
        )?;
        info!(%local_addr, "listening");

        Ok(Self {
            airspace,
            connection: Connection::new(pending, cancel),
            local_addr,
            ids: IdMap::new(),
            population: BTreeSet::new(),
            sent_score: None,
            sent_landed: None,
            sent_game_end: false,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Start over with a fresh airspace. Ids restart from zero and the client
    /// is told to clear its mirror.
    pub fn restart(&mut self, airspace: Airspace) {
        self.airspace = airspace;
        self.ids.clear();
        self.population.clear();
        self.sent_score = None;
        self.sent_landed = None;
        self.sent_game_end = false;
        if self.connection.is_connected() {
            self.send_game_start();
        }
    }

    fn send_game_start(&mut self) {
        let config = self.airspace.config();
        let start = GameStart {
            lateral_separation: config.lateral_separation,
            vertical_separation: config.vertical_separation,
        };
        self.connection.send(Message::GameStart(start));
    }

    fn apply_intent(&mut self, message: Message) {
        let (aircraft_id, applied) = match message {
            Message::TakeOff => {
                self.airspace.take_off();
                return;
            }
            Message::SetAltitude(m) => (
                m.aircraft_id,
                self.resolve(m.aircraft_id)
                    .is_some_and(|id| self.airspace.set_target_altitude(id, m.target)),
            ),
            Message::SetVelocity(m) => (
                m.aircraft_id,
                self.resolve(m.aircraft_id)
                    .is_some_and(|id| self.airspace.set_target_velocity(id, m.target)),
            ),
            Message::SetTurning(m) => (
                m.aircraft_id,
                self.resolve(m.aircraft_id)
                    .is_some_and(|id| self.airspace.set_turning(id, m.turning)),
            ),
            Message::Handover(m) => (
                m.aircraft_id,
                self.resolve(m.aircraft_id)
                    .is_some_and(|id| self.airspace.hand_over(id)),
            ),
            other => {
                warn!(message = other.name(), "ignoring server-bound message from client");
                return;
            }
        };
        if !applied {
            debug!(aircraft_id, "dropping command for unknown aircraft");
        }
    }

    fn resolve(&self, id: WireId) -> Option<ObjectId> {
        self.ids.object(id)
    }

    /// Emit create/update/destroy against the last published population,
    /// then any changed counters.
    fn publish(&mut self) {
        let mut outbound = Vec::new();
        let mut current = BTreeSet::new();

        for (object, (kinematics, aircraft)) in self.airspace.active_objects().iter() {
            let id = self.ids.assign(object);
            current.insert(id);
            if !self.population.contains(&id) {
                outbound.push(Message::AircraftCreate(AircraftCreate {
                    id,
                    name: aircraft.name().to_owned(),
                    kind: aircraft.kind(),
                    flight_plan: aircraft.flight_plan().clone(),
                }));
            }
            outbound.push(Message::AircraftUpdate(AircraftUpdate {
                id,
                state: aircraft.replicated_state(kinematics),
            }));
        }
        for &id in self.population.difference(&current) {
            outbound.push(Message::AircraftDestroy(AircraftDestroy { id }));
        }
        self.population = current;

        let score = self.airspace.score();
        if self.sent_score != Some(score) {
            self.sent_score = Some(score);
            outbound.push(Message::ScoreUpdate(ScoreUpdate { score }));
        }
        let landed = self.airspace.landed();
        if self.sent_landed != Some(landed) {
            self.sent_landed = Some(landed);
            outbound.push(Message::LandedUpdate(LandedUpdate { landed }));
        }
        if self.airspace.is_game_over() && !self.sent_game_end {
            self.sent_game_end = true;
            info!(score, "game over, notifying client");
            outbound.push(Message::GameEnd(GameEnd {
                final_time: self.airspace.elapsed_secs(),
                final_score: score,
            }));
        }

        for message in outbound {
            self.connection.send(message);
        }
    }
}

impl Endpoint for ServerEndpoint {
    fn state(&self) -> EndpointState {
        self.connection.state
    }

    fn airspace(&self) -> &Airspace {
        &self.airspace
    }

    fn act_begin(&mut self) {
        if self.connection.poll_connect() {
            self.send_game_start();
        }
        while let Some(message) = self.connection.recv() {
            self.apply_intent(message);
        }
    }

    fn act_end(&mut self, delta: f64) {
        if !self.connection.is_connected() {
            return;
        }
        self.airspace.refresh(delta);
        self.publish();
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
        self.connection.close();
    }

    fn last_error(&self) -> Option<&NetError> {
        self.connection.error.as_ref()
    }
}
