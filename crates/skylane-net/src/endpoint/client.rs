use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use skylane_core::config::AirspaceConfig;
use skylane_core::enums::{EndpointState, TurningState};
use skylane_core::types::Vector2D;
use skylane_sim::aircraft::NewAircraft;
use skylane_sim::{Airspace, ObjectId};

use super::{Connection, Endpoint};
use crate::config::NetConfig;
use crate::error::NetError;
use crate::id_map::IdMap;
use crate::link;
use crate::protocol::{Handover, Message, SetAltitude, SetTurning, SetVelocity, WireId};

/// Mirrors a server's airspace. Intents are forwarded, never applied locally.
pub struct ClientEndpoint {
    airspace: Airspace,
    connection: Connection,
    /// Server wire ids to local mirror handles.
    ids: IdMap,
    /// Intents collected this frame, sent in `act_end`.
    outbound: Vec<Message>,
}

impl ClientEndpoint {
    /// Start connecting to `host` in the background. `map` supplies the
    /// bounds and point sets for the mirror.
    pub fn connect(handle: &Handle, host: &str, config: &NetConfig, map: AirspaceConfig) -> Self {
        let cancel = CancellationToken::new();
        let pending = link::spawn_connect(
            handle,
            format!("{host}:{}", config.port),
            config.protocol_version,
            config.connect_timeout(),
            cancel.clone(),
        );
        Self {
            airspace: Airspace::mirror(map),
            connection: Connection::new(pending, cancel),
            ids: IdMap::new(),
            outbound: Vec::new(),
        }
    }

    fn apply(&mut self, message: Message) {
        match message {
            Message::GameStart(start) => {
                info!("game started");
                self.airspace.clear();
                self.ids.clear();
                self.airspace
                    .set_separation(start.lateral_separation, start.vertical_separation);
            }
            Message::AircraftCreate(create) => {
                if self.local(create.id).is_some() {
                    debug!(id = create.id, "duplicate create");
                    return;
                }
                let new = NewAircraft::new(create.name, create.kind, create.flight_plan);
                let object = self.airspace.insert(new);
                self.ids.bind(create.id, object);
            }
            Message::AircraftUpdate(update) => {
                let applied = self
                    .local(update.id)
                    .is_some_and(|object| self.airspace.apply_replicated_state(object, &update.state));
                if !applied {
                    debug!(id = update.id, "dropping update for unknown aircraft or bad state");
                }
            }
            Message::AircraftDestroy(destroy) => {
                if !self.local(destroy.id).is_some_and(|object| self.airspace.cull(object)) {
                    debug!(id = destroy.id, "destroy for unknown aircraft");
                }
            }
            Message::ScoreUpdate(update) => self.airspace.set_score(update.score),
            Message::LandedUpdate(update) => self.airspace.set_landed(update.landed),
            Message::GameEnd(end) => {
                info!(score = end.final_score, time = end.final_time, "game over");
                self.airspace.end_game(end.final_time, end.final_score);
            }
            other => warn!(message = other.name(), "ignoring client-bound message from server"),
        }
    }

    fn local(&self, id: WireId) -> Option<ObjectId> {
        self.ids.object(id).filter(|&object| self.airspace.contains(object))
    }

    /// Queue an intent naming `object`, if the server knows it.
    fn forward(&mut self, object: ObjectId, intent: impl FnOnce(WireId) -> Message) {
        if !self.connection.is_connected() {
            return;
        }
        match self.ids.wire_id(object) {
            Some(id) => self.outbound.push(intent(id)),
            None => debug!(?object, "no wire id for aircraft"),
        }
    }
}

impl Endpoint for ClientEndpoint {
    fn state(&self) -> EndpointState {
        self.connection.state
    }

    fn airspace(&self) -> &Airspace {
        &self.airspace
    }

    /// Culled objects from last frame are purged before new messages apply,
    /// then warnings are recomputed on the updated mirror.
    fn act_begin(&mut self) {
        self.airspace.purge_culled();
        self.connection.poll_connect();
        if !self.connection.is_connected() {
            return;
        }
        while let Some(message) = self.connection.recv() {
            self.apply(message);
        }
        self.airspace.refresh_mirror();
    }

    fn act_end(&mut self, _delta: f64) {
        for message in std::mem::take(&mut self.outbound) {
            self.connection.send(message);
        }
    }

    fn take_off(&mut self) {
        if self.connection.is_connected() {
            self.outbound.push(Message::TakeOff);
        }
    }

    fn set_target_velocity(&mut self, id: ObjectId, target: Vector2D) {
        self.forward(id, |aircraft_id| {
            Message::SetVelocity(SetVelocity {
                aircraft_id,
                target,
            })
        });
    }

    fn set_target_altitude(&mut self, id: ObjectId, target: f64) {
        self.forward(id, |aircraft_id| {
            Message::SetAltitude(SetAltitude {
                aircraft_id,
                target,
            })
        });
    }

    fn set_turning(&mut self, id: ObjectId, turning: TurningState) {
        self.forward(id, |aircraft_id| {
            Message::SetTurning(SetTurning {
                aircraft_id,
                turning,
            })
        });
    }

    fn hand_over(&mut self, id: ObjectId) {
        self.forward(id, |aircraft_id| Message::Handover(Handover { aircraft_id }));
    }

    fn close(&mut self) {
        self.outbound.clear();
        self.connection.close();
    }

    fn last_error(&self) -> Option<&NetError> {
        self.connection.error.as_ref()
    }
}
