//! The endpoint contract and its three implementations.
//!
//! A frame drives an endpoint as: `act_begin`, then any number of intent
//! calls, then `act_end(delta)`. None of these block.

mod client;
mod server;
mod single_player;

pub use client::ClientEndpoint;
pub use server::ServerEndpoint;
pub use single_player::SinglePlayerEndpoint;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use skylane_core::enums::{EndpointState, TurningState};
use skylane_core::types::Vector2D;
use skylane_sim::{Airspace, ObjectId};

use crate::error::NetError;
use crate::link::{Link, PendingLink};
use crate::protocol::Message;

pub trait Endpoint {
    fn state(&self) -> EndpointState;

    /// The airspace to render: authoritative or mirrored.
    fn airspace(&self) -> &Airspace;

    /// Drain and apply inbound messages. Called once per frame before input.
    fn act_begin(&mut self);

    /// Advance and/or emit outbound messages. Called once per frame after input.
    fn act_end(&mut self, delta: f64);

    fn take_off(&mut self);

    fn set_target_velocity(&mut self, id: ObjectId, target: Vector2D);

    fn set_target_altitude(&mut self, id: ObjectId, target: f64);

    fn set_turning(&mut self, id: ObjectId, turning: TurningState);

    fn hand_over(&mut self, id: ObjectId);

    /// Safe at any time. `Closed` is terminal.
    fn close(&mut self);

    /// The failure that closed this endpoint, if any.
    fn last_error(&self) -> Option<&NetError> {
        None
    }
}

/// Connection state shared by the networked endpoints.
struct Connection {
    state: EndpointState,
    pending: Option<PendingLink>,
    link: Option<Link>,
    cancel: CancellationToken,
    error: Option<NetError>,
}

impl Connection {
    fn new(pending: PendingLink, cancel: CancellationToken) -> Self {
        Self {
            state: EndpointState::Connecting,
            pending: Some(pending),
            link: None,
            cancel,
            error: None,
        }
    }

    fn is_connected(&self) -> bool {
        self.state == EndpointState::Connected
    }

    /// Pick up the background connect result. True on the poll that connects.
    fn poll_connect(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        match pending.poll() {
            None => false,
            Some(Ok(link)) => {
                self.pending = None;
                self.link = Some(link);
                self.state = EndpointState::Connected;
                true
            }
            Some(Err(error)) => {
                self.fail(error);
                false
            }
        }
    }

    /// Next inbound message. A failure closes the connection and ends the drain.
    fn recv(&mut self) -> Option<Message> {
        let next = self.link.as_mut()?.try_recv()?;
        match next {
            Ok(message) => Some(message),
            Err(error) => {
                self.fail(error);
                None
            }
        }
    }

    fn send(&mut self, message: Message) {
        let result = match &self.link {
            Some(link) => link.send(message),
            None => return,
        };
        if let Err(error) = result {
            self.fail(error);
        }
    }

    fn fail(&mut self, error: NetError) {
        if self.state == EndpointState::Closed {
            return;
        }
        warn!(%error, "closing endpoint");
        self.error = Some(error);
        self.close();
    }

    fn close(&mut self) {
        if self.state != EndpointState::Closed {
            info!("endpoint closed");
        }
        self.cancel.cancel();
        self.pending = None;
        self.link = None;
        self.state = EndpointState::Closed;
    }
}
