//! Replication layer for the skylane simulation.
//!
//! An [`Endpoint`] hides whether the airspace is local (single player),
//! authoritative and replicated to a peer (server), or a mirror fed by a
//! peer (client). Transport runs on tokio tasks; the endpoints themselves
//! are polled once per frame and never block.

pub mod codec;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod id_map;
pub mod link;
pub mod protocol;

pub use config::NetConfig;
pub use endpoint::{ClientEndpoint, Endpoint, ServerEndpoint, SinglePlayerEndpoint};
pub use error::NetError;
pub use protocol::{Message, PROTOCOL_VERSION};

#[cfg(test)]
mod tests;
