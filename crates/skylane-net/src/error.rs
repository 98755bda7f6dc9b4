//! Replication errors. Any of these closes the endpoint that hit it.

use std::io;

use thiserror::Error;

use crate::codec::CodecError;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("protocol version mismatch: local {local}, remote {remote}")]
    VersionMismatch { local: u32, remote: u32 },

    #[error("transport failure: {0}")]
    Transport(#[from] io::Error),

    #[error("timed out connecting to peer")]
    ConnectTimeout,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("peer sent {0} before the version handshake")]
    UnexpectedMessage(&'static str),

    #[error("connection closed")]
    Closed,
}
